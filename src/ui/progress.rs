use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::core::progress::{size_mb, ProgressObserver, TransferProgress};

const BAR_TEMPLATE: &str = "{bar:40} {percent}% | {msg}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg}";

/// 控制台进度条，同一时间只有一个文件在下载，所以只维护一个进度条
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
    total_mb: f64,
    hidden: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        ConsoleProgress {
            bar: None,
            total_mb: 0.0,
            hidden: false,
        }
    }

    /// 不向终端输出，测试用
    pub fn hidden() -> Self {
        ConsoleProgress {
            hidden: true,
            ..Self::new()
        }
    }

    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(|pb| pb.position())
    }

    pub fn message(&self) -> Option<String> {
        self.bar.as_ref().map(|pb| pb.message())
    }

    fn status(&self, value: &str, speed: &str) -> String {
        if self.total_mb > 0.0 {
            format!("{}/{} MB | Speed: {} KB/s", value, self.total_mb, speed)
        } else {
            format!("{} MB | Speed: {} KB/s", value, speed)
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ConsoleProgress {
    fn start(&mut self, _file_name: &str, total_bytes: u64) {
        let pb = if total_bytes > 0 {
            let style = ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█░");
            ProgressBar::new(total_bytes).with_style(style)
        } else {
            let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            ProgressBar::new_spinner().with_style(style)
        };
        if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        self.total_mb = size_mb(total_bytes);
        pb.set_message(self.status("0.00", "N/A"));
        self.bar = Some(pb);
    }

    fn update(&mut self, progress: &TransferProgress) {
        let message = self.status(&progress.value_label(), &progress.speed_label());
        if let Some(pb) = &self.bar {
            if progress.total_known() {
                pb.set_position(progress.transferred_bytes);
            } else {
                pb.tick();
            }
            pb.set_message(message);
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish();
        }
    }

    fn abandon(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.abandon();
        }
    }
}
