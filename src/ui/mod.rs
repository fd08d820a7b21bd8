mod progress;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
pub use progress::ConsoleProgress;

pub fn print_success(message: &str) {
    println!("✓ {}", message);
}

pub fn print_error(message: &str) {
    println!("✗ {}", message);
}

/// 一次运行的统计
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub requested: u64,
    pub completed: u64,
    /// 重试耗尽，已写入失败日志
    pub exhausted: u64,
    /// 非 200 或本地错误，直接跳过
    pub skipped: u64,
    pub total_bytes: u64,
    pub elapsed_time: Duration,
}

impl RunSummary {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    pub fn failed_count(&self) -> u64 {
        self.exhausted + self.skipped
    }

    pub fn is_clean(&self) -> bool {
        self.failed_count() == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n下载摘要:")?;
        writeln!(f, "输出目录: {}", self.output_dir.display())?;
        writeln!(f, "总文件数: {}", self.requested)?;
        writeln!(f, "总大小: {}", format_size(self.total_bytes))?;
        writeln!(f, "耗时: {:.2}秒", self.elapsed_time.as_secs_f64())?;
        writeln!(f, "成功: {}", self.completed)?;
        writeln!(f, "重试耗尽: {}", self.exhausted)?;
        writeln!(f, "跳过: {}", self.skipped)?;
        Ok(())
    }
}

pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
