use std::time::{Duration, Instant};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// 字节换算为 MB，保留两位小数
pub fn size_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / BYTES_PER_MB;
    (mb * 100.0).round() / 100.0
}

/// 单次尝试内的传输进度，每次重试都会重新计时
#[derive(Debug, Clone)]
pub struct TransferProgress {
    /// 0 表示服务器没有给出 Content-Length
    pub total_bytes: u64,
    pub transferred_bytes: u64,
    started: Instant,
    pub elapsed: Duration,
}

impl TransferProgress {
    pub fn new(total_bytes: u64, started: Instant) -> Self {
        Self {
            total_bytes,
            transferred_bytes: 0,
            started,
            elapsed: started.elapsed(),
        }
    }

    /// 本次尝试的开始时间
    pub fn started(&self) -> Instant {
        self.started
    }

    /// 收到一个数据块后更新
    pub fn record_chunk(&mut self, len: usize) {
        self.transferred_bytes += len as u64;
        self.elapsed = self.started.elapsed();
    }

    pub fn total_known(&self) -> bool {
        self.total_bytes > 0
    }

    pub fn total_mb(&self) -> f64 {
        size_mb(self.total_bytes)
    }

    pub fn transferred_mb(&self) -> f64 {
        size_mb(self.transferred_bytes)
    }

    /// 平均速度（KB/s），计时为零时没有意义
    pub fn speed_kbps(&self) -> Option<f64> {
        kb_per_sec(self.transferred_bytes, self.elapsed)
    }

    pub fn speed_label(&self) -> String {
        match self.speed_kbps() {
            Some(speed) => format!("{:.2}", speed),
            None => "N/A".to_string(),
        }
    }

    pub fn value_label(&self) -> String {
        format!("{:.2}", self.transferred_bytes as f64 / BYTES_PER_MB)
    }
}

pub fn kb_per_sec(bytes: u64, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return None;
    }
    Some(bytes as f64 / 1024.0 / secs)
}

/// 进度观察者，每个文件 start 一次，结束时 finish 或 abandon
pub trait ProgressObserver {
    fn start(&mut self, file_name: &str, total_bytes: u64);
    fn update(&mut self, progress: &TransferProgress);
    fn finish(&mut self);
    fn abandon(&mut self);
}

/// 不输出任何内容的观察者
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn start(&mut self, _file_name: &str, _total_bytes: u64) {}
    fn update(&mut self, _progress: &TransferProgress) {}
    fn finish(&mut self) {}
    fn abandon(&mut self) {}
}
