use std::path::{Path, PathBuf};

use super::layout::PakPath;

/// 默认重试次数（不含首次请求）
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// 单个文件的下载任务，由调度器按编号创建，交给传输引擎消费
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub index: u64,
    pub remote_url: String,
    pub file_name: String,
    pub local_path: PathBuf,
    pub remaining_retries: u32,
}

impl DownloadTask {
    pub fn new(index: u64, dest_dir: &Path, file_name: &str, remote_url: &str) -> Self {
        Self {
            index,
            remote_url: remote_url.to_string(),
            file_name: file_name.to_string(),
            local_path: dest_dir.join(file_name),
            remaining_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// 根据补丁包编号生成任务
    pub fn for_pak(pak: &PakPath, dest_dir: &Path, base_url: &str) -> Self {
        Self::new(pak.index(), dest_dir, &pak.file_name(), &pak.remote_url(base_url))
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.remaining_retries = max_retries;
        self
    }
}

/// 单个文件下载的最终结果，两种情况都不会中断调度
#[derive(Debug)]
pub enum TransferOutcome {
    Completed { bytes: u64 },
    ExhaustedRetries { attempts: u32, error: super::error::DownloadError },
}

impl TransferOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferOutcome::Completed { .. })
    }
}
