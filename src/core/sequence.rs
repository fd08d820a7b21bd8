//! 顺序调度：按编号从小到大逐个下载，上一个文件结束后才开始下一个

use std::path::Path;
use std::time::Instant;

use crate::ui::RunSummary;
use super::error::DownloadError;
use super::layout::{OutputDirectory, PakPath};
use super::progress::ProgressObserver;
use super::task::{DownloadTask, TransferOutcome, DEFAULT_MAX_RETRIES};
use super::transfer::TransferEngine;

pub struct SequenceRunner {
    engine: TransferEngine,
    observer: Box<dyn ProgressObserver>,
    max_retries: u32,
}

impl SequenceRunner {
    pub fn new(engine: TransferEngine, observer: Box<dyn ProgressObserver>) -> Self {
        Self {
            engine,
            observer,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// 下载 `[from, to]` 区间内的全部补丁包
    ///
    /// 单个文件失败只记录并跳过，不会中断整个区间；`from > to` 时不发起任何请求。
    pub async fn run(
        &mut self,
        from: u64,
        to: u64,
        output_root: &Path,
        base_url: &str,
    ) -> Result<RunSummary, DownloadError> {
        let started = Instant::now();
        if from <= to {
            PakPath::from_index(to).map_err(|e| DownloadError::Config(e.to_string()))?;
        }

        let output = OutputDirectory::create(output_root)?;
        let mut summary = RunSummary::new(output.path().to_path_buf());
        log::info!("输出目录: {}", output.path().display());

        if from > to {
            log::info!("编号区间 {} - {} 为空，跳过下载", from, to);
            return Ok(summary);
        }

        for current in from..=to {
            let pak = PakPath::from_index(current)?;
            let task = DownloadTask::for_pak(&pak, output.path(), base_url)
                .with_retries(self.max_retries);
            let file_name = task.file_name.clone();
            summary.requested += 1;

            match self.engine.download(task, self.observer.as_mut()).await {
                Ok(TransferOutcome::Completed { bytes }) => {
                    summary.completed += 1;
                    summary.total_bytes += bytes;
                }
                Ok(TransferOutcome::ExhaustedRetries { attempts, error }) => {
                    summary.exhausted += 1;
                    log::warn!("{} 在 {} 次尝试后放弃: {}", file_name, attempts, error);
                }
                Err(error) => {
                    summary.skipped += 1;
                    println!("{}, skipping...", error);
                    log::error!("{} 下载失败: {}", file_name, error);
                }
            }
        }

        summary.elapsed_time = started.elapsed();
        Ok(summary)
    }
}
