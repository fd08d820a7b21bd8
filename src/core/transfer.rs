//! 传输引擎：把一个远端文件流式写入本地文件，出现传输错误时从头重试

use actix::Addr;
use awc::http::header::{self, HeaderMap};
use awc::http::StatusCode;
use awc::Client;
use futures::{Stream, StreamExt};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::time::{timeout, timeout_at};

use crate::config::Config;
use crate::utils::logger::{FailureLogActor, LogFailure};
use super::error::DownloadError;
use super::progress::{ProgressObserver, TransferProgress};
use super::task::{DownloadTask, TransferOutcome};

pub struct TransferEngine {
    client: Client,
    failure_log: Addr<FailureLogActor>,
    limits: ReadLimits,
}

/// 单次尝试的时间限制
#[derive(Debug, Clone, Copy)]
pub struct ReadLimits {
    /// 等待响应头和每个数据块的最长时间
    pub read_timeout: Duration,
    /// 最低平均速度（字节/秒），0 表示不限制整次尝试的时长
    pub min_speed: u64,
}

impl ReadLimits {
    pub fn new(read_timeout: Duration, min_speed: u64) -> Self {
        Self { read_timeout, min_speed }
    }

    /// 整次尝试的时长上限：read_timeout 加上按最低速度传完 max(总大小, 已传输) 所需的时间
    pub fn attempt_budget(&self, progress: &TransferProgress) -> Option<Duration> {
        if self.min_speed == 0 {
            return None;
        }
        let bytes = progress.total_bytes.max(progress.transferred_bytes);
        Some(self.read_timeout + Duration::from_secs_f64(bytes as f64 / self.min_speed as f64))
    }
}

impl TransferEngine {
    pub fn new(failure_log: Addr<FailureLogActor>, limits: ReadLimits, user_agent: &str) -> Self {
        // awc 自带的请求超时会截断大文件，时长改由 ReadLimits 控制；
        // 重定向不跟随，非 200 一律按状态码错误处理
        let client = Client::builder()
            .disable_timeout()
            .disable_redirects()
            .add_default_header((header::USER_AGENT, user_agent.to_string()))
            .finish();
        Self {
            client,
            failure_log,
            limits,
        }
    }

    pub fn from_config(config: &Config, failure_log: Addr<FailureLogActor>) -> Self {
        let limits = ReadLimits::new(config.timeout(), config.min_speed_kbps.saturating_mul(1024));
        Self::new(failure_log, limits, &config.user_agent)
    }

    /// 下载单个文件
    ///
    /// - 成功或重试耗尽都返回 `Ok`，调度器据此继续下一个编号
    /// - 非 200 状态码和本地 IO 错误不重试，以 `Err` 返回
    pub async fn download(
        &self,
        mut task: DownloadTask,
        observer: &mut dyn ProgressObserver,
    ) -> Result<TransferOutcome, DownloadError> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            log::info!("下载 {} (第 {} 次尝试): {}", task.file_name, attempts, task.remote_url);

            let error = match self.attempt(&task, observer).await {
                Ok(bytes) => {
                    println!("File {} downloaded!\n", task.file_name);
                    log::info!("{} 下载完成，共 {} 字节", task.file_name, bytes);
                    return Ok(TransferOutcome::Completed { bytes });
                }
                Err(error) => error,
            };

            remove_partial(&task.local_path).await;

            if !error.is_retryable() {
                log::error!("{} 下载失败，不再重试: {}", task.file_name, error);
                return Err(error);
            }

            if task.remaining_retries == 0 {
                log::error!("{} 重试次数已用完 ({} 次尝试): {}", task.file_name, attempts, error);
                self.record_failure(&task.file_name, &error).await;
                return Ok(TransferOutcome::ExhaustedRetries { attempts, error });
            }

            log::warn!("{} 传输出错: {}", task.file_name, error);
            println!(
                "Retrying download: {}... ({} retries left)",
                task.file_name, task.remaining_retries
            );
            task.remaining_retries -= 1;
        }
    }

    /// 单次尝试，每次都重新计时
    async fn attempt(
        &self,
        task: &DownloadTask,
        observer: &mut dyn ProgressObserver,
    ) -> Result<u64, DownloadError> {
        let started = Instant::now();
        // 写入服务器发送的原始字节，Content-Length 与写入量才能对应
        let request = self.client.get(task.remote_url.as_str()).no_decompress().send();
        let read_timeout = self.limits.read_timeout;
        let mut response = timeout(read_timeout, request)
            .await
            .map_err(|_| DownloadError::Timeout(read_timeout))??;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::HttpStatus {
                url: task.remote_url.clone(),
                status: status.as_u16(),
            });
        }

        let total = content_length(response.headers());
        println!("\nDownloading file: {}...", task.file_name);

        let file = fs::File::create(&task.local_path).await?;
        let mut progress = TransferProgress::new(total, started);
        observer.start(&task.file_name, total);

        match stream_to_file(&mut response, file, &mut progress, observer, self.limits).await {
            Ok(()) => {
                observer.finish();
                Ok(progress.transferred_bytes)
            }
            Err(e) => {
                observer.abandon();
                Err(e)
            }
        }
    }

    async fn record_failure(&self, file_name: &str, error: &DownloadError) {
        let msg = LogFailure {
            file_name: file_name.to_string(),
            error: error.to_string(),
        };
        match self.failure_log.send(msg).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("写入失败日志出错: {}", e),
            Err(e) => log::error!("发送失败日志消息失败: {}", e),
        }
    }
}

/// 读取 Content-Length，缺失或无法解析时视为 0（未知）
pub fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}

/// 逐块写入文件，每个数据块都通知观察者
///
/// 单块等待超过 `read_timeout`、整次尝试超过 `attempt_budget`、
/// 或流结束时字节数与 Content-Length 不符，都视为传输错误。
pub async fn stream_to_file<S, B, E>(
    body: &mut S,
    mut file: fs::File,
    progress: &mut TransferProgress,
    observer: &mut dyn ProgressObserver,
    limits: ReadLimits,
) -> Result<(), DownloadError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<DownloadError>,
{
    loop {
        let read_deadline = Instant::now() + limits.read_timeout;
        let budget = limits.attempt_budget(progress);
        let attempt_deadline = budget.map(|b| progress.started() + b);
        let deadline = match attempt_deadline {
            Some(end) => end.min(read_deadline),
            None => read_deadline,
        };

        let next = match timeout_at(deadline.into(), body.next()).await {
            Ok(next) => next,
            Err(_) => {
                return Err(match (attempt_deadline, budget) {
                    (Some(end), Some(budget)) if end <= read_deadline => {
                        DownloadError::DeadlineExceeded(budget)
                    }
                    _ => DownloadError::Timeout(limits.read_timeout),
                });
            }
        };
        let chunk = match next {
            Some(chunk) => chunk.map_err(Into::into)?,
            None => break,
        };
        let bytes = chunk.as_ref();
        file.write_all(bytes).await?;
        progress.record_chunk(bytes.len());
        observer.update(progress);
    }
    file.flush().await?;

    if progress.total_known() && progress.transferred_bytes != progress.total_bytes {
        return Err(DownloadError::Network(format!(
            "incomplete body: got {} of {} bytes",
            progress.transferred_bytes, progress.total_bytes
        )));
    }
    Ok(())
}

async fn remove_partial(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => log::debug!("已删除不完整文件: {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("删除不完整文件失败 {}: {}", path.display(), e),
    }
}
