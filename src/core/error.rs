use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("Failed to get '{url}' ({status})")]
    HttpStatus {
        url: String,
        status: u16,
    },

    #[error("网络错误: {0}")]
    Network(String),

    #[error("下载超时: {0:?} 内没有收到数据")]
    Timeout(Duration),

    #[error("下载超时: 单次尝试超过 {0:?}")]
    DeadlineExceeded(Duration),

    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("编号超出8位: {0}")]
    IndexOverflow(u64),
}

impl DownloadError {
    /// 传输层错误（连接失败、读流中断、超时）才会整体重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DownloadError::Network(_)
                | DownloadError::Timeout(_)
                | DownloadError::DeadlineExceeded(_)
        )
    }
}

impl From<serde_json::Error> for DownloadError {
    fn from(error: serde_json::Error) -> Self {
        DownloadError::Config(error.to_string())
    }
}

impl From<awc::error::SendRequestError> for DownloadError {
    fn from(error: awc::error::SendRequestError) -> Self {
        DownloadError::Network(error.to_string())
    }
}

impl From<awc::error::PayloadError> for DownloadError {
    fn from(error: awc::error::PayloadError) -> Self {
        DownloadError::Network(error.to_string())
    }
}

pub type DownloadResult<T> = Result<T, DownloadError>;
