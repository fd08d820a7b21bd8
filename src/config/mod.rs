use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::DownloadError;
use crate::core::task::DEFAULT_MAX_RETRIES;
use crate::utils::logger::DEFAULT_FAILURE_LOG;
use crate::utils::validator;

/// 默认配置文件，位于当前工作目录
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// 配置结构体，对应 JSON 配置文件（camelCase 字段名）
///
/// ```json
/// {
///   "baseUrl": "http://cdn.example.com/patches",
///   "from": 1,
///   "to": 120,
///   "outputPath": "./downloads"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// 补丁包所在的基础地址，不做结尾斜杠处理
    pub base_url: String,
    /// 起始编号（含）
    pub from: u64,
    /// 结束编号（含）
    pub to: u64,
    /// 输出根目录，每次运行在其下创建时间戳子目录
    pub output_path: String,
    /// 传输错误时的重试次数
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// 单次请求等待响应头或下一块数据的超时时间（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 最低平均速度（KB/s），决定单次尝试的总时长上限；0 表示不限制
    #[serde(default = "default_min_speed_kbps")]
    pub min_speed_kbps: u64,
    /// 失败日志文件
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_min_speed_kbps() -> u64 {
    1
}

fn default_log_file() -> String {
    DEFAULT_FAILURE_LOG.to_string()
}

fn default_user_agent() -> String {
    format!("pakdown/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// 加载并校验配置文件
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DownloadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DownloadError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&content)?;
        log::debug!("已加载配置文件: {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, DownloadError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置合法性
    pub fn validate(&self) -> Result<(), DownloadError> {
        validator::validate_base_url(&self.base_url)
            .and_then(|_| validator::validate_output_path(&self.output_path))
            .and_then(|_| validator::validate_range(self.from, self.to))
            .and_then(|_| validator::validate_timeout(self.timeout_secs))
            .map_err(|e| DownloadError::Config(e.to_string()))?;

        if self.from > self.to {
            log::warn!("from ({}) 大于 to ({})，本次不会下载任何文件", self.from, self.to);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn output_root(&self) -> PathBuf {
        PathBuf::from(&self.output_path)
    }

    /// 区间内的文件数
    pub fn file_count(&self) -> u64 {
        if self.from > self.to {
            0
        } else {
            self.to - self.from + 1
        }
    }

    /// 获取配置摘要信息
    pub fn get_summary(&self) -> String {
        format!(
            "配置摘要:\n\
            - 基础地址: {}\n\
            - 编号区间: {} - {} (共 {} 个)\n\
            - 输出目录: {}\n\
            - 重试次数: {}\n\
            - 超时时间: {} 秒\n\
            - 最低速度: {} KB/s\n\
            - 失败日志: {}",
            self.base_url,
            self.from,
            self.to,
            self.file_count(),
            self.output_path,
            self.max_retries,
            self.timeout_secs,
            self.min_speed_kbps,
            self.log_file,
        )
    }
}
