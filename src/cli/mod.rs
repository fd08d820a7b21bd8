//! CLI: 命令行参数解析
//!
//! 下载区间、地址和输出目录全部来自 JSON 配置文件，命令行只负责选择配置文件和输出级别。
//!
//! - 默认配置：`pakdown`（读取当前目录下的 `config.json`）
//! - 指定配置：`pakdown -c patches.json`
//! - 详细日志：`pakdown -v` / `pakdown -vv`

use clap::Parser;

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::core::error::DownloadError;

/// pakdown 命令行参数
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pakdown",
    author = "panzhifu",
    version = env!("CARGO_PKG_VERSION"),
    about = "按编号区间顺序下载补丁包",
    long_about = "读取 JSON 配置文件中的 baseUrl、from、to、outputPath，\n按编号依次下载 <baseUrl>/<8位编号>/Patch<8位编号>.pak 到带时间戳的输出目录。\n\n示例：\n  pakdown\n  pakdown -c patches.json -v\n"
)]
pub struct Args {
    /// 配置文件路径
    #[arg(short = 'c', long, default_value_t = String::from(DEFAULT_CONFIG_PATH), help = "JSON 配置文件路径。")]
    pub config: String,

    /// 日志详细程度，可重复
    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "输出更详细的日志（-v 信息，-vv 调试）。")]
    pub verbose: u8,

    /// 不显示进度条
    #[arg(short = 'q', long, help = "不显示进度条。")]
    pub quiet: bool,
}

impl Args {
    /// env_logger 的默认过滤级别，RUST_LOG 优先
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    pub fn load_config(&self) -> Result<Config, DownloadError> {
        Config::load(&self.config)
    }
}
