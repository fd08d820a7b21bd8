//! 远端补丁包命名规则与本地输出目录布局

use chrono::{DateTime, Local};
use std::io;
use std::path::{Path, PathBuf};

use super::error::DownloadError;

/// 8位编号能表示的最大值
pub const MAX_PAK_INDEX: u64 = 99_999_999;

/// 编号对应的补丁包路径
///
/// 编号 42 对应 `00000042/Patch00000042.pak`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakPath {
    index: u64,
    padded: String,
}

impl PakPath {
    pub fn from_index(index: u64) -> Result<Self, DownloadError> {
        if index > MAX_PAK_INDEX {
            return Err(DownloadError::IndexOverflow(index));
        }
        Ok(Self {
            index,
            padded: format!("{:08}", index),
        })
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// 8位补零编号
    pub fn padded(&self) -> &str {
        &self.padded
    }

    pub fn file_name(&self) -> String {
        format!("Patch{}.pak", self.padded)
    }

    /// 相对 baseUrl 的远端路径
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.padded, self.file_name())
    }

    /// 拼接远端地址，不对 baseUrl 的结尾斜杠做任何处理
    pub fn remote_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url, self.relative_path())
    }
}

/// 单次运行的输出目录 `<root>/<HH.MM.SS>`
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// 按当前本地时间创建本次运行的目录
    pub fn create(root: &Path) -> io::Result<Self> {
        Self::create_at(root, Local::now())
    }

    /// 目录名已存在时追加 `-2`、`-3` …，保证每次运行都是新目录
    pub fn create_at(root: &Path, now: DateTime<Local>) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let stamp = now.format("%H.%M.%S").to_string();
        let mut suffix = 1u32;
        loop {
            let name = if suffix == 1 {
                stamp.clone()
            } else {
                format!("{}-{}", stamp, suffix)
            };
            let candidate = root.join(name);
            match std::fs::create_dir(&candidate) {
                Ok(()) => {
                    log::debug!("创建输出目录: {}", candidate.display());
                    return Ok(Self { path: candidate });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => return Err(e),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
