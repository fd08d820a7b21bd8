use actix::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 默认失败日志文件，位于当前工作目录
pub const DEFAULT_FAILURE_LOG: &str = "logs.txt";

/// 一个文件重试耗尽后的失败记录
pub struct LogFailure {
    pub file_name: String,
    pub error: String,
}
impl Message for LogFailure { type Result = io::Result<()>; }

impl LogFailure {
    pub fn line(&self) -> String {
        format!("Error while reading config file: {} - {}\n", self.file_name, self.error)
    }
}

/// 失败日志Actor：只追加，首次写入时才打开文件，每行写完立即刷新
pub struct FailureLogActor {
    file_path: PathBuf,
    writer: Option<File>,
    written: u64,
}

impl FailureLogActor {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            writer: None,
            written: 0,
        }
    }

    fn open(&self) -> io::Result<File> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let file = match self.writer.take() {
            Some(file) => file,
            None => self.open()?,
        };
        let writer = self.writer.insert(file);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

impl Actor for FailureLogActor {
    type Context = Context<Self>;
}

impl Handler<LogFailure> for FailureLogActor {
    type Result = io::Result<()>;
    fn handle(&mut self, msg: LogFailure, _ctx: &mut Self::Context) -> Self::Result {
        let line = msg.line();
        if let Err(e) = self.write_line(&line) {
            log::error!("失败日志写入失败 {}: {}", self.file_path.display(), e);
            return Err(e);
        }
        log::debug!("失败日志已写入第 {} 条: {}", self.written, line.trim_end());
        Ok(())
    }
}
