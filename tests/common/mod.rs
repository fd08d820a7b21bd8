#![allow(dead_code)]

use actix::prelude::*;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use pakdown::core::{ProgressObserver, ReadLimits, TransferEngine, TransferProgress};
use pakdown::utils::logger::FailureLogActor;

/// 模拟服务器对一次请求的回应
pub enum Reply {
    /// 200 + 完整内容
    Body(Vec<u8>),
    /// 任意状态码，无内容
    Status(u16),
    /// 302 跳转到指定路径
    Redirect(String),
    /// 200 + 带 Content-Encoding 的原始内容
    Encoded { encoding: &'static str, body: Vec<u8> },
    /// 声明 `declared` 字节，只发送 `sent` 后断开连接
    Truncated { declared: usize, sent: Vec<u8> },
    /// 接受连接后不回应
    Stall,
}

/// 按顺序记录请求路径的最小 HTTP/1.1 服务器
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// `handler(path, attempt)`，attempt 为该路径第几次被请求（从 1 开始）
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, usize) -> Reply + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        actix_rt::spawn(async move {
            let mut attempts: HashMap<String, usize> = HashMap::new();
            while let Ok((mut socket, _)) = listener.accept().await {
                let Some(path) = read_request_path(&mut socket).await else {
                    continue;
                };
                let attempt = {
                    let count = attempts.entry(path.clone()).or_insert(0);
                    *count += 1;
                    *count
                };
                seen.lock().unwrap().push(path.clone());
                let reply = handler(&path, attempt);
                actix_rt::spawn(write_reply(socket, reply));
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| p.as_str() == path).count()
    }
}

async fn read_request_path(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

async fn write_reply(mut socket: TcpStream, reply: Reply) {
    match reply {
        Reply::Body(body) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
        }
        Reply::Status(code) => {
            let head = format!(
                "HTTP/1.1 {} Status\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                code
            );
            let _ = socket.write_all(head.as_bytes()).await;
        }
        Reply::Redirect(location) => {
            let head = format!(
                "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                location
            );
            let _ = socket.write_all(head.as_bytes()).await;
        }
        Reply::Encoded { encoding, body } => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Encoding: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                encoding,
                body.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
        }
        Reply::Truncated { declared, sent } => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                declared
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&sent).await;
        }
        Reply::Stall => {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }
    let _ = socket.flush().await;
    let _ = socket.shutdown().await;
}

/// 一个不会被监听的本地地址
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn engine(log_path: &Path, read_timeout: Duration) -> TransferEngine {
    let failure_log = FailureLogActor::new(log_path).start();
    TransferEngine::new(failure_log, ReadLimits::new(read_timeout, 0), "pakdown-test")
}

pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

pub fn pak_path(index: u64) -> String {
    format!("/{:08}/Patch{:08}.pak", index, index)
}

/// 记录观察者收到的事件
#[derive(Debug, Default)]
pub struct Recorder {
    pub started: Vec<(String, u64)>,
    pub updates: Vec<u64>,
    pub finished: usize,
    pub abandoned: usize,
}

impl ProgressObserver for Recorder {
    fn start(&mut self, file_name: &str, total_bytes: u64) {
        self.started.push((file_name.to_string(), total_bytes));
    }

    fn update(&mut self, progress: &TransferProgress) {
        self.updates.push(progress.transferred_bytes);
    }

    fn finish(&mut self) {
        self.finished += 1;
    }

    fn abandon(&mut self) {
        self.abandoned += 1;
    }
}
