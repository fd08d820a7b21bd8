//! Core: 补丁包命名、单文件传输引擎与顺序调度

pub mod error;
pub mod layout;
pub mod progress;
pub mod sequence;
pub mod task;
pub mod transfer;

pub use error::{DownloadError, DownloadResult};
pub use layout::{OutputDirectory, PakPath, MAX_PAK_INDEX};
pub use progress::{ProgressObserver, SilentProgress, TransferProgress};
pub use sequence::SequenceRunner;
pub use task::{DownloadTask, TransferOutcome};
pub use transfer::{ReadLimits, TransferEngine};
