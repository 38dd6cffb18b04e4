use thiserror::Error;

use super::{BlockIndex, InodeIndex};

/// every way an operation on [MemFS](crate::MemFS) can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("invalid block index {index}, the store only has {total} blocks")]
    InvalidBlockIndex { index: BlockIndex, total: usize },
    #[error("no free block available: requested {requested}, {available} free")]
    NoFreeBlockAvailable { requested: usize, available: usize },
    #[error("no available inode, all {capacity} slots are allocated")]
    NoAvailableInode { capacity: usize },
    #[error("invalid inode index {index}, the table only has {capacity} slots")]
    InvalidInodeIndex { index: InodeIndex, capacity: usize },
    #[error("file already exists: {name}")]
    FileAlreadyExists { name: String },
    #[error("file not found: {name}")]
    FileMissing { name: String },
    #[error("file {name} is too large: {size} bytes, at most {max} bytes fit")]
    FileTooLarge { name: String, size: usize, max: usize },
    #[error("filesystem not formatted, run `format` first")]
    UnformattedFilesystem,
    #[error("invalid filesystem geometry: {0}")]
    InvalidGeometry(String),
}

impl FsError {
    /// exhaustion and namespace errors can be handled by the caller,
    /// precondition violations and index corruption can not
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FsError::NoFreeBlockAvailable { .. }
                | FsError::NoAvailableInode { .. }
                | FsError::FileAlreadyExists { .. }
                | FsError::FileMissing { .. }
                | FsError::FileTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
