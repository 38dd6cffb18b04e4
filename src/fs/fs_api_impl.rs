use std::time::SystemTime;

use log::{info, warn};

use super::{BlockIndex, FsError, InodeIndex, MemFS, Result};

/// what `stat <name>` reports about one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileStat {
    pub name: String,
    pub inode: InodeIndex,
    pub size: u64,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
    pub blocks: Vec<BlockIndex>,
}

/// usage numbers of the whole filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStats {
    pub block_size: u32,
    pub total_blocks: usize,
    pub free_blocks: usize,
    pub used_blocks: usize,
    pub total_inodes: usize,
    pub free_inodes: usize,
    pub files: usize,
}

impl MemFS {
    /// create an empty file
    /// # Return
    /// `Ok(false)` when every inode slot is taken,
    /// [FsError::FileAlreadyExists] when `name` is already used
    pub fn create_file(&mut self, name: &str) -> Result<bool> {
        info!("create_file() called with name: {name:?}");
        self.ensure_formatted()?;
        match self.allocate_inode(name) {
            Ok(_) => Ok(true),
            Err(FsError::NoAvailableInode { capacity }) => {
                warn!("no inode left for {name:?}, all {capacity} slots are in use");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// replace the content of an existing file with `data`
    ///
    /// on failure the previous content of the file is kept
    pub fn write_file(&mut self, name: &str, data: impl AsRef<[u8]>) -> Result<()> {
        let data = data.as_ref();
        info!("write_file() called with name: {name:?} and {} bytes", data.len());
        let index = self.find_inode(name)?;
        self.replace_data(name, index, data)
    }

    /// the content of a file
    /// # Return
    /// `Ok(None)` if there is no such file, an empty file reads as `Ok(Some(vec![]))`
    pub fn read_file(&self, name: &str) -> Result<Option<Vec<u8>>> {
        info!("read_file() called with name: {name:?}");
        let index = match self.find_inode(name) {
            Ok(index) => index,
            Err(FsError::FileMissing { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let inode = self.inode(index)?;
        self.read_data_from_blocks(inode.direct_blocks()).map(Some)
    }

    /// delete a file and release its blocks
    /// # Return
    /// `Ok(false)` if there is no such file
    pub fn delete_file(&mut self, name: &str) -> Result<bool> {
        info!("delete_file() called with name: {name:?}");
        let index = match self.find_inode(name) {
            Ok(index) => index,
            Err(FsError::FileMissing { .. }) => return Ok(false),
            Err(e) => return Err(e),
        };
        self.release_inode(name, index)?;
        Ok(true)
    }

    pub fn list_files(&self) -> Result<Vec<String>> {
        self.ensure_formatted()?;
        Ok(self.root_directory().list_files())
    }

    pub fn stat(&self, name: &str) -> Result<FileStat> {
        let index = self.find_inode(name)?;
        let inode = self.inode(index)?;
        Ok(FileStat {
            name: name.to_string(),
            inode: index,
            size: inode.file_size,
            created_at: inode.created_at.into(),
            modified_at: inode.modified_at.into(),
            blocks: inode.direct_blocks().to_vec(),
        })
    }

    pub fn stats(&self) -> FsStats {
        let blocks = self.block_manager();
        let inodes = self.inode_table();
        FsStats {
            block_size: self.block_size(),
            total_blocks: blocks.get_total_blocks(),
            free_blocks: blocks.get_free_block_count(),
            used_blocks: blocks.used_block_count(),
            total_inodes: inodes.capacity(),
            free_inodes: inodes.free_inodes(),
            files: self.root_directory().len(),
        }
    }
}
