//! what does our filesystem look like in the memory

use log::{debug, info};

use crate::utils::fs_size_calculator;

use super::{
    superblock::SuperBlock, BlockIndex, BlockManager, Directory, FsError, Inode, InodeIndex,
    InodeTable, Result, DIRECT_POINTERS,
};

/// it has the following layout:
/// - superblock
/// - block store with its free bitmap
/// - inode table
/// - a single flat directory
#[derive(Debug)]
pub struct MemFS {
    /// the superblock of this filesystem
    superblock: SuperBlock,
    block_manager: BlockManager,
    inode_table: InodeTable,
    root_directory: Directory,
}

impl MemFS {
    /// create a new, unformatted filesystem instance
    /// # Params
    /// - `disk_size`: the size of the simulated disk in bytes
    /// - `block_size`: the size of a block in bytes
    /// # Return
    /// an error if the geometry can't hold a single block
    pub fn new(disk_size: u64, block_size: u32) -> Result<Self> {
        Self::with_direct_blocks(disk_size, block_size, DIRECT_POINTERS)
    }

    /// like [MemFS::new], with `max_direct_blocks` block indices per inode
    pub fn with_direct_blocks(
        disk_size: u64,
        block_size: u32,
        max_direct_blocks: usize,
    ) -> Result<Self> {
        let superblock = SuperBlock::new(disk_size, block_size, max_direct_blocks)?;
        debug!("new filesystem with geometry {superblock:?}");
        Ok(MemFS {
            block_manager: BlockManager::new(superblock.block_count as usize, block_size),
            inode_table: InodeTable::new(superblock.inode_count as usize),
            root_directory: Directory::new(),
            superblock,
        })
    }

    /// wipe every file and mark the filesystem usable,
    /// can be called again at any time
    pub fn format(&mut self) {
        info!("format() called");
        self.inode_table.reset();
        self.block_manager.reset();
        self.root_directory.clear();
        self.superblock.update_formatted_at();
    }
}

/// get [SuperBlock] and the components of this filesystem
impl MemFS {
    #[inline]
    pub fn superblock(&self) -> &SuperBlock {
        &self.superblock
    }

    #[inline]
    pub fn block_manager(&self) -> &BlockManager {
        &self.block_manager
    }

    #[inline]
    pub fn inode_table(&self) -> &InodeTable {
        &self.inode_table
    }

    #[inline]
    pub fn root_directory(&self) -> &Directory {
        &self.root_directory
    }

    #[inline]
    pub fn is_formatted(&self) -> bool {
        self.superblock.is_formatted()
    }

    #[inline]
    pub fn block_size(&self) -> u32 {
        self.superblock.block_size
    }

    pub fn get_free_block_count(&self) -> usize {
        self.block_manager.get_free_block_count()
    }

    pub fn get_total_block_count(&self) -> usize {
        self.block_manager.get_total_blocks()
    }

    pub(crate) fn ensure_formatted(&self) -> Result<()> {
        if self.is_formatted() {
            Ok(())
        } else {
            Err(FsError::UnformattedFilesystem)
        }
    }
}

/// [Inode] operations
impl MemFS {
    pub(crate) fn find_inode(&self, name: &str) -> Result<InodeIndex> {
        self.ensure_formatted()?;
        self.root_directory.get_inode_index(name)
    }

    #[inline]
    pub(crate) fn inode(&self, index: InodeIndex) -> Result<&Inode> {
        self.inode_table.get(index)
    }

    /// take the first free inode slot and name it
    pub(crate) fn allocate_inode(&mut self, name: &str) -> Result<InodeIndex> {
        if self.root_directory.file_exists(name) {
            return Err(FsError::FileAlreadyExists { name: name.into() });
        }
        let index = self.inode_table.allocate_inode()?;
        self.root_directory.add_file(name, index)?;
        Ok(index)
    }

    /// release the inode, its blocks and its directory entry
    pub(crate) fn release_inode(&mut self, name: &str, index: InodeIndex) -> Result<()> {
        let blocks = self.inode(index)?.direct_blocks.clone();
        self.block_manager.free_blocks(&blocks)?;
        self.inode_table.release_inode(index)?;
        self.root_directory.remove_file(name)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn inode_mut(&mut self, index: InodeIndex) -> Result<&mut Inode> {
        self.inode_table.get_mut(index)
    }

    #[cfg(test)]
    pub(crate) fn block_manager_mut(&mut self) -> &mut BlockManager {
        &mut self.block_manager
    }

    #[cfg(test)]
    pub(crate) fn root_directory_mut(&mut self) -> &mut Directory {
        &mut self.root_directory
    }
}

/// read and write data in the filesystem
impl MemFS {
    /// replace the content of the file behind inode `index` with `data`
    ///
    /// the old blocks are only given up once the new content is known to fit,
    /// so a failed write leaves the file as it was
    pub(crate) fn replace_data(&mut self, name: &str, index: InodeIndex, data: &[u8]) -> Result<()> {
        let max = self.superblock.max_file_size() as usize;
        if data.len() > max {
            return Err(FsError::FileTooLarge {
                name: name.into(),
                size: data.len(),
                max,
            });
        }

        let needed = fs_size_calculator::blocks_needed(data.len(), self.block_size());
        let old_blocks = self.inode(index)?.direct_blocks.clone();
        let available = self.block_manager.get_free_block_count() + old_blocks.len();
        if needed > available {
            return Err(FsError::NoFreeBlockAvailable {
                requested: needed,
                available,
            });
        }

        self.block_manager.free_blocks(&old_blocks)?;
        let blocks = self.block_manager.allocate_blocks(needed)?;
        self.write_data_to_blocks(data, &blocks)?;
        self.inode_table
            .get_mut(index)?
            .allocate(data.len() as u64, &blocks);
        Ok(())
    }

    fn write_data_to_blocks(&mut self, data: &[u8], blocks: &[BlockIndex]) -> Result<()> {
        let chunks = data.chunks(self.block_manager.block_size());
        for (chunk, block) in chunks.zip(blocks) {
            self.block_manager.write_block(*block, chunk)?;
        }
        Ok(())
    }

    pub(crate) fn read_data_from_blocks(&self, blocks: &[BlockIndex]) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(blocks.len() * self.block_manager.block_size());
        for block in blocks {
            data.extend_from_slice(self.block_manager.read_block(*block)?);
        }
        Ok(data)
    }
}
