use bitvec::prelude::*;
use log::{debug, warn};

use super::{BlockIndex, FsError, Result};

/// the raw block store with one used/free bit per block
#[derive(Debug, Default)]
pub struct BlockManager {
    /// a set bit means the block is in use
    data_bitmap: BitVec<u8, Lsb0>,
    blocks: Vec<Vec<u8>>,
    block_size: usize,
    next_data_block: Option<usize>,
}

impl BlockManager {
    pub fn new(block_count: usize, block_size: u32) -> Self {
        let mut manager = BlockManager {
            data_bitmap: BitVec::repeat(false, block_count),
            blocks: vec![Vec::new(); block_count],
            block_size: block_size as usize,
            next_data_block: None,
        };
        manager.next_data_block = manager.next_free_data_block();
        manager
    }

    /// mark every block free and drop all payloads, keeping the block count
    pub fn reset(&mut self) {
        self.data_bitmap.fill(false);
        self.blocks.iter_mut().for_each(Vec::clear);
        self.next_data_block = self.next_free_data_block();
    }
}

/// for data block allocation
impl BlockManager {
    /// allocate the lowest indexed free block
    pub fn allocate_block(&mut self) -> Result<BlockIndex> {
        let index = self.next_data_block.ok_or(FsError::NoFreeBlockAvailable {
            requested: 1,
            available: 0,
        })?;
        self.data_bitmap.set(index, true);
        self.next_data_block = self.next_free_data_block();
        Ok(index as BlockIndex)
    }

    /// allocate `count` blocks, or none of them
    /// # Return
    /// the block indices in allocation order,
    /// on failure every block taken by this call is released again
    pub fn allocate_blocks(&mut self, count: usize) -> Result<Vec<BlockIndex>> {
        let mut allocated = Vec::with_capacity(count);
        for _ in 0..count {
            match self.allocate_block() {
                Ok(index) => allocated.push(index),
                Err(FsError::NoFreeBlockAvailable { .. }) => {
                    warn!(
                        "unable to allocate {count} blocks, releasing {} already allocated",
                        allocated.len()
                    );
                    let available = allocated.len();
                    self.free_blocks(&allocated)?;
                    return Err(FsError::NoFreeBlockAvailable {
                        requested: count,
                        available,
                    });
                }
                Err(e) => return Err(e),
            }
        }
        debug!("allocated blocks {allocated:?}");
        Ok(allocated)
    }

    /// release a block, releasing an already free block does nothing
    pub fn free_block(&mut self, index: BlockIndex) -> Result<()> {
        let i = self.check_index(index)?;
        if !self.data_bitmap[i] {
            warn!("block {index} is already free");
            return Ok(());
        }
        self.data_bitmap.set(i, false);
        self.next_data_block = self.next_free_data_block();
        Ok(())
    }

    pub fn free_blocks(&mut self, blocks: &[BlockIndex]) -> Result<()> {
        blocks.iter().try_for_each(|b| self.free_block(*b))
    }

    /// check if a block is free
    /// # Params
    /// - `index`: block index,start at 0
    pub fn is_free(&self, index: BlockIndex) -> Result<bool> {
        let i = self.check_index(index)?;
        Ok(!self.data_bitmap[i])
    }

    /// calculate the number of free data blocks
    pub fn get_free_block_count(&self) -> usize {
        self.data_bitmap.count_zeros()
    }

    pub fn used_block_count(&self) -> usize {
        self.data_bitmap.count_ones()
    }

    pub fn get_total_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    // next free data block index,index start at 0
    fn next_free_data_block(&self) -> Option<usize> {
        self.data_bitmap.first_zero()
    }

    fn check_index(&self, index: BlockIndex) -> Result<usize> {
        let i = index as usize;
        if i >= self.blocks.len() {
            return Err(FsError::InvalidBlockIndex {
                index,
                total: self.blocks.len(),
            });
        }
        Ok(i)
    }
}

/// read and write block payloads
impl BlockManager {
    /// store `data` in a block, anything past `block_size` bytes is dropped
    /// # Return
    /// the number of bytes actually stored
    pub fn write_block(&mut self, index: BlockIndex, data: &[u8]) -> Result<usize> {
        let i = self.check_index(index)?;
        let len = data.len().min(self.block_size);
        if len < data.len() {
            debug!(
                "truncating {} bytes written to block {index}",
                data.len() - len
            );
        }
        let block = &mut self.blocks[i];
        block.clear();
        block.extend_from_slice(&data[..len]);
        Ok(len)
    }

    /// the payload of a block, empty if it was never written
    pub fn read_block(&self, index: BlockIndex) -> Result<&[u8]> {
        let i = self.check_index(index)?;
        Ok(self.blocks[i].as_slice())
    }
}
