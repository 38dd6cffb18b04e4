use smallvec::SmallVec;

use crate::utils::time_util::{self, TimeDurationStruct};

use super::{BlockIndex, DIRECT_POINTERS};

pub type DirectBlocks = SmallVec<[BlockIndex; DIRECT_POINTERS]>;

/// metadata of one file, stored in a reusable slot of the inode table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inode {
    pub allocated: bool,
    pub file_size: u64,
    pub created_at: TimeDurationStruct,
    pub modified_at: TimeDurationStruct,
    pub direct_blocks: DirectBlocks,
}

impl Inode {
    /// an unallocated inode with every field zeroed
    pub fn new() -> Self {
        Inode::default()
    }

    /// (re)initialize this inode for a file of `size` bytes stored in `blocks`
    ///
    /// the block list and both timestamps are replaced wholesale
    pub fn allocate(&mut self, size: u64, blocks: &[BlockIndex]) {
        let now = time_util::now();
        self.allocated = true;
        self.file_size = size;
        self.created_at = now;
        self.modified_at = now;
        self.direct_blocks = blocks.iter().copied().collect();
    }

    /// reset every field, the blocks this inode owned are not released here
    pub fn deallocate(&mut self) {
        *self = Inode::default();
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn direct_blocks(&self) -> &[BlockIndex] {
        &self.direct_blocks
    }

    pub fn block_count(&self) -> usize {
        self.direct_blocks.len()
    }
}
