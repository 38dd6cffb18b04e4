use crate::utils::{
    fs_size_calculator,
    time_util::{self, TimeDurationStruct},
};

use super::{BlockIndex, FsError, Result, FS_MAGIC};

/// The superblock of this filesystem, its geometry and format state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuperBlock {
    /// magic number
    pub magic: u32,
    pub disk_size: u64,
    /// data block size
    pub block_size: u32,
    pub block_count: u64,
    pub inode_count: u64,
    /// how many block indices one inode can hold
    pub max_direct_blocks: usize,
    pub created_at: TimeDurationStruct,
    /// `None` until the filesystem is formatted
    pub formatted_at: Option<TimeDurationStruct>,
}

impl SuperBlock {
    pub fn new(disk_size: u64, block_size: u32, max_direct_blocks: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(FsError::InvalidGeometry("block size must not be 0".into()));
        }
        if max_direct_blocks == 0 {
            return Err(FsError::InvalidGeometry(
                "an inode needs at least one direct block".into(),
            ));
        }
        if disk_size < block_size as u64 {
            return Err(FsError::InvalidGeometry(format!(
                "disk size {disk_size} is smaller than one block of {block_size} bytes"
            )));
        }
        let block_count = fs_size_calculator::block_count(disk_size, block_size);
        if block_count > BlockIndex::MAX as u64 {
            return Err(FsError::InvalidGeometry(format!(
                "{block_count} blocks can not be addressed, at most {} allowed",
                BlockIndex::MAX
            )));
        }
        if (block_size as u64)
            .checked_mul(max_direct_blocks as u64)
            .is_none()
        {
            return Err(FsError::InvalidGeometry(format!(
                "{max_direct_blocks} direct blocks of {block_size} bytes overflow the file size"
            )));
        }
        Ok(Self {
            magic: FS_MAGIC,
            disk_size,
            block_size,
            block_count,
            inode_count: fs_size_calculator::inode_count(disk_size, block_size, max_direct_blocks),
            max_direct_blocks,
            created_at: time_util::now(),
            formatted_at: None,
        })
    }

    pub fn is_formatted(&self) -> bool {
        self.formatted_at.is_some()
    }

    pub fn update_formatted_at(&mut self) {
        self.formatted_at = Some(time_util::now());
    }

    /// the largest file an inode can describe, in bytes
    pub fn max_file_size(&self) -> u64 {
        fs_size_calculator::max_file_size(self.block_size, self.max_direct_blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let superblock = SuperBlock::new(64000, 64, 10).unwrap();
        assert_eq!(superblock.magic, FS_MAGIC);
        assert_eq!(superblock.block_count, 1000);
        assert_eq!(superblock.inode_count, 100);
        assert_eq!(superblock.max_file_size(), 640);
        assert!(!superblock.is_formatted());
    }

    #[test]
    fn test_update_formatted_at() {
        let mut superblock = SuperBlock::new(640, 64, 10).unwrap();
        superblock.update_formatted_at();
        assert!(superblock.is_formatted());
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(matches!(
            SuperBlock::new(64000, 0, 10),
            Err(FsError::InvalidGeometry(_))
        ));
        assert!(matches!(
            SuperBlock::new(64000, 64, 0),
            Err(FsError::InvalidGeometry(_))
        ));
        assert!(matches!(
            SuperBlock::new(32, 64, 10),
            Err(FsError::InvalidGeometry(_))
        ));
        // block indices are u32
        assert!(matches!(
            SuperBlock::new(1 << 33, 1, 10),
            Err(FsError::InvalidGeometry(_))
        ));
        assert!(matches!(
            SuperBlock::new(u64::MAX, 1, 10),
            Err(FsError::InvalidGeometry(_))
        ));
        assert!(matches!(
            SuperBlock::new(2 * u32::MAX as u64, u32::MAX, usize::MAX),
            Err(FsError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_largest_addressable_geometry() {
        let superblock = SuperBlock::new(BlockIndex::MAX as u64, 1, 10).unwrap();
        assert_eq!(superblock.block_count, BlockIndex::MAX as u64);
        assert!(SuperBlock::new(BlockIndex::MAX as u64 + 1, 1, 10).is_err());
    }
}
