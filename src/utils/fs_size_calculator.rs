//! This module contains functions to calculate the geometry of the filesystem

/// calculate how many blocks a disk holds
/// # Arguments
/// - `disk_size`: the size of the disk in bytes
/// - `block_size`: the size of a block in bytes
/// # Return
/// the number of whole blocks that fit on the disk
/// # Example
/// ```
/// use memfs::utils::fs_size_calculator::block_count;
/// assert_eq!(block_count(64000, 64), 1000);
/// assert_eq!(block_count(100, 64), 1);
/// ```
pub const fn block_count(disk_size: u64, block_size: u32) -> u64 {
    disk_size / block_size as u64
}

/// calculate the number of inode slots
///
/// one slot is provisioned for every `block_size * max_direct_blocks` bytes of disk,
/// which is the size of the largest file
/// # Example
/// ```
/// use memfs::utils::fs_size_calculator::inode_count;
/// assert_eq!(inode_count(64000, 64, 10), 100);
/// assert_eq!(inode_count(600, 64, 10), 0);
/// ```
pub const fn inode_count(disk_size: u64, block_size: u32, max_direct_blocks: usize) -> u64 {
    disk_size / max_file_size(block_size, max_direct_blocks)
}

/// calculate the largest file an inode can describe
/// # Example
/// ```
/// use memfs::utils::fs_size_calculator::max_file_size;
/// assert_eq!(max_file_size(64, 10), 640);
/// ```
pub const fn max_file_size(block_size: u32, max_direct_blocks: usize) -> u64 {
    block_size as u64 * max_direct_blocks as u64
}

/// calculate how many blocks are needed to store `len` bytes
/// # Example
/// ```
/// use memfs::utils::fs_size_calculator::blocks_needed;
/// assert_eq!(blocks_needed(0, 64), 0);
/// assert_eq!(blocks_needed(64, 64), 1);
/// assert_eq!(blocks_needed(100, 64), 2);
/// ```
pub const fn blocks_needed(len: usize, block_size: u32) -> usize {
    len.div_ceil(block_size as usize)
}
