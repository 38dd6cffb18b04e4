//! our in-memory filesystem
pub mod block_manager;
pub mod directory;
pub mod error;
pub mod fs_layout;
pub mod fsck;
pub mod inode;
pub mod inode_table;
pub mod superblock;
mod fs_api_impl;
pub use block_manager::*;
pub use directory::*;
pub use error::*;
pub use fs_api_impl::*;
pub use fs_layout::*;
pub use fsck::*;
pub use inode::*;
pub use inode_table::*;
pub use superblock::*;

/// index of a block in the block store, start at 0
pub type BlockIndex = u32;
/// index of a slot in the inode table, start at 0
pub type InodeIndex = u64;

const FS_MAGIC: u32 = 0x1324a;
pub const DEFAULT_BLOCK_SIZE: u32 = 64;
pub const DEFAULT_DISK_SIZE: u64 = 1000 * DEFAULT_BLOCK_SIZE as u64;
pub const DIRECT_POINTERS: usize = 10;
