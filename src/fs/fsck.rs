//! consistency check across the block store, the inode table and the directory

use std::collections::HashMap;

use log::warn;

use crate::utils::fs_size_calculator;

use super::{BlockIndex, InodeIndex, MemFS, Result};

/// every invariant violation found by [MemFS::fsck]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FsckReport {
    pub blocks_ok: bool,
    pub inodes_ok: bool,
    pub directory_ok: bool,
    pub errors: Vec<String>,
}

impl FsckReport {
    pub fn new() -> Self {
        Self {
            blocks_ok: true,
            inodes_ok: true,
            directory_ok: true,
            errors: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn block_error(&mut self, error: String) {
        self.blocks_ok = false;
        self.errors.push(error);
    }

    fn inode_error(&mut self, error: String) {
        self.inodes_ok = false;
        self.errors.push(error);
    }

    fn directory_error(&mut self, error: String) {
        self.directory_ok = false;
        self.errors.push(error);
    }
}

impl MemFS {
    /// walk every structure and report anything that breaks their mutual consistency
    pub fn fsck(&self) -> Result<FsckReport> {
        self.ensure_formatted()?;
        let mut report = FsckReport::new();
        let blocks = self.block_manager();
        let block_size = self.block_size();

        let total = blocks.get_total_blocks();
        let (free, used) = (blocks.get_free_block_count(), blocks.used_block_count());
        if free + used != total {
            report.block_error(format!(
                "{free} free and {used} used blocks do not add up to {total}"
            ));
        }

        let mut owners: HashMap<BlockIndex, InodeIndex> = HashMap::new();
        for (index, inode) in self.inode_table().allocated() {
            let direct_blocks = inode.direct_blocks();
            if direct_blocks.len() > self.superblock().max_direct_blocks {
                report.inode_error(format!(
                    "inode {index} holds {} blocks, at most {} allowed",
                    direct_blocks.len(),
                    self.superblock().max_direct_blocks
                ));
            }
            let needed = fs_size_calculator::blocks_needed(inode.file_size as usize, block_size);
            if needed != direct_blocks.len() {
                report.inode_error(format!(
                    "inode {index} has size {} but {} blocks",
                    inode.file_size,
                    direct_blocks.len()
                ));
            }
            for block in direct_blocks {
                match blocks.is_free(*block) {
                    Ok(false) => {}
                    Ok(true) => report.block_error(format!(
                        "block {block} of inode {index} is marked free"
                    )),
                    Err(e) => report.block_error(format!("inode {index}: {e}")),
                }
                if let Some(owner) = owners.insert(*block, index) {
                    report.block_error(format!(
                        "block {block} is shared by inodes {owner} and {index}"
                    ));
                }
            }
        }

        for block in 0..total as BlockIndex {
            if blocks.is_free(block) == Ok(false) && !owners.contains_key(&block) {
                report.block_error(format!("block {block} is used but owned by no inode"));
            }
        }

        let mut names: HashMap<InodeIndex, &str> = HashMap::new();
        for (name, index) in self.root_directory().get_entries() {
            match self.inode(*index) {
                Ok(inode) if inode.is_allocated() => {}
                Ok(_) => report.directory_error(format!(
                    "{name:?} points to unallocated inode {index}"
                )),
                Err(e) => report.directory_error(format!("{name:?}: {e}")),
            }
            if let Some(other) = names.insert(*index, name.as_str()) {
                report.directory_error(format!(
                    "{other:?} and {name:?} both point to inode {index}"
                ));
            }
        }
        for (index, _) in self.inode_table().allocated() {
            if !names.contains_key(&index) {
                report.inode_error(format!("inode {index} is allocated but has no name"));
            }
        }

        for error in &report.errors {
            warn!("fsck: {error}");
        }
        Ok(report)
    }
}
