use log::debug;

use super::{FsError, Inode, InodeIndex, Result};

/// a fixed number of inode slots, reused by index and never resized
#[derive(Debug, Default)]
pub struct InodeTable {
    inodes: Vec<Inode>,
}

impl InodeTable {
    pub fn new(capacity: usize) -> Self {
        InodeTable {
            inodes: vec![Inode::new(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.inodes.len()
    }

    /// calculate the number of free inodes
    pub fn free_inodes(&self) -> usize {
        self.inodes.iter().filter(|i| !i.is_allocated()).count()
    }

    /// allocate the lowest indexed free slot as an empty file
    pub fn allocate_inode(&mut self) -> Result<InodeIndex> {
        let index = self
            .inodes
            .iter()
            .position(|i| !i.is_allocated())
            .ok_or(FsError::NoAvailableInode {
                capacity: self.inodes.len(),
            })?;
        self.inodes[index].allocate(0, &[]);
        debug!("allocated inode {index}");
        Ok(index as InodeIndex)
    }

    /// release inode
    /// # Params
    /// - `index`: inode index,start at 0
    pub fn release_inode(&mut self, index: InodeIndex) -> Result<()> {
        self.get_mut(index)?.deallocate();
        Ok(())
    }

    /// deallocate every slot
    pub fn reset(&mut self) {
        self.inodes.iter_mut().for_each(Inode::deallocate);
    }

    pub fn get(&self, index: InodeIndex) -> Result<&Inode> {
        let capacity = self.inodes.len();
        self.inodes
            .get(index as usize)
            .ok_or(FsError::InvalidInodeIndex { index, capacity })
    }

    pub fn get_mut(&mut self, index: InodeIndex) -> Result<&mut Inode> {
        let capacity = self.inodes.len();
        self.inodes
            .get_mut(index as usize)
            .ok_or(FsError::InvalidInodeIndex { index, capacity })
    }

    /// every allocated inode with its slot index
    pub fn allocated(&self) -> impl Iterator<Item = (InodeIndex, &Inode)> {
        self.inodes
            .iter()
            .enumerate()
            .filter(|(_, inode)| inode.is_allocated())
            .map(|(index, inode)| (index as InodeIndex, inode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_inode_first_fit() {
        let mut table = InodeTable::new(3);
        assert_eq!(table.allocate_inode(), Ok(0));
        assert_eq!(table.allocate_inode(), Ok(1));
        assert_eq!(table.free_inodes(), 1);

        table.release_inode(0).unwrap();
        assert_eq!(table.allocate_inode(), Ok(0));
        assert_eq!(table.allocate_inode(), Ok(2));
        assert_eq!(
            table.allocate_inode(),
            Err(FsError::NoAvailableInode { capacity: 3 })
        );
        // capacity never grows
        assert_eq!(table.capacity(), 3);
    }

    #[test]
    fn test_allocated_inode_is_empty_file() {
        let mut table = InodeTable::new(2);
        let index = table.allocate_inode().unwrap();
        let inode = table.get(index).unwrap();
        assert!(inode.is_allocated());
        assert_eq!(inode.file_size, 0);
        assert!(inode.direct_blocks().is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let mut table = InodeTable::new(2);
        assert_eq!(
            table.get(2).err(),
            Some(FsError::InvalidInodeIndex {
                index: 2,
                capacity: 2
            })
        );
        assert!(table.release_inode(5).is_err());
    }

    #[test]
    fn test_reset() {
        let mut table = InodeTable::new(4);
        for _ in 0..4 {
            table.allocate_inode().unwrap();
        }
        assert_eq!(table.allocated().count(), 4);
        table.reset();
        assert_eq!(table.free_inodes(), 4);
        assert_eq!(table.allocated().count(), 0);
    }
}
