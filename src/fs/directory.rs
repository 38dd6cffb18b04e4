use std::collections::BTreeMap;

use super::{FsError, InodeIndex, Result};

/// the flat namespace, file names are unique keys
#[derive(Debug, Default)]
pub struct Directory {
    pub entries: BTreeMap<String, InodeIndex>,
}

impl Directory {
    pub fn new() -> Self {
        Directory::default()
    }

    pub fn entry(&self, name: &str) -> Option<InodeIndex> {
        self.entries.get(name).copied()
    }

    pub fn add_file(&mut self, name: &str, inode_index: InodeIndex) -> Result<()> {
        if self.entries.contains_key(name) {
            return Err(FsError::FileAlreadyExists { name: name.into() });
        }
        self.entries.insert(name.to_string(), inode_index);
        Ok(())
    }

    pub fn remove_file(&mut self, name: &str) -> Result<InodeIndex> {
        self.entries
            .remove(name)
            .ok_or_else(|| FsError::FileMissing { name: name.into() })
    }

    pub fn get_inode_index(&self, name: &str) -> Result<InodeIndex> {
        self.entry(name)
            .ok_or_else(|| FsError::FileMissing { name: name.into() })
    }

    pub fn list_files(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get_entries(&self) -> &BTreeMap<String, InodeIndex> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file() {
        let mut dir = Directory::new();
        dir.add_file("test1.txt", 1).unwrap();
        dir.add_file("test2.txt", 2).unwrap();
        assert_eq!(
            dir.add_file("test1.txt", 3),
            Err(FsError::FileAlreadyExists {
                name: "test1.txt".into()
            })
        );
        // the failed add keeps the old mapping
        assert_eq!(dir.entry("test1.txt"), Some(1));
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_directory_entry() {
        let mut dir = Directory::new();
        dir.add_file("test1.txt", 1).unwrap();
        dir.add_file("test2.txt", 2).unwrap();

        assert_eq!(dir.get_inode_index("test1.txt"), Ok(1));
        assert_eq!(dir.get_inode_index("test2.txt"), Ok(2));
        assert_eq!(
            dir.get_inode_index("test3.txt"),
            Err(FsError::FileMissing {
                name: "test3.txt".into()
            })
        );
        assert!(dir.file_exists("test2.txt"));
        assert!(!dir.file_exists("test3.txt"));
    }

    #[test]
    fn test_remove_file() {
        let mut dir = Directory::new();
        dir.add_file("a", 0).unwrap();
        assert_eq!(dir.remove_file("a"), Ok(0));
        assert!(dir.is_empty());
        assert!(matches!(
            dir.remove_file("a"),
            Err(FsError::FileMissing { .. })
        ));
    }

    #[test]
    fn test_list_files() {
        let mut dir = Directory::new();
        assert!(dir.list_files().is_empty());
        dir.add_file("b.txt", 0).unwrap();
        dir.add_file("a.txt", 1).unwrap();
        let mut files = dir.list_files();
        files.sort();
        assert_eq!(files, vec!["a.txt".to_string(), "b.txt".to_string()]);

        dir.clear();
        assert!(dir.list_files().is_empty());
    }
}
