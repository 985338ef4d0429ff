use crate::node::{InodeNumber, Permissions};

/// An open file table entry: the per-open cursors and the mode the file was
/// opened with, bound to one inode for the whole lifetime of the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenFile {
    /// Where the next read starts.
    pub(crate) read_offset: usize,
    /// Where the next write starts. Writes only ever append.
    pub(crate) write_offset: usize,
    pub(crate) mode: Permissions,
    pub(crate) inode: InodeNumber,
}

impl OpenFile {
    pub fn new(inode: InodeNumber, mode: Permissions) -> Self {
        Self {
            read_offset: 0,
            write_offset: 0,
            mode,
            inode,
        }
    }

    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    pub fn mode(&self) -> Permissions {
        self.mode
    }

    pub fn inode(&self) -> InodeNumber {
        self.inode
    }
}
