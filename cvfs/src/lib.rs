//! An in-memory file system modelled on classic Unix internals: a fixed inode
//! table with free/used accounting, an open file table and the descriptor
//! table of a single session.
//!
//! ```
//! use cvfs::CVFS;
//!
//! let mut fs = CVFS::new();
//! let fd = fs.create_file("notes", 3).unwrap();
//! fs.write_file(fd, b"hello", 5).unwrap();
//!
//! let mut buf = [0; 5];
//! fs.read_file(fd, &mut buf, 5).unwrap();
//! assert_eq!(&buf, b"hello");
//! ```
#[macro_use]
extern crate log;

mod alloc;
mod file;
mod fs;
mod node;
mod sb;
mod sync;

pub use crate::alloc::{Descriptor, RESERVED_DESCRIPTORS};
pub use crate::file::OpenFile;
pub use crate::fs::{
    CVFSBuilder, CVFSError, FileEntry, FileStat, ListFiles, Result, CVFS, MAX_FILE_SIZE,
    MAX_INODES, MAX_OPEN_FILES,
};
pub use crate::node::{
    permission_from_bits, FileType, Inode, InodeNumber, Permission, Permissions, MAX_FILE_NAME,
};
pub use crate::sb::SuperBlock;
pub use crate::sync::SharedCVFS;
