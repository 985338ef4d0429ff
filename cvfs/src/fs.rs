use crate::alloc::{Descriptor, DescriptorTable, RESERVED_DESCRIPTORS};
use crate::file::OpenFile;
use crate::node::{
    permission_from_bits, FileType, Inode, InodeNumber, InodeTable, Permission, Permissions,
    MAX_FILE_NAME,
};
use crate::sb::SuperBlock;

use std::iter::FusedIterator;
use thiserror::Error;

/// Maximum bytes allowed in one file.
pub const MAX_FILE_SIZE: usize = 50;
/// Size of the descriptor table, reserved slots included.
pub const MAX_OPEN_FILES: usize = 20;
/// Maximum number of files that can exist at once.
pub const MAX_INODES: usize = 5;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CVFSError {
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("there is no free inode")]
    NoFreeInodes,
    #[error("file already exists")]
    FileAlreadyExists,
    #[error("there is no such file")]
    FileNotExist,
    #[error("permission denied")]
    PermissionDenied,
    #[error("not enough space left in the file")]
    InsufficientSpace,
    #[error("not enough data left in the file")]
    InsufficientData,
    #[error("maximum number of open files reached")]
    MaxFilesOpen,
}

impl CVFSError {
    /// The classic negative return code for this error.
    pub fn code(&self) -> i32 {
        match self {
            CVFSError::InvalidParameter => -1,
            CVFSError::NoFreeInodes => -2,
            CVFSError::FileAlreadyExists => -3,
            CVFSError::FileNotExist => -4,
            CVFSError::PermissionDenied => -5,
            CVFSError::InsufficientSpace => -6,
            CVFSError::InsufficientData => -7,
            CVFSError::MaxFilesOpen => -8,
        }
    }
}

pub type Result<T> = std::result::Result<T, CVFSError>;

/// One line of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub inode_number: InodeNumber,
    pub name: String,
    pub actual_size: usize,
}

/// A snapshot of the regular files taken when `list_files` was called, in
/// inode table order. Once drained it stays empty; list again for fresh state.
#[derive(Debug)]
pub struct ListFiles {
    entries: std::vec::IntoIter<FileEntry>,
}

impl Iterator for ListFiles {
    type Item = FileEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for ListFiles {}
impl FusedIterator for ListFiles {}

/// Everything the file system knows about one regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub inode_number: InodeNumber,
    pub name: String,
    pub file_type: FileType,
    pub size_limit: usize,
    pub actual_size: usize,
    pub reference_count: u32,
    pub permission: Permissions,
}

impl From<&Inode> for FileStat {
    fn from(node: &Inode) -> Self {
        Self {
            inode_number: node.number(),
            name: node.name().to_string(),
            file_type: node.file_type(),
            size_limit: node.size_limit(),
            actual_size: node.actual_size(),
            reference_count: node.reference_count(),
            permission: node.permission(),
        }
    }
}

/// Sets the fixed capacities of a file system before booting it.
#[derive(Debug, Clone)]
pub struct CVFSBuilder {
    max_inodes: usize,
    max_open_files: usize,
    max_file_size: usize,
}

impl Default for CVFSBuilder {
    fn default() -> Self {
        Self {
            max_inodes: MAX_INODES,
            max_open_files: MAX_OPEN_FILES,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl CVFSBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of inode slots, and with it the maximum file count.
    pub fn with_max_inodes(mut self, count: usize) -> Self {
        self.max_inodes = count;
        self
    }

    /// Sets the descriptor table size. The first three slots are reserved, so
    /// anything up to three leaves no usable descriptor.
    pub fn with_max_open_files(mut self, count: usize) -> Self {
        self.max_open_files = count;
        self
    }

    /// Sets the fixed size limit applied to every regular file.
    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn build(self) -> Result<CVFS> {
        if self.max_inodes == 0
            || self.max_file_size == 0
            || self.max_open_files <= RESERVED_DESCRIPTORS
        {
            return Err(CVFSError::InvalidParameter);
        }
        Ok(CVFS::boot(self))
    }
}

/// An in-memory file system: a capacity tracker, a fixed inode table and the
/// descriptor table of the one session using it.
///
/// Every operation checks all of its preconditions before touching any of the
/// three structures, so a returned error means nothing changed.
pub struct CVFS {
    super_block: SuperBlock,
    inodes: InodeTable,
    descriptors: DescriptorTable,
    max_file_size: usize,
}

impl Default for CVFS {
    fn default() -> Self {
        Self::new()
    }
}

impl CVFS {
    /// Boots a file system with the default capacities.
    pub fn new() -> Self {
        Self::boot(CVFSBuilder::default())
    }

    pub fn builder() -> CVFSBuilder {
        CVFSBuilder::default()
    }

    fn boot(geometry: CVFSBuilder) -> Self {
        let fs = CVFS {
            super_block: SuperBlock::new(geometry.max_inodes),
            inodes: InodeTable::new(geometry.max_inodes),
            descriptors: DescriptorTable::new(geometry.max_open_files),
            max_file_size: geometry.max_file_size,
        };
        debug!(
            "Booted with {} inodes, {} descriptors and {} byte files.",
            geometry.max_inodes, geometry.max_open_files, geometry.max_file_size
        );
        fs
    }

    pub fn total_inodes(&self) -> usize {
        self.super_block.inodes_count
    }

    pub fn free_inodes(&self) -> usize {
        self.super_block.free_inodes_count
    }

    pub fn super_block(&self) -> &SuperBlock {
        &self.super_block
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn max_open_files(&self) -> usize {
        self.descriptors.len()
    }

    pub fn inode(&self, number: InodeNumber) -> Option<&Inode> {
        self.inodes.get(number)
    }

    pub fn inodes(&self) -> impl Iterator<Item = &Inode> {
        self.inodes.iter()
    }

    /// The open file entry behind a descriptor, if the slot is occupied.
    pub fn descriptor(&self, fd: Descriptor) -> Option<&OpenFile> {
        self.descriptors.entry(fd)
    }

    /// True if a regular file carries `name`.
    pub fn file_exists(&self, name: &str) -> bool {
        self.inodes.find_regular(name).is_some()
    }

    /// Creates a file and opens it, returning the new descriptor.
    /// `permission` uses the numeric encoding 1 = read, 2 = write, 3 = both.
    pub fn create_file(&mut self, name: &str, permission: u8) -> Result<Descriptor> {
        debug!(
            "Total number of inodes remaining: {}.",
            self.super_block.free_inodes_count
        );
        let (fd, inum, perm) = self.check_create(name, permission).map_err(|err| {
            warn!("Refused to create \"{}\": {}.", name, err);
            err
        })?;

        let node = self.inodes.get_mut(inum).ok_or(CVFSError::NoFreeInodes)?;
        if self
            .descriptors
            .install(fd, OpenFile::new(inum, perm))
            .is_err()
        {
            return Err(CVFSError::MaxFilesOpen);
        }
        node.bind(name, perm, self.max_file_size);
        self.super_block.reserve_inode();
        self.debug_check_accounting();

        info!("Created \"{}\" on inode {} with descriptor {}.", name, inum, fd);
        Ok(fd)
    }

    fn check_create(
        &self,
        name: &str,
        permission: u8,
    ) -> Result<(Descriptor, InodeNumber, Permissions)> {
        if name.is_empty() || name.len() > MAX_FILE_NAME {
            return Err(CVFSError::InvalidParameter);
        }
        let perm = permission_from_bits(permission).ok_or(CVFSError::InvalidParameter)?;
        if !self.super_block.has_free_inodes() {
            return Err(CVFSError::NoFreeInodes);
        }
        if self.file_exists(name) {
            return Err(CVFSError::FileAlreadyExists);
        }
        let inum = self.inodes.first_free().ok_or(CVFSError::NoFreeInodes)?;
        let fd = self
            .descriptors
            .next_available()
            .next()
            .ok_or(CVFSError::MaxFilesOpen)?;
        Ok((fd, inum, perm))
    }

    /// Appends the first `size` bytes of `data` at the descriptor's write
    /// offset. Writes never move backwards or skip ahead.
    pub fn write_file(&mut self, fd: Descriptor, data: &[u8], size: usize) -> Result<usize> {
        self.write_inner(fd, data, size).map_err(|err| {
            warn!("Write of {} bytes to descriptor {} failed: {}.", size, fd, err);
            err
        })
    }

    fn write_inner(&mut self, fd: Descriptor, data: &[u8], size: usize) -> Result<usize> {
        if !self.descriptors.contains(fd) || size > data.len() {
            return Err(CVFSError::InvalidParameter);
        }
        let file = self
            .descriptors
            .entry_mut(fd)
            .ok_or(CVFSError::FileNotExist)?;
        let node = self
            .inodes
            .get_mut(file.inode)
            .filter(|node| node.is_regular())
            .ok_or(CVFSError::FileNotExist)?;
        if !node.permission().contains(Permission::Write) {
            return Err(CVFSError::PermissionDenied);
        }
        if node.size_limit().saturating_sub(file.write_offset) < size {
            return Err(CVFSError::InsufficientSpace);
        }

        let written = node
            .write_at(file.write_offset, &data[..size])
            .ok_or(CVFSError::InsufficientSpace)?;
        file.write_offset += written;
        debug!(
            "Wrote {} bytes to inode {}, write offset now {}.",
            written, file.inode, file.write_offset
        );
        Ok(written)
    }

    /// Copies `size` bytes from the descriptor's read offset into `dest`.
    ///
    /// The remaining span is measured against the file's size limit rather
    /// than the bytes written so far; bytes past the written end read back as
    /// zeroes.
    pub fn read_file(&mut self, fd: Descriptor, dest: &mut [u8], size: usize) -> Result<usize> {
        self.read_inner(fd, dest, size).map_err(|err| {
            warn!("Read of {} bytes from descriptor {} failed: {}.", size, fd, err);
            err
        })
    }

    fn read_inner(&mut self, fd: Descriptor, dest: &mut [u8], size: usize) -> Result<usize> {
        if !self.descriptors.contains(fd) || dest.len() < size || size == 0 {
            return Err(CVFSError::InvalidParameter);
        }
        let file = self
            .descriptors
            .entry_mut(fd)
            .ok_or(CVFSError::FileNotExist)?;
        let node = self
            .inodes
            .get(file.inode)
            .filter(|node| node.is_regular())
            .ok_or(CVFSError::FileNotExist)?;
        if !node.permission().contains(Permission::Read) {
            return Err(CVFSError::PermissionDenied);
        }
        if node.size_limit().saturating_sub(file.read_offset) < size {
            return Err(CVFSError::InsufficientData);
        }

        let read = node
            .read_at(file.read_offset, &mut dest[..size])
            .ok_or(CVFSError::InsufficientData)?;
        file.read_offset += read;
        debug!(
            "Read {} bytes from inode {}, read offset now {}.",
            read, file.inode, file.read_offset
        );
        Ok(read)
    }

    /// Deletes a file: its buffer is released, the inode goes back to the free
    /// state and the first descriptor bound to it is cleared.
    pub fn unlink_file(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            warn!("Refused to unlink a file without a name.");
            return Err(CVFSError::InvalidParameter);
        }
        let inum = match self.inodes.find_regular(name) {
            Some(node) => node.number(),
            None => {
                warn!("Refused to unlink \"{}\": no such file.", name);
                return Err(CVFSError::FileNotExist);
            }
        };

        let node = self.inodes.get_mut(inum).ok_or(CVFSError::FileNotExist)?;

        // Only the first matching slot is torn down.
        let fd = self
            .descriptors
            .iter()
            .find(|(_, file)| file.inode == inum)
            .map(|(fd, _)| fd);
        if let Some(fd) = fd {
            self.descriptors.take(fd);
        }
        node.reset();
        self.super_block.release_inode();
        self.debug_check_accounting();

        info!("Unlinked \"{}\" from inode {} (descriptor {:?}).", name, inum, fd);
        Ok(())
    }

    fn debug_check_accounting(&self) {
        debug_assert_eq!(
            self.super_block.free_inodes_count,
            self.inodes.count(FileType::Free),
            "free inode count out of step with the inode table"
        );
    }

    /// Lists every regular file as `(inode number, name, actual size)`.
    pub fn list_files(&self) -> ListFiles {
        let entries: Vec<FileEntry> = self
            .inodes
            .iter()
            .filter(|node| node.is_regular())
            .map(|node| FileEntry {
                inode_number: node.number(),
                name: node.name().to_string(),
                actual_size: node.actual_size(),
            })
            .collect();
        ListFiles {
            entries: entries.into_iter(),
        }
    }

    /// Metadata of the regular file called `name`.
    pub fn stat(&self, name: &str) -> Result<FileStat> {
        if name.is_empty() {
            return Err(CVFSError::InvalidParameter);
        }
        self.inodes
            .find_regular(name)
            .map(FileStat::from)
            .ok_or(CVFSError::FileNotExist)
    }

    /// Metadata of the file open on `fd`.
    pub fn fstat(&self, fd: Descriptor) -> Result<FileStat> {
        if !self.descriptors.contains(fd) {
            return Err(CVFSError::InvalidParameter);
        }
        let file = self.descriptors.entry(fd).ok_or(CVFSError::FileNotExist)?;
        self.inodes
            .get(file.inode)
            .filter(|node| node.is_regular())
            .map(FileStat::from)
            .ok_or(CVFSError::FileNotExist)
    }
}
