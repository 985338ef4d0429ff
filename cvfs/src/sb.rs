/// The capacity tracker of the file system, kept in the spirit of a classic
/// superblock: how many inodes exist and how many of them are still unused.
///
/// The number of inodes ultimately sets the upper bound on how many files can
/// exist at the same time. Nothing here is ever written anywhere, the counters
/// live for as long as the owning `CVFS` does.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SuperBlock {
    /// Total number of inode slots created at boot.
    pub inodes_count: usize,
    /// The number of remaining available inodes.
    pub free_inodes_count: usize,
}

impl SuperBlock {
    /// All inodes are initially free.
    pub fn new(inodes_count: usize) -> Self {
        Self {
            inodes_count,
            free_inodes_count: inodes_count,
        }
    }

    pub fn has_free_inodes(&self) -> bool {
        self.free_inodes_count > 0
    }

    /// Accounts for one inode moving from free to used. Callers check
    /// `has_free_inodes` first.
    pub fn reserve_inode(&mut self) {
        assert!(self.free_inodes_count > 0, "no free inode to reserve");
        self.free_inodes_count -= 1;
    }

    /// Accounts for one inode being handed back.
    pub fn release_inode(&mut self) {
        debug_assert!(
            self.free_inodes_count < self.inodes_count,
            "released more inodes than exist"
        );
        self.free_inodes_count += 1;
    }

    pub fn used_inodes(&self) -> usize {
        self.inodes_count - self.free_inodes_count
    }
}
