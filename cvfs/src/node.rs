use enumflags2::{bitflags, BitFlags};

/// Inode numbers start at 1, the way the inode table is numbered at boot.
pub type InodeNumber = usize;

/// Names are stored in a 20 byte field on the classic layout, one byte of which
/// held the terminator.
pub const MAX_FILE_NAME: usize = 19;

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read = 0b01,
    Write = 0b10,
}

/// The permission mask stored on an inode and requested at open time.
pub type Permissions = BitFlags<Permission>;

/// Decodes the numeric permission encoding: 1 = read, 2 = write, 3 = both.
/// Anything else, including an empty mask, is rejected.
pub fn permission_from_bits(bits: u8) -> Option<Permissions> {
    match BitFlags::<Permission>::from_bits(bits) {
        Ok(perm) if !perm.is_empty() => Some(perm),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// The slot holds no file and can be handed out by create.
    Free,
    Regular,
    /// Reserved. Nothing in the file system produces it.
    Special,
}

/// One fixed-identity file slot. The data buffer exists exactly while the inode
/// is `Regular`; `bind` allocates it and `reset` drops it.
#[derive(Debug)]
pub struct Inode {
    number: InodeNumber,
    name: String,
    file_type: FileType,
    /// Max allowed size, applied to every regular file.
    size_limit: usize,
    /// Bytes written so far, never above `size_limit`.
    actual_size: usize,
    /// How many open file entries point at this inode.
    reference_count: u32,
    permission: Permissions,
    buffer: Option<Box<[u8]>>,
}

impl Inode {
    fn free(number: InodeNumber) -> Self {
        Self {
            number,
            name: String::new(),
            file_type: FileType::Free,
            size_limit: 0,
            actual_size: 0,
            reference_count: 0,
            permission: Permissions::empty(),
            buffer: None,
        }
    }

    pub fn number(&self) -> InodeNumber {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    pub fn actual_size(&self) -> usize {
        self.actual_size
    }

    pub fn reference_count(&self) -> u32 {
        self.reference_count
    }

    pub fn permission(&self) -> Permissions {
        self.permission
    }

    pub fn is_regular(&self) -> bool {
        self.file_type == FileType::Regular
    }

    pub fn is_free(&self) -> bool {
        self.file_type == FileType::Free
    }

    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    /// Turns a free slot into a regular file with an empty, zero filled buffer
    /// of `size_limit` bytes.
    pub(crate) fn bind(&mut self, name: &str, permission: Permissions, size_limit: usize) {
        assert!(self.is_free(), "inode {} is already in use", self.number);
        self.name = name.to_string();
        self.file_type = FileType::Regular;
        self.size_limit = size_limit;
        self.actual_size = 0;
        self.reference_count = 1;
        self.permission = permission;
        self.buffer = Some(vec![0; size_limit].into_boxed_slice());
    }

    /// Returns the slot to the free state, releasing its buffer. The inode
    /// number is the only field that survives.
    pub(crate) fn reset(&mut self) {
        *self = Inode::free(self.number);
    }

    /// Copies `data` into the buffer at `offset` and grows the actual size.
    /// The caller has already checked `offset + data.len() <= size_limit`.
    pub(crate) fn write_at(&mut self, offset: usize, data: &[u8]) -> Option<usize> {
        let buf = self.buffer.as_mut()?;
        buf.get_mut(offset..offset + data.len())?.copy_from_slice(data);
        self.actual_size += data.len();
        Some(data.len())
    }

    /// Copies `dest.len()` bytes out of the buffer starting at `offset`.
    pub(crate) fn read_at(&self, offset: usize, dest: &mut [u8]) -> Option<usize> {
        let buf = self.buffer.as_ref()?;
        dest.copy_from_slice(buf.get(offset..offset + dest.len())?);
        Some(dest.len())
    }
}

/// Fixed-size table of inode slots, indexed by inode number. Every slot is
/// created free at boot and only ever reset, never removed.
pub struct InodeTable {
    nodes: Vec<Inode>,
}

impl InodeTable {
    pub fn new(count: usize) -> Self {
        Self {
            nodes: (1..=count).map(Inode::free).collect(),
        }
    }

    pub fn get(&self, number: InodeNumber) -> Option<&Inode> {
        self.nodes.get(number.checked_sub(1)?)
    }

    pub fn get_mut(&mut self, number: InodeNumber) -> Option<&mut Inode> {
        self.nodes.get_mut(number.checked_sub(1)?)
    }

    /// Looks up the regular file carrying `name`. Free slots never match, even
    /// if a stale name were left behind.
    pub fn find_regular(&self, name: &str) -> Option<&Inode> {
        self.nodes
            .iter()
            .find(|node| node.is_regular() && node.name == name)
    }

    /// First free slot in table order.
    pub fn first_free(&self) -> Option<InodeNumber> {
        self.nodes.iter().find(|node| node.is_free()).map(Inode::number)
    }

    pub fn count(&self, file_type: FileType) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.file_type == file_type)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Inode> {
        self.nodes.iter()
    }
}
