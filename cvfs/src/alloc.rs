use crate::file::OpenFile;

/// A small integer handle into the descriptor table.
pub type Descriptor = usize;

/// Slots 0, 1 and 2 are kept back the way standard streams are, the file
/// system never hands them out.
pub const RESERVED_DESCRIPTORS: usize = 3;

#[derive(Debug, PartialEq)]
pub enum State {
    Free,
    Used,
}

/// The per-session descriptor table. Each occupied slot exclusively owns one
/// open file entry; clearing the slot drops the entry.
#[derive(Debug)]
pub struct DescriptorTable {
    slots: Vec<Option<OpenFile>>,
}

impl DescriptorTable {
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| None).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, fd: Descriptor) -> bool {
        fd < self.slots.len()
    }

    /// State of a slot. Out of range descriptors read as free.
    pub fn get(&self, fd: Descriptor) -> State {
        match self.slots.get(fd) {
            Some(Some(_)) => State::Used,
            _ => State::Free,
        }
    }

    pub fn entry(&self, fd: Descriptor) -> Option<&OpenFile> {
        self.slots.get(fd)?.as_ref()
    }

    pub fn entry_mut(&mut self, fd: Descriptor) -> Option<&mut OpenFile> {
        self.slots.get_mut(fd)?.as_mut()
    }

    /// Places `file` into a free slot. Returns the entry back if the slot is
    /// taken or out of range.
    pub fn install(&mut self, fd: Descriptor, file: OpenFile) -> Result<(), OpenFile> {
        match self.slots.get_mut(fd) {
            Some(slot) if slot.is_none() => {
                *slot = Some(file);
                Ok(())
            }
            _ => Err(file),
        }
    }

    /// Clears a slot, handing back the entry it held.
    pub fn take(&mut self, fd: Descriptor) -> Option<OpenFile> {
        self.slots.get_mut(fd)?.take()
    }

    /// Occupied slots in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = (Descriptor, &OpenFile)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(fd, slot)| slot.as_ref().map(|file| (fd, file)))
    }

    pub fn next_available(&self) -> NextAvailableAllocation<'_> {
        NextAvailableAllocation::new(self)
    }
}

/// Hands out free descriptors in ascending order, skipping the reserved
/// slots. Each call to `next` resumes after the last slot returned.
pub struct NextAvailableAllocation<'a> {
    /// Keeps track of the next starting place for looking for free slots.
    marker: usize,
    table: &'a DescriptorTable,
}

impl<'a> NextAvailableAllocation<'a> {
    fn new(table: &'a DescriptorTable) -> Self {
        Self {
            marker: RESERVED_DESCRIPTORS,
            table,
        }
    }
}

impl Iterator for NextAvailableAllocation<'_> {
    type Item = Descriptor;

    fn next(&mut self) -> Option<Self::Item> {
        for fd in self.marker..self.table.len() {
            if let State::Free = self.table.get(fd) {
                self.marker = fd + 1;
                return Some(fd);
            }
        }
        self.marker = self.table.len();
        None
    }
}
