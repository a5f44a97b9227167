//! Segments of a delta document.
//!
//! A segment is one contiguous run of document bytes. It either references a
//! range of the backing source or owns overlay bytes held in memory. Cloning a
//! segment yields a detached copy; memory bytes are deep-copied.

/// Immutable reference to `[start_position, start_position + length)` of the backing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSegment {
    /// Offset of the first byte in the backing source.
    pub start_position: u64,
    /// Number of referenced bytes.
    pub length: u64,
}

impl FileSegment {
    /// Creates a file segment.
    pub fn new(start_position: u64, length: u64) -> Self {
        Self {
            start_position,
            length,
        }
    }
}

/// Overlay bytes owned by the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySegment {
    data: Vec<u8>,
}

impl MemorySegment {
    /// Creates a memory segment owning `data`.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Overlay bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}

/// One run of document bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Bytes read from the backing source.
    File(FileSegment),
    /// Bytes held in memory.
    Memory(MemorySegment),
}

impl Segment {
    /// Creates a segment referencing a range of the backing source.
    pub fn file(start_position: u64, length: u64) -> Self {
        Self::File(FileSegment::new(start_position, length))
    }

    /// Creates a segment owning `data`.
    pub fn memory(data: Vec<u8>) -> Self {
        Self::Memory(MemorySegment::new(data))
    }

    /// Length in bytes.
    pub fn len(&self) -> u64 {
        match self {
            Self::File(file) => file.length,
            Self::Memory(memory) => memory.data.len() as u64,
        }
    }

    /// Returns `true` for a zero-length segment.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for a memory-backed segment.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory(_))
    }

    /// Splits the segment at `at`, keeping `[0, at)` and returning `[at, len)`.
    ///
    /// Splitting a file segment produces two disjoint ranges of the same source.
    pub fn split_off(&mut self, at: u64) -> Segment {
        match self {
            Self::File(file) => {
                let tail = FileSegment::new(file.start_position + at, file.length - at);
                file.length = at;
                Self::File(tail)
            }
            Self::Memory(memory) => Self::memory(memory.data.split_off(at as usize)),
        }
    }

    /// Keeps only the first `length` bytes.
    pub fn truncate(&mut self, length: u64) {
        match self {
            Self::File(file) => file.length = file.length.min(length),
            Self::Memory(memory) => memory.data.truncate(length as usize),
        }
    }

    /// Drops the first `count` bytes.
    pub fn truncate_front(&mut self, count: u64) {
        match self {
            Self::File(file) => {
                let count = count.min(file.length);
                file.start_position += count;
                file.length -= count;
            }
            Self::Memory(memory) => {
                let count = (count as usize).min(memory.data.len());
                memory.data.drain(..count);
            }
        }
    }
}
