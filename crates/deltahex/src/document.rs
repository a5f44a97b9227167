//! Delta document: a segment chain over an immutable backing source.
//!
//! The document content is the concatenation of its segments. File segments
//! reference ranges of the backing source and are read through a
//! [`PageWindow`]; memory segments own overlay bytes. Edits split, trim and
//! splice segments, so the backing source is never rewritten and never copied.
//!
//! Invariants kept after every completed operation:
//!
//! - the sum of segment lengths equals [`DeltaDocument::size`]
//! - no zero-length segment stays in the chain
//! - every offset in `[0, size)` maps to exactly one `(segment, local offset)` pair
//!
//! Operations are not transactional: a failure halfway through a multi-step
//! edit leaves the steps already applied in place.

use std::io::Cursor;

use crate::diagnostics::{DiagnosticsSink, tracing_sink};
use crate::error::{DeltaError, Result};
use crate::linked_list::{LinkedSequence, NodeId};
use crate::page_window::PageWindow;
use crate::segment::Segment;
use crate::source::ByteSource;

/// Cached lookup result: a node and the document offset it starts at.
#[derive(Debug, Clone, Copy)]
struct Focus {
    node: NodeId,
    start: u64,
}

/// Editable document built from file and memory segments.
///
/// # Example
///
/// ```rust
/// use deltahex::DeltaDocument;
///
/// let mut doc = DeltaDocument::from_bytes(b"hello".to_vec()).unwrap();
/// doc.insert(5, b" world").unwrap();
/// doc.set_byte(0, b'H').unwrap();
/// assert_eq!(doc.to_vec().unwrap(), b"Hello world");
/// assert_eq!(doc.size(), 11);
/// ```
#[derive(Debug)]
pub struct DeltaDocument<S> {
    window: Option<PageWindow<S>>,
    segments: LinkedSequence<Segment>,
    size: u64,
    focus: Option<Focus>,
}

impl DeltaDocument<Cursor<Vec<u8>>> {
    /// Opens a document backed by an in-memory buffer.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::open(Cursor::new(data))
    }
}

impl<S: ByteSource> Default for DeltaDocument<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: ByteSource> DeltaDocument<S> {
    /// Creates a new, empty document without a backing source.
    pub fn empty() -> Self {
        Self {
            window: None,
            segments: LinkedSequence::new(),
            size: 0,
            focus: None,
        }
    }

    /// Opens `source` as one file segment spanning all of it.
    ///
    /// Page load failures are logged through `tracing`.
    pub fn open(source: S) -> Result<Self> {
        Self::open_with_sink(source, tracing_sink())
    }

    /// Opens `source`, reporting page load failures to `sink`.
    pub fn open_with_sink(source: S, sink: DiagnosticsSink) -> Result<Self> {
        let window = PageWindow::new(source, sink)?;
        let source_len = window.source_len();
        let mut segments = LinkedSequence::new();
        if source_len > 0 {
            segments.append(Segment::file(0, source_len));
        }

        Ok(Self {
            window: Some(window),
            segments,
            size: source_len,
            focus: None,
        })
    }

    /// Document size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if the document holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Length of the backing source, `0` for documents without one.
    pub fn source_len(&self) -> u64 {
        self.window.as_ref().map_or(0, PageWindow::source_len)
    }

    /// Number of segments in the chain.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segments in document order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().map(|(_, segment)| segment)
    }

    /// The page window over the backing source, if any.
    pub fn page_window(&self) -> Option<&PageWindow<S>> {
        self.window.as_ref()
    }

    /// Consumes the document, returning the backing source.
    pub fn into_source(self) -> Option<S> {
        self.window.map(PageWindow::into_source)
    }

    /// Returns the byte at `position`.
    pub fn read_byte(&mut self, position: u64) -> Result<u8> {
        let (node, local) = self.locate(position)?;
        let file_position = match self.segments.value(node)? {
            Segment::Memory(memory) => return Ok(memory.data()[local as usize]),
            Segment::File(file) => file.start_position + local,
        };
        Ok(self.window_mut()?.read_byte(file_position))
    }

    /// Copies `length` bytes starting at `position`.
    pub fn read(&mut self, position: u64, length: u64) -> Result<Vec<u8>> {
        self.check_range(position, length)?;
        let mut out = Vec::with_capacity(length as usize);
        if length == 0 {
            return Ok(out);
        }

        let (mut node, mut local) = self.locate(position)?;
        loop {
            let remaining = length - out.len() as u64;
            let segment = self.segments.value(node)?;
            let count = (segment.len() - local).min(remaining);
            match segment {
                Segment::Memory(memory) => {
                    let start = local as usize;
                    out.extend_from_slice(&memory.data()[start..start + count as usize]);
                }
                Segment::File(file) => {
                    let file_position = file.start_position + local;
                    let filled = out.len();
                    out.resize(filled + count as usize, 0);
                    self.window
                        .as_mut()
                        .ok_or(DeltaError::InvalidState("file segment without backing source"))?
                        .read_into(file_position, &mut out[filled..]);
                }
            }

            if out.len() as u64 >= length {
                return Ok(out);
            }
            local = 0;
            node = self.next_node(node)?;
        }
    }

    /// Copies the whole document content.
    pub fn to_vec(&mut self) -> Result<Vec<u8>> {
        self.read(0, self.size)
    }

    /// Inserts `data` at `position`.
    pub fn insert(&mut self, position: u64, data: &[u8]) -> Result<()> {
        self.insert_segment(position, Segment::memory(data.to_vec()))
    }

    /// Inserts `count` zero bytes at `position`.
    pub fn insert_zeros(&mut self, position: u64, count: u64) -> Result<()> {
        self.insert_segment(position, Segment::memory(vec![0; count as usize]))
    }

    /// Splices `segment` into the chain at `position`.
    ///
    /// The segment containing `position` is split in two around the new one.
    /// Memory bytes landing inside or at the edge of a memory segment extend
    /// that segment instead of creating a new one.
    pub fn insert_segment(&mut self, position: u64, segment: Segment) -> Result<()> {
        if position > self.size {
            return Err(DeltaError::PositionOutOfRange {
                position,
                size: self.size,
            });
        }
        let length = segment.len();
        if length == 0 {
            return Ok(());
        }
        if let Segment::File(file) = &segment {
            let end = file.start_position.saturating_add(file.length);
            if end > self.source_len() {
                return Err(DeltaError::SourceRangeOutOfBounds {
                    start: file.start_position,
                    end,
                    source_len: self.source_len(),
                });
            }
        }

        if position == self.size {
            match self.segments.last() {
                Some(last) if segment.is_memory() && self.is_memory(last)? => {
                    self.splice_memory(last, usize::MAX, segment)?;
                }
                _ => {
                    self.segments.append(segment);
                }
            }
        } else {
            let (node, local) = self.locate(position)?;
            if local == 0 {
                match self.segments.prev(node)? {
                    Some(prev) if segment.is_memory() && self.is_memory(prev)? => {
                        self.splice_memory(prev, usize::MAX, segment)?;
                    }
                    _ if segment.is_memory() && self.is_memory(node)? => {
                        self.splice_memory(node, 0, segment)?;
                    }
                    _ => {
                        self.segments.insert_before(node, segment)?;
                    }
                }
            } else if segment.is_memory() && self.is_memory(node)? {
                self.splice_memory(node, local as usize, segment)?;
            } else {
                let tail = self.segments.value_mut(node)?.split_off(local);
                let inserted = self.segments.insert_after(node, segment)?;
                self.segments.insert_after(inserted, tail)?;
            }
        }

        self.size += length;
        self.focus = None;
        Ok(())
    }

    /// Removes `length` bytes starting at `position`.
    pub fn remove(&mut self, position: u64, length: u64) -> Result<()> {
        self.check_range(position, length)?;
        if length == 0 {
            return Ok(());
        }

        let (mut node, mut local) = self.locate(position)?;
        let mut removed = 0;
        while removed < length {
            let remaining = length - removed;
            let segment_len = self.segments.value(node)?.len();
            let next = self.segments.next(node)?;
            let available = segment_len - local;

            if local == 0 && remaining >= segment_len {
                self.segments.remove(node)?;
                removed += segment_len;
            } else if remaining >= available {
                self.segments.value_mut(node)?.truncate(local);
                removed += available;
            } else if local == 0 {
                self.segments.value_mut(node)?.truncate_front(remaining);
                removed += remaining;
            } else {
                let segment = self.segments.value_mut(node)?;
                match segment {
                    Segment::Memory(memory) => {
                        let start = local as usize;
                        memory.data_mut().drain(start..start + remaining as usize);
                    }
                    Segment::File(_) => {
                        let tail = segment.split_off(local + remaining);
                        segment.truncate(local);
                        self.segments.insert_after(node, tail)?;
                    }
                }
                removed += remaining;
            }

            local = 0;
            match next {
                Some(next) if removed < length => node = next,
                _ => break,
            }
        }

        self.size -= removed;
        self.focus = None;
        if removed != length {
            return Err(DeltaError::RemoveMismatch {
                expected: length,
                removed,
            });
        }
        Ok(())
    }

    /// Sets the byte at `position`.
    ///
    /// Memory segments are changed in place. A byte inside a file segment is
    /// copied on write: the segment is split around a new one-byte memory
    /// segment, or the byte is appended to the preceding memory segment when it
    /// is the first byte of the file segment.
    pub fn set_byte(&mut self, position: u64, value: u8) -> Result<()> {
        let (node, local) = self.locate(position)?;
        let file = match self.segments.value_mut(node)? {
            Segment::Memory(memory) => {
                memory.data_mut()[local as usize] = value;
                return Ok(());
            }
            Segment::File(file) => *file,
        };

        if local == 0
            && let Some(prev) = self.segments.prev(node)?
            && self.is_memory(prev)?
        {
            self.splice_memory(prev, usize::MAX, Segment::memory(vec![value]))?;
            if file.length == 1 {
                self.segments.remove(node)?;
            } else {
                self.segments.value_mut(node)?.truncate_front(1);
            }
        } else {
            let byte = Segment::memory(vec![value]);
            let inserted = if local == 0 {
                *self.segments.value_mut(node)? = byte;
                node
            } else {
                self.segments.value_mut(node)?.truncate(local);
                self.segments.insert_after(node, byte)?
            };

            let after_len = file.length - local - 1;
            if after_len > 0 {
                let after = Segment::file(file.start_position + local + 1, after_len);
                self.segments.insert_after(inserted, after)?;
            }
        }

        self.focus = None;
        Ok(())
    }

    /// Overwrites the bytes starting at `position` with `data`.
    pub fn replace(&mut self, position: u64, data: &[u8]) -> Result<()> {
        self.check_range(position, data.len() as u64)?;
        for (offset, value) in data.iter().enumerate() {
            self.set_byte(position + offset as u64, *value)?;
        }
        Ok(())
    }

    /// Finds the segment containing `position` and the offset inside it.
    fn locate(&mut self, position: u64) -> Result<(NodeId, u64)> {
        if position >= self.size {
            return Err(DeltaError::PositionOutOfRange {
                position,
                size: self.size,
            });
        }

        let (mut node, mut start) = match self.focus {
            Some(focus) if focus.start <= position => (focus.node, focus.start),
            _ => (
                self.segments
                    .first()
                    .ok_or(DeltaError::InvalidState("document has no segments"))?,
                0,
            ),
        };

        loop {
            let length = self.segments.value(node)?.len();
            if position < start + length {
                self.focus = Some(Focus { node, start });
                return Ok((node, position - start));
            }
            start += length;
            node = self.next_node(node)?;
        }
    }

    fn next_node(&self, node: NodeId) -> Result<NodeId> {
        self.segments
            .next(node)?
            .ok_or(DeltaError::InvalidState("segment lengths disagree with document size"))
    }

    fn check_range(&self, position: u64, length: u64) -> Result<u64> {
        match position.checked_add(length) {
            Some(end) if end <= self.size => Ok(end),
            _ => Err(DeltaError::RangeOutOfBounds {
                start: position,
                end: position.saturating_add(length),
                size: self.size,
            }),
        }
    }

    fn is_memory(&self, node: NodeId) -> Result<bool> {
        Ok(self.segments.value(node)?.is_memory())
    }

    /// Splices the bytes of memory segment `inserted` into memory node `node` at `at`.
    ///
    /// `at` is clamped to the node length, so `usize::MAX` appends.
    fn splice_memory(&mut self, node: NodeId, at: usize, inserted: Segment) -> Result<()> {
        match (self.segments.value_mut(node)?, inserted) {
            (Segment::Memory(target), Segment::Memory(inserted)) => {
                let data = target.data_mut();
                let at = at.min(data.len());
                data.splice(at..at, inserted.data().iter().copied());
                Ok(())
            }
            _ => Err(DeltaError::InvalidState("splice requires memory segments")),
        }
    }

    fn window_mut(&mut self) -> Result<&mut PageWindow<S>> {
        self.window
            .as_mut()
            .ok_or(DeltaError::InvalidState("file segment without backing source"))
    }
}
