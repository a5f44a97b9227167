//! Two-slot page cache over the backing source.
//!
//! Random byte reads into a file segment are served from one of two resident
//! pages of [`PAGE_SIZE`] bytes. A miss evicts the slot the round-robin pointer
//! designates and flips the pointer; recency of access plays no role, so the
//! page that survives a given access sequence is fully determined by the
//! order of misses.

use std::fmt;

use crate::diagnostics::{DiagnosticsSink, PageLoadFailure};
use crate::error::Result;
use crate::source::ByteSource;

/// Size of one cached page in bytes.
pub const PAGE_SIZE: usize = 1024;

struct DataPage {
    /// `None` until the slot holds a page.
    page_index: Option<u64>,
    bytes: Box<[u8; PAGE_SIZE]>,
}

impl DataPage {
    fn new() -> Self {
        Self {
            page_index: None,
            bytes: Box::new([0; PAGE_SIZE]),
        }
    }
}

/// Read window over a [`ByteSource`] with two cached pages.
pub struct PageWindow<S> {
    source: S,
    source_len: u64,
    pages: [DataPage; 2],
    /// Slot evicted by the next miss.
    active_page: usize,
    sink: DiagnosticsSink,
}

impl<S: ByteSource> PageWindow<S> {
    /// Creates a window over `source`, querying its length once and loading page 0.
    pub fn new(mut source: S, sink: DiagnosticsSink) -> Result<Self> {
        let source_len = source.source_len()?;
        let mut window = Self {
            source,
            source_len,
            pages: [DataPage::new(), DataPage::new()],
            active_page: 1,
            sink,
        };
        window.load_page(0, 0);
        Ok(window)
    }

    /// Length of the backing source captured at construction.
    pub fn source_len(&self) -> u64 {
        self.source_len
    }

    /// Page indexes currently held by slot 0 and slot 1.
    pub fn resident_pages(&self) -> [Option<u64>; 2] {
        [self.pages[0].page_index, self.pages[1].page_index]
    }

    /// Returns the byte at `position`.
    ///
    /// Positions past the end of the source read as zero.
    pub fn read_byte(&mut self, position: u64) -> u8 {
        let slot = self.slot_for(position / PAGE_SIZE as u64);
        self.pages[slot].bytes[(position % PAGE_SIZE as u64) as usize]
    }

    /// Fills `buf` with the bytes starting at `position`.
    pub fn read_into(&mut self, mut position: u64, buf: &mut [u8]) {
        let mut filled = 0;
        while filled < buf.len() {
            let slot = self.slot_for(position / PAGE_SIZE as u64);
            let in_page = (position % PAGE_SIZE as u64) as usize;
            let count = (PAGE_SIZE - in_page).min(buf.len() - filled);
            buf[filled..filled + count]
                .copy_from_slice(&self.pages[slot].bytes[in_page..in_page + count]);
            filled += count;
            position += count as u64;
        }
    }

    /// Consumes the window, returning the backing source.
    pub fn into_source(self) -> S {
        self.source
    }

    fn slot_for(&mut self, page_index: u64) -> usize {
        if self.pages[0].page_index == Some(page_index) {
            return 0;
        }
        if self.pages[1].page_index == Some(page_index) {
            return 1;
        }

        let slot = self.active_page;
        self.load_page(slot, page_index);
        self.active_page = (self.active_page + 1) & 1;
        slot
    }

    fn load_page(&mut self, slot: usize, page_index: u64) {
        let page_position = page_index * PAGE_SIZE as u64;
        let to_read = self
            .source_len
            .saturating_sub(page_position)
            .min(PAGE_SIZE as u64) as usize;

        tracing::trace!(page_index, slot, to_read, "loading page");

        let page = &mut self.pages[slot];
        page.page_index = Some(page_index);

        let mut offset = 0;
        while offset < to_read {
            match self
                .source
                .read_at(page_position + offset as u64, &mut page.bytes[offset..to_read])
            {
                Ok(0) => break,
                Ok(read) => offset += read,
                Err(error) => {
                    (self.sink)(&PageLoadFailure {
                        page_index,
                        position: page_position,
                        error,
                    });
                    break;
                }
            }
        }
        page.bytes[offset..].fill(0);
    }
}

impl<S> fmt::Debug for PageWindow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageWindow")
            .field("source_len", &self.source_len)
            .field(
                "resident_pages",
                &[self.pages[0].page_index, self.pages[1].page_index],
            )
            .field("active_page", &self.active_page)
            .finish_non_exhaustive()
    }
}
