//! Diagnostics reported by the page cache.
//!
//! Reading pages from the backing source happens underneath byte reads that
//! cannot fail, so I/O errors are not propagated. Instead each failure is
//! handed to a [`DiagnosticsSink`] owned by the page window. The sink lives as
//! long as the window and is dropped with it.

use std::io;

/// A page that could not be (fully) loaded from the backing source.
#[derive(Debug)]
pub struct PageLoadFailure {
    /// Index of the page (`position / PAGE_SIZE`).
    pub page_index: u64,
    /// Byte position of the first byte of the page.
    pub position: u64,
    /// Underlying I/O error.
    pub error: io::Error,
}

/// Receiver of page load failures.
pub type DiagnosticsSink = Box<dyn FnMut(&PageLoadFailure)>;

/// Default sink: logs every failure through `tracing` at error level.
pub fn tracing_sink() -> DiagnosticsSink {
    Box::new(|failure: &PageLoadFailure| {
        tracing::error!(
            page_index = failure.page_index,
            position = failure.position,
            error = %failure.error,
            "failed to load page from backing source"
        );
    })
}
