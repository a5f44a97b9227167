//! Byte search over a document.
//!
//! Queries are raw bytes and every public offset is a document position.
//! Two modes are supported:
//!
//! - literal search: the query bytes are escaped into a byte regex and the
//!   document is scanned chunk by chunk, so large file-backed documents are
//!   never read into memory at once
//! - regex search: the query is UTF-8 pattern text matched against the
//!   searched range in one piece
//!
//! Matching runs with Unicode disabled, so case-insensitive search folds
//! ASCII letters only.

use std::ops::ControlFlow;

use regex::bytes::{Regex, RegexBuilder};

use crate::document::DeltaDocument;
use crate::error::DeltaError;
use crate::source::ByteSource;

/// Number of bytes read per step of a literal search.
pub const SEARCH_CHUNK_SIZE: u64 = 64 * 1024;

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// If `true`, treats the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            regex: false,
        }
    }
}

/// A match returned by the search APIs, expressed as a half-open byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start position.
    pub start: u64,
    /// Exclusive end position.
    pub end: u64,
}

impl SearchMatch {
    /// Returns the length of the match in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Search errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The provided regex pattern failed to compile.
    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),
    /// Regex queries must be UTF-8 pattern text.
    #[error("regex pattern is not valid UTF-8: {0}")]
    NonUtf8Pattern(#[from] std::str::Utf8Error),
    /// Reading the document failed.
    #[error(transparent)]
    Document(#[from] DeltaError),
}

struct Matcher {
    regex: Regex,
    /// Fixed match length of a literal query; `None` for regex queries.
    literal_len: Option<u64>,
}

impl Matcher {
    fn compile(query: &[u8], options: SearchOptions) -> Result<Self, SearchError> {
        let (pattern, literal_len) = if options.regex {
            (std::str::from_utf8(query)?.to_string(), None)
        } else {
            let pattern: String = query.iter().map(|byte| format!("\\x{byte:02X}")).collect();
            (pattern, Some(query.len() as u64))
        };

        let regex = RegexBuilder::new(&pattern)
            .unicode(false)
            .case_insensitive(!options.case_sensitive)
            .build()?;
        Ok(Self { regex, literal_len })
    }

    /// Feeds every non-empty, non-overlapping match inside `[from, to)` to `visit`.
    fn scan<S: ByteSource>(
        &self,
        doc: &mut DeltaDocument<S>,
        from: u64,
        to: u64,
        mut visit: impl FnMut(SearchMatch) -> ControlFlow<()>,
    ) -> Result<(), SearchError> {
        let Some(literal_len) = self.literal_len else {
            let buffer = doc.read(from, to.saturating_sub(from))?;
            for m in self.regex.find_iter(&buffer) {
                let found = SearchMatch {
                    start: from + m.start() as u64,
                    end: from + m.end() as u64,
                };
                if found.is_empty() {
                    continue;
                }
                if visit(found).is_break() {
                    break;
                }
            }
            return Ok(());
        };

        // A match starting inside a chunk may run `literal_len - 1` bytes past it.
        let overlap = literal_len.saturating_sub(1);
        let mut position = from;
        while position < to {
            let chunk_end = position.saturating_add(SEARCH_CHUNK_SIZE).min(to);
            let read_end = chunk_end.saturating_add(overlap).min(to);
            let buffer = doc.read(position, read_end - position)?;

            let mut next = chunk_end;
            for m in self.regex.find_iter(&buffer) {
                let found = SearchMatch {
                    start: position + m.start() as u64,
                    end: position + m.end() as u64,
                };
                if found.start >= chunk_end {
                    break;
                }
                next = next.max(found.end);
                if visit(found).is_break() {
                    return Ok(());
                }
            }
            position = next;
        }
        Ok(())
    }
}

/// Find the next occurrence of `query` in `doc`, searching forward from `from`.
///
/// - Returns `Ok(None)` if no match is found (or if `query` is empty).
/// - Match ranges are half-open (`[start, end)`).
pub fn find_next<S: ByteSource>(
    doc: &mut DeltaDocument<S>,
    query: &[u8],
    from: u64,
    options: SearchOptions,
) -> Result<Option<SearchMatch>, SearchError> {
    let size = doc.size();
    if query.is_empty() || from >= size {
        return Ok(None);
    }

    let matcher = Matcher::compile(query, options)?;
    let mut first = None;
    matcher.scan(doc, from, size, |found| {
        first = Some(found);
        ControlFlow::Break(())
    })?;
    Ok(first)
}

/// Find the previous occurrence of `query` in `doc` that ends at or before `before`.
///
/// - Returns `Ok(None)` if no match is found (or if `query` is empty).
/// - Match ranges are half-open (`[start, end)`).
pub fn find_prev<S: ByteSource>(
    doc: &mut DeltaDocument<S>,
    query: &[u8],
    before: u64,
    options: SearchOptions,
) -> Result<Option<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }

    let matcher = Matcher::compile(query, options)?;
    let limit = before.min(doc.size());
    let mut last = None;
    matcher.scan(doc, 0, limit, |found| {
        last = Some(found);
        ControlFlow::Continue(())
    })?;
    Ok(last)
}

/// Find all non-overlapping occurrences of `query` in `doc`.
///
/// Returns an empty list if `query` is empty.
pub fn find_all<S: ByteSource>(
    doc: &mut DeltaDocument<S>,
    query: &[u8],
    options: SearchOptions,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let matcher = Matcher::compile(query, options)?;
    let size = doc.size();
    let mut matches = Vec::new();
    matcher.scan(doc, 0, size, |found| {
        matches.push(found);
        ControlFlow::Continue(())
    })?;
    Ok(matches)
}
