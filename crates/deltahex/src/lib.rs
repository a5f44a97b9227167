#![warn(missing_docs)]
//! Deltahex - Delta Document Core for Binary Editors
//!
//! # Overview
//!
//! `deltahex` edits binary data of any size without rewriting or copying it.
//! The backing source (a file, or any `Read + Seek`) stays untouched; the
//! document is a chain of segments that either reference ranges of the source
//! or own bytes typed in by the user. It does not render anything, assuming the
//! upper layer draws a hex/code grid from [`DeltaDocument::read`].
//!
//! # Core Features
//!
//! - **Segment Chain**: insertion/deletion touch only the segments around the edit
//! - **Page Window**: two 1 KiB pages of the source stay resident
//! - **Digit Entry**: bytes typed digit by digit in binary, octal, decimal or hexadecimal
//! - **Undo/Redo**: every operation returns its own inverse
//! - **Search**: literal byte and regex search over the whole document
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Commands & Undo History                    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Live Edits (digit entry, backspace/delete) │  ← Typing
//! ├─────────────────────────────────────────────┤
//! │  Operations (insert / remove / modify)      │  ← Reversible edits
//! ├─────────────────────────────────────────────┤
//! │  Delta Document (segment chain)             │  ← Content
//! ├─────────────────────────────────────────────┤
//! │  Page Window over ByteSource                │  ← Backing storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Editing a document
//!
//! ```rust
//! use deltahex::DeltaDocument;
//!
//! let mut doc = DeltaDocument::from_bytes(b"0123456789".to_vec()).unwrap();
//! doc.insert(5, b"abc").unwrap();
//! doc.remove(0, 2).unwrap();
//! doc.set_byte(0, b'X').unwrap();
//!
//! assert_eq!(doc.to_vec().unwrap(), b"X34abc56789");
//! assert_eq!(doc.size(), 11);
//! ```
//!
//! ## Typing digits with undo
//!
//! ```rust
//! use deltahex::{CodeType, DeltaDocument, EditCommand, EditMode, UndoHistory};
//!
//! let mut doc = DeltaDocument::from_bytes(vec![0x00]).unwrap();
//! let mut history = UndoHistory::default();
//!
//! // Overwrite past the end appends a byte.
//! let command =
//!     EditCommand::code_edit(&mut doc, EditMode::Overwrite, CodeType::Hexadecimal, 1, 0).unwrap();
//! history.push(command);
//! history.append_edit(&mut doc, 0xA).unwrap();
//! history.append_edit(&mut doc, 0xB).unwrap();
//! assert_eq!(doc.to_vec().unwrap(), vec![0x00, 0xAB]);
//!
//! history.undo(&mut doc).unwrap();
//! assert_eq!(doc.size(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`source`] - Random-access byte sources
//! - [`page_window`] - Two-page cache over the source
//! - [`linked_list`] - Arena-backed doubly linked sequence
//! - [`segment`] - File and memory segments
//! - [`document`] - The delta document
//! - [`code_type`] - Numeral systems for digit entry
//! - [`operation`] - Reversible insert/remove/modify operations
//! - [`edit`] - Live digit and delete edits
//! - [`command`] - Undoable commands
//! - [`history`] - Undo/redo stacks
//! - [`search`] - Byte and regex search
//!
//! # Diagnostics
//!
//! Source read failures inside the page window do not fail reads; they are
//! reported to a [`DiagnosticsSink`] (by default [`tracing_sink`]) and the
//! affected page reads as zeros.

pub mod code_type;
pub mod command;
pub mod diagnostics;
pub mod document;
pub mod edit;
pub mod error;
pub mod history;
pub mod linked_list;
pub mod operation;
pub mod page_window;
pub mod search;
pub mod segment;
pub mod source;

pub use code_type::CodeType;
pub use command::{CommandState, EditCommand};
pub use diagnostics::{DiagnosticsSink, PageLoadFailure, tracing_sink};
pub use document::DeltaDocument;
pub use edit::{BACKSPACE, CodeEdit, DELETE, DeleteEdit, EditMode, EditOperation};
pub use error::{DeltaError, ErrorKind, Result};
pub use history::UndoHistory;
pub use linked_list::{LinkedSequence, NodeId};
pub use operation::{InsertOperation, ModifyOperation, Operation, OperationKind, RemoveOperation};
pub use page_window::{PAGE_SIZE, PageWindow};
pub use search::{SearchError, SearchMatch, SearchOptions};
pub use segment::{FileSegment, MemorySegment, Segment};
pub use source::ByteSource;
