//! Live edits: operations that grow one keystroke at a time.
//!
//! A live edit mutates the document as each digit or key arrives and records
//! what it needs to revert itself. Once the edit is finished, [`generate_undo`]
//! turns that record into plain [`Operation`]s.
//!
//! [`generate_undo`]: EditOperation::generate_undo

use crate::code_type::CodeType;
use crate::document::DeltaDocument;
use crate::error::{DeltaError, Result};
use crate::operation::{ModifyOperation, Operation, RemoveOperation};
use crate::source::ByteSource;

/// Key code deleting the byte before the position.
pub const BACKSPACE: u8 = 0x08;
/// Key code deleting the byte at the position.
pub const DELETE: u8 = 0x7f;

/// How typed digits treat existing bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Each new byte is inserted before the existing content.
    Insert,
    /// Digits replace existing bytes; the document only grows past its end.
    #[default]
    Overwrite,
}

/// Digit-by-digit entry of bytes in a numeral system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEdit {
    mode: EditMode,
    code_type: CodeType,
    start_position: u64,
    start_code_offset: usize,
    code_offset: usize,
    /// Bytes touched so far, starting at `start_position`.
    length: u64,
    /// Original values of the pre-existing bytes among the touched ones.
    undo_data: Vec<u8>,
}

impl CodeEdit {
    /// Starts a code edit at `position`, with the caret on digit `code_offset`.
    ///
    /// A caret inside an existing byte captures that byte right away; a caret
    /// inside a byte that does not exist yet starts over at the first digit.
    pub fn new<S: ByteSource>(
        doc: &mut DeltaDocument<S>,
        mode: EditMode,
        code_type: CodeType,
        position: u64,
        code_offset: usize,
    ) -> Result<Self> {
        if position > doc.size() {
            return Err(DeltaError::PositionOutOfRange {
                position,
                size: doc.size(),
            });
        }
        code_type.check_code_offset(code_offset)?;

        let mut edit = Self {
            mode,
            code_type,
            start_position: position,
            start_code_offset: code_offset,
            code_offset,
            length: 0,
            undo_data: Vec::new(),
        };
        if code_offset > 0 {
            if position < doc.size() {
                edit.undo_data.push(doc.read_byte(position)?);
                edit.length = 1;
            } else {
                edit.start_code_offset = 0;
                edit.code_offset = 0;
            }
        }
        Ok(edit)
    }

    /// Edit mode.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Numeral system digits are entered in.
    pub fn code_type(&self) -> CodeType {
        self.code_type
    }

    /// Position of the first touched byte.
    pub fn start_position(&self) -> u64 {
        self.start_position
    }

    /// Code offset the edit started at.
    pub fn start_code_offset(&self) -> usize {
        self.start_code_offset
    }

    /// Digit the next [`append_digit`](Self::append_digit) call writes.
    pub fn code_offset(&self) -> usize {
        self.code_offset
    }

    /// Number of bytes touched so far.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Writes `digit` into the current byte and advances to the next digit.
    pub fn append_digit<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>, digit: u8) -> Result<()> {
        self.code_type.check_digit(digit)?;

        let mut position = self.start_position + self.length;
        let mut value = 0;
        if self.code_offset > 0 {
            position -= 1;
            value = doc.read_byte(position)?;
        } else {
            if self.mode == EditMode::Overwrite && position < doc.size() {
                value = doc.read_byte(position)?;
                self.undo_data.push(value);
            } else {
                doc.insert_zeros(position, 1)?;
            }
            self.length += 1;
        }

        let value = self.code_type.fold_digit(value, self.code_offset, digit)?;
        doc.set_byte(position, value)?;

        self.code_offset += 1;
        if self.code_offset == self.code_type.max_digits() {
            self.code_offset = 0;
        }
        Ok(())
    }

    /// Operations reverting everything written so far.
    ///
    /// Pre-existing bytes are restored by a modify operation, bytes added by
    /// the edit are removed.
    pub fn generate_undo(&self) -> Vec<Operation> {
        let captured = self.undo_data.len() as u64;
        let mut operations = Vec::with_capacity(2);
        if captured > 0 {
            operations.push(Operation::Modify(ModifyOperation::new(
                self.start_position,
                self.undo_data.clone(),
            )));
        }
        if self.length > captured {
            operations.push(Operation::Remove(RemoveOperation::new(
                self.start_position + captured,
                self.start_code_offset,
                self.length - captured,
            )));
        }
        operations
    }
}

/// Byte deletion driven by backspace and delete keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEdit {
    position: u64,
    /// Removed bytes in document order.
    undo_data: Vec<u8>,
}

impl DeleteEdit {
    /// Starts a delete edit with the caret at `position`.
    pub fn new(position: u64) -> Self {
        Self {
            position,
            undo_data: Vec::new(),
        }
    }

    /// Current caret position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Applies one [`BACKSPACE`] or [`DELETE`] key.
    ///
    /// Backspace at the start and delete at the end of the document do nothing.
    pub fn append_key<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>, key: u8) -> Result<()> {
        match key {
            BACKSPACE => {
                if self.position > 0 {
                    self.position -= 1;
                    let value = doc.read_byte(self.position)?;
                    self.undo_data.insert(0, value);
                    doc.remove(self.position, 1)?;
                }
            }
            DELETE => {
                if self.position < doc.size() {
                    let value = doc.read_byte(self.position)?;
                    self.undo_data.push(value);
                    doc.remove(self.position, 1)?;
                }
            }
            other => return Err(DeltaError::UnexpectedInput(other)),
        }
        Ok(())
    }

    /// Operation re-inserting the deleted bytes.
    pub fn generate_undo(&self) -> Vec<Operation> {
        if self.undo_data.is_empty() {
            return Vec::new();
        }
        vec![Operation::insert(self.position, self.undo_data.clone())]
    }
}

/// An edit that is still accepting input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Digit entry.
    Code(CodeEdit),
    /// Backspace/delete sequence.
    Delete(DeleteEdit),
}

impl EditOperation {
    /// Feeds one more digit (code edits) or key (delete edits).
    pub fn append_edit<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>, value: u8) -> Result<()> {
        match self {
            Self::Code(edit) => edit.append_digit(doc, value),
            Self::Delete(edit) => edit.append_key(doc, value),
        }
    }

    /// Operations reverting the edit.
    pub fn generate_undo(&self) -> Vec<Operation> {
        match self {
            Self::Code(edit) => edit.generate_undo(),
            Self::Delete(edit) => edit.generate_undo(),
        }
    }
}
