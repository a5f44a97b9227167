//! Undoable commands wrapping live edits or finished operations.
//!
//! # State machine
//!
//! ```text
//!              undo()                 redo()
//! Performed ─────────────► Undone ─────────────► Reverted
//!                            ▲                      │
//!                            └──────── undo() ──────┘
//! ```
//!
//! A command starts `Performed`. While it is `Performed` and still holds a
//! live edit, [`EditCommand::append_edit`] extends that edit. The first undo
//! turns the live edit into plain operations and from then on every toggle
//! executes each held operation and stores the inverse it returns, so the
//! command alternates between `Undone` and `Reverted` without rebuilding
//! anything. Appending to a toggled command is rejected.

use crate::code_type::CodeType;
use crate::document::DeltaDocument;
use crate::edit::{CodeEdit, DeleteEdit, EditMode, EditOperation};
use crate::error::{DeltaError, Result};
use crate::operation::Operation;
use crate::source::ByteSource;

/// Lifecycle of an [`EditCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    /// Executed and never toggled.
    Performed,
    /// Undone; the held operations redo the command.
    Undone,
    /// Executed again after an undo; the held operations undo the command.
    Reverted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CommandOperations {
    Live(EditOperation),
    Recorded(Vec<Operation>),
}

/// An undoable document edit.
///
/// # Example
///
/// ```rust
/// use deltahex::{CodeType, DeltaDocument, EditCommand, EditMode};
///
/// let mut doc = DeltaDocument::from_bytes(vec![0x00, 0x11]).unwrap();
/// let mut command =
///     EditCommand::code_edit(&mut doc, EditMode::Overwrite, CodeType::Hexadecimal, 0, 0).unwrap();
/// command.append_edit(&mut doc, 0xC).unwrap();
/// command.append_edit(&mut doc, 0xD).unwrap();
/// assert_eq!(doc.to_vec().unwrap(), vec![0xCD, 0x11]);
///
/// command.undo(&mut doc).unwrap();
/// assert_eq!(doc.to_vec().unwrap(), vec![0x00, 0x11]);
/// command.redo(&mut doc).unwrap();
/// assert_eq!(doc.to_vec().unwrap(), vec![0xCD, 0x11]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCommand {
    operations: CommandOperations,
    state: CommandState,
}

impl EditCommand {
    /// Starts a digit entry command at `position`/`code_offset`.
    pub fn code_edit<S: ByteSource>(
        doc: &mut DeltaDocument<S>,
        mode: EditMode,
        code_type: CodeType,
        position: u64,
        code_offset: usize,
    ) -> Result<Self> {
        let edit = CodeEdit::new(doc, mode, code_type, position, code_offset)?;
        Ok(Self::live(EditOperation::Code(edit)))
    }

    /// Starts a backspace/delete command with the caret at `position`.
    pub fn delete(position: u64) -> Self {
        Self::live(EditOperation::Delete(DeleteEdit::new(position)))
    }

    /// Executes `operations` in order and records their inverses.
    pub fn perform<S: ByteSource>(doc: &mut DeltaDocument<S>, operations: Vec<Operation>) -> Result<Self> {
        let mut inverses = Vec::with_capacity(operations.len());
        for operation in &operations {
            inverses.push(operation.execute_with_undo(doc)?);
        }
        Ok(Self {
            operations: CommandOperations::Recorded(inverses),
            state: CommandState::Performed,
        })
    }

    fn live(edit: EditOperation) -> Self {
        Self {
            operations: CommandOperations::Live(edit),
            state: CommandState::Performed,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CommandState {
        self.state
    }

    /// Returns `true` if [`undo`](Self::undo) is legal now.
    pub fn can_undo(&self) -> bool {
        self.state != CommandState::Undone
    }

    /// Returns `true` if [`redo`](Self::redo) is legal now.
    pub fn can_redo(&self) -> bool {
        self.state == CommandState::Undone
    }

    /// Returns `true` once the command no longer holds a live edit.
    pub fn was_reverted(&self) -> bool {
        !matches!(self.operations, CommandOperations::Live(_))
    }

    /// Returns `true` while [`append_edit`](Self::append_edit) is accepted.
    pub fn is_live(&self) -> bool {
        self.state == CommandState::Performed && !self.was_reverted()
    }

    /// The live edit, if the command still holds one.
    pub fn live_edit(&self) -> Option<&EditOperation> {
        match &self.operations {
            CommandOperations::Live(edit) => Some(edit),
            CommandOperations::Recorded(_) => None,
        }
    }

    /// Recorded operations; empty while the command holds a live edit.
    pub fn operations(&self) -> &[Operation] {
        match &self.operations {
            CommandOperations::Live(_) => &[],
            CommandOperations::Recorded(operations) => operations,
        }
    }

    /// Extends the live edit by one digit or key.
    pub fn append_edit<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>, value: u8) -> Result<()> {
        match (&mut self.operations, self.state) {
            (CommandOperations::Live(edit), CommandState::Performed) => edit.append_edit(doc, value),
            _ => Err(DeltaError::InvalidState(
                "cannot append edit on reverted command",
            )),
        }
    }

    /// Reverts the command.
    ///
    /// Held operations run in reverse order; each is replaced by its inverse.
    pub fn undo<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>) -> Result<()> {
        if self.state == CommandState::Undone {
            return Err(DeltaError::InvalidState("command is already undone"));
        }

        if let CommandOperations::Live(edit) = &self.operations {
            self.operations = CommandOperations::Recorded(edit.generate_undo());
        }
        if let CommandOperations::Recorded(operations) = &mut self.operations {
            for operation in operations.iter_mut().rev() {
                *operation = operation.execute_with_undo(doc)?;
            }
        }

        self.state = CommandState::Undone;
        Ok(())
    }

    /// Re-applies an undone command.
    ///
    /// Held operations run in order; each is replaced by its inverse.
    pub fn redo<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>) -> Result<()> {
        if self.state != CommandState::Undone {
            return Err(DeltaError::InvalidState("command is not undone"));
        }

        if let CommandOperations::Recorded(operations) = &mut self.operations {
            for operation in operations.iter_mut() {
                *operation = operation.execute_with_undo(doc)?;
            }
        }

        self.state = CommandState::Reverted;
        Ok(())
    }
}
