//! Linear undo/redo history of edit commands.

use crate::command::EditCommand;
use crate::document::DeltaDocument;
use crate::error::{DeltaError, Result};
use crate::source::ByteSource;

/// Default bound on the number of undoable commands.
pub const DEFAULT_MAX_UNDO: usize = 1000;

/// Undo and redo stacks of [`EditCommand`]s.
///
/// Pushing a command discards everything that could be redone. The oldest
/// command is dropped once `max_undo` commands are stored.
#[derive(Debug)]
pub struct UndoHistory {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
    max_undo: usize,
    /// Undo depth at the last clean point; `None` once that point can no longer be reached.
    clean_index: Option<usize>,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl UndoHistory {
    /// Creates a history keeping at most `max_undo` commands.
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
            clean_index: Some(0),
        }
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable commands.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redoable commands.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Returns `true` if the history is at the last clean point.
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    /// Marks the current position as clean (e.g. after the document was saved elsewhere).
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
    }

    /// Most recent undoable command.
    pub fn last(&self) -> Option<&EditCommand> {
        self.undo_stack.last()
    }

    /// Records an already executed command.
    pub fn push(&mut self, command: EditCommand) {
        self.clear_redo_and_adjust_clean();

        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(clean_index) => Some(clean_index - 1),
            };
        }

        self.undo_stack.push(command);
    }

    /// Extends the most recent command if it is still live.
    pub fn append_edit<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>, value: u8) -> Result<()> {
        if self.can_redo() {
            return Err(DeltaError::InvalidState("cannot append edit behind redo history"));
        }
        let command = self
            .undo_stack
            .last_mut()
            .ok_or(DeltaError::InvalidState("no command to append to"))?;
        command.append_edit(doc, value)
    }

    /// Undoes the most recent command.
    pub fn undo<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>) -> Result<()> {
        let mut command = self
            .undo_stack
            .pop()
            .ok_or(DeltaError::InvalidState("nothing to undo"))?;
        tracing::debug!(depth = self.undo_stack.len(), "undo");
        command.undo(doc)?;
        self.redo_stack.push(command);
        Ok(())
    }

    /// Redoes the most recently undone command.
    pub fn redo<S: ByteSource>(&mut self, doc: &mut DeltaDocument<S>) -> Result<()> {
        let mut command = self
            .redo_stack
            .pop()
            .ok_or(DeltaError::InvalidState("nothing to redo"))?;
        tracing::debug!(depth = self.redo_stack.len(), "redo");
        command.redo(doc)?;
        self.undo_stack.push(command);
        Ok(())
    }

    /// Drops all recorded commands.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = Some(0);
    }

    fn clear_redo_and_adjust_clean(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }

        // A clean point among the discarded redo entries is gone for good.
        if let Some(clean_index) = self.clean_index
            && clean_index > self.undo_stack.len()
        {
            self.clean_index = None;
        }

        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_type::CodeType;
    use crate::edit::{BACKSPACE, EditMode};
    use crate::operation::Operation;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn doc(data: &[u8]) -> DeltaDocument<Cursor<Vec<u8>>> {
        DeltaDocument::from_bytes(data.to_vec()).unwrap()
    }

    #[test]
    fn test_undo_redo_sequence() {
        let mut doc = doc(b"abc");
        let mut history = UndoHistory::default();

        history.push(EditCommand::perform(&mut doc, vec![Operation::insert(3, b"d".to_vec())]).unwrap());
        history.push(EditCommand::perform(&mut doc, vec![Operation::remove(0, 1)]).unwrap());
        assert_eq!(doc.to_vec().unwrap(), b"bcd");
        assert_eq!(history.undo_depth(), 2);

        history.undo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"abcd");
        history.undo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"abc");
        assert!(!history.can_undo());
        assert!(matches!(history.undo(&mut doc), Err(DeltaError::InvalidState(_))));

        history.redo(&mut doc).unwrap();
        history.redo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"bcd");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_append_to_live_command() {
        let mut doc = doc(&[0x00]);
        let mut history = UndoHistory::default();
        let command =
            EditCommand::code_edit(&mut doc, EditMode::Overwrite, CodeType::Hexadecimal, 0, 0)
                .unwrap();
        history.push(command);
        history.append_edit(&mut doc, 0x1).unwrap();
        history.append_edit(&mut doc, 0x2).unwrap();
        assert_eq!(doc.to_vec().unwrap(), vec![0x12]);

        history.undo(&mut doc).unwrap();
        assert!(history.append_edit(&mut doc, 0x3).is_err());
        history.redo(&mut doc).unwrap();
        assert!(matches!(
            history.append_edit(&mut doc, 0x3),
            Err(DeltaError::InvalidState(_))
        ));
    }

    #[test]
    fn test_push_clears_redo() {
        let mut doc = doc(b"ab");
        let mut history = UndoHistory::default();
        let mut command = EditCommand::delete(2);
        command.append_edit(&mut doc, BACKSPACE).unwrap();
        history.push(command);

        history.undo(&mut doc).unwrap();
        assert_eq!(history.redo_depth(), 1);

        history.push(EditCommand::perform(&mut doc, vec![Operation::insert(0, b"x".to_vec())]).unwrap());
        assert_eq!(history.redo_depth(), 0);
        assert_eq!(doc.to_vec().unwrap(), b"xab");
    }

    #[test]
    fn test_max_undo_drops_oldest() {
        let mut doc = doc(b"");
        let mut history = UndoHistory::new(2);
        for value in [b'a', b'b', b'c'] {
            let position = doc.size();
            history.push(
                EditCommand::perform(&mut doc, vec![Operation::insert(position, vec![value])])
                    .unwrap(),
            );
        }
        assert_eq!(history.undo_depth(), 2);
        history.undo(&mut doc).unwrap();
        history.undo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"a");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_clean_point() {
        let mut doc = doc(b"ab");
        let mut history = UndoHistory::default();
        assert!(history.is_clean());

        history.push(EditCommand::perform(&mut doc, vec![Operation::remove(0, 1)]).unwrap());
        assert!(!history.is_clean());
        history.mark_clean();
        assert!(history.is_clean());

        history.undo(&mut doc).unwrap();
        assert!(!history.is_clean());
        history.redo(&mut doc).unwrap();
        assert!(history.is_clean());

        // Clean point in the redo area is lost once redo is discarded.
        history.undo(&mut doc).unwrap();
        history.push(EditCommand::perform(&mut doc, vec![Operation::insert(0, b"z".to_vec())]).unwrap());
        assert!(!history.is_clean());
    }
}
