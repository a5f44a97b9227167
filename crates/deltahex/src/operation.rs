//! Finished, re-executable document operations.
//!
//! Every operation can run on its own ([`Operation::execute`]) or run and
//! return its exact inverse ([`Operation::execute_with_undo`]). The inverse is
//! again a plain operation, so undo and redo are the same step applied to
//! alternating values: executing an operation with undo yields the operation
//! that undoes it, executing that one yields the original back.
//!
//! Inverses never hold references to document segments; bytes that leave the
//! document are copied out first.

use crate::document::DeltaDocument;
use crate::error::Result;
use crate::source::ByteSource;

/// Operation type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Bytes inserted.
    Insert,
    /// Bytes removed.
    Remove,
    /// Bytes overwritten in place.
    Modify,
}

/// Inserts `data` at `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOperation {
    position: u64,
    code_offset: usize,
    data: Vec<u8>,
}

impl InsertOperation {
    /// Creates an insert operation.
    pub fn new(position: u64, code_offset: usize, data: Vec<u8>) -> Self {
        Self {
            position,
            code_offset,
            data,
        }
    }

    /// Target position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Code offset of the caret the edit started at.
    pub fn code_offset(&self) -> usize {
        self.code_offset
    }

    /// Payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Extends the payload before the operation is executed.
    pub fn append_data(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }

    fn execute_with_undo<S: ByteSource>(&self, doc: &mut DeltaDocument<S>) -> Result<Operation> {
        doc.insert(self.position, &self.data)?;
        Ok(Operation::Remove(RemoveOperation::new(
            self.position,
            self.code_offset,
            self.data.len() as u64,
        )))
    }
}

/// Removes `length` bytes at `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOperation {
    position: u64,
    code_offset: usize,
    length: u64,
}

impl RemoveOperation {
    /// Creates a remove operation.
    pub fn new(position: u64, code_offset: usize, length: u64) -> Self {
        Self {
            position,
            code_offset,
            length,
        }
    }

    /// Target position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Code offset of the caret the edit started at.
    pub fn code_offset(&self) -> usize {
        self.code_offset
    }

    /// Number of bytes removed.
    pub fn length(&self) -> u64 {
        self.length
    }

    fn execute_with_undo<S: ByteSource>(&self, doc: &mut DeltaDocument<S>) -> Result<Operation> {
        let removed = doc.read(self.position, self.length)?;
        doc.remove(self.position, self.length)?;
        Ok(Operation::Insert(InsertOperation::new(
            self.position,
            self.code_offset,
            removed,
        )))
    }
}

/// Overwrites bytes at `position` with `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyOperation {
    position: u64,
    data: Vec<u8>,
}

impl ModifyOperation {
    /// Creates a modify operation.
    pub fn new(position: u64, data: Vec<u8>) -> Self {
        Self { position, data }
    }

    /// Target position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Replacement bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn execute_with_undo<S: ByteSource>(&self, doc: &mut DeltaDocument<S>) -> Result<Operation> {
        let original = doc.read(self.position, self.data.len() as u64)?;
        doc.replace(self.position, &self.data)?;
        Ok(Operation::Modify(ModifyOperation::new(self.position, original)))
    }
}

/// A reversible edit primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert bytes.
    Insert(InsertOperation),
    /// Remove bytes.
    Remove(RemoveOperation),
    /// Overwrite bytes.
    Modify(ModifyOperation),
}

impl Operation {
    /// Shorthand for an insert operation.
    pub fn insert(position: u64, data: Vec<u8>) -> Self {
        Self::Insert(InsertOperation::new(position, 0, data))
    }

    /// Shorthand for a remove operation.
    pub fn remove(position: u64, length: u64) -> Self {
        Self::Remove(RemoveOperation::new(position, 0, length))
    }

    /// Shorthand for a modify operation.
    pub fn modify(position: u64, data: Vec<u8>) -> Self {
        Self::Modify(ModifyOperation::new(position, data))
    }

    /// Operation type tag.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Insert(_) => OperationKind::Insert,
            Self::Remove(_) => OperationKind::Remove,
            Self::Modify(_) => OperationKind::Modify,
        }
    }

    /// Target position.
    pub fn position(&self) -> u64 {
        match self {
            Self::Insert(op) => op.position,
            Self::Remove(op) => op.position,
            Self::Modify(op) => op.position,
        }
    }

    /// Applies the operation to `doc`.
    pub fn execute<S: ByteSource>(&self, doc: &mut DeltaDocument<S>) -> Result<()> {
        match self {
            Self::Insert(op) => doc.insert(op.position, &op.data),
            Self::Remove(op) => doc.remove(op.position, op.length),
            Self::Modify(op) => doc.replace(op.position, &op.data),
        }
    }

    /// Applies the operation to `doc` and returns the operation reverting it.
    pub fn execute_with_undo<S: ByteSource>(&self, doc: &mut DeltaDocument<S>) -> Result<Operation> {
        match self {
            Self::Insert(op) => op.execute_with_undo(doc),
            Self::Remove(op) => op.execute_with_undo(doc),
            Self::Modify(op) => op.execute_with_undo(doc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn doc(data: &[u8]) -> DeltaDocument<Cursor<Vec<u8>>> {
        DeltaDocument::from_bytes(data.to_vec()).unwrap()
    }

    #[test]
    fn test_insert_inverse_is_remove() {
        let mut doc = doc(b"0123456789");
        let insert = Operation::insert(3, b"abc".to_vec());
        let undo = insert.execute_with_undo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"012abc3456789");
        assert_eq!(undo, Operation::remove(3, 3));

        let redo = undo.execute_with_undo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"0123456789");
        assert_eq!(doc.size(), 10);
        assert_eq!(redo, insert);
    }

    #[test]
    fn test_remove_captures_bytes() {
        let mut doc = doc(b"0123456789");
        doc.insert(5, b"xy").unwrap();
        let undo = Operation::remove(4, 4).execute_with_undo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"01236789");
        assert_eq!(undo, Operation::insert(4, b"4xy5".to_vec()));

        undo.execute(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"01234xy56789");
    }

    #[test]
    fn test_modify_inverse_restores() {
        let mut doc = doc(b"abcdef");
        let undo = Operation::modify(1, b"XY".to_vec())
            .execute_with_undo(&mut doc)
            .unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"aXYdef");
        assert_eq!(undo, Operation::modify(1, b"bc".to_vec()));
        assert_eq!(undo.kind(), OperationKind::Modify);

        undo.execute(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"abcdef");
    }

    #[test]
    fn test_append_data_before_execution() {
        let mut insert = InsertOperation::new(0, 1, b"ab".to_vec());
        insert.append_data(b"cd");
        assert_eq!(insert.data(), b"abcd");

        let mut doc = doc(b"");
        let undo = Operation::Insert(insert)
            .execute_with_undo(&mut doc)
            .unwrap();
        assert_eq!(doc.to_vec().unwrap(), b"abcd");
        assert_eq!(undo, Operation::Remove(RemoveOperation::new(0, 1, 4)));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut doc = doc(b"abc");
        assert!(Operation::remove(2, 2).execute(&mut doc).is_err());
        assert!(Operation::insert(4, vec![1]).execute(&mut doc).is_err());
        assert!(Operation::modify(3, vec![1]).execute_with_undo(&mut doc).is_err());
        assert_eq!(doc.to_vec().unwrap(), b"abc");
    }
}
