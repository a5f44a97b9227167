use std::io::Cursor;

use deltahex::{
    BACKSPACE, CodeType, CommandState, DELETE, DeltaDocument, DeltaError, EditCommand, EditMode,
    Operation, UndoHistory,
};
use pretty_assertions::assert_eq;

fn doc(data: &[u8]) -> DeltaDocument<Cursor<Vec<u8>>> {
    DeltaDocument::from_bytes(data.to_vec()).unwrap()
}

fn overwrite(
    doc: &mut DeltaDocument<Cursor<Vec<u8>>>,
    code_type: CodeType,
    position: u64,
    digits: &[u8],
) -> EditCommand {
    let mut command =
        EditCommand::code_edit(doc, EditMode::Overwrite, code_type, position, 0).unwrap();
    for digit in digits {
        command.append_edit(doc, *digit).unwrap();
    }
    command
}

#[test]
fn test_insert_then_undo_restores_content() {
    let original = b"The quick brown fox".to_vec();
    for position in [0, 4, 10, original.len() as u64] {
        let mut doc = doc(&original);
        let mut command =
            EditCommand::perform(&mut doc, vec![Operation::insert(position, b"<ins>".to_vec())])
                .unwrap();
        assert_eq!(doc.size(), original.len() as u64 + 5);

        command.undo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), original, "insert at {position}");
        assert_eq!(doc.size(), original.len() as u64);
    }
}

#[test]
fn test_hex_overwrite_at_end_appends_byte() {
    let mut doc = doc(&[0x01, 0x02, 0x03]);
    let mut command = overwrite(&mut doc, CodeType::Hexadecimal, 3, &[0xA, 0xB]);
    assert_eq!(doc.to_vec().unwrap(), vec![0x01, 0x02, 0x03, 0xAB]);
    assert_eq!(doc.size(), 4);

    command.undo(&mut doc).unwrap();
    assert_eq!(doc.to_vec().unwrap(), vec![0x01, 0x02, 0x03]);
    assert_eq!(doc.size(), 3);
}

#[test]
fn test_decimal_overwrite_clamps_to_200() {
    let mut doc = doc(&[37, 1]);
    let mut command = overwrite(&mut doc, CodeType::Decimal, 0, &[9]);
    assert_eq!(doc.read_byte(0).unwrap(), 200);

    command.undo(&mut doc).unwrap();
    assert_eq!(doc.to_vec().unwrap(), vec![37, 1]);
}

#[test]
fn test_overwrite_one_byte_every_code_type() {
    let cases: [(CodeType, &[u8], u8); 4] = [
        (CodeType::Binary, &[1, 1, 0, 0, 0, 0, 1, 1], 0xC3),
        (CodeType::Octal, &[3, 0, 7], 0o307),
        (CodeType::Decimal, &[2, 4, 1], 241),
        (CodeType::Hexadecimal, &[0xF, 0x0], 0xF0),
    ];

    for (code_type, digits, expected) in cases {
        let mut doc = doc(&[0x11, 0x22]);
        let mut command = overwrite(&mut doc, code_type, 1, digits);
        assert_eq!(doc.to_vec().unwrap(), vec![0x11, expected], "{code_type:?}");

        command.undo(&mut doc).unwrap();
        assert_eq!(doc.to_vec().unwrap(), vec![0x11, 0x22], "{code_type:?}");
    }
}

#[test]
fn test_overwrite_inside_byte_keeps_other_digits() {
    let mut doc = doc(&[0x12, 0x34]);
    let mut command =
        EditCommand::code_edit(&mut doc, EditMode::Overwrite, CodeType::Hexadecimal, 0, 1).unwrap();
    command.append_edit(&mut doc, 0xF).unwrap();
    command.append_edit(&mut doc, 0xE).unwrap();
    assert_eq!(doc.to_vec().unwrap(), vec![0x1F, 0xE4]);

    command.undo(&mut doc).unwrap();
    assert_eq!(doc.to_vec().unwrap(), vec![0x12, 0x34]);
}

#[test]
fn test_insert_mode_grows_document() {
    let mut doc = doc(&[0xAA, 0xBB]);
    let mut command =
        EditCommand::code_edit(&mut doc, EditMode::Insert, CodeType::Hexadecimal, 1, 0).unwrap();
    for digit in [0x1, 0x2, 0x3] {
        command.append_edit(&mut doc, digit).unwrap();
    }
    assert_eq!(doc.to_vec().unwrap(), vec![0xAA, 0x12, 0x30, 0xBB]);

    command.undo(&mut doc).unwrap();
    assert_eq!(doc.to_vec().unwrap(), vec![0xAA, 0xBB]);
    command.redo(&mut doc).unwrap();
    assert_eq!(doc.to_vec().unwrap(), vec![0xAA, 0x12, 0x30, 0xBB]);
}

#[test]
fn test_undo_redo_undo_equals_single_undo() {
    let original = b"0123456789".to_vec();

    let mut single = doc(&original);
    let mut command = overwrite(&mut single, CodeType::Hexadecimal, 8, &[0x1, 0x2, 0x3, 0x4, 0x5]);
    command.undo(&mut single).unwrap();

    let mut toggled = doc(&original);
    let mut command = overwrite(&mut toggled, CodeType::Hexadecimal, 8, &[0x1, 0x2, 0x3, 0x4, 0x5]);
    command.undo(&mut toggled).unwrap();
    command.redo(&mut toggled).unwrap();
    assert_eq!(command.state(), CommandState::Reverted);
    command.undo(&mut toggled).unwrap();

    assert_eq!(toggled.to_vec().unwrap(), single.to_vec().unwrap());
    assert_eq!(toggled.to_vec().unwrap(), original);
}

#[test]
fn test_backspace_and_delete_undo() {
    let mut doc = doc(b"abcdef");
    let mut command = EditCommand::delete(3);
    command.append_edit(&mut doc, BACKSPACE).unwrap();
    command.append_edit(&mut doc, BACKSPACE).unwrap();
    command.append_edit(&mut doc, DELETE).unwrap();
    assert_eq!(doc.to_vec().unwrap(), b"aef");

    assert!(matches!(
        command.append_edit(&mut doc, b'x'),
        Err(DeltaError::UnexpectedInput(b'x'))
    ));

    command.undo(&mut doc).unwrap();
    assert_eq!(doc.to_vec().unwrap(), b"abcdef");
    command.redo(&mut doc).unwrap();
    assert_eq!(doc.to_vec().unwrap(), b"aef");
}

#[test]
fn test_history_session() {
    let mut doc = doc(&[0x00; 4]);
    let mut history = UndoHistory::default();

    history.push(overwrite(&mut doc, CodeType::Hexadecimal, 0, &[0x7, 0xF]));
    let mut delete = EditCommand::delete(4);
    delete.append_edit(&mut doc, BACKSPACE).unwrap();
    history.push(delete);
    history.push(
        EditCommand::perform(&mut doc, vec![Operation::insert(0, vec![0xEE])]).unwrap(),
    );
    assert_eq!(doc.to_vec().unwrap(), vec![0xEE, 0x7F, 0x00, 0x00]);
    assert_eq!(history.undo_depth(), 3);

    while history.can_undo() {
        history.undo(&mut doc).unwrap();
    }
    assert_eq!(doc.to_vec().unwrap(), vec![0x00; 4]);
    assert_eq!(history.redo_depth(), 3);

    while history.can_redo() {
        history.redo(&mut doc).unwrap();
    }
    assert_eq!(doc.to_vec().unwrap(), vec![0xEE, 0x7F, 0x00, 0x00]);
}
