use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use deltahex::{DeltaDocument, DeltaError, ErrorKind, Segment};
use pretty_assertions::assert_eq;

const TEN_MB: u64 = 10 * 1024 * 1024;

fn pattern_byte(position: u64) -> u8 {
    (position % 251) as u8
}

fn backing_file(len: u64) -> File {
    let mut file = tempfile::tempfile().unwrap();
    let data: Vec<u8> = (0..len).map(pattern_byte).collect();
    file.write_all(&data).unwrap();
    file.flush().unwrap();
    file
}

fn segment_total<S: deltahex::ByteSource>(doc: &DeltaDocument<S>) -> u64 {
    doc.segments().map(Segment::len).sum()
}

#[test]
fn test_insert_into_large_file() {
    let mut doc = DeltaDocument::open(backing_file(TEN_MB)).unwrap();
    assert_eq!(doc.size(), TEN_MB);
    assert_eq!(doc.source_len(), TEN_MB);

    doc.insert(5000, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

    assert_eq!(doc.size(), 10_485_764);
    assert_eq!(doc.read(5000, 4).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(doc.read_byte(5004).unwrap(), pattern_byte(5000));
    assert_eq!(doc.read_byte(4999).unwrap(), pattern_byte(4999));
    assert_eq!(doc.read_byte(doc.size() - 1).unwrap(), pattern_byte(TEN_MB - 1));
    assert_eq!(doc.segment_count(), 3);
    assert_eq!(segment_total(&doc), doc.size());
}

#[test]
fn test_backing_file_is_never_written() {
    let mut doc = DeltaDocument::open(backing_file(8192)).unwrap();
    doc.insert(10, b"inserted").unwrap();
    doc.remove(100, 3000).unwrap();
    doc.set_byte(7000 - 3000, 0xFF).unwrap();
    doc.replace(0, b"head").unwrap();

    let mut file = doc.into_source().unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut content = Vec::new();
    file.read_to_end(&mut content).unwrap();
    let expected: Vec<u8> = (0..8192).map(pattern_byte).collect();
    assert_eq!(content, expected);
}

#[test]
fn test_segment_lengths_sum_to_size() {
    let mut doc = DeltaDocument::open(backing_file(4096)).unwrap();
    let edits: [(&str, u64, u64); 8] = [
        ("insert", 0, 16),
        ("remove", 10, 100),
        ("set", 2000, 0),
        ("insert", 2001, 3),
        ("remove", 1990, 20),
        ("set", 0, 0),
        ("insert", 3000, 1),
        ("remove", 0, 50),
    ];

    for (kind, position, length) in edits {
        match kind {
            "insert" => doc.insert(position, &vec![0xAA; length as usize]).unwrap(),
            "remove" => doc.remove(position, length).unwrap(),
            _ => doc.set_byte(position, 0x55).unwrap(),
        }
        assert_eq!(segment_total(&doc), doc.size(), "after {kind} at {position}");
        assert!(doc.segments().all(|segment| !segment.is_empty()));
    }
}

#[test]
fn test_remove_everything_then_rebuild() {
    let mut doc = DeltaDocument::open(backing_file(3000)).unwrap();
    doc.remove(0, 3000).unwrap();
    assert!(doc.is_empty());
    assert_eq!(doc.segment_count(), 0);

    doc.insert(0, b"fresh").unwrap();
    assert_eq!(doc.to_vec().unwrap(), b"fresh");
    assert_eq!(doc.segment_count(), 1);
}

#[test]
fn test_range_errors() {
    let mut doc = DeltaDocument::from_bytes(b"0123".to_vec()).unwrap();

    let error = doc.read_byte(4).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Range);
    assert!(matches!(
        doc.insert(5, b"x"),
        Err(DeltaError::PositionOutOfRange { position: 5, size: 4 })
    ));
    assert_eq!(doc.remove(3, 2).unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(doc.set_byte(4, 0).unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(doc.to_vec().unwrap(), b"0123");
}

#[test]
fn test_empty_document_grows_from_nothing() {
    let mut doc: DeltaDocument<std::io::Cursor<Vec<u8>>> = DeltaDocument::empty();
    assert_eq!(doc.size(), 0);
    assert!(doc.page_window().is_none());

    doc.insert_zeros(0, 3).unwrap();
    doc.set_byte(1, 7).unwrap();
    assert_eq!(doc.to_vec().unwrap(), vec![0, 7, 0]);
    assert!(doc.into_source().is_none());
}
