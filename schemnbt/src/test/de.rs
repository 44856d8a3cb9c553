use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{ErrorKind, Result};
use crate::test::builder::Builder;
use crate::{
    decode_root, decode_root_from_reader, ByteArray, Compound, IntArray, List, LongArray,
    NamedRoot, Tag, TagKind, MAX_DEPTH,
};

fn payload(kind: TagKind, bytes: &[u8]) -> Tag {
    Tag::from_bytes(kind, bytes).unwrap()
}

#[test]
fn error_impls_sync_send() {
    fn i<T: Clone + Send + Sync + std::error::Error>(_: T) {}
    i(decode_root(&[]).unwrap_err());
}

#[test]
fn scalar_payloads() {
    assert_eq!(payload(TagKind::Byte, &[0x01]), Tag::Byte(1));
    assert_eq!(payload(TagKind::Byte, &[0xff]), Tag::Byte(-1));
    assert_eq!(payload(TagKind::Short, &[0x7a, 0xb7]), Tag::Short(31415));
    assert_eq!(
        payload(TagKind::Int, &[0x01, 0xdf, 0x5e, 0x76]),
        Tag::Int(31415926)
    );
    assert_eq!(
        payload(TagKind::Long, &[0, 0, 0, 0, 0, 0, 0x01, 0x00]),
        Tag::Long(256)
    );
    assert_eq!(
        payload(TagKind::Float, &[0x3f, 0x80, 0x00, 0x00]),
        Tag::Float(1.0)
    );
    assert_eq!(
        payload(TagKind::Double, &[0x3f, 0xf0, 0, 0, 0, 0, 0, 0]),
        Tag::Double(1.0)
    );
}

#[test]
fn string_payload() {
    assert_eq!(
        payload(TagKind::String, b"\x00\x03foo"),
        Tag::String("foo".to_owned())
    );
    assert_eq!(payload(TagKind::String, b"\x00\x00"), Tag::String("".to_owned()));
}

#[test]
fn string_length_is_bytes_not_chars() {
    let s = "héllo";
    let input = Builder::new().string_payload(s).build();
    assert_eq!(input[..2], [0, 6]);
    assert_eq!(payload(TagKind::String, &input), Tag::String(s.to_owned()));
}

#[test]
fn array_payloads() {
    assert_eq!(
        payload(TagKind::ByteArray, &[0, 0, 0, 3, 1, 2, 3]),
        Tag::ByteArray(ByteArray::new(&[1, 2, 3]))
    );
    assert_eq!(
        payload(TagKind::IntArray, &[0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 2]),
        Tag::IntArray(IntArray::new(&[1, 2]))
    );
    assert_eq!(
        payload(TagKind::LongArray, &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1]),
        Tag::LongArray(LongArray::new(&[1]))
    );
    assert_eq!(
        payload(TagKind::IntArray, &[0, 0, 0, 0]),
        Tag::IntArray(IntArray::new(&[]))
    );
}

#[test]
fn list_payloads() {
    assert_eq!(payload(TagKind::List, &[0, 0, 0, 0, 0]), Tag::List(List::new()));

    let input = Builder::new()
        .start_anon_list(TagKind::Int, 2)
        .int_payload(1)
        .int_payload(2)
        .build();
    let expected = List::from_tags(vec![Tag::Int(1), Tag::Int(2)]).unwrap();
    assert_eq!(payload(TagKind::List, &input), Tag::List(expected));
}

#[test]
fn empty_list_ignores_count() {
    // Element kind End with a non-zero count still has no payload.
    let tag = payload(TagKind::List, &[0, 0, 0, 0, 5]);
    assert_eq!(tag, Tag::List(List::new()));
}

#[test]
fn list_of_compounds() {
    let input = Builder::new()
        .start_compound("")
        .start_list("items", TagKind::Compound, 2)
        .start_anon_compound()
        .string("id", "stone")
        .end_compound()
        .start_anon_compound()
        .string("id", "dirt")
        .byte("Count", 3)
        .end_compound()
        .end_compound()
        .build();

    let root = decode_root(&input).unwrap();
    let items = root["items"].as_list().unwrap();
    assert_eq!(items.kind(), Some(TagKind::Compound));
    assert_eq!(items.len(), 2);

    let second = items.get(1).and_then(Tag::as_compound).unwrap();
    assert_eq!(second["id"], Tag::String("dirt".to_owned()));
    assert_eq!(second["Count"], Tag::Byte(3));
}

#[test]
fn root_fixture() {
    let root = decode_root(b"\x0a\x00\x00\x08\x00\x03foo\x00\x03bar\x00").unwrap();

    let mut expected = Compound::new();
    expected.insert("foo", "bar");

    assert_eq!(root.name(), "");
    assert_eq!(root.compound(), &expected);
}

#[test]
fn compound_ends_at_end_of_stream() {
    // No End byte for the root compound.
    let root = decode_root(b"\x0a\x00\x00\x08\x00\x03foo\x00\x03bar").unwrap();
    assert_eq!(root["foo"], Tag::String("bar".to_owned()));
    assert_eq!(root.len(), 1);
}

#[test]
fn compound_keeps_insertion_order() {
    let input = Builder::new()
        .start_compound("Schematic")
        .short("Width", 3)
        .short("Height", 2)
        .short("Length", 1)
        .int("Version", 2)
        .end_compound()
        .build();

    let root = decode_root(&input).unwrap();
    assert_eq!(root.name(), "Schematic");
    let keys: Vec<&str> = root.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Width", "Height", "Length", "Version"]);
}

#[test]
fn every_kind_in_a_root() {
    let input = Builder::new()
        .start_compound("")
        .byte("b", -5)
        .short("s", 300)
        .int("i", -70000)
        .long("l", 1 << 40)
        .float("f", 0.5)
        .double("d", -0.25)
        .string("str", "text")
        .byte_array("ba", &[-1, 0, 1])
        .int_array("ia", &[i32::MIN, i32::MAX])
        .long_array("la", &[i64::MIN])
        .start_list("list", TagKind::String, 1)
        .string_payload("x")
        .start_compound("nested")
        .end_compound()
        .end_compound()
        .build();

    let root = decode_root(&input).unwrap();
    assert_eq!(root["b"], Tag::Byte(-5));
    assert_eq!(root["s"], Tag::Short(300));
    assert_eq!(root["i"], Tag::Int(-70000));
    assert_eq!(root["l"], Tag::Long(1 << 40));
    assert_eq!(root["f"], Tag::Float(0.5));
    assert_eq!(root["d"], Tag::Double(-0.25));
    assert_eq!(root["str"], Tag::String("text".to_owned()));
    assert_eq!(root["ba"], Tag::ByteArray(ByteArray::new(&[-1, 0, 1])));
    assert_eq!(
        root["ia"],
        Tag::IntArray(IntArray::new(&[i32::MIN, i32::MAX]))
    );
    assert_eq!(root["la"], Tag::LongArray(LongArray::new(&[i64::MIN])));
    assert_eq!(root["list"].as_list().map(List::len), Some(1));
    assert_eq!(root["nested"], Tag::Compound(Compound::new()));
}

#[test]
fn unknown_kind_in_compound() {
    let input = Builder::new()
        .start_compound("")
        .raw_bytes(&[0xa3])
        .name("mystery")
        .int_payload(1)
        .end_compound()
        .build();

    let err = decode_root(&input).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownTagKind(0xa3));
}

#[test]
fn unknown_kind_in_list() {
    let input = Builder::new()
        .start_compound("")
        .kind(TagKind::List)
        .name("l")
        .raw_bytes(&[0xa3])
        .u32_payload(1)
        .int_payload(1)
        .end_compound()
        .build();

    let err = decode_root(&input).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownTagKind(0xa3));
}

#[test]
fn root_with_two_entries() {
    let input = Builder::new()
        .start_compound("a")
        .end_compound()
        .start_compound("b")
        .end_compound()
        .build();

    let err = decode_root(&input).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
}

#[test]
fn root_must_be_compound() {
    let input = Builder::new().string("", "foo").build();

    let err = decode_root(&input).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
}

#[test]
fn empty_input() {
    assert!(decode_root(&[]).unwrap_err().is_eof());
}

#[test]
fn truncated_payloads() {
    for (kind, bytes) in [
        (TagKind::Byte, &[0u8; 0][..]),
        (TagKind::Short, &[0x7a][..]),
        (TagKind::Int, &[0, 0, 1][..]),
        (TagKind::Long, &[0; 7][..]),
        (TagKind::Float, &[0x3f, 0x80][..]),
        (TagKind::Double, &[0; 4][..]),
        (TagKind::String, &b"\x00\x03fo"[..]),
        (TagKind::ByteArray, &[0, 0, 0, 3, 1, 2][..]),
        (TagKind::IntArray, &[0, 0, 0, 1, 0, 0][..]),
        (TagKind::LongArray, &[0, 0, 0][..]),
        (TagKind::List, &[3, 0, 0, 0, 2, 0, 0, 0, 1][..]),
    ] {
        let err = Tag::from_bytes(kind, bytes).unwrap_err();
        assert!(err.is_eof(), "{} gave {:?}", kind, err);
    }
}

#[test]
fn truncated_root() {
    let input = Builder::new()
        .start_compound("")
        .string("foo", "bar")
        .end_compound()
        .build();

    // Three bytes is a complete root holding an empty compound.
    for len in (1..input.len() - 1).filter(|len| *len != 3) {
        let err = decode_root(&input[..len]).unwrap_err();
        assert!(err.is_eof(), "length {} gave {:?}", len, err);
    }
}

#[test]
fn huge_array_count_does_not_allocate() {
    let err = Tag::from_bytes(TagKind::LongArray, &[0xff, 0xff, 0xff, 0xff, 0]).unwrap_err();
    assert!(err.is_eof());
}

#[test]
fn huge_compound_list_count_fails_at_eof() {
    let input = Builder::new()
        .start_anon_list(TagKind::Compound, u32::MAX)
        .end_compound()
        .build();
    let err = Tag::from_bytes(TagKind::List, &input).unwrap_err();
    assert!(err.is_eof());
}

#[test]
fn invalid_utf8() {
    let input = Builder::new()
        .start_compound("")
        .kind(TagKind::String)
        .name("s")
        .raw_str_len(2)
        .raw_bytes(&[0xff, 0xfe])
        .end_compound()
        .build();

    let err = decode_root(&input).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidEncoding(vec![0xff, 0xfe]));
}

#[test]
fn trailing_payload_bytes() {
    let err = Tag::from_bytes(TagKind::Byte, &[1, 2]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
}

#[test]
fn nesting_limit() {
    let mut builder = Builder::new()
        .start_compound("")
        .start_list("deep", TagKind::List, 1);
    for _ in 0..MAX_DEPTH {
        builder = builder.start_anon_list(TagKind::List, 1);
    }
    let input = builder
        .start_anon_list(TagKind::End, 0)
        .end_compound()
        .build();

    let err = decode_root(&input).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
}

#[test]
fn moderate_nesting_is_fine() {
    let mut builder = Builder::new()
        .start_compound("")
        .start_list("deep", TagKind::List, 1);
    for _ in 0..100 {
        builder = builder.start_anon_list(TagKind::List, 1);
    }
    let input = builder
        .start_anon_list(TagKind::End, 0)
        .end_compound()
        .build();

    let root = decode_root(&input).unwrap();
    let mut tag = &root["deep"];
    let mut depth = 0;
    while let Some(inner) = tag.as_list().and_then(|l| l.get(0)) {
        tag = inner;
        depth += 1;
    }
    assert_eq!(depth, 101);
}

fn gzipped(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn gzip_framed_root() -> Result<()> {
    let plain = b"\x0a\x00\x00\x08\x00\x03foo\x00\x03bar\x00";
    let compressed = gzipped(plain);
    assert_eq!(compressed[..2], [0x1f, 0x8b]);

    let root = decode_root(&compressed)?;
    assert_eq!(root, decode_root(plain)?);
    Ok(())
}

#[test]
fn truncated_gzip() {
    let compressed = gzipped(b"\x0a\x00\x00\x08\x00\x03foo\x00\x03bar\x00");
    assert!(decode_root(&compressed[..compressed.len() / 2]).is_err());
}

#[test]
fn from_reader_matches_from_bytes() -> Result<()> {
    let input = Builder::new()
        .start_compound("r")
        .int("x", 1)
        .end_compound()
        .build();

    let expected = NamedRoot::new("r", [("x", 1)].into_iter().collect());
    assert_eq!(decode_root_from_reader(input.as_slice())?, expected);
    assert_eq!(decode_root_from_reader(&gzipped(&input)[..])?, expected);
    Ok(())
}
