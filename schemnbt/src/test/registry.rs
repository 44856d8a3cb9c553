use crate::de::{decode_root_with, Decoder};
use crate::error::{ErrorKind, Result};
use crate::test::builder::Builder;
use crate::{registry, Registry, Tag, TagKind};

#[test]
fn builtin_resolves_standard_ids() -> Result<()> {
    for kind in TagKind::BUILTIN {
        assert_eq!(registry().resolve(kind.id())?, kind);
    }
    assert_eq!(registry().iter().count(), 12);
    Ok(())
}

#[test]
fn unbound_ids_fail() {
    for id in [0u8, 13, 0x20, 0xff] {
        let err = registry().resolve(id).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownTagKind(id));
    }
}

#[test]
fn empty_registry_resolves_nothing() {
    let registry = Registry::new();
    assert_eq!(registry.iter().count(), 0);
    assert_eq!(
        registry.resolve(1).unwrap_err().kind(),
        &ErrorKind::UnknownTagKind(1)
    );
}

#[test]
fn default_is_builtin() {
    let registry = Registry::default();
    assert!(registry.iter().eq(crate::registry().iter()));
}

#[test]
fn duplicate_registration() {
    let mut registry = Registry::builtin();
    let err = registry.register(3, TagKind::Long, false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DuplicateRegistration(3));

    // The existing binding is untouched.
    assert_eq!(registry.resolve(3), Ok(TagKind::Int));
}

#[test]
fn overwrite_replaces_binding() -> Result<()> {
    let mut registry = Registry::builtin();
    registry.register(3, TagKind::Long, true)?;
    assert_eq!(registry.resolve(3)?, TagKind::Long);
    Ok(())
}

#[test]
fn new_id_can_alias_a_kind() -> Result<()> {
    let mut registry = Registry::builtin();
    registry.register(0x20, TagKind::String, false)?;
    assert_eq!(registry.resolve(0x20)?, TagKind::String);
    assert_eq!(registry.resolve(8)?, TagKind::String);
    Ok(())
}

#[test]
fn end_cannot_be_registered() {
    let mut registry = Registry::new();
    let err = registry.register(0x20, TagKind::End, false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
}

#[test]
fn iter_in_id_order() -> Result<()> {
    let mut registry = Registry::new();
    registry.register(9, TagKind::Byte, false)?;
    registry.register(2, TagKind::Long, false)?;

    assert_eq!(
        registry.iter().collect::<Vec<_>>(),
        [(2, TagKind::Long), (9, TagKind::Byte)]
    );
    Ok(())
}

#[test]
fn decode_through_custom_registry() -> Result<()> {
    let mut registry = Registry::builtin();
    registry.register(0x20, TagKind::Int, false)?;

    let input = Builder::new()
        .start_compound("")
        .kind(TagKind::Compound)
        .name("inner")
        .raw_bytes(&[0x20])
        .name("n")
        .int_payload(7)
        .end_compound()
        .start_list("list", TagKind::End, 0)
        .end_compound()
        .build();

    // The custom id reads as an ordinary Int.
    let root = decode_root_with(&input, &registry)?;
    let inner = root["inner"].as_compound().unwrap();
    assert_eq!(inner["n"], Tag::Int(7));

    // Unknown to the built-in registry.
    let err = crate::decode_root(&input).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownTagKind(0x20));
    Ok(())
}

#[test]
fn list_elements_resolve_through_registry() -> Result<()> {
    let mut registry = Registry::builtin();
    registry.register(0x30, TagKind::Short, false)?;

    let payload = Builder::new()
        .raw_bytes(&[0x30])
        .u32_payload(2)
        .short_payload(1)
        .short_payload(-1)
        .build();

    let mut decoder = Decoder::with_registry(&payload, &registry);
    let tag = decoder.read_payload(TagKind::List.id())?;
    let list = tag.as_list().unwrap();
    assert_eq!(list.kind(), Some(TagKind::Short));
    assert_eq!(list.as_slice(), [Tag::Short(1), Tag::Short(-1)]);
    assert!(decoder.remaining().is_empty());
    Ok(())
}

#[test]
fn rebinding_changes_how_payloads_read() -> Result<()> {
    // Id 1 read as a Short consumes two bytes.
    let mut registry = Registry::builtin();
    registry.register(1, TagKind::Short, true)?;

    let mut decoder = Decoder::with_registry(&[0x01, 0x02], &registry);
    assert_eq!(decoder.read_payload(1)?, Tag::Short(0x0102));
    Ok(())
}

#[test]
fn empty_registry_rejects_root() {
    let input = Builder::new()
        .start_compound("")
        .end_compound()
        .build();

    let err = decode_root_with(&input, &Registry::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownTagKind(10));
}
