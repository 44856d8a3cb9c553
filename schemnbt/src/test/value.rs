use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result};
use crate::{
    decode_root, encode_root, from_compound, from_tag, lower_record, to_tag, ByteArray, Compound,
    IntArray, List, LongArray, NamedRoot, Tag, TagKind, ToTag,
};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Position {
    x: i32,
    y: i32,
    z: i32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "PascalCase")]
struct Entity {
    id: String,
    pos: Vec<f64>,
    health: Option<f32>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "PascalCase")]
struct Schematic {
    version: i32,
    width: i16,
    height: i16,
    length: i16,
    offset: IntArray,
    palette: BTreeMap<String, i32>,
    block_data: ByteArray,
    entities: Vec<Entity>,
    origin: Position,
    author: Option<String>,
    metadata: Option<Compound>,
}

fn schematic() -> Schematic {
    let mut palette = BTreeMap::new();
    palette.insert("minecraft:air".to_owned(), 0);
    palette.insert("minecraft:stone".to_owned(), 1);

    Schematic {
        version: 2,
        width: 2,
        height: 1,
        length: 2,
        offset: IntArray::new(&[0, -64, 0]),
        palette,
        block_data: ByteArray::new(&[0, 1, 1, 0]),
        entities: vec![
            Entity {
                id: "minecraft:pig".to_owned(),
                pos: vec![0.5, 64.0, 0.5],
                health: Some(10.0),
            },
            Entity {
                id: "minecraft:cow".to_owned(),
                pos: vec![1.5, 64.0, 0.5],
                health: None,
            },
        ],
        origin: Position { x: 1, y: 2, z: 3 },
        author: None,
        metadata: None,
    }
}

#[test]
fn record_lowers_to_compound() -> Result<()> {
    let compound = lower_record(&schematic())?;

    assert_eq!(
        compound.keys().collect::<Vec<_>>(),
        [
            "Version",
            "Width",
            "Height",
            "Length",
            "Offset",
            "Palette",
            "BlockData",
            "Entities",
            "Origin"
        ]
    );
    assert_eq!(compound["Version"], Tag::Int(2));
    assert_eq!(compound["Width"], Tag::Short(2));
    assert_eq!(compound["Offset"], Tag::IntArray(IntArray::new(&[0, -64, 0])));
    assert_eq!(compound["BlockData"].kind(), TagKind::ByteArray);

    let palette = compound["Palette"].as_compound().unwrap();
    assert_eq!(palette["minecraft:stone"], Tag::Int(1));

    let origin = compound["Origin"].as_compound().unwrap();
    assert_eq!(origin.keys().collect::<Vec<_>>(), ["x", "y", "z"]);
    Ok(())
}

#[test]
fn none_fields_are_omitted() -> Result<()> {
    let compound = lower_record(&schematic())?;
    assert!(!compound.contains_key("Author"));
    assert!(!compound.contains_key("Metadata"));

    let entities = compound["Entities"].as_list().unwrap();
    assert_eq!(entities.kind(), Some(TagKind::Compound));

    let pig = entities.get(0).and_then(Tag::as_compound).unwrap();
    let cow = entities.get(1).and_then(Tag::as_compound).unwrap();
    assert_eq!(pig["Health"], Tag::Float(10.0));
    assert!(!cow.contains_key("Health"));
    assert_eq!(cow.len(), 2);
    Ok(())
}

#[test]
fn record_round_trips_through_tags() -> Result<()> {
    let original = schematic();
    let compound = lower_record(&original)?;
    let back: Schematic = from_compound(&compound)?;
    assert_eq!(back, original);

    let tag = to_tag(&original)?;
    let back: Schematic = from_tag(&tag)?;
    assert_eq!(back, original);
    Ok(())
}

#[test]
fn record_round_trips_through_bytes() -> Result<()> {
    let original = schematic();
    let root = NamedRoot::new("Schematic", lower_record(&original)?);

    let decoded = decode_root(&encode_root(&root, true)?)?;
    assert_eq!(decoded.name(), "Schematic");

    let back: Schematic = from_compound(&decoded)?;
    assert_eq!(back, original);
    Ok(())
}

#[test]
fn present_option_fields_round_trip() -> Result<()> {
    let mut metadata = Compound::new();
    metadata.insert("Date", 1_700_000_000_000i64);

    let mut original = schematic();
    original.author = Some("someone".to_owned());
    original.metadata = Some(metadata.clone());

    let compound = lower_record(&original)?;
    assert_eq!(compound["Author"], Tag::String("someone".to_owned()));
    assert_eq!(compound["Metadata"], Tag::Compound(metadata));

    let back: Schematic = from_compound(&compound)?;
    assert_eq!(back, original);
    Ok(())
}

#[test]
fn scalars_lower_to_matching_width() -> Result<()> {
    assert_eq!(to_tag(1i8)?, Tag::Byte(1));
    assert_eq!(to_tag(1i16)?, Tag::Short(1));
    assert_eq!(to_tag(1i32)?, Tag::Int(1));
    assert_eq!(to_tag(1i64)?, Tag::Long(1));
    assert_eq!(to_tag(0.5f32)?, Tag::Float(0.5));
    assert_eq!(to_tag(0.5f64)?, Tag::Double(0.5));
    assert_eq!(to_tag("s")?, Tag::String("s".to_owned()));
    assert_eq!(to_tag(true)?, Tag::Byte(1));
    assert_eq!(to_tag(false)?, Tag::Byte(0));
    assert_eq!(to_tag(Some(3i32))?, Tag::Int(3));
    assert_eq!(to_tag('x')?, Tag::Int('x' as i32));
    Ok(())
}

#[test]
fn unsigned_stored_bit_for_bit() -> Result<()> {
    assert_eq!(to_tag(255u8)?, Tag::Byte(-1));
    assert_eq!(to_tag(u16::MAX)?, Tag::Short(-1));
    assert_eq!(to_tag(u32::MAX)?, Tag::Int(-1));
    assert_eq!(to_tag(u64::MAX)?, Tag::Long(-1));

    assert_eq!(from_tag::<u8>(&Tag::Byte(-1))?, 255);
    assert_eq!(from_tag::<u16>(&Tag::Short(-1))?, u16::MAX);
    assert_eq!(from_tag::<u32>(&Tag::Int(-1))?, u32::MAX);
    assert_eq!(from_tag::<u64>(&Tag::Long(-1))?, u64::MAX);
    Ok(())
}

#[test]
fn wide_integers_use_int_arrays() -> Result<()> {
    let tag = to_tag(1u128 << 96 | 5)?;
    assert_eq!(tag, Tag::IntArray(IntArray::new(&[1, 0, 0, 5])));
    assert_eq!(from_tag::<u128>(&tag)?, 1u128 << 96 | 5);

    let tag = to_tag(-2i128)?;
    assert_eq!(from_tag::<i128>(&tag)?, -2);

    let err = from_tag::<u128>(&Tag::IntArray(IntArray::new(&[1]))).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
    Ok(())
}

#[test]
fn sequences_lower_to_lists() -> Result<()> {
    let tag = to_tag(vec![1i16, 2, 3])?;
    let list = tag.as_list().unwrap();
    assert_eq!(list.kind(), Some(TagKind::Short));
    assert_eq!(list.len(), 3);

    let tag = to_tag(Vec::<i32>::new())?;
    assert_eq!(tag, Tag::List(List::new()));

    let tag = to_tag(vec![vec![1i8], vec![]])?;
    assert_eq!(tag.as_list().unwrap().kind(), Some(TagKind::List));
    Ok(())
}

#[test]
fn bytes_lower_to_list_of_bytes() -> Result<()> {
    let tag = to_tag(serde_bytes::Bytes::new(&[1, 255]))?;
    assert_eq!(
        tag,
        Tag::List(List::from_tags(vec![Tag::Byte(1), Tag::Byte(-1)])?)
    );
    Ok(())
}

#[test]
fn mixed_sequence_is_structural() {
    let err = to_tag(vec![Tag::Int(1), Tag::String("x".to_owned())]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);

    let err = to_tag((1i32, "x")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
}

#[test]
fn list_cannot_hold_none() {
    let err = to_tag(vec![Some(1), None]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
}

#[test]
fn nothing_to_lower() {
    assert_eq!(
        to_tag(None::<i32>).unwrap_err().kind(),
        &ErrorKind::Structural
    );
    assert_eq!(to_tag(()).unwrap_err().kind(), &ErrorKind::Structural);
}

#[test]
fn lower_record_needs_a_record() {
    let err = lower_record(&5).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);

    let err = lower_record(&vec![1, 2]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
}

#[test]
fn map_keys_must_be_strings() -> Result<()> {
    let mut by_int = BTreeMap::new();
    by_int.insert(2, "two");
    by_int.insert(1, "one");
    let compound = lower_record(&by_int)?;
    assert_eq!(compound.keys().collect::<Vec<_>>(), ["1", "2"]);

    let mut by_tuple = BTreeMap::new();
    by_tuple.insert((1, 2), 0);
    let err = lower_record(&by_tuple).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Structural);
    Ok(())
}

#[test]
fn tags_pass_through() -> Result<()> {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Holder {
        anything: Tag,
        list: List,
        states: LongArray,
    }

    let holder = Holder {
        anything: Tag::LongArray(LongArray::new(&[i64::MIN])),
        list: List::from_tags(vec![Tag::Double(1.0)])?,
        states: LongArray::pack_list(&[3, 2, 1], Some(4))?,
    };

    let compound = lower_record(&holder)?;
    assert_eq!(compound["anything"], holder.anything);
    assert_eq!(compound["list"], Tag::List(holder.list.clone()));
    assert_eq!(compound["states"], Tag::LongArray(holder.states.clone()));

    let back: Holder = from_compound(&compound)?;
    assert_eq!(back, holder);

    assert_eq!(to_tag(&compound)?, Tag::Compound(compound.clone()));
    Ok(())
}

#[test]
fn arrays_read_as_plain_sequences() -> Result<()> {
    let tag = Tag::IntArray(IntArray::new(&[1, -2]));
    assert_eq!(from_tag::<Vec<i32>>(&tag)?, [1, -2]);
    assert_eq!(from_tag::<Vec<i64>>(&tag)?, [1, -2]);

    let tag = Tag::ByteArray(ByteArray::new(&[7]));
    assert_eq!(from_tag::<Vec<i8>>(&tag)?, [7]);
    Ok(())
}

#[test]
fn numbers_project_across_widths() -> Result<()> {
    assert_eq!(from_tag::<i64>(&Tag::Byte(5))?, 5);
    assert_eq!(from_tag::<i8>(&Tag::Int(5))?, 5);
    assert!(from_tag::<i8>(&Tag::Int(300)).is_err());
    assert!(from_tag::<bool>(&Tag::Byte(1))?);
    assert!(!from_tag::<bool>(&Tag::Byte(0))?);
    assert_eq!(from_tag::<char>(&Tag::Int('x' as i32))?, 'x');
    assert_eq!(from_tag::<f64>(&Tag::Double(2.5))?, 2.5);
    Ok(())
}

#[test]
fn mismatched_shapes_fail() {
    assert!(from_tag::<Position>(&Tag::Int(1)).is_err());
    assert!(from_tag::<String>(&Tag::Int(1)).is_err());
    assert!(from_tag::<Vec<i32>>(&Tag::String("x".to_owned())).is_err());

    let mut compound = Compound::new();
    compound.insert("x", 1);
    assert!(from_compound::<Position>(&compound).is_err());
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
enum Rotation {
    Identity,
    Clockwise(i32),
    Mirror { axis: String },
}

#[test]
fn enums() -> Result<()> {
    assert_eq!(to_tag(Rotation::Identity)?, Tag::String("Identity".to_owned()));

    let tag = to_tag(Rotation::Clockwise(90))?;
    let expected: Compound = vec![("Clockwise", 90)].into_iter().collect();
    assert_eq!(tag, Tag::Compound(expected));
    assert_eq!(from_tag::<Rotation>(&tag)?, Rotation::Clockwise(90));

    let mirror = Rotation::Mirror {
        axis: "x".to_owned(),
    };
    let tag = to_tag(&mirror)?;
    assert_eq!(
        tag.as_compound().and_then(|c| c.get("Mirror")).map(Tag::kind),
        Some(TagKind::Compound)
    );
    assert_eq!(from_tag::<Rotation>(&tag)?, mirror);

    assert_eq!(
        from_tag::<Rotation>(&Tag::String("Identity".to_owned()))?,
        Rotation::Identity
    );
    assert!(from_tag::<Rotation>(&Tag::Int(0)).is_err());
    Ok(())
}

#[test]
fn to_tag_method() -> Result<()> {
    assert_eq!(5i16.to_tag()?, Tag::Short(5));
    assert_eq!(Position { x: 1, y: 2, z: 3 }.to_tag()?.kind(), TagKind::Compound);
    Ok(())
}

#[test]
fn tag_from_json() -> Result<()> {
    let tag: Tag = serde_json::from_str(r#"{"a": 1, "b": [1.5, 2.5], "c": "x", "d": {}}"#)
        .map_err(|e| crate::error::Error::bespoke(e.to_string()))?;

    let compound = tag.as_compound().unwrap();
    assert_eq!(compound.keys().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    assert_eq!(compound["a"], Tag::Long(1));
    assert_eq!(compound["b"].as_list().unwrap().kind(), Some(TagKind::Double));
    assert_eq!(compound["c"], Tag::String("x".to_owned()));
    assert_eq!(compound["d"], Tag::Compound(Compound::new()));

    let mixed: std::result::Result<Tag, _> = serde_json::from_str(r#"[1, "x"]"#);
    assert!(mixed.is_err());
    Ok(())
}
