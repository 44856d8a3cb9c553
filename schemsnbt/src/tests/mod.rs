use schemnbt::{Compound, IntArray, List, Tag};
use serde::{Deserialize, Serialize};

use crate::{from_snbt, from_str, to_snbt, to_string};

mod proptests;

#[test]
fn mixed_struct_round_trip() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct MixedStruct {
        name: String,
        ints: IntArray,
        f: f64,
        collection: Vec<bool>,
    }

    let data = MixedStruct {
        name: "Cool \"name\"".into(),
        ints: IntArray::new(&[-1, 3, 2000]),
        f: -5.0e-40,
        collection: vec![true, false, true, true],
    };
    let serialized = to_string(&data).unwrap();
    assert_eq!(
        r#"{name:"Cool \"name\"",ints:[I;-1,3,2000],f:-5e-40D,collection:[1B,0B,1B,1B]}"#,
        serialized
    );

    let deserialized: MixedStruct = from_str(&serialized).unwrap();
    assert_eq!(deserialized, data);
}

#[test]
fn schematic_header_round_trip() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Header {
        version: i32,
        width: i16,
        height: i16,
        length: i16,
        author: Option<String>,
    }

    let header = Header {
        version: 2,
        width: 16,
        height: 4,
        length: 9,
        author: None,
    };
    let text = to_string(&header).unwrap();
    assert_eq!("{Version:2,Width:16S,Height:4S,Length:9S}", text);
    assert_eq!(from_str::<Header>(&text).unwrap(), header);
}

#[test]
fn text_round_trip_of_nested_tree() {
    let mut block = Compound::new();
    block.insert("Name", "minecraft:chest");
    block.insert("Items", List::new());
    block.insert("Lock", Tag::Byte(0));

    let mut root = Compound::new();
    root.insert("Pos", List::from_tags(vec![Tag::Int(1), Tag::Int(-2), Tag::Int(3)]).unwrap());
    root.insert("Block", block);
    root.insert("weird key", Tag::Double(0.5));
    let tag = Tag::Compound(root);

    let text = to_snbt(&tag);
    assert_eq!(
        r#"{Pos:[1,-2,3],Block:{Name:"minecraft:chest",Items:[],Lock:0B},"weird key":0.5}"#,
        text
    );
    assert_eq!(from_snbt(&text).unwrap(), tag);
}

#[test]
fn value_errors_surface_as_value_kind() {
    let err = from_str::<String>("3").unwrap_err();
    assert_eq!(err.kind(), &crate::error::ErrorKind::Value);
    assert_eq!(err.position(), None);

    let err = to_string(&()).unwrap_err();
    assert_eq!(err.kind(), &crate::error::ErrorKind::Value);
}
