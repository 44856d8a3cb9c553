use proptest::prelude::*;
use schemnbt::{ByteArray, Compound, IntArray, List, LongArray, Tag};

use crate::{from_snbt, to_snbt};

fn arb_leaf() -> impl Strategy<Value = Tag> {
    prop_oneof![
        any::<i8>().prop_map(Tag::Byte),
        any::<i16>().prop_map(Tag::Short),
        any::<i32>().prop_map(Tag::Int),
        any::<i64>().prop_map(Tag::Long),
        any::<f32>()
            .prop_filter("NaN never compares equal", |f| !f.is_nan())
            .prop_map(Tag::Float),
        any::<f64>()
            .prop_filter("NaN never compares equal", |f| !f.is_nan())
            .prop_map(Tag::Double),
        "\\PC{0,12}".prop_map(Tag::String),
        prop::collection::vec(any::<i8>(), 0..8).prop_map(|v| Tag::ByteArray(ByteArray::new(&v))),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(|v| Tag::IntArray(IntArray::new(&v))),
        prop::collection::vec(any::<i64>(), 0..8).prop_map(|v| Tag::LongArray(LongArray::new(&v))),
    ]
}

fn arb_tag() -> impl Strategy<Value = Tag> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(|items| {
                let kind = items.first().map(Tag::kind);
                let items = items
                    .into_iter()
                    .filter(|t| Some(t.kind()) == kind)
                    .collect();
                Tag::List(List::from_tags(items).unwrap())
            }),
            prop::collection::vec((".{0,8}", inner), 0..6)
                .prop_map(|entries| Tag::Compound(entries.into_iter().collect::<Compound>())),
        ]
    })
}

proptest! {
    #[test]
    fn text_round_trip(tag in arb_tag()) {
        let text = to_snbt(&tag);
        prop_assert_eq!(from_snbt(&text).unwrap(), tag);
    }

    #[test]
    fn arbitrary_text_does_not_panic(text in "\\PC{0,64}") {
        let _ = from_snbt(&text);
    }

    #[test]
    fn snbt_like_text_does_not_panic(text in "[\\[\\]{}:,;\"BILbsldf0-9.e+\\- ]{0,48}") {
        let _ = from_snbt(&text);
    }
}
