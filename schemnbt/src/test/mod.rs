use std::convert::TryFrom;

use crate::TagKind;


#[allow(clippy::float_cmp)]
mod de;
mod registry;
#[allow(clippy::float_cmp)]
mod value;

macro_rules! check_kinds {
    {$($kind:ident = $val:literal),* $(,)?} => {
        $(
            let id: u8 = $val;
            assert_eq!(u8::from(TagKind::$kind), id);
            assert_eq!(TagKind::try_from(id), Ok(TagKind::$kind));
        )*
    };
}

#[test]
fn exhaustive_kind_check() {
    check_kinds! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
        LongArray = 12,
    }

    for value in 13..=u8::MAX {
        assert!(TagKind::try_from(value).is_err())
    }
}

#[test]
fn builtin_kinds_are_in_id_order() {
    let ids: Vec<u8> = TagKind::BUILTIN.iter().map(|k| k.id()).collect();
    assert_eq!(ids, (1..=12).collect::<Vec<u8>>());
}
