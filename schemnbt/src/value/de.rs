use std::convert::TryFrom;
use std::fmt;

use serde::de::value::{
    BorrowedBytesDeserializer, MapAccessDeserializer, MapDeserializer, SeqDeserializer,
    StrDeserializer,
};
use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, Visitor};
use serde::{forward_to_deserialize_any, Deserialize};
use serde_bytes::ByteBuf;

use crate::arrays::Word;
use crate::error::{Error, Result};
use crate::{ByteArray, Compound, IntArray, List, LongArray, Tag};

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TagVisitor;

        impl<'de> Visitor<'de> for TagVisitor {
            type Value = Tag;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("valid NBT")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Tag, E> {
                Ok(Tag::Byte(v as i8))
            }

            fn visit_i8<E: de::Error>(self, v: i8) -> std::result::Result<Tag, E> {
                Ok(Tag::Byte(v))
            }

            fn visit_i16<E: de::Error>(self, v: i16) -> std::result::Result<Tag, E> {
                Ok(Tag::Short(v))
            }

            fn visit_i32<E: de::Error>(self, v: i32) -> std::result::Result<Tag, E> {
                Ok(Tag::Int(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Tag, E> {
                Ok(Tag::Long(v))
            }

            // Self-describing formats such as JSON hand out unsigned numbers.
            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Tag, E> {
                i64::try_from(v)
                    .map(Tag::Long)
                    .map_err(|_| E::custom(format!("{} is too large for a Long", v)))
            }

            fn visit_f32<E: de::Error>(self, v: f32) -> std::result::Result<Tag, E> {
                Ok(Tag::Float(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Tag, E> {
                Ok(Tag::Double(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Tag, E> {
                Ok(Tag::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Tag, E> {
                Ok(Tag::String(v))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Tag, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::<Tag>::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(el) = seq.next_element()? {
                    items.push(el);
                }

                List::from_tags(items)
                    .map(Tag::List)
                    .map_err(de::Error::custom)
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Tag, A::Error>
            where
                A: MapAccess<'de>,
            {
                match map.next_key_seed(KeyClassifier)? {
                    Some(KeyClass::Compound(first_key)) => {
                        let mut compound = Compound::new();

                        compound.insert(first_key, map.next_value::<Tag>()?);
                        while let Some((key, value)) = map.next_entry::<String, Tag>()? {
                            compound.insert(key, value);
                        }

                        Ok(Tag::Compound(compound))
                    }
                    Some(KeyClass::ByteArray) => {
                        let data = map.next_value::<ByteBuf>()?;
                        Ok(Tag::ByteArray(ByteArray::from_raw(data.into_vec())))
                    }
                    Some(KeyClass::IntArray) => {
                        let data = map.next_value::<ByteBuf>()?;
                        Ok(Tag::IntArray(IntArray::from_raw(data.into_vec())))
                    }
                    Some(KeyClass::LongArray) => {
                        let data = map.next_value::<ByteBuf>()?;
                        Ok(Tag::LongArray(LongArray::from_raw(data.into_vec())))
                    }
                    // No keys just means an empty compound.
                    None => Ok(Tag::Compound(Compound::new())),
                }
            }
        }

        deserializer.deserialize_any(TagVisitor)
    }
}

impl<'de> Deserialize<'de> for Compound {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Tag::deserialize(deserializer)? {
            Tag::Compound(compound) => Ok(compound),
            other => Err(de::Error::custom(format!(
                "expected a Compound, found {}",
                other.kind()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for List {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Tag::deserialize(deserializer)? {
            Tag::List(list) => Ok(list),
            other => Err(de::Error::custom(format!(
                "expected a List, found {}",
                other.kind()
            ))),
        }
    }
}

struct KeyClassifier;

enum KeyClass {
    Compound(String),
    ByteArray,
    IntArray,
    LongArray,
}

impl KeyClass {
    fn of(s: &str) -> Self {
        match s {
            crate::BYTE_ARRAY_TOKEN => KeyClass::ByteArray,
            crate::INT_ARRAY_TOKEN => KeyClass::IntArray,
            crate::LONG_ARRAY_TOKEN => KeyClass::LongArray,
            _ => KeyClass::Compound(s.to_owned()),
        }
    }
}

impl<'de> DeserializeSeed<'de> for KeyClassifier {
    type Value = KeyClass;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<KeyClass, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for KeyClassifier {
    type Value = KeyClass;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an nbt field string")
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<KeyClass, E> {
        Ok(KeyClass::of(&s))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<KeyClass, E> {
        Ok(KeyClass::of(s))
    }
}

/// Arrays are presented as a single-entry map from a hidden token to their
/// raw bytes, which is what the array types' `Deserialize` looks for.
struct ArrayAccess<'de> {
    token: Option<&'static str>,
    bytes: &'de [u8],
}

impl<'de> ArrayAccess<'de> {
    fn new<W: Word>(bytes: &'de [u8]) -> Self {
        Self {
            token: Some(W::TOKEN),
            bytes,
        }
    }
}

impl<'de> MapAccess<'de> for ArrayAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.token.take() {
            Some(token) => {
                let key: StrDeserializer<'_, Error> = token.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        seed.deserialize(BorrowedBytesDeserializer::new(self.bytes))
    }
}

fn entries<'a>(compound: &'a Compound) -> impl Iterator<Item = (&'a str, &'a Tag)> + 'a {
    compound.iter().map(|(k, v)| (k.as_str(), v))
}

impl<'de> IntoDeserializer<'de, Error> for &'de Tag {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> serde::Deserializer<'de> for &'de Tag {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::Byte(v) => visitor.visit_i8(*v),
            Tag::Short(v) => visitor.visit_i16(*v),
            Tag::Int(v) => visitor.visit_i32(*v),
            Tag::Long(v) => visitor.visit_i64(*v),
            Tag::Float(v) => visitor.visit_f32(*v),
            Tag::Double(v) => visitor.visit_f64(*v),
            Tag::String(v) => visitor.visit_borrowed_str(v),
            Tag::ByteArray(v) => visitor.visit_map(ArrayAccess::new::<u8>(v.as_bytes())),
            Tag::IntArray(v) => visitor.visit_map(ArrayAccess::new::<u32>(v.as_bytes())),
            Tag::LongArray(v) => visitor.visit_map(ArrayAccess::new::<u64>(v.as_bytes())),
            Tag::List(v) => visitor.visit_seq(SeqDeserializer::new(v.iter())),
            Tag::Compound(v) => visitor.visit_map(MapDeserializer::new(entries(v))),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::Byte(v) => visitor.visit_bool(*v != 0),
            _ => self.deserialize_any(visitor),
        }
    }

    // Unsigned integers are lowered bit-for-bit into the signed tag of the
    // same width, so read them back the same way.

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::Byte(v) => visitor.visit_u8(*v as u8),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::Short(v) => visitor.visit_u16(*v as u16),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::Int(v) => visitor.visit_u32(*v as u32),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::Long(v) => visitor.visit_u64(*v as u64),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i128(wide(self)? as i128)
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u128(wide(self)?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::Int(v) => match char::from_u32(*v as u32) {
                Some(c) => visitor.visit_char(c),
                None => Err(Error::structural(format!("{} is not a char", v))),
            },
            _ => self.deserialize_any(visitor),
        }
    }

    /// A tag that exists is always `Some`. Absent fields never reach here.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    /// Arrays can be read as plain sequences of their native integers.
    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::ByteArray(v) => visitor.visit_seq(SeqDeserializer::new(v.iter())),
            Tag::IntArray(v) => visitor.visit_seq(SeqDeserializer::new(v.iter())),
            Tag::LongArray(v) => visitor.visit_seq(SeqDeserializer::new(v.iter())),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Tag::String(variant) => {
                let variant: StrDeserializer<'_, Error> = variant.as_str().into_deserializer();
                visitor.visit_enum(variant)
            }
            Tag::Compound(c) if c.len() == 1 => {
                let map = MapDeserializer::new(entries(c));
                visitor.visit_enum(MapAccessDeserializer::new(map))
            }
            other => Err(Error::structural(format!(
                "enum {} must be a String or a single-entry Compound, found {}",
                name,
                other.kind()
            ))),
        }
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 f32 f64 str string bytes byte_buf unit unit_struct
        tuple tuple_struct map struct identifier ignored_any
    }
}

fn wide(tag: &Tag) -> Result<u128> {
    match tag {
        Tag::IntArray(v) if v.len() == 4 => <[u8; 16]>::try_from(v.as_bytes())
            .map(u128::from_be_bytes)
            .map_err(|_| Error::structural("malformed 128-bit integer")),
        other => Err(Error::structural(format!(
            "expected a 128-bit integer stored as an IntArray of 4, found {}",
            other.kind()
        ))),
    }
}
