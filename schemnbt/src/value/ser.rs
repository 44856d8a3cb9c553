use core::result;

use serde::ser::Impossible;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::{
    Compound, IntArray, List, NamedRoot, Tag, TagKind, BYTE_ARRAY_TOKEN, INT_ARRAY_TOKEN,
    LONG_ARRAY_TOKEN,
};

use super::array_serializer::ArraySerializer;

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Tag::Byte(v) => serializer.serialize_i8(*v),
            Tag::Short(v) => serializer.serialize_i16(*v),
            Tag::Int(v) => serializer.serialize_i32(*v),
            Tag::Long(v) => serializer.serialize_i64(*v),
            Tag::Float(v) => serializer.serialize_f32(*v),
            Tag::Double(v) => serializer.serialize_f64(*v),
            Tag::String(v) => serializer.serialize_str(v),
            Tag::ByteArray(v) => v.serialize(serializer),
            Tag::IntArray(v) => v.serialize(serializer),
            Tag::LongArray(v) => v.serialize(serializer),
            Tag::List(v) => v.serialize(serializer),
            Tag::Compound(v) => v.serialize(serializer),
        }
    }
}

impl Serialize for List {
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self)
    }
}

impl Serialize for Compound {
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self)
    }
}

impl Serialize for NamedRoot {
    /// Serializes as the single-entry map from the root's name to its
    /// compound.
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(std::iter::once((self.name(), self.compound())))
    }
}

//
// The serializer below is adapted from serde_json's value serializer (MIT).
//

/// Serializer whose output is a [`Tag`].
///
/// This is the serializer behind [`to_tag`][crate::to_tag]. Its output is an
/// `Option` because an absent optional value lowers to nothing at all, which
/// is how `None` fields get left out of compounds.
pub struct Serializer;

impl<'a> serde::Serializer for &'a mut Serializer {
    type Ok = Option<Tag>;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    #[inline]
    fn serialize_bool(self, value: bool) -> Result<Option<Tag>> {
        Ok(Some(Tag::Byte(value as i8)))
    }

    #[inline]
    fn serialize_i8(self, value: i8) -> Result<Option<Tag>> {
        Ok(Some(Tag::Byte(value)))
    }

    #[inline]
    fn serialize_i16(self, value: i16) -> Result<Option<Tag>> {
        Ok(Some(Tag::Short(value)))
    }

    #[inline]
    fn serialize_i32(self, value: i32) -> Result<Option<Tag>> {
        Ok(Some(Tag::Int(value)))
    }

    #[inline]
    fn serialize_i64(self, value: i64) -> Result<Option<Tag>> {
        Ok(Some(Tag::Long(value)))
    }

    fn serialize_i128(self, value: i128) -> Result<Option<Tag>> {
        self.serialize_u128(value as u128)
    }

    /// 128-bit integers are stored as an IntArray of four words, most
    /// significant first.
    fn serialize_u128(self, value: u128) -> Result<Option<Tag>> {
        Ok(Some(Tag::IntArray(IntArray::from_raw(
            value.to_be_bytes().to_vec(),
        ))))
    }

    #[inline]
    fn serialize_u8(self, value: u8) -> Result<Option<Tag>> {
        Ok(Some(Tag::Byte(value as i8)))
    }

    #[inline]
    fn serialize_u16(self, value: u16) -> Result<Option<Tag>> {
        Ok(Some(Tag::Short(value as i16)))
    }

    #[inline]
    fn serialize_u32(self, value: u32) -> Result<Option<Tag>> {
        Ok(Some(Tag::Int(value as i32)))
    }

    #[inline]
    fn serialize_u64(self, value: u64) -> Result<Option<Tag>> {
        Ok(Some(Tag::Long(value as i64)))
    }

    #[inline]
    fn serialize_f32(self, value: f32) -> Result<Option<Tag>> {
        Ok(Some(Tag::Float(value)))
    }

    #[inline]
    fn serialize_f64(self, value: f64) -> Result<Option<Tag>> {
        Ok(Some(Tag::Double(value)))
    }

    #[inline]
    fn serialize_char(self, value: char) -> Result<Option<Tag>> {
        Ok(Some(Tag::Int(value as i32)))
    }

    #[inline]
    fn serialize_str(self, value: &str) -> Result<Option<Tag>> {
        Ok(Some(Tag::String(value.to_owned())))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Option<Tag>> {
        let bytes = value.iter().map(|b| Tag::Byte(*b as i8)).collect();
        Ok(Some(Tag::List(List::from_vec_unchecked(bytes))))
    }

    fn serialize_none(self) -> Result<Option<Tag>> {
        Ok(None)
    }

    #[inline]
    fn serialize_some<T>(self, value: &T) -> Result<Option<Tag>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<Tag>> {
        Err(Error::structural("unit has no tag representation"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Option<Tag>> {
        Err(Error::structural(format!(
            "unit struct {} has no tag representation",
            name
        )))
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<Tag>> {
        self.serialize_str(variant)
    }

    #[inline]
    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Option<Tag>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Option<Tag>>
    where
        T: ?Sized + Serialize,
    {
        let kind = match name {
            BYTE_ARRAY_TOKEN => TagKind::ByteArray,
            INT_ARRAY_TOKEN => TagKind::IntArray,
            LONG_ARRAY_TOKEN => TagKind::LongArray,
            _ => {
                let mut object = Compound::with_capacity(1);
                if let Some(inner) = value.serialize(self)? {
                    object.insert(variant, inner);
                }
                return Ok(Some(Tag::Compound(object)));
            }
        };

        value.serialize(ArraySerializer { kind }).map(Some)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap {
            map: Compound::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant,
            map: Compound::with_capacity(len),
        })
    }

    fn collect_str<T: ?Sized>(self, value: &T) -> Result<Option<Tag>>
    where
        T: std::fmt::Display,
    {
        Ok(Some(Tag::String(value.to_string())))
    }
}

/// Lower a list element, which must not be absent.
fn element<T>(value: &T) -> Result<Tag>
where
    T: ?Sized + Serialize,
{
    value
        .serialize(&mut Serializer)?
        .ok_or_else(|| Error::structural("a list cannot hold an absent value"))
}

pub struct SerializeVec {
    vec: Vec<Tag>,
}

pub struct SerializeTupleVariant {
    name: &'static str,
    vec: Vec<Tag>,
}

pub struct SerializeMap {
    map: Compound,
    next_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: &'static str,
    map: Compound,
}

impl serde::ser::SerializeSeq for SerializeVec {
    type Ok = Option<Tag>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(element(value)?);
        Ok(())
    }

    fn end(self) -> Result<Option<Tag>> {
        List::from_tags(self.vec).map(|list| Some(Tag::List(list)))
    }
}

impl serde::ser::SerializeTuple for SerializeVec {
    type Ok = Option<Tag>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Option<Tag>> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleStruct for SerializeVec {
    type Ok = Option<Tag>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Option<Tag>> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Option<Tag>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(element(value)?);
        Ok(())
    }

    fn end(self) -> Result<Option<Tag>> {
        let mut object = Compound::with_capacity(1);
        object.insert(self.name, List::from_tags(self.vec)?);

        Ok(Some(Tag::Compound(object)))
    }
}

impl serde::ser::SerializeMap for SerializeMap {
    type Ok = Option<Tag>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::bespoke("serialize_value called before serialize_key"))?;

        if let Some(tag) = value.serialize(&mut Serializer)? {
            self.map.insert(key, tag);
        }
        Ok(())
    }

    fn end(self) -> Result<Option<Tag>> {
        Ok(Some(Tag::Compound(self.map)))
    }
}

impl serde::ser::SerializeStruct for SerializeMap {
    type Ok = Option<Tag>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeMap::serialize_entry(self, key, value)
    }

    fn end(self) -> Result<Option<Tag>> {
        serde::ser::SerializeMap::end(self)
    }
}

impl serde::ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Option<Tag>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(tag) = value.serialize(&mut Serializer)? {
            self.map.insert(key, tag);
        }
        Ok(())
    }

    fn end(self) -> Result<Option<Tag>> {
        let mut object = Compound::with_capacity(1);
        object.insert(self.name, self.map);

        Ok(Some(Tag::Compound(object)))
    }
}

struct MapKeySerializer;

fn key_must_be_a_string() -> Error {
    Error::structural("compound keys must be strings")
}

impl serde::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_owned())
    }

    #[inline]
    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _value: bool) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_i8(self, value: i8) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_i16(self, value: i16) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_i32(self, value: i32) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_i64(self, value: i64) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_u8(self, value: u8) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_u16(self, value: u16) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_u32(self, value: u32) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_u64(self, value: u64) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_f32(self, _value: f32) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_f64(self, _value: f64) -> Result<String> {
        Err(key_must_be_a_string())
    }

    #[inline]
    fn serialize_char(self, value: char) -> Result<String> {
        Ok(value.to_string())
    }

    #[inline]
    fn serialize_str(self, value: &str) -> Result<String> {
        Ok(value.to_owned())
    }

    fn serialize_bytes(self, _value: &[u8]) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_a_string())
    }

    fn collect_str<T: ?Sized>(self, value: &T) -> Result<String>
    where
        T: std::fmt::Display,
    {
        Ok(value.to_string())
    }
}
