use serde::ser::Impossible;

use crate::error::{Error, Result};
use crate::{ByteArray, IntArray, LongArray, Tag, TagKind};

/// ArraySerializer receives the raw bytes of ByteArray, IntArray and
/// LongArray values, which arrive as the payload of a hidden newtype variant.
/// Anything other than bytes is an error.
pub struct ArraySerializer {
    pub kind: TagKind,
}

impl ArraySerializer {
    fn not_bytes(&self) -> Error {
        Error::bespoke(format!("expected the bytes of an {}", self.kind))
    }
}

impl serde::Serializer for ArraySerializer {
    type Ok = Tag;
    type Error = Error;
    type SerializeSeq = Impossible<Tag, Error>;
    type SerializeTuple = Impossible<Tag, Error>;
    type SerializeTupleStruct = Impossible<Tag, Error>;
    type SerializeTupleVariant = Impossible<Tag, Error>;
    type SerializeMap = Impossible<Tag, Error>;
    type SerializeStruct = Impossible<Tag, Error>;
    type SerializeStructVariant = Impossible<Tag, Error>;

    fn serialize_bytes(self, v: &[u8]) -> Result<Tag> {
        match self.kind {
            TagKind::ByteArray => Ok(Tag::ByteArray(ByteArray::from_raw(v.to_vec()))),
            TagKind::IntArray => Ok(Tag::IntArray(IntArray::from_raw(v.to_vec()))),
            TagKind::LongArray => Ok(Tag::LongArray(LongArray::from_raw(v.to_vec()))),
            _ => Err(self.not_bytes()),
        }
    }

    fn serialize_bool(self, _v: bool) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_i8(self, _v: i8) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_i16(self, _v: i16) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_i32(self, _v: i32) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_i64(self, _v: i64) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_u8(self, _v: u8) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_u16(self, _v: u16) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_u32(self, _v: u32) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_u64(self, _v: u64) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_f32(self, _v: f32) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_f64(self, _v: f64) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_char(self, _v: char) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_str(self, _v: &str) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_none(self) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_some<T: ?Sized>(self, _value: &T) -> Result<Tag>
    where
        T: serde::Serialize,
    {
        Err(self.not_bytes())
    }

    fn serialize_unit(self) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Tag> {
        Err(self.not_bytes())
    }

    fn serialize_newtype_struct<T: ?Sized>(self, _name: &'static str, _value: &T) -> Result<Tag>
    where
        T: serde::Serialize,
    {
        Err(self.not_bytes())
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Tag>
    where
        T: serde::Serialize,
    {
        Err(self.not_bytes())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.not_bytes())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.not_bytes())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.not_bytes())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.not_bytes())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.not_bytes())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.not_bytes())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.not_bytes())
    }
}
