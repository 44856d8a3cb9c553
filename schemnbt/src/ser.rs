//! Encoding to the binary format.
//!
//! The layout mirrors [`de`](crate::de). Each tag's payload is written with
//! its discriminator and key written by the enclosing compound, so the same
//! [`Tag::write_payload`] serves compound entries, list elements and lone
//! tags.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::arrays::{PackedArray, Word};
use crate::error::Result;
use crate::{Compound, List, NamedRoot, Tag, TagKind};

mod write_nbt;

use write_nbt::WriteNbt;

/// Encode a named root, gzip-framing it if `compress` is set.
pub fn encode_root(root: &NamedRoot, compress: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_root_to_writer(&mut out, root, compress)?;
    Ok(out)
}

/// Encode a named root into `writer`, gzip-framing it if `compress` is set.
pub fn encode_root_to_writer<W: Write>(
    mut writer: W,
    root: &NamedRoot,
    compress: bool,
) -> Result<()> {
    if compress {
        return gzip(writer, root);
    }
    write_root(&mut writer, root)
}

fn write_root<W: Write>(writer: &mut W, root: &NamedRoot) -> Result<()> {
    writer.write_kind(TagKind::Compound)?;
    writer.write_size_prefixed_str(root.name())?;
    write_compound(writer, root.compound())
}

#[cfg(feature = "gzip")]
fn gzip<W: Write>(writer: W, root: &NamedRoot) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use log::debug;

    let mut encoder = GzEncoder::new(writer, Compression::default());
    write_root(&mut encoder, root)?;
    encoder.finish()?;

    debug!("wrote gzip-framed root {:?}", root.name());
    Ok(())
}

#[cfg(not(feature = "gzip"))]
fn gzip<W: Write>(_writer: W, _root: &NamedRoot) -> Result<()> {
    Err(crate::error::Error::bespoke(
        "compression requested but the gzip feature is disabled",
    ))
}

impl Tag {
    /// Write this tag's payload, without a discriminator or name.
    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Tag::Byte(v) => writer.write_i8(*v)?,
            Tag::Short(v) => writer.write_i16::<BigEndian>(*v)?,
            Tag::Int(v) => writer.write_i32::<BigEndian>(*v)?,
            Tag::Long(v) => writer.write_i64::<BigEndian>(*v)?,
            Tag::Float(v) => writer.write_f32::<BigEndian>(*v)?,
            Tag::Double(v) => writer.write_f64::<BigEndian>(*v)?,
            Tag::String(v) => writer.write_size_prefixed_str(v)?,
            Tag::ByteArray(v) => write_array(writer, v)?,
            Tag::IntArray(v) => write_array(writer, v)?,
            Tag::LongArray(v) => write_array(writer, v)?,
            Tag::List(v) => write_list(writer, v)?,
            Tag::Compound(v) => write_compound(writer, v)?,
        }
        Ok(())
    }

    /// This tag's payload as bytes. The inverse of [`Tag::from_bytes`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_payload(&mut out)?;
        Ok(out)
    }
}

fn write_compound<W: Write>(writer: &mut W, compound: &Compound) -> Result<()> {
    for (key, tag) in compound {
        writer.write_kind(tag.kind())?;
        writer.write_size_prefixed_str(key)?;
        tag.write_payload(writer)?;
    }
    writer.write_kind(TagKind::End)
}

fn write_list<W: Write>(writer: &mut W, list: &List) -> Result<()> {
    writer.write_kind(list.element_kind())?;
    writer.write_len(list.len())?;
    for tag in list {
        tag.write_payload(writer)?;
    }
    Ok(())
}

// The stored bytes are already whole big-endian words, so they go out as is.
fn write_array<W: Write, A: Word>(writer: &mut W, array: &PackedArray<A>) -> Result<()> {
    writer.write_len(array.len())?;
    writer.write_all(array.as_bytes())?;
    Ok(())
}
