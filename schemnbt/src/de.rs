//! Decoding of the binary format.
//!
//! All numbers are big-endian. A named root is a Compound discriminator, the
//! root's name, then the compound's entries up to an End byte:
//!
//! ```
//! use schemnbt::{decode_root, Tag};
//!
//! # fn main() -> schemnbt::error::Result<()> {
//! let root = decode_root(b"\x0a\x00\x00\x08\x00\x03foo\x00\x03bar\x00")?;
//! assert_eq!(root.name(), "");
//! assert_eq!(root.get("foo").and_then(Tag::as_str), Some("bar"));
//! # Ok(())
//! # }
//! ```
//!
//! Input starting with the gzip magic bytes is decompressed first. Any
//! failure aborts the whole decode, there is no partial result.

use std::convert::TryFrom;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use log::debug;

use crate::arrays::{PackedArray, Word};
use crate::error::{Error, Result};
use crate::registry::{registry, Registry};
use crate::{Compound, List, NamedRoot, Tag, TagKind, MAX_DEPTH};

/// Decodes the payload of one kind of tag. The discriminator, and for
/// compound entries the key, have already been consumed.
pub type DecodeFn = fn(&mut Decoder<'_>) -> Result<Tag>;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decode a named root, decompressing it first if it is gzip-framed.
pub fn decode_root(bytes: &[u8]) -> Result<NamedRoot> {
    decode_root_with(bytes, registry())
}

/// Like [`decode_root`], resolving discriminators through `registry` rather
/// than the built-in one.
pub fn decode_root_with(bytes: &[u8], registry: &Registry) -> Result<NamedRoot> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let inflated = gunzip(bytes)?;
        return decode_plain_root(&inflated, registry);
    }

    decode_plain_root(bytes, registry)
}

/// Read all of `reader` and decode it as a named root.
pub fn decode_root_from_reader<R: Read>(mut reader: R) -> Result<NamedRoot> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_root(&bytes)
}

fn decode_plain_root(bytes: &[u8], registry: &Registry) -> Result<NamedRoot> {
    if bytes.is_empty() {
        return Err(Error::unexpected_eof());
    }

    // The root is laid out exactly like a compound entry, so read it as the
    // body of an enclosing compound and insist on a single entry.
    let mut decoder = Decoder::with_registry(bytes, registry);
    let outer = decoder.read_compound()?;
    let root = NamedRoot::try_from(outer)?;

    debug!("decoded root {:?} with {} entries", root.name(), root.len());
    Ok(root)
}

#[cfg(feature = "gzip")]
fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::GzDecoder;

    let mut inflated = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut inflated)?;

    debug!(
        "inflated gzip root from {} to {} bytes",
        bytes.len(),
        inflated.len()
    );
    Ok(inflated)
}

#[cfg(not(feature = "gzip"))]
fn gunzip(_bytes: &[u8]) -> Result<Vec<u8>> {
    Err(Error::bespoke(
        "input is gzip-framed but the gzip feature is disabled",
    ))
}

impl Tag {
    /// Decode a lone payload of the given kind, as produced by
    /// [`Tag::to_bytes`]. All of `bytes` must be used.
    pub fn from_bytes(kind: TagKind, bytes: &[u8]) -> Result<Tag> {
        let mut decoder = Decoder::new(bytes);
        let tag = (decoder_for(kind))(&mut decoder)?;

        if !decoder.remaining().is_empty() {
            return Err(Error::structural(format!(
                "{} trailing bytes after {} payload",
                decoder.remaining().len(),
                kind
            )));
        }
        Ok(tag)
    }
}

/// Cursor over binary input. Composite payloads dispatch on the
/// discriminators they contain through the decoder's [`Registry`].
pub struct Decoder<'a> {
    input: &'a [u8],
    registry: &'a Registry,
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// A decoder using the built-in registry.
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_registry(input, registry())
    }

    pub fn with_registry(input: &'a [u8], registry: &'a Registry) -> Self {
        Self {
            input,
            registry,
            depth: 0,
        }
    }

    /// The input not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.input
    }

    /// Decode a payload of the kind bound to `id`.
    pub fn read_payload(&mut self, id: u8) -> Result<Tag> {
        let entry = *self.registry.entry(id)?;
        (entry.decode)(self)
    }

    /// Read compound entries up to an End byte or the end of input.
    pub fn read_compound(&mut self) -> Result<Compound> {
        self.enter()?;

        let mut compound = Compound::new();
        while let Some((&id, rest)) = self.input.split_first() {
            self.input = rest;
            if id == 0 {
                break;
            }

            // Resolve before reading the key, an unknown kind is fatal either
            // way.
            let entry = *self.registry.entry(id)?;
            let key = self.read_str()?;
            let tag = (entry.decode)(self)?;
            compound.insert(key, tag);
        }

        self.leave();
        Ok(compound)
    }

    fn read_list(&mut self) -> Result<List> {
        let id = self.input.read_u8()?;
        let count = self.input.read_u32::<BigEndian>()? as usize;

        // An End element kind means an empty list, whatever the count says.
        if id == 0 {
            return Ok(List::new());
        }

        let entry = *self.registry.entry(id)?;
        self.enter()?;

        // Every element takes at least one byte, so cap the up front
        // allocation by what is left. A compound element could otherwise
        // end at EOF without consuming anything.
        let mut items = Vec::with_capacity(count.min(self.input.len()));
        for _ in 0..count {
            if self.input.is_empty() {
                return Err(Error::unexpected_eof());
            }
            items.push((entry.decode)(self)?);
        }

        self.leave();
        Ok(List::from_vec_unchecked(items))
    }

    fn read_str(&mut self) -> Result<String> {
        let len = self.input.read_u16::<BigEndian>()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::nonunicode(e.into_bytes()))
    }

    fn read_array<W: Word>(&mut self) -> Result<PackedArray<W>> {
        let count = self.input.read_u32::<BigEndian>()? as usize;
        let len = count
            .checked_mul(W::BYTES)
            .ok_or_else(Error::unexpected_eof)?;
        let bytes = self.take(len)?;
        Ok(PackedArray::from_raw(bytes.to_vec()))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.input.len() < n {
            return Err(Error::unexpected_eof());
        }
        let (taken, rest) = self.input.split_at(n);
        self.input = rest;
        Ok(taken)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::structural(format!(
                "nesting deeper than {} levels",
                MAX_DEPTH
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// The payload decoder for a kind.
pub(crate) fn decoder_for(kind: TagKind) -> DecodeFn {
    match kind {
        TagKind::End => decode_end,
        TagKind::Byte => decode_byte,
        TagKind::Short => decode_short,
        TagKind::Int => decode_int,
        TagKind::Long => decode_long,
        TagKind::Float => decode_float,
        TagKind::Double => decode_double,
        TagKind::ByteArray => decode_byte_array,
        TagKind::String => decode_string,
        TagKind::List => decode_list,
        TagKind::Compound => decode_compound,
        TagKind::IntArray => decode_int_array,
        TagKind::LongArray => decode_long_array,
    }
}

fn decode_end(_: &mut Decoder<'_>) -> Result<Tag> {
    Err(Error::structural("End tag has no payload"))
}

fn decode_byte(d: &mut Decoder<'_>) -> Result<Tag> {
    Ok(Tag::Byte(d.input.read_i8()?))
}

fn decode_short(d: &mut Decoder<'_>) -> Result<Tag> {
    Ok(Tag::Short(d.input.read_i16::<BigEndian>()?))
}

fn decode_int(d: &mut Decoder<'_>) -> Result<Tag> {
    Ok(Tag::Int(d.input.read_i32::<BigEndian>()?))
}

fn decode_long(d: &mut Decoder<'_>) -> Result<Tag> {
    Ok(Tag::Long(d.input.read_i64::<BigEndian>()?))
}

fn decode_float(d: &mut Decoder<'_>) -> Result<Tag> {
    Ok(Tag::Float(d.input.read_f32::<BigEndian>()?))
}

fn decode_double(d: &mut Decoder<'_>) -> Result<Tag> {
    Ok(Tag::Double(d.input.read_f64::<BigEndian>()?))
}

fn decode_string(d: &mut Decoder<'_>) -> Result<Tag> {
    d.read_str().map(Tag::String)
}

fn decode_list(d: &mut Decoder<'_>) -> Result<Tag> {
    d.read_list().map(Tag::List)
}

fn decode_compound(d: &mut Decoder<'_>) -> Result<Tag> {
    d.read_compound().map(Tag::Compound)
}

fn decode_byte_array(d: &mut Decoder<'_>) -> Result<Tag> {
    d.read_array().map(Tag::ByteArray)
}

fn decode_int_array(d: &mut Decoder<'_>) -> Result<Tag> {
    d.read_array().map(Tag::IntArray)
}

fn decode_long_array(d: &mut Decoder<'_>) -> Result<Tag> {
    d.read_array().map(Tag::LongArray)
}
