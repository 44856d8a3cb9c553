//! schemnbt parses, builds and writes the named binary tag (NBT) trees that
//! voxel schematic and world formats are stored in.
//!
//! * For the tag tree itself see [`Tag`], [`Compound`], [`List`] and
//!   [`NamedRoot`].
//! * For the binary codec see [`decode_root`], [`encode_root`] and the [`de`]
//!   and [`ser`] modules.
//! * For densely packed integer arrays see [`ByteArray`], [`IntArray`],
//!   [`LongArray`] and their [virtual-width views](PackedArray::view).
//! * For building tags from your own types see [`to_tag`], [`lower_record`]
//!   and [`from_tag`].
//!
//! The text notation (SNBT) lives in the sibling `schemsnbt` crate.
//!
//! # Quick example
//!
//! ```
//! use schemnbt::{decode_root, encode_root, Compound, NamedRoot, Tag};
//!
//! # fn main() -> schemnbt::error::Result<()> {
//! let mut compound = Compound::new();
//! compound.insert("foo", "bar");
//! let root = NamedRoot::new("", compound);
//!
//! let bytes = encode_root(&root, false)?;
//! assert_eq!(
//!     bytes,
//!     b"\x0a\x00\x00\x08\x00\x03foo\x00\x03bar\x00".to_vec()
//! );
//!
//! let decoded = decode_root(&bytes)?;
//! assert_eq!(decoded["foo"], Tag::String("bar".into()));
//! # Ok(())
//! # }
//! ```
//!
//! # Packed arrays
//!
//! Array tags keep their elements as raw big-endian words. Besides the usual
//! per-word access, an array can be viewed as a sequence of narrower unsigned
//! integers that may straddle word boundaries. This is how schematic formats
//! store palette indices:
//!
//! ```
//! use schemnbt::LongArray;
//!
//! # fn main() -> schemnbt::error::Result<()> {
//! let indices = [0, 5, 2, 7, 1];
//! let packed = LongArray::pack_list(&indices, None)?;
//! let view = packed.view(3)?;
//! assert_eq!(view.get(3), Some(7));
//! # Ok(())
//! # }
//! ```

use std::convert::TryFrom;
use std::fmt;

pub mod de;
pub mod error;
pub mod registry;
pub mod ser;

mod arrays;
mod bits;
mod compound;
mod tag;
mod value;

pub use arrays::*;
pub use compound::*;
pub use de::{decode_root, decode_root_from_reader};
pub use registry::{registry, Registry};
pub use ser::{encode_root, encode_root_to_writer};
pub use tag::*;
pub use value::*;

#[cfg(test)]
mod test;

/// Deepest nesting of lists and compounds accepted when decoding.
pub const MAX_DEPTH: usize = 512;

pub(crate) const BYTE_ARRAY_TOKEN: &str = "__schemnbt_byte_array";
pub(crate) const INT_ARRAY_TOKEN: &str = "__schemnbt_int_array";
pub(crate) const LONG_ARRAY_TOKEN: &str = "__schemnbt_long_array";

/// The kind of an NBT tag, as identified on the wire by its discriminator
/// byte. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum TagKind {
    /// Represents the end of a Compound object, and the element kind of an
    /// empty list.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Packed array of 8-bit words.
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same kind.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Packed array of 32-bit words.
    IntArray = 11,
    /// Packed array of 64-bit words.
    LongArray = 12,
}

impl TagKind {
    /// The twelve kinds that carry a payload, in discriminator order.
    pub const BUILTIN: [TagKind; 12] = [
        TagKind::Byte,
        TagKind::Short,
        TagKind::Int,
        TagKind::Long,
        TagKind::Float,
        TagKind::Double,
        TagKind::ByteArray,
        TagKind::String,
        TagKind::List,
        TagKind::Compound,
        TagKind::IntArray,
        TagKind::LongArray,
    ];

    /// The discriminator byte for this kind.
    pub fn id(self) -> u8 {
        self.into()
    }

    pub fn name(self) -> &'static str {
        match self {
            TagKind::End => "End",
            TagKind::Byte => "Byte",
            TagKind::Short => "Short",
            TagKind::Int => "Int",
            TagKind::Long => "Long",
            TagKind::Float => "Float",
            TagKind::Double => "Double",
            TagKind::ByteArray => "ByteArray",
            TagKind::String => "String",
            TagKind::List => "List",
            TagKind::Compound => "Compound",
            TagKind::IntArray => "IntArray",
            TagKind::LongArray => "LongArray",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually. The kinds will very rarely
// change so it isn't a massive burden.
impl TryFrom<u8> for TagKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use TagKind::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<TagKind> for u8 {
    fn from(kind: TagKind) -> Self {
        match kind {
            TagKind::End => 0,
            TagKind::Byte => 1,
            TagKind::Short => 2,
            TagKind::Int => 3,
            TagKind::Long => 4,
            TagKind::Float => 5,
            TagKind::Double => 6,
            TagKind::ByteArray => 7,
            TagKind::String => 8,
            TagKind::List => 9,
            TagKind::Compound => 10,
            TagKind::IntArray => 11,
            TagKind::LongArray => 12,
        }
    }
}
