//! Lowering Rust values to tags, and projecting tags back onto Rust types,
//! through serde.
//!
//! Lowering is a pure function of the value:
//!
//! * integers, floats and strings become the tag of the same width, with
//!   unsigned integers stored bit-for-bit in the signed tag of their width,
//!   and `bool` as a Byte;
//! * structs and maps become Compounds, keeping field order;
//! * sequences become Lists, which must hold one kind of tag;
//! * [`Tag`]s, [`Compound`]s, [`List`]s and the array types pass through
//!   unchanged;
//! * a `None` field is left out of its Compound. Nothing else is defaulted.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use schemnbt::{from_compound, lower_record, LongArray, Tag};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Region {
//!     #[serde(rename = "Name")]
//!     name: String,
//!     #[serde(rename = "BlockStates")]
//!     block_states: LongArray,
//!     #[serde(rename = "Author")]
//!     author: Option<String>,
//! }
//!
//! # fn main() -> schemnbt::error::Result<()> {
//! let region = Region {
//!     name: "base".to_owned(),
//!     block_states: LongArray::pack_list(&[0, 1, 1, 2], None)?,
//!     author: None,
//! };
//!
//! let compound = lower_record(&region)?;
//! assert_eq!(compound.len(), 2);
//! assert_eq!(compound["Name"], Tag::String("base".to_owned()));
//!
//! let back: Region = from_compound(&compound)?;
//! assert_eq!(back, region);
//! # Ok(())
//! # }
//! ```

mod array_serializer;
mod de;
mod ser;

use serde::de::value::MapDeserializer;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{Compound, Tag};

pub use self::ser::Serializer;

/// Lower `value` to a tag.
///
/// Fails if `T`'s `Serialize` implementation fails, if `T` is `None` or `()`
/// at the top level, if a sequence would produce a list of mixed kinds, or if
/// a map has keys that cannot be strings.
pub fn to_tag<T>(value: T) -> Result<Tag>
where
    T: Serialize,
{
    value
        .serialize(&mut Serializer)?
        .ok_or_else(|| Error::structural("value lowers to nothing"))
}

/// Lower a record to a Compound. Fails with a structural error if the record
/// does not lower to a Compound, eg if it is a plain integer.
pub fn lower_record<T>(record: &T) -> Result<Compound>
where
    T: ?Sized + Serialize,
{
    match to_tag(record)? {
        Tag::Compound(compound) => Ok(compound),
        other => Err(Error::structural(format!(
            "record lowered to a {}, not a Compound",
            other.kind()
        ))),
    }
}

/// Types that can be lowered to a tag.
///
/// Every `Serialize` type gets this through [`to_tag`]. Types that are not
/// `Serialize` can implement it by hand.
pub trait ToTag {
    fn to_tag(&self) -> Result<Tag>;
}

impl<T: ?Sized + Serialize> ToTag for T {
    fn to_tag(&self) -> Result<Tag> {
        to_tag(self)
    }
}

/// Interpret a tag as an instance of `T`.
///
/// Fails if the structure of the tag does not match what `T` expects, eg a
/// struct read from something other than a Compound, or if a number does not
/// fit the field it is read into. Missing `Option` fields read as `None`.
pub fn from_tag<'de, T>(tag: &'de Tag) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(tag)
}

/// Interpret the entries of a compound as an instance of `T`. A
/// [`NamedRoot`](crate::NamedRoot) derefs to its compound, so this projects
/// decoded roots too.
pub fn from_compound<'de, T>(compound: &'de Compound) -> Result<T>
where
    T: Deserialize<'de>,
{
    let entries = compound.iter().map(|(k, v)| (k.as_str(), v));
    T::deserialize(MapDeserializer::<_, Error>::new(entries))
}
