//! schemsnbt reads and writes the stringified form of NBT (SNBT), the text
//! notation used in commands and for hand-written schematic data, producing
//! and consuming the tag trees of the `schemnbt` crate.
//!
//! ```
//! use schemnbt::Tag;
//!
//! # fn main() -> schemsnbt::error::Result<()> {
//! let tag = schemsnbt::from_snbt(r#"{Pos:[1d,2d,3d],Tags:["a","b"]}"#)?;
//! let compound = tag.as_compound().unwrap();
//! assert_eq!(compound["Pos"].as_list().unwrap().len(), 3);
//!
//! assert_eq!(
//!     schemsnbt::to_snbt(&tag),
//!     r#"{Pos:[1.0,2.0,3.0],Tags:["a","b"]}"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Values of your own types go through the `serde` support of `schemnbt`, see
//! [`from_str`] and [`to_string`].

use schemnbt::{from_tag, to_tag};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod de;
pub mod error;
pub mod ser;

mod parser;

pub use de::from_snbt;
pub use ser::{to_snbt, to_writer, Snbt};

use error::Result;

#[cfg(test)]
mod tests;

/// Parse SNBT text and project it onto a `T`.
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    let tag = from_snbt(input)?;
    Ok(from_tag(&tag)?)
}

/// Lower `value` to a tag and render it as SNBT text.
pub fn to_string<T: ?Sized + Serialize>(value: &T) -> Result<String> {
    let tag = to_tag(value)?;
    Ok(to_snbt(&tag))
}
