//! Rendering of tags as SNBT text.
//!
//! Numbers carry an upper-case suffix naming their kind, except Int which has
//! none and Double which only needs one when its digits would otherwise read
//! back as an Int. Strings are written with JSON escapes. Compound keys are
//! left bare when every character could appear in a bare key, and quoted
//! otherwise.
//!
//! ```
//! use schemnbt::{Compound, Tag};
//!
//! let mut pos = Compound::new();
//! pos.insert("X", 3);
//! pos.insert("Y", 64i8);
//! pos.insert("block name", "stone");
//!
//! let text = schemsnbt::to_snbt(&Tag::Compound(pos));
//! assert_eq!(text, r#"{X:3,Y:64B,"block name":"stone"}"#);
//! ```

use std::fmt::{self, Display, Write as _};
use std::io::Write;

use schemnbt::{PackedArray, Tag, Word};

use crate::error::Result;
use crate::parser::is_token_char;

/// Render `tag` as SNBT text.
pub fn to_snbt(tag: &Tag) -> String {
    Snbt(tag).to_string()
}

/// Render `tag` as SNBT text into `writer`.
pub fn to_writer<W: Write>(mut writer: W, tag: &Tag) -> Result<()> {
    write!(writer, "{}", Snbt(tag))?;
    Ok(())
}

/// Displays the wrapped tag as SNBT text.
#[derive(Debug, Clone, Copy)]
pub struct Snbt<'a>(pub &'a Tag);

impl Display for Snbt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tag(f, self.0)
    }
}

fn write_tag(f: &mut fmt::Formatter<'_>, tag: &Tag) -> fmt::Result {
    let mut ints = itoa::Buffer::new();
    let mut floats = ryu::Buffer::new();

    match tag {
        Tag::Byte(v) => write!(f, "{}B", ints.format(*v)),
        Tag::Short(v) => write!(f, "{}S", ints.format(*v)),
        Tag::Int(v) => f.write_str(ints.format(*v)),
        Tag::Long(v) => write!(f, "{}L", ints.format(*v)),
        Tag::Float(v) => write!(f, "{}F", floats.format(*v)),
        Tag::Double(v) => {
            let digits = floats.format(*v);
            f.write_str(digits)?;
            if !digits.contains('.') {
                f.write_char('D')?;
            }
            Ok(())
        }
        Tag::String(s) => write_quoted(f, s),
        Tag::ByteArray(array) => write_array(f, 'B', "B", array),
        Tag::IntArray(array) => write_array(f, 'I', "", array),
        Tag::LongArray(array) => write_array(f, 'L', "L", array),
        Tag::List(list) => {
            f.write_char('[')?;
            for (i, item) in list.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                write_tag(f, item)?;
            }
            f.write_char(']')
        }
        Tag::Compound(compound) => {
            f.write_char('{')?;
            for (i, (key, value)) in compound.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                write_key(f, key)?;
                f.write_char(':')?;
                write_tag(f, value)?;
            }
            f.write_char('}')
        }
    }
}

fn write_array<W: Word>(
    f: &mut fmt::Formatter<'_>,
    prefix: char,
    suffix: &str,
    array: &PackedArray<W>,
) -> fmt::Result {
    let mut ints = itoa::Buffer::new();

    write!(f, "[{};", prefix)?;
    for (i, v) in array.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        let v: i64 = v.into();
        f.write_str(ints.format(v))?;
        f.write_str(suffix)?;
    }
    f.write_char(']')
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    if !key.is_empty() && key.chars().all(is_token_char) {
        f.write_str(key)
    } else {
        write_quoted(f, key)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}
