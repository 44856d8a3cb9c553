use std::convert::TryFrom;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::{ByteArray, Compound, IntArray, List, LongArray, TagKind};

/// Tag is a complete NBT value. It owns its data. Compounds and Lists own
/// their children, there are no references back to a parent.
///
/// Each variant holds the native representation of its kind directly, so a
/// `Byte` can never hold a value that does not fit in 8 bits.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(ByteArray),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(IntArray),
    LongArray(LongArray),
}

/// A host-native value with the tag kinds erased. Integers widen to `i64`,
/// floats to `f64`, arrays become lists of integers.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Native>),
    Map(IndexMap<String, Native>),
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::String(_) => TagKind::String,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
            Tag::IntArray(_) => TagKind::IntArray,
            Tag::LongArray(_) => TagKind::LongArray,
        }
    }

    /// The discriminator byte of this tag's kind.
    pub fn id(&self) -> u8 {
        self.kind().id()
    }

    /// Convert to host-native values, recursing through lists, compounds and
    /// arrays.
    pub fn to_native(&self) -> Native {
        match self {
            Tag::Byte(v) => Native::Int(*v as i64),
            Tag::Short(v) => Native::Int(*v as i64),
            Tag::Int(v) => Native::Int(*v as i64),
            Tag::Long(v) => Native::Int(*v),
            Tag::Float(v) => Native::Float(*v as f64),
            Tag::Double(v) => Native::Float(*v),
            Tag::String(v) => Native::String(v.clone()),
            Tag::ByteArray(v) => Native::List(v.iter().map(|i| Native::Int(i as i64)).collect()),
            Tag::IntArray(v) => Native::List(v.iter().map(|i| Native::Int(i as i64)).collect()),
            Tag::LongArray(v) => Native::List(v.iter().map(Native::Int).collect()),
            Tag::List(v) => Native::List(v.iter().map(Tag::to_native).collect()),
            Tag::Compound(v) => Native::Map(v.to_native()),
        }
    }

    /// Build a tag of the given kind from a native value.
    ///
    /// Integers must fit the kind's width, they are never truncated. Floats
    /// accept integer natives too. Lists and compounds cannot be built this way
    /// since natives do not record the kinds of their elements; build those
    /// from tags with [`List::from_tags`] and [`Compound`].
    pub fn from_native(kind: TagKind, value: &Native) -> Result<Tag> {
        let mismatch = || {
            Error::structural(format!("cannot build a {} from {:?}", kind, value))
        };

        Ok(match (kind, value) {
            (TagKind::Byte, Native::Int(v)) => Tag::Byte(narrow(kind, *v)?),
            (TagKind::Short, Native::Int(v)) => Tag::Short(narrow(kind, *v)?),
            (TagKind::Int, Native::Int(v)) => Tag::Int(narrow(kind, *v)?),
            (TagKind::Long, Native::Int(v)) => Tag::Long(*v),
            (TagKind::Float, Native::Float(v)) => Tag::Float(narrow_float(*v)?),
            (TagKind::Float, Native::Int(v)) => Tag::Float(*v as f32),
            (TagKind::Double, Native::Float(v)) => Tag::Double(*v),
            (TagKind::Double, Native::Int(v)) => Tag::Double(*v as f64),
            (TagKind::String, Native::String(v)) => Tag::String(v.clone()),
            (TagKind::ByteArray, Native::List(vs)) => {
                Tag::ByteArray(ByteArray::new(&native_ints::<i8>(kind, vs)?))
            }
            (TagKind::IntArray, Native::List(vs)) => {
                Tag::IntArray(IntArray::new(&native_ints::<i32>(kind, vs)?))
            }
            (TagKind::LongArray, Native::List(vs)) => {
                Tag::LongArray(LongArray::new(&native_ints::<i64>(kind, vs)?))
            }
            _ => return Err(mismatch()),
        })
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Tag::Byte(v) => Some(v as i64),
            Tag::Short(v) => Some(v as i64),
            Tag::Int(v) => Some(v as i64),
            Tag::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tag::Float(v) => Some(v as f64),
            Tag::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(v) => Some(v),
            _ => None,
        }
    }
}

fn narrow<T: TryFrom<i64>>(kind: TagKind, v: i64) -> Result<T> {
    T::try_from(v).map_err(|_| Error::structural(format!("{} does not fit in a {}", v, kind)))
}

// Non-finite values carry over as they are, finite ones must stay finite.
fn narrow_float(v: f64) -> Result<f32> {
    let narrowed = v as f32;
    if v.is_finite() && !narrowed.is_finite() {
        return Err(Error::structural(format!("{} does not fit in a Float", v)));
    }
    Ok(narrowed)
}

fn native_ints<T: TryFrom<i64>>(kind: TagKind, values: &[Native]) -> Result<Vec<T>> {
    values
        .iter()
        .map(|v| match v {
            Native::Int(i) => narrow(kind, *i),
            other => Err(Error::structural(format!(
                "{} elements must be integers, found {:?}",
                kind, other
            ))),
        })
        .collect()
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Tag {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(ByteArray, ByteArray);
from!(IntArray, IntArray);
from!(LongArray, LongArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Tag {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}
