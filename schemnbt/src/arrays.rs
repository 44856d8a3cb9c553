use std::fmt;
use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_bytes::{ByteBuf, Bytes};

use crate::bits;
use crate::error::{Error, Result};
use crate::{TagKind, BYTE_ARRAY_TOKEN, INT_ARRAY_TOKEN, LONG_ARRAY_TOKEN};

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// A backing word of a packed array. Implemented for `u8`, `u32` and `u64`,
/// the word types of [`ByteArray`], [`IntArray`] and [`LongArray`].
pub trait Word: private::Sealed + Copy + fmt::Debug + 'static {
    /// Width of the word in bits.
    const BITS: u32;
    const BYTES: usize;
    /// The tag kind of arrays of this word.
    const KIND: TagKind;
    #[doc(hidden)]
    const TOKEN: &'static str;

    /// The signed integer a word reads as in native mode.
    type Native: Copy + fmt::Debug + Into<i64> + DeserializeOwned;

    /// Read a big-endian word from exactly `BYTES` bytes.
    fn read(bytes: &[u8]) -> u64;
    /// Write the low `BITS` bits of `word` big-endian into exactly `BYTES` bytes.
    fn write(bytes: &mut [u8], word: u64);
    fn to_native(word: u64) -> Self::Native;
    fn from_native(value: Self::Native) -> u64;
}

impl Word for u8 {
    const BITS: u32 = 8;
    const BYTES: usize = 1;
    const KIND: TagKind = TagKind::ByteArray;
    const TOKEN: &'static str = BYTE_ARRAY_TOKEN;

    type Native = i8;

    fn read(bytes: &[u8]) -> u64 {
        bytes[0] as u64
    }

    fn write(bytes: &mut [u8], word: u64) {
        bytes[0] = word as u8;
    }

    fn to_native(word: u64) -> i8 {
        word as u8 as i8
    }

    fn from_native(value: i8) -> u64 {
        value as u8 as u64
    }
}

impl Word for u32 {
    const BITS: u32 = 32;
    const BYTES: usize = 4;
    const KIND: TagKind = TagKind::IntArray;
    const TOKEN: &'static str = INT_ARRAY_TOKEN;

    type Native = i32;

    fn read(bytes: &[u8]) -> u64 {
        BigEndian::read_u32(bytes) as u64
    }

    fn write(bytes: &mut [u8], word: u64) {
        BigEndian::write_u32(bytes, word as u32)
    }

    fn to_native(word: u64) -> i32 {
        word as u32 as i32
    }

    fn from_native(value: i32) -> u64 {
        value as u32 as u64
    }
}

impl Word for u64 {
    const BITS: u32 = 64;
    const BYTES: usize = 8;
    const KIND: TagKind = TagKind::LongArray;
    const TOKEN: &'static str = LONG_ARRAY_TOKEN;

    type Native = i64;

    fn read(bytes: &[u8]) -> u64 {
        BigEndian::read_u64(bytes)
    }

    fn write(bytes: &mut [u8], word: u64) {
        BigEndian::write_u64(bytes, word)
    }

    fn to_native(word: u64) -> i64 {
        word as i64
    }

    fn from_native(value: i64) -> u64 {
        value as u64
    }
}

/// NBT ByteArray: a packed array of 8-bit words.
pub type ByteArray = PackedArray<u8>;
/// NBT IntArray: a packed array of 32-bit words.
pub type IntArray = PackedArray<u32>;
/// NBT LongArray: a packed array of 64-bit words.
pub type LongArray = PackedArray<u64>;

/// An array tag. The elements are kept as their big-endian wire bytes, the
/// length of which is always a multiple of the word size.
///
/// In native mode element `i` is word `i` read as a signed integer. Through
/// [`view`](Self::view) and [`view_mut`](Self::view_mut) the same bits can be
/// addressed as unsigned integers of any width from 2 up to the word width,
/// counting bits from the least significant bit of word 0. Such values may
/// straddle two words.
///
/// Equality compares native values, so arrays of different word widths are
/// equal if they hold the same integers.
#[derive(Clone)]
pub struct PackedArray<W: Word> {
    data: Vec<u8>,
    word: PhantomData<W>,
}

impl<W: Word> PackedArray<W> {
    /// Create an array holding `values`, one per word.
    pub fn new(values: &[W::Native]) -> Self {
        let mut array = Self::zeroed(values.len());
        for (i, v) in values.iter().enumerate() {
            bits::put_word::<W>(&mut array.data, i, W::from_native(*v));
        }
        array
    }

    /// Create an array of `len` zero words.
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: vec![0; len * W::BYTES],
            word: PhantomData,
        }
    }

    /// Create an array from its raw big-endian bytes. If the bytes do not fill
    /// the last word, that word is padded with leading zero bytes.
    pub fn from_raw(mut bytes: Vec<u8>) -> Self {
        let partial = bytes.len() % W::BYTES;
        if partial != 0 {
            let tail = bytes.split_off(bytes.len() - partial);
            bytes.resize(bytes.len() + W::BYTES - partial, 0);
            bytes.extend(tail);
        }

        Self {
            data: bytes,
            word: PhantomData,
        }
    }

    /// Pack `values` at `width` bits each, the way schematic formats store
    /// palette indices. The width defaults to the smallest that holds the
    /// largest value, and is never below 2.
    ///
    /// The returned array has just enough words to hold every value. Its
    /// [`view`](Self::view) at the same width reads the values back, followed
    /// by zeros for any unused bits in the last word.
    pub fn pack_list(values: &[u64], width: Option<u32>) -> Result<Self> {
        let width = match width {
            Some(width) => width,
            None => values.iter().copied().max().map_or(2, bits::min_width),
        };
        check_width::<W>(width)?;

        let total_bits = values.len() * width as usize;
        let words = (total_bits + W::BITS as usize - 1) / W::BITS as usize;

        let mut array = Self::zeroed(words);
        let mut view = array.view_mut(width)?;
        for (i, v) in values.iter().enumerate() {
            view.set(i, *v)?;
        }

        Ok(array)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.data.len() / W::BYTES
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get word `index` as a signed integer.
    pub fn get(&self, index: usize) -> Option<W::Native> {
        (index < self.len()).then(|| W::to_native(bits::word_at::<W>(&self.data, index)))
    }

    /// Replace word `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: W::Native) {
        let len = self.len();
        assert!(
            index < len,
            "index {} out of range for array of length {}",
            index,
            len
        );
        bits::put_word::<W>(&mut self.data, index, W::from_native(value));
    }

    pub fn iter(&self) -> impl Iterator<Item = W::Native> + '_ {
        self.data
            .chunks_exact(W::BYTES)
            .map(|word| W::to_native(W::read(word)))
    }

    pub fn to_vec(&self) -> Vec<W::Native> {
        self.iter().collect()
    }

    /// The big-endian bytes of the array, as they appear on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// View the array as unsigned integers of `width` bits.
    ///
    /// Fails with `MalformedArrayWidth` unless `2 <= width <= W::BITS`.
    pub fn view(&self, width: u32) -> Result<View<'_, W>> {
        check_width::<W>(width)?;
        Ok(View {
            data: &self.data,
            width,
            len: view_len(self.data.len(), width),
            word: PhantomData,
        })
    }

    /// Mutable version of [`view`](Self::view). Writes go straight to this
    /// array's storage.
    pub fn view_mut(&mut self, width: u32) -> Result<ViewMut<'_, W>> {
        check_width::<W>(width)?;
        let len = view_len(self.data.len(), width);
        Ok(ViewMut {
            data: &mut self.data,
            width,
            len,
            word: PhantomData,
        })
    }
}

/// Smallest bit width able to hold every one of `values`, at least 2. One
/// extra bit is added if *any* value is negative, so the result describes a
/// single width shared by the whole array.
///
/// ```
/// # use schemnbt::calcsize;
/// assert_eq!(calcsize(&[3]), 2);
/// assert_eq!(calcsize(&[-1]), 3);
/// assert_eq!(calcsize(&[300]), 9);
/// ```
pub fn calcsize(values: &[i64]) -> u32 {
    let largest = values.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0);
    let signed = values.iter().any(|v| *v < 0);

    bits::min_width(largest) + u32::from(signed)
}

fn check_width<W: Word>(width: u32) -> Result<()> {
    if (2..=W::BITS).contains(&width) {
        Ok(())
    } else {
        Err(Error::array_width(width, W::BITS))
    }
}

fn view_len(bytes: usize, width: u32) -> usize {
    bytes * 8 / width as usize
}

/// A read-only view of a packed array at a virtual width. See
/// [`PackedArray::view`].
#[derive(Clone, Copy)]
pub struct View<'a, W: Word> {
    data: &'a [u8],
    width: u32,
    len: usize,
    word: PhantomData<W>,
}

impl<'a, W: Word> View<'a, W> {
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of whole `width`-bit values the array's bits can hold.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        (index < self.len).then(|| bits::get_packed::<W>(self.data, self.width, index))
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + 'a {
        let (data, width) = (self.data, self.width);
        (0..self.len).map(move |i| bits::get_packed::<W>(data, width, i))
    }
}

/// A mutable view of a packed array at a virtual width. See
/// [`PackedArray::view_mut`].
pub struct ViewMut<'a, W: Word> {
    data: &'a mut [u8],
    width: u32,
    len: usize,
    word: PhantomData<W>,
}

impl<'a, W: Word> ViewMut<'a, W> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        self.as_view().get(index)
    }

    /// Write `value` at `index`. Every other value in the array, including
    /// those sharing a word with this one, is left untouched.
    ///
    /// Fails with a structural error if `value` does not fit in the view's
    /// width.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: u64) -> Result<()> {
        assert!(
            index < self.len,
            "index {} out of range for view of length {}",
            index,
            self.len
        );
        if u64::BITS - value.leading_zeros() > self.width {
            return Err(Error::structural(format!(
                "{} does not fit in {} bits",
                value, self.width
            )));
        }

        bits::set_packed::<W>(self.data, self.width, index, value);
        Ok(())
    }

    pub fn as_view(&self) -> View<'_, W> {
        View {
            data: &*self.data,
            width: self.width,
            len: self.len,
            word: PhantomData,
        }
    }
}

impl<W: Word> Default for PackedArray<W> {
    fn default() -> Self {
        Self::zeroed(0)
    }
}

impl<A: Word, B: Word> PartialEq<PackedArray<B>> for PackedArray<A> {
    fn eq(&self, other: &PackedArray<B>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .map(Into::<i64>::into)
                .eq(other.iter().map(Into::<i64>::into))
    }
}

impl<W: Word> fmt::Debug for PackedArray<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(W::KIND.name()).field(&self.to_vec()).finish()
    }
}

impl<'a, W: Word> fmt::Debug for View<'a, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<W: Word> Serialize for PackedArray<W> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // We can't know anything about NBT here, since we might be serializing
        // to a different format. A hidden variant name signals the tag
        // serializer, anything else just sees some bytes.
        serializer.serialize_newtype_variant(W::TOKEN, 0, "Data", Bytes::new(&self.data))
    }
}

impl<'de, W: Word> Deserialize<'de> for PackedArray<W> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ArrayVisitor<W>(PhantomData<W>);

        impl<'de, W: Word> serde::de::Visitor<'de> for ArrayVisitor<W> {
            type Value = PackedArray<W>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an NBT {}", W::KIND)
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let token: String = map
                    .next_key()?
                    .ok_or_else(|| A::Error::custom(format!("expected an {}", W::KIND)))?;
                if token != W::TOKEN {
                    return Err(A::Error::custom(format!(
                        "expected an {}, found {}",
                        W::KIND,
                        token
                    )));
                }

                let data: ByteBuf = map.next_value()?;
                Ok(PackedArray::from_raw(data.into_vec()))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(v) = seq.next_element::<W::Native>()? {
                    values.push(v);
                }
                Ok(PackedArray::new(&values))
            }
        }

        deserializer.deserialize_any(ArrayVisitor(PhantomData))
    }
}
