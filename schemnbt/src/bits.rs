//! Bit-level access to values packed across fixed-width backing words.
//!
//! Bits are numbered from the least significant bit of word 0 upwards, so
//! value `i` at width `V` occupies bits `[i*V, (i+1)*V)`. Since `V` never
//! exceeds the word width, a value lies in one word or straddles exactly two.

use bit_field::BitField;

use crate::arrays::Word;

/// Word index of the first bit, word index of the last bit, and the offset of
/// the first bit inside its word.
fn locate<W: Word>(width: u32, index: usize) -> (usize, usize, usize) {
    let width = width as usize;
    let bits = W::BITS as usize;

    let start = index * width;
    let start_word = start / bits;
    let end_word = ((index + 1) * width - 1) / bits;
    let start_bit = start % bits;

    (start_word, end_word, start_bit)
}

pub(crate) fn word_at<W: Word>(data: &[u8], word: usize) -> u64 {
    W::read(&data[word * W::BYTES..(word + 1) * W::BYTES])
}

pub(crate) fn put_word<W: Word>(data: &mut [u8], word: usize, value: u64) {
    W::write(&mut data[word * W::BYTES..(word + 1) * W::BYTES], value)
}

/// Read the `width`-bit value at `index`.
pub(crate) fn get_packed<W: Word>(data: &[u8], width: u32, index: usize) -> u64 {
    let (start_word, end_word, start_bit) = locate::<W>(width, index);
    let width = width as usize;
    let bits = W::BITS as usize;

    let first = word_at::<W>(data, start_word);
    if start_word == end_word {
        return first.get_bits(start_bit..start_bit + width);
    }

    // Low part sits at the top of the first word, high part at the bottom of
    // the next.
    let low_len = bits - start_bit;
    let low = first.get_bits(start_bit..bits);
    let high = word_at::<W>(data, end_word).get_bits(0..width - low_len);

    low | high << low_len
}

/// Write the `width`-bit `value` at `index`, leaving every other bit alone.
/// `value` must already fit in `width` bits.
pub(crate) fn set_packed<W: Word>(data: &mut [u8], width: u32, index: usize, value: u64) {
    let (start_word, end_word, start_bit) = locate::<W>(width, index);
    let width = width as usize;
    let bits = W::BITS as usize;

    let mut first = word_at::<W>(data, start_word);
    if start_word == end_word {
        first.set_bits(start_bit..start_bit + width, value);
        put_word::<W>(data, start_word, first);
        return;
    }

    let low_len = bits - start_bit;
    first.set_bits(start_bit..bits, value.get_bits(0..low_len));
    put_word::<W>(data, start_word, first);

    let mut last = word_at::<W>(data, end_word);
    last.set_bits(0..width - low_len, value >> low_len);
    put_word::<W>(data, end_word, last);
}

/// Number of bits needed to hold `value`, at least 2.
pub(crate) fn min_width(value: u64) -> u32 {
    std::cmp::max(u64::BITS - value.leading_zeros(), 2)
}
