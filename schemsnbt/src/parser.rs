//! Lexemes of the text notation as nom parsers. Structure (lists, compounds,
//! nesting) is handled by the recursive descent in [`de`](crate::de).

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1};
use nom::character::complete::{char, digit0, digit1, multispace0, one_of};
use nom::combinator::{cut, opt, recognize, value};
use nom::error::{Error as NomError, ErrorKind as NomErrorKind};
use nom::sequence::{pair, tuple};
use nom::IResult;

use schemnbt::TagKind;

/// A numeric literal: the number without its suffix, and the kind the suffix
/// selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Literal<'a> {
    pub kind: TagKind,
    pub digits: &'a str,
}

/// Characters of an unquoted compound key. A literal may not be directly
/// followed by one of these.
pub(crate) fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

pub(crate) fn whitespace(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

pub(crate) fn key_token(input: &str) -> IResult<&str, &str> {
    take_while1(is_token_char)(input)
}

/// A double-quoted string, quotes included. Escapes are skipped over here and
/// decoded later.
pub(crate) fn quoted(input: &str) -> IResult<&str, &str> {
    let (body, _) = char('"')(input)?;

    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => {
                let end = i + 2;
                return Ok((&input[end..], &input[..end]));
            }
            _ => {}
        }
    }

    // Unterminated. Point at the opening quote.
    Err(nom::Err::Failure(NomError::new(input, NomErrorKind::Char)))
}

pub(crate) fn boolean(input: &str) -> IResult<&str, bool> {
    let (rest, b) = alt((value(true, tag("true")), value(false, tag("false"))))(input)?;
    if rest.starts_with(is_token_char) {
        return Err(nom::Err::Error(NomError::new(input, NomErrorKind::Tag)));
    }
    Ok((rest, b))
}

fn sign(input: &str) -> IResult<&str, Option<char>> {
    opt(one_of("+-"))(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    alt((
        tag_no_case("infinity"),
        tag_no_case("inf"),
        tag_no_case("nan"),
    ))(input)
}

fn mantissa(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ))(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), cut(digit1))))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        sign,
        alt((word, recognize(pair(mantissa, opt(exponent))))),
    ))(input)
}

/// A numeric literal with its optional one-letter suffix.
///
/// Integers without a suffix are Int. Anything with a point or an exponent
/// and no suffix is Double. `B`, `S` and `L` only follow integers, while the
/// words `inf`, `infinity` and `nan` need an `F` or `D`.
pub(crate) fn literal(input: &str) -> IResult<&str, Literal<'_>> {
    let (rest, digits) = number(input)?;
    let (rest, suffix) = opt(one_of("bBsSlLfFdD"))(rest)?;

    let unsigned = digits.trim_start_matches(|c: char| c == '+' || c == '-');
    let integral = unsigned.bytes().all(|b| b.is_ascii_digit());
    let word = unsigned.starts_with(|c: char| c.is_ascii_alphabetic());

    let kind = match (suffix.map(|c| c.to_ascii_uppercase()), integral) {
        (Some('B'), true) => TagKind::Byte,
        (Some('S'), true) => TagKind::Short,
        (Some('L'), true) => TagKind::Long,
        (Some('F'), _) => TagKind::Float,
        (Some('D'), _) => TagKind::Double,
        (None, true) => TagKind::Int,
        (None, false) if !word => TagKind::Double,
        _ => return Err(nom::Err::Failure(NomError::new(input, NomErrorKind::Verify))),
    };

    // Anything glued onto the literal, like the second point of `1.2.3`,
    // makes the whole thing malformed.
    if rest.starts_with(is_token_char) {
        return Err(nom::Err::Failure(NomError::new(rest, NomErrorKind::Verify)));
    }

    Ok((rest, Literal { kind, digits }))
}
