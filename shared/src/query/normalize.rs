//! Boolean operator normalization using nom.
//!
//! The input is split into alternating word and separator runs. Word runs that
//! spell `and`, `or` or `not` in any case are uppercased; everything else is
//! copied through untouched.

use crate::models::MATCH_ALL;
use nom::{
    branch::alt, bytes::complete::take_while1, combinator::map, multi::many0, IResult, Parser,
};

/// Operators the backend only recognises in uppercase.
const OPERATORS: [&str; 3] = ["AND", "OR", "NOT"];

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Word(&'a str),
    Separator(&'a str),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(take_while1(is_word_char), Segment::Word),
        map(take_while1(|c: char| !is_word_char(c)), Segment::Separator),
    ))
    .parse(input)
}

fn segments(input: &str) -> IResult<&str, Vec<Segment<'_>>> {
    many0(segment).parse(input)
}

fn operator(word: &str) -> Option<&'static str> {
    OPERATORS
        .into_iter()
        .find(|op| op.eq_ignore_ascii_case(word))
}

/// Normalizes a free-text query before it is sent to the backend.
///
/// Whole-word `and`, `or` and `not` (any letter case) become `AND`, `OR` and
/// `NOT`. An operator that is only part of a larger word, such as `android`,
/// stays as it is. Empty or whitespace-only input yields the match-all query
/// `*`. No other validation happens here; malformed queries are left for the
/// backend to reject.
///
/// Word boundaries follow Unicode [`char::is_alphanumeric`], not ASCII, so
/// `登录and abc` is one word followed by `abc` and comes back unchanged.
///
/// # Examples
///
/// ```
/// use shared::query::normalize_query;
///
/// assert_eq!(normalize_query("login and abc123"), "login AND abc123");
/// assert_eq!(normalize_query("ERROR or Not timeout"), "ERROR OR NOT timeout");
/// assert_eq!(normalize_query("android"), "android");
/// assert_eq!(normalize_query("登录and abc"), "登录and abc");
/// assert_eq!(normalize_query("  "), "*");
/// ```
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    if raw.trim().is_empty() {
        return MATCH_ALL.to_string();
    }

    // Every char is either a word char or a separator, so the whole input is
    // always consumed.
    let Ok((_, parts)) = segments(raw) else {
        return raw.to_string();
    };

    let mut normalized = String::with_capacity(raw.len());
    for part in parts {
        match part {
            Segment::Word(word) => normalized.push_str(operator(word).unwrap_or(word)),
            Segment::Separator(sep) => normalized.push_str(sep),
        }
    }
    normalized
}
