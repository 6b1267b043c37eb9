//! Lenient attribute-list and numeric parsing.
//!
//! Everything here degrades instead of failing: a malformed value becomes
//! `None` or an empty list, never an error. Callers treat the result as
//! partially-populated input, which is how real-world playlists with small
//! syntax defects stay usable.

use nom::bytes::complete::{is_not, take_till};
use nom::character::complete::{char, digit1, one_of};
use nom::combinator::{map, opt, recognize};
use nom::multi::separated_list0;
use nom::sequence::{pair, preceded};
use nom::IResult;

/// A single `NAME=VALUE` attribute. The value is `None` when the `=` is
/// missing entirely and `Some("")` when it is present but empty.
pub type AttributePair = (String, Option<String>);

/// Parses a comma-separated `NAME=VALUE` attribute list, e.g. the payload of
/// `#EXT-X-KEY:METHOD=AES-128,URI="key.bin",IV=0x1234`.
///
/// Commas split unconditionally, quoted or not, and names are returned as
/// written; callers match them case-insensitively and strip quotes where the
/// attribute calls for it.
pub fn attribute_pairs(input: &str) -> Vec<AttributePair> {
    let parsed: IResult<&str, Vec<AttributePair>> =
        separated_list0(char(','), attribute_pair)(input);
    match parsed {
        Ok((_, pairs)) => pairs,
        Err(_) => Vec::new(),
    }
}

fn attribute_pair(input: &str) -> IResult<&str, AttributePair> {
    map(
        pair(
            take_till(|c| c == '=' || c == ','),
            opt(preceded(char('='), attribute_value)),
        ),
        |(name, value): (&str, Option<&str>)| (name.to_string(), value.map(String::from)),
    )(input)
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
    map(opt(is_not(",")), |value: Option<&str>| value.unwrap_or(""))(input)
}

/// Strips surrounding quote characters, if present.
pub fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}

/// Parses a leading, optionally signed integer and ignores anything after
/// it: `"9.5"` gives 9, `"bad"` gives `None`. This is the truncating read
/// used for every numeric playlist field.
pub fn leading_int(input: &str) -> Option<i64> {
    let parsed: IResult<&str, &str> =
        recognize(pair(opt(one_of("+-")), digit1))(input.trim_start());
    match parsed {
        Ok((_, digits)) => digits.parse().ok(),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_pairs_quoted_and_unquoted() {
        assert_eq!(
            attribute_pairs("METHOD=AES-128,URI=\"key.bin\",IV=0x1234"),
            vec![
                ("METHOD".to_string(), Some("AES-128".to_string())),
                ("URI".to_string(), Some("\"key.bin\"".to_string())),
                ("IV".to_string(), Some("0x1234".to_string())),
            ]
        );
    }

    #[test]
    fn attribute_pairs_without_equals() {
        assert_eq!(
            attribute_pairs("METHOD,IV=0x1"),
            vec![
                ("METHOD".to_string(), None),
                ("IV".to_string(), Some("0x1".to_string())),
            ]
        );
    }

    #[test]
    fn attribute_pairs_empty_value() {
        assert_eq!(
            attribute_pairs("URI=,METHOD=NONE"),
            vec![
                ("URI".to_string(), Some("".to_string())),
                ("METHOD".to_string(), Some("NONE".to_string())),
            ]
        );
    }

    #[test]
    fn attribute_pairs_split_commas_inside_quotes() {
        // Quoted values are not comma-aware; the list splits anyway.
        assert_eq!(
            attribute_pairs("URI=\"a,b\""),
            vec![
                ("URI".to_string(), Some("\"a".to_string())),
                ("b\"".to_string(), None),
            ]
        );
    }

    #[test]
    fn strip_quotes_only_touches_surrounding_quotes() {
        assert_eq!(strip_quotes("\"key.bin\""), "key.bin");
        assert_eq!(strip_quotes("key.bin"), "key.bin");
        assert_eq!(strip_quotes("a\"b"), "a\"b");
    }

    #[test]
    fn leading_int_truncates() {
        assert_eq!(leading_int("9.5"), Some(9));
        assert_eq!(leading_int("8"), Some(8));
        assert_eq!(leading_int("10,title"), Some(10));
    }

    #[test]
    fn leading_int_signs_and_whitespace() {
        assert_eq!(leading_int("-2"), Some(-2));
        assert_eq!(leading_int("+7"), Some(7));
        assert_eq!(leading_int(" 42"), Some(42));
    }

    #[test]
    fn leading_int_not_a_number() {
        assert_eq!(leading_int("bad"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int(".5"), None);
    }
}
