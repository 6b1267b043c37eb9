//! Positional `{N}` template substitution, used to format output lines.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([0-9]+)\}").unwrap());

/// Replaces `{0}`, `{1}`, ... with the matching argument, or the empty
/// string when the argument is missing. Arguments are inserted literally.
///
/// ```
/// use m3u8_rewrite::template::format;
///
/// assert_eq!(format("{0}:{1}", &["#EXT-X-VERSION", "3"]), "#EXT-X-VERSION:3");
/// assert_eq!(format("{0},{1}", &["solo"]), "solo,");
/// ```
pub fn format(template: &str, args: &[&str]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .copied()
                .unwrap_or("")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_in_order() {
        assert_eq!(format("{0}:METHOD={1}", &["#EXT-X-KEY", "AES-128"]), "#EXT-X-KEY:METHOD=AES-128");
    }

    #[test]
    fn repeated_and_out_of_order_placeholders() {
        assert_eq!(format("{1}{0}{1}", &["a", "b"]), "bab");
    }

    #[test]
    fn missing_arguments_become_empty() {
        assert_eq!(format("{0}:{1},{2}", &["#EXTINF"]), "#EXTINF:,");
    }

    #[test]
    fn non_numeric_braces_are_left_alone() {
        assert_eq!(format("{x} {0}", &["y"]), "{x} y");
    }

    #[test]
    fn arguments_are_not_rescanned() {
        assert_eq!(format("{0}", &["{1}"]), "{1}");
    }
}
