//! Contains all the structs produced by parsing.
//!
//! The main type here is [`Playlist`], built up line by line by the tag
//! handlers in [`crate::transform`] and able to regenerate its own text
//! through [`Playlist::to_text`].

use std::sync::Arc;

use crate::attributes::{attribute_pairs, strip_quotes};
use crate::transform::Transform;

/// A parsed [Media Playlist]
/// (https://tools.ietf.org/html/draft-pantos-http-live-streaming-19#section-4.3.3).
///
/// All fields are public; the scalar fields are late-bound into the output,
/// so edits made after parsing show up in [`Playlist::to_text`]. Numeric
/// fields are `None` when the input value was not a number.
#[derive(Debug, Default, Clone)]
pub struct Playlist {
    /// `#EXTM3U` seen.
    pub start: bool,
    /// `#EXT-X-VERSION:<n>`
    pub version: Option<i64>,
    /// `#EXT-X-TARGETDURATION:<s>`
    pub target_duration: Option<i64>,
    /// `#EXT-X-MEDIA-SEQUENCE:<number>`
    pub media_sequence: Option<i64>,
    /// `#EXT-X-PLAYLIST-TYPE:<EVENT|VOD>`, kept as written.
    pub playlist_type: Option<String>,
    /// The default key: the first `#EXT-X-KEY` encountered.
    pub key: Option<Arc<Key>>,
    /// Every key encountered, in declaration order. Re-declarations after
    /// the first stay in this list but do not replace the default key.
    pub keys: Vec<Arc<Key>>,
    /// Media segments, in playlist order.
    pub segments: Vec<Segment>,
    /// `#EXT-X-ENDLIST` seen.
    pub end: bool,
    /// Sum of the numeric segment durations, in whole seconds. Recomputed
    /// once after the parse pass; non-numeric durations contribute 0.
    pub total_duration: i64,
    /// Unrecognized `#EXT` lines, verbatim.
    pub unknowns: Vec<String>,
    /// Re-emission entries, one per consumed input line, in input order.
    pub transforms: Vec<Transform>,
    /// The key in effect at the current parse position. Internal
    /// bookkeeping; public so custom tag handlers can participate.
    pub used_key: Option<Arc<Key>>,
}

impl Playlist {
    /// Regenerates playlist text by emitting every recorded transform in
    /// order, joined with `\n`.
    ///
    /// The active-key tracker is re-derived from the default key on every
    /// call, so repeated calls yield identical output.
    pub fn to_text(&self) -> String {
        let mut used_key = self.key.clone();
        let lines: Vec<String> = self
            .transforms
            .iter()
            .map(|transform| transform.emit(self, &mut used_key))
            .collect();
        lines.join("\n")
    }
}

/// A [Media Segment]
/// (https://tools.ietf.org/html/draft-pantos-http-live-streaming-19#section-3):
/// an `#EXTINF` tag plus the URL line that follows it.
#[derive(Debug, Default, Clone)]
pub struct Segment {
    /// `#EXTINF:<duration>,[<title>]`, whole seconds. Fractional input
    /// truncates to its leading digits; `None` when not a number at all.
    pub duration: Option<i64>,
    /// Title text after the comma; empty when absent.
    pub title: String,
    /// The URL line following the tag; empty when the document ended first.
    pub url: String,
    /// The key in effect when this segment was parsed. Later key changes do
    /// not retroactively alter it.
    pub key: Option<Arc<Key>>,
}

/// Decryption parameters from an [`#EXT-X-KEY:<attribute-list>`]
/// (https://tools.ietf.org/html/draft-pantos-http-live-streaming-19#section-4.3.2.4)
/// tag. Absent attributes stay unset.
///
/// Keys are shared by reference: a [`Segment`] points at the `Arc<Key>` that
/// was active when it was parsed, and the serializer decides whether a
/// key-change line needs re-inserting by pointer identity. `Key` does not
/// implement `PartialEq`; compare with `Arc::ptr_eq`.
#[derive(Debug, Default, Clone)]
pub struct Key {
    /// `METHOD=<method>`, e.g. `AES-128`.
    pub method: Option<String>,
    /// `URI=<url>`, surrounding quotes stripped.
    pub url: Option<String>,
    /// `IV=<iv>`
    pub iv: Option<String>,
}

impl Key {
    /// Builds a key from the attribute list of an `#EXT-X-KEY` line.
    /// Attribute names match case-insensitively; unrecognized names are
    /// dropped silently.
    pub fn from_attribute_list(value: &str) -> Key {
        let mut key = Key::default();
        for (name, value) in attribute_pairs(value) {
            match name.to_uppercase().as_str() {
                "METHOD" => key.method = value,
                "URI" => key.url = value.map(|v| strip_quotes(&v).to_string()),
                "IV" => key.iv = value,
                _ => (),
            }
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_attribute_list() {
        let key = Key::from_attribute_list(
            "METHOD=AES-128,URI=\"https://secure.domain.com/key\",IV=0x9c7db8778570d05c3177c349fd9236aa",
        );
        assert_eq!(key.method.as_deref(), Some("AES-128"));
        assert_eq!(key.url.as_deref(), Some("https://secure.domain.com/key"));
        assert_eq!(key.iv.as_deref(), Some("0x9c7db8778570d05c3177c349fd9236aa"));
    }

    #[test]
    fn key_attribute_names_are_case_insensitive() {
        let key = Key::from_attribute_list("method=NONE,uri=key.bin");
        assert_eq!(key.method.as_deref(), Some("NONE"));
        assert_eq!(key.url.as_deref(), Some("key.bin"));
        assert_eq!(key.iv, None);
    }

    #[test]
    fn key_drops_unrecognized_attributes() {
        let key = Key::from_attribute_list("KEYFORMAT=identity,METHOD=AES-128");
        assert_eq!(key.method.as_deref(), Some("AES-128"));
        assert_eq!(key.url, None);
        assert_eq!(key.iv, None);
    }

    #[test]
    fn key_with_absent_values() {
        let key = Key::from_attribute_list("METHOD");
        assert_eq!(key.method, None);
        assert_eq!(key.url, None);
        assert_eq!(key.iv, None);
    }
}
