//! The transform table: one handler per recognized tag prefix.
//!
//! Each handler does two jobs at once. It parses its matched line into the
//! [`Playlist`] under construction, and it records a [`Transform`] able to
//! emit that line again later. Running the recorded transforms in order is
//! the whole serializer; there is no separate writer walking the model.

use std::sync::Arc;

use crate::attributes::leading_int;
use crate::playlist::{Key, Playlist, Segment};
use crate::template::format;
use crate::LineCursor;

// -----------------------------------------------------------------------------------------------
// Re-emission entries
// -----------------------------------------------------------------------------------------------

/// A recorded re-emission step. One `Transform` is appended to
/// [`Playlist::transforms`] for every input line a handler consumes, and
/// emitting them in order reconstructs the document.
///
/// The non-literal variants are late-bound: they read the playlist at
/// emission time rather than snapshotting parsed text, so edits made to the
/// model between parsing and [`Playlist::to_text`] show up in the output.
#[derive(Debug, Clone)]
pub enum Transform {
    /// A line replayed verbatim: `#EXTM3U`, `#EXT-X-ENDLIST`, comments and
    /// unknown tags.
    Literal(String),
    /// `TAG:<version>`
    Version { tag: String },
    /// `TAG:<target duration>`
    TargetDuration { tag: String },
    /// `TAG:<media sequence>`
    MediaSequence { tag: String },
    /// `TAG:<playlist type>`
    PlaylistType { tag: String },
    /// The playlist's default key line. Re-reads the current default key and
    /// resets the serializer's active-key tracker to it.
    DefaultKey { tag: String },
    /// One media segment: `TAG:<duration>,<title>` plus its URL line.
    /// Prepends a key-change line whenever the segment's key differs, by
    /// identity, from the serializer's active key.
    Segment { tag: String, index: usize },
}

impl Transform {
    /// Produces the output line(s) for this entry. `used_key` is the
    /// active-key tracker owned by [`Playlist::to_text`] for the duration of
    /// one serialization pass.
    pub(crate) fn emit(&self, playlist: &Playlist, used_key: &mut Option<Arc<Key>>) -> String {
        match self {
            Transform::Literal(line) => line.clone(),
            Transform::Version { tag } => scalar_line(tag, playlist.version),
            Transform::TargetDuration { tag } => scalar_line(tag, playlist.target_duration),
            Transform::MediaSequence { tag } => scalar_line(tag, playlist.media_sequence),
            Transform::PlaylistType { tag } => format(
                "{0}:{1}",
                &[tag.as_str(), playlist.playlist_type.as_deref().unwrap_or("")],
            ),
            Transform::DefaultKey { tag } => {
                *used_key = playlist.key.clone();
                key_line("{0}:METHOD={1},URL=\"{2}\",IV={3}", tag, playlist.key.as_deref())
            }
            Transform::Segment { tag, index } => {
                let segment = match playlist.segments.get(*index) {
                    Some(segment) => segment,
                    None => return String::new(),
                };
                let mut change = String::new();
                if !same_key(used_key, &segment.key) {
                    if segment.key.is_some() {
                        change =
                            key_line("{0}:METHOD={1},URL={2},IV={3}\n", tag, segment.key.as_deref());
                    }
                    *used_key = segment.key.clone();
                }
                let duration = segment.duration.map(|d| d.to_string()).unwrap_or_default();
                format(
                    "{0}{1}:{2},{3}\n{4}",
                    &[
                        change.as_str(),
                        tag.as_str(),
                        duration.as_str(),
                        segment.title.as_str(),
                        segment.url.as_str(),
                    ],
                )
            }
        }
    }
}

fn scalar_line(tag: &str, value: Option<i64>) -> String {
    let value = value.map(|v| v.to_string()).unwrap_or_default();
    format("{0}:{1}", &[tag, value.as_str()])
}

fn key_line(template: &str, tag: &str, key: Option<&Key>) -> String {
    let method = key.and_then(|k| k.method.as_deref()).unwrap_or("");
    let url = key.and_then(|k| k.url.as_deref()).unwrap_or("");
    let iv = key.and_then(|k| k.iv.as_deref()).unwrap_or("");
    format(template, &[tag, method, url, iv])
}

fn same_key(a: &Option<Arc<Key>>, b: &Option<Arc<Key>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

// -----------------------------------------------------------------------------------------------
// The table
// -----------------------------------------------------------------------------------------------

/// A tag handler: parses one matched line into the playlist and records the
/// [`Transform`] that will re-emit it. The `#EXTINF` handler additionally
/// advances the cursor to take the URL line that follows its tag.
pub type Handler = fn(&str, &mut Playlist, &mut LineCursor<'_>);

/// One entry of the transform table: a tag prefix matched with
/// `str::starts_with`, the handler invoked on matching lines, and a human
/// description.
#[derive(Debug, Clone)]
pub struct TagHandler {
    pub id: String,
    pub handle: Handler,
    pub description: String,
}

impl TagHandler {
    pub fn new(id: &str, handle: Handler, description: &str) -> TagHandler {
        TagHandler {
            id: id.to_string(),
            handle,
            description: description.to_string(),
        }
    }
}

/// The built-in transform table, in declaration order. First match wins, so
/// specific prefixes come before the `#EXT` and `#` fallbacks.
///
/// Callers may prepend, append or replace entries and pass the result to
/// [`parse_with`](crate::parse_with) to support additional tags.
pub fn default_handlers() -> Vec<TagHandler> {
    vec![
        TagHandler::new("#EXTM3U", m3u, "header marking the start of the document"),
        TagHandler::new("#EXT-X-VERSION", version, "protocol compatibility version"),
        TagHandler::new(
            "#EXT-X-TARGETDURATION",
            target_duration,
            "upper bound on segment duration, in seconds",
        ),
        TagHandler::new(
            "#EXT-X-MEDIA-SEQUENCE",
            media_sequence,
            "sequence number of the first segment",
        ),
        TagHandler::new(
            "#EXT-X-PLAYLIST-TYPE",
            playlist_type,
            "playlist type, EVENT or VOD",
        ),
        TagHandler::new(
            "#EXT-X-KEY",
            key,
            "encryption parameters for the segments that follow",
        ),
        TagHandler::new(
            "#EXTINF",
            inf,
            "segment duration and title, followed by the segment URL",
        ),
        TagHandler::new("#EXT-X-ENDLIST", end_list, "marks the end of the playlist"),
        TagHandler::new("#EXT", unknown, "any other #EXT tag, preserved verbatim"),
        TagHandler::new("#", comment, "comment line, preserved verbatim"),
    ]
}

// -----------------------------------------------------------------------------------------------
// Built-in handlers
// -----------------------------------------------------------------------------------------------

/// Splits a tag line at the first `:`. The value is empty when there is
/// none; the tag keeps whatever spelling the line used.
fn split_tag(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((tag, value)) => (tag, value),
        None => (line, ""),
    }
}

fn m3u(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    playlist.start = true;
    playlist.transforms.push(Transform::Literal(line.to_string()));
}

fn version(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    let (tag, value) = split_tag(line);
    playlist.version = leading_int(value);
    playlist.transforms.push(Transform::Version { tag: tag.to_string() });
}

fn target_duration(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    let (tag, value) = split_tag(line);
    playlist.target_duration = leading_int(value);
    playlist
        .transforms
        .push(Transform::TargetDuration { tag: tag.to_string() });
}

fn media_sequence(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    let (tag, value) = split_tag(line);
    playlist.media_sequence = leading_int(value);
    playlist
        .transforms
        .push(Transform::MediaSequence { tag: tag.to_string() });
}

fn playlist_type(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    let (tag, value) = split_tag(line);
    playlist.playlist_type = Some(value.to_string());
    playlist
        .transforms
        .push(Transform::PlaylistType { tag: tag.to_string() });
}

/// Every key lands in `keys` and becomes the active key for subsequent
/// segments. Only the first one becomes the playlist's default key and gets
/// a re-emission entry of its own; re-declarations are re-inserted at
/// serialization time by the segment transforms that reference them.
fn key(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    let (tag, value) = split_tag(line);
    let key = Arc::new(Key::from_attribute_list(value));
    if playlist.key.is_none() {
        playlist.key = Some(key.clone());
        playlist
            .transforms
            .push(Transform::DefaultKey { tag: tag.to_string() });
    }
    playlist.used_key = Some(key.clone());
    playlist.keys.push(key);
}

/// The one handler that advances the shared cursor: the line after the tag
/// is the segment URL.
fn inf(line: &str, playlist: &mut Playlist, lines: &mut LineCursor<'_>) {
    let (tag, value) = split_tag(line);
    let (duration, title) = match value.split_once(',') {
        Some((duration, title)) => (duration, title),
        None => (value, ""),
    };
    let url = lines.next().unwrap_or("");
    let index = playlist.segments.len();
    playlist.segments.push(Segment {
        duration: leading_int(duration),
        title: title.to_string(),
        url: url.to_string(),
        key: playlist.used_key.clone(),
    });
    playlist
        .transforms
        .push(Transform::Segment { tag: tag.to_string(), index });
}

fn end_list(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    playlist.end = true;
    playlist.transforms.push(Transform::Literal(line.to_string()));
}

fn unknown(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    playlist.unknowns.push(line.to_string());
    playlist.transforms.push(Transform::Literal(line.to_string()));
}

fn comment(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
    playlist.transforms.push(Transform::Literal(line.to_string()));
}
