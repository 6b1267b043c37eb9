//! A library to parse and rewrite m3u8 media playlists (HTTP Live Streaming)
//! [link](https://tools.ietf.org/html/draft-pantos-http-live-streaming-19).
//!
//! Parsing and serialization are driven by a single table of per-tag
//! handlers. Each handler consumes one matched line, mutates the
//! [`Playlist`] under construction and records a [`Transform`] able to emit
//! that line again, so the parse pass doubles as the serializer: comments
//! and unknown tags survive a round trip verbatim, while recognized lines
//! are re-emitted from the model's current field values.
//!
//! Parsing never fails. Lines matching no table entry are skipped, numeric
//! fields that do not parse stay `None`, and malformed attributes are
//! dropped; the worst case is a partially-populated [`Playlist`].
//!
//! # Examples
//!
//! Parsing a playlist and regenerating its text.
//!
//! ```
//! let text = "#EXTM3U\n\
//!             #EXT-X-VERSION:3\n\
//!             #EXTINF:9,seg one\n\
//!             clip1.ts\n\
//!             #EXT-X-ENDLIST";
//!
//! let playlist = m3u8_rewrite::parse(text);
//! assert_eq!(playlist.version, Some(3));
//! assert_eq!(playlist.segments[0].url, "clip1.ts");
//! assert_eq!(playlist.total_duration, 9);
//! assert_eq!(playlist.to_text(), text);
//! ```
//!
//! Editing the model between parsing and serialization.
//!
//! ```
//! let mut playlist = m3u8_rewrite::parse("#EXTM3U\n#EXT-X-VERSION:3");
//! playlist.version = Some(4);
//! assert_eq!(playlist.to_text(), "#EXTM3U\n#EXT-X-VERSION:4");
//! ```
//!
//! Supporting an extra tag by extending the table.
//!
//! ```
//! use m3u8_rewrite::{default_handlers, parse_with, LineCursor, Playlist, TagHandler, Transform};
//!
//! fn start_tag(line: &str, playlist: &mut Playlist, _lines: &mut LineCursor<'_>) {
//!     playlist.transforms.push(Transform::Literal(line.to_string()));
//! }
//!
//! let mut handlers = default_handlers();
//! handlers.insert(0, TagHandler::new("#EXT-X-START", start_tag, "preferred start point"));
//!
//! let playlist = parse_with("#EXTM3U\n#EXT-X-START:TIME-OFFSET=-12", &handlers);
//! assert!(playlist.unknowns.is_empty());
//! assert_eq!(playlist.to_text(), "#EXTM3U\n#EXT-X-START:TIME-OFFSET=-12");
//! ```

pub mod attributes;
pub mod playlist;
pub mod template;
pub mod transform;

pub use crate::playlist::{Key, Playlist, Segment};
pub use crate::transform::{default_handlers, Handler, TagHandler, Transform};

// -----------------------------------------------------------------------------------------------
// Parse engine
// -----------------------------------------------------------------------------------------------

/// Forward-only cursor over the input lines, shared between the dispatch
/// loop and the handlers. A handler may advance it past its own line, as
/// `#EXTINF` does to take the segment URL that follows its tag.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: std::str::Split<'a, char>,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> LineCursor<'a> {
        LineCursor { lines: text.split('\n') }
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.lines.next()
    }
}

/// Parses playlist text with the built-in transform table.
pub fn parse(text: &str) -> Playlist {
    parse_with(text, &default_handlers())
}

/// Parses playlist text against a caller-supplied transform table, usually
/// [`default_handlers`] with entries added or replaced.
///
/// Each line is matched by prefix against the table in order; the first
/// matching entry handles the line, and a line matching no entry at all is
/// skipped. After the pass, [`Playlist::total_duration`] is computed from
/// the parsed segments.
pub fn parse_with(text: &str, handlers: &[TagHandler]) -> Playlist {
    let mut playlist = Playlist::default();
    let mut lines = LineCursor::new(text);

    while let Some(line) = lines.next() {
        let matched = handlers
            .iter()
            .find(|handler| line.starts_with(handler.id.as_str()));
        if let Some(handler) = matched {
            (handler.handle)(line, &mut playlist, &mut lines);
        }
    }

    playlist.total_duration = playlist
        .segments
        .iter()
        .filter_map(|segment| segment.duration)
        .sum();

    playlist
}
