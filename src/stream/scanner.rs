//! Windowed tag scanning
//!
//! Finds whole elements of one target tag in an unbounded byte stream,
//! reading through a fixed-size window:
//!
//! - Tag boundaries that straddle a refill are reconstructed in a side
//!   buffer, so any window size down to one byte still scans correctly
//! - Nesting of the target tag is depth-counted; only the outermost
//!   close completes a match
//! - Captured content lives in a `ChunkStore` that is cleared and
//!   reused per candidate, keeping peak memory bounded
//! - Matches are optionally filtered by an attribute substring in the
//!   opening tag and by contained search text, both case-insensitive
//!
//! Emission is either verbatim to a sink or a structured replay through
//! `ElementTokenizer`. One scanner consumes one stream.

use std::io::{Read, Write};

use log::{debug, trace};
use memchr::{memchr, memchr3};

use crate::core::cursor::{is_name_start_char, Cursor};
use crate::core::store::{find_ignore_case, ChunkStore, DEFAULT_CHUNK_CAPACITY};
use crate::error::Error;
use crate::sax::listener::{Flow, TagListener};
use crate::sax::tokenizer::{ElementTokenizer, VOID_ELEMENTS};
use crate::stream::window::{Window, DEFAULT_WINDOW_SIZE};

/// Scan configuration, immutable once a scanner is built from it
#[derive(Debug, Clone)]
pub struct ScanConfig {
    tag: String,
    attribute_filter: Option<String>,
    search_text: Option<String>,
    select_all: bool,
    window_size: usize,
    chunk_capacity: usize,
}

impl ScanConfig {
    /// Configuration for the given target tag name with default window
    /// and chunk sizes, stopping after the first match.
    pub fn new(tag: &str) -> Self {
        ScanConfig {
            tag: tag.to_string(),
            attribute_filter: None,
            search_text: None,
            select_all: false,
            window_size: DEFAULT_WINDOW_SIZE,
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
        }
    }

    /// Only emit elements whose opening tag contains this substring,
    /// compared case-insensitively against the tag's raw text.
    pub fn attribute_filter(mut self, filter: &str) -> Self {
        self.attribute_filter = Some(filter.to_string());
        self
    }

    /// Only emit elements whose captured content contains this text,
    /// case-insensitively.
    pub fn search_text(mut self, text: &str) -> Self {
        self.search_text = Some(text.to_string());
        self
    }

    /// Keep scanning for further matches after the first
    pub fn select_all(mut self) -> Self {
        self.select_all = true;
        self
    }

    /// Read window size in bytes
    pub fn window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Capture store chunk size in bytes
    pub fn chunk_capacity(mut self, capacity: usize) -> Self {
        self.chunk_capacity = capacity;
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.tag.is_empty() {
            return Err(Error::EmptyTagName);
        }
        if self.window_size == 0 {
            return Err(Error::WindowSizeZero);
        }
        if let Some(ref filter) = self.attribute_filter {
            if filter.is_empty() {
                return Err(Error::EmptyAttributeFilter);
            }
        }
        if let Some(ref search) = self.search_text {
            if search.is_empty() {
                return Err(Error::EmptySearchText);
            }
            if search.len() > self.window_size {
                return Err(Error::SearchTextTooLong {
                    len: search.len(),
                    limit: self.window_size,
                });
            }
            if search.len() > self.chunk_capacity {
                return Err(Error::NeedleTooLong {
                    len: search.len(),
                    capacity: self.chunk_capacity,
                });
            }
        }
        Ok(())
    }
}

/// Streaming scanner for whole elements of one target tag.
///
/// Construction validates the configuration; `write_to` and `run`
/// consume the scanner and drain the stream.
pub struct TagScanner<R: Read> {
    window: Window<R>,
    state: ScanState,
}

/// Everything the scan carries across window refills
struct ScanState {
    /// Target tag name, matched case-insensitively
    tag: String,
    /// Substring required in the opening tag's raw text
    attribute_filter: Option<String>,
    /// Text required somewhere in the captured content
    search_text: Option<String>,
    /// Keep scanning after the first emitted match
    select_all: bool,
    /// Nesting count of the target tag inside the current candidate
    depth: usize,
    /// Matches emitted so far
    matches: usize,
    mode: Mode,
    /// Construct left open at the previous window's edge
    pending: Option<Pending>,
    /// Captured candidate content, cleared per candidate
    store: ChunkStore,
    /// Reconstruction buffer for a tag spanning refills
    tag_buf: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// No open candidate; looking for a target start tag
    Seeking,
    /// Inside a still-open candidate, capturing content
    Accumulating,
    /// Stream exhausted, first match delivered, or listener stop
    Done,
}

enum Pending {
    /// A tag's `>` was not in the window; `tag_buf` holds its prefix
    Tag { in_quote: Option<u8> },
    /// Inside a comment; `seam` holds the last two bytes seen
    Comment { seam: [u8; 2] },
}

impl<R: Read> TagScanner<R> {
    /// Create a scanner over a reader. Fails fast on an invalid
    /// configuration.
    pub fn new(reader: R, config: ScanConfig) -> Result<Self, Error> {
        config.validate()?;
        let ScanConfig {
            tag,
            attribute_filter,
            search_text,
            select_all,
            window_size,
            chunk_capacity,
        } = config;
        Ok(TagScanner {
            window: Window::new(reader, window_size),
            state: ScanState {
                tag,
                attribute_filter,
                search_text,
                select_all,
                depth: 0,
                matches: 0,
                mode: Mode::Seeking,
                pending: None,
                store: ChunkStore::with_chunk_capacity(chunk_capacity),
                tag_buf: Vec::new(),
            },
        })
    }

    /// Write every matched fragment verbatim to a sink.
    ///
    /// Returns the number of fragments written.
    pub fn write_to<W: Write>(self, sink: &mut W) -> Result<usize, Error> {
        self.scan(|store| {
            store.write_to(sink)?;
            Ok(Flow::Continue)
        })
    }

    /// Replay every matched fragment into a listener.
    ///
    /// Each fragment gets its own bracketed tokenizer pass. Returns the
    /// number of fragments delivered, counting one the listener stopped
    /// on.
    pub fn run<L: TagListener>(self, listener: &mut L) -> Result<usize, Error> {
        let mut fragment = Vec::new();
        self.scan(|store| {
            fragment.clear();
            store.write_to(&mut fragment)?;
            Ok(ElementTokenizer::new(&fragment).run(listener))
        })
    }

    pub(crate) fn scan<F>(mut self, mut emit: F) -> Result<usize, Error>
    where
        F: FnMut(&ChunkStore) -> Result<Flow, Error>,
    {
        while self.state.mode != Mode::Done {
            if !self.window.refill()? {
                break;
            }
            let TagScanner { window, state } = &mut self;
            state.process(window.contents(), &mut emit)?;
        }
        if self.state.mode == Mode::Accumulating {
            debug!(
                "stream ended inside <{}>, dropping unclosed capture",
                self.state.tag
            );
        }
        Ok(self.state.matches)
    }
}

impl ScanState {
    /// Scan one window's contents.
    ///
    /// `mark` tracks the window offset at which unflushed capture
    /// content begins; anything still needed is pushed to the store
    /// before this returns.
    fn process<F>(&mut self, data: &[u8], emit: &mut F) -> Result<(), Error>
    where
        F: FnMut(&ChunkStore) -> Result<Flow, Error>,
    {
        let mut pos = 0;
        let mut mark = 0;

        if let Some(pending) = self.pending.take() {
            match self.resume_pending(pending, data, &mut mark, emit)? {
                Some(next) => pos = next,
                None => return Ok(()),
            }
            if self.mode == Mode::Done {
                return Ok(());
            }
        }

        while pos < data.len() {
            let lt = match memchr(b'<', &data[pos..]) {
                Some(off) => pos + off,
                None => break,
            };

            // a '<' that opens no markup is content
            if lt + 1 < data.len() && !opens_markup(data[lt + 1]) {
                pos = lt + 1;
                continue;
            }

            if data.len() - lt >= 4 && &data[lt..lt + 4] == b"<!--" {
                // comment contents are opaque, brackets included
                match find_comment_close(data, lt + 4, [0, 0]) {
                    Some(close) => {
                        pos = close + 1;
                        continue;
                    }
                    None => {
                        self.pending = Some(Pending::Comment {
                            seam: comment_seam([0, 0], data),
                        });
                        self.flush_tail(data, mark);
                        return Ok(());
                    }
                }
            }

            let mut quote = None;
            match find_tag_end(data, lt + 1, &mut quote) {
                Some(gt) => {
                    self.complete_tag(data, lt, gt, false, &mut mark, emit)?;
                    if self.mode == Mode::Done {
                        return Ok(());
                    }
                    pos = gt + 1;
                }
                None => {
                    if self.mode == Mode::Accumulating && mark < lt {
                        self.store.append(&data[mark..lt]);
                    }
                    self.tag_buf.clear();
                    self.tag_buf.extend_from_slice(&data[lt..]);
                    self.pending = Some(Pending::Tag { in_quote: quote });
                    return Ok(());
                }
            }
        }

        self.flush_tail(data, mark);
        Ok(())
    }

    /// Continue the construct left open at the previous window's edge.
    ///
    /// Returns the offset at which normal scanning resumes, or None
    /// when this window was consumed entirely (suspending again as
    /// needed).
    fn resume_pending<F>(
        &mut self,
        pending: Pending,
        data: &[u8],
        mark: &mut usize,
        emit: &mut F,
    ) -> Result<Option<usize>, Error>
    where
        F: FnMut(&ChunkStore) -> Result<Flow, Error>,
    {
        let in_quote = match pending {
            Pending::Comment { seam } => {
                return match find_comment_close(data, 0, seam) {
                    Some(close) => Ok(Some(close + 1)),
                    None => {
                        self.pending = Some(Pending::Comment {
                            seam: comment_seam(seam, data),
                        });
                        self.flush_tail(data, 0);
                        Ok(None)
                    }
                };
            }
            Pending::Tag { in_quote } => in_quote,
        };

        // a lone '<' could not be classified before the window ended
        if self.tag_buf.len() == 1 && !opens_markup(data[0]) {
            if self.mode == Mode::Accumulating {
                self.store.append(b"<");
            }
            self.tag_buf.clear();
            return Ok(Some(0));
        }

        // the buffered prefix may still turn out to open a comment
        if self.tag_buf.len() < 4 && self.tag_buf[..] == b"<!--"[..self.tag_buf.len()] {
            let have = self.tag_buf.len();
            let need = 4 - have;
            if data.len() < need {
                if data[..] == b"<!--"[have..have + data.len()] {
                    self.tag_buf.extend_from_slice(data);
                    self.pending = Some(Pending::Tag { in_quote });
                    return Ok(None);
                }
            } else if data[..need] == b"<!--"[have..] {
                if self.mode == Mode::Accumulating {
                    self.store.append(&self.tag_buf);
                }
                let seam = comment_seam([0, 0], &self.tag_buf);
                self.tag_buf.clear();
                return match find_comment_close(data, need, seam) {
                    Some(close) => Ok(Some(close + 1)),
                    None => {
                        self.pending = Some(Pending::Comment {
                            seam: comment_seam(seam, data),
                        });
                        self.flush_tail(data, 0);
                        Ok(None)
                    }
                };
            }
        }

        // regular tag: keep reconstructing until its closing bracket
        let mut quote = in_quote;
        match find_tag_end(data, 0, &mut quote) {
            Some(gt) => {
                self.tag_buf.extend_from_slice(&data[..=gt]);
                self.complete_tag(data, 0, gt, true, mark, emit)?;
                self.tag_buf.clear();
                Ok(Some(gt + 1))
            }
            None => {
                self.tag_buf.extend_from_slice(data);
                self.pending = Some(Pending::Tag { in_quote: quote });
                Ok(None)
            }
        }
    }

    /// Classify and apply one completed tag.
    ///
    /// `spanned` means the tag was reconstructed in `tag_buf`; its
    /// bytes are then appended from there whenever they belong to the
    /// capture, since they are no longer in the window's flush range.
    fn complete_tag<F>(
        &mut self,
        data: &[u8],
        lt: usize,
        gt: usize,
        spanned: bool,
        mark: &mut usize,
        emit: &mut F,
    ) -> Result<(), Error>
    where
        F: FnMut(&ChunkStore) -> Result<Flow, Error>,
    {
        let tag: &[u8] = if spanned { &self.tag_buf } else { &data[lt..=gt] };

        if tag.len() >= 2 && tag[1] == b'/' {
            if self.mode != Mode::Accumulating {
                // end tags with nothing open are ignored
                return Ok(());
            }
            let closes_target = tag_name(tag, 2)
                .map_or(false, |n| n.eq_ignore_ascii_case(self.tag.as_bytes()));
            if closes_target {
                self.depth -= 1;
                if self.depth == 0 {
                    if spanned {
                        self.store.append(tag);
                    } else {
                        self.store.append(&data[*mark..=gt]);
                    }
                    *mark = gt + 1;
                    self.mode = Mode::Seeking;
                    trace!(
                        "</{}> closed candidate, {} byte(s) captured",
                        self.tag,
                        self.store.len()
                    );
                    return self.emit_fragment(emit);
                }
            }
            if spanned {
                self.store.append(tag);
                *mark = gt + 1;
            }
            return Ok(());
        }

        let name = tag_name(tag, 1);
        let is_target =
            name.map_or(false, |n| n.eq_ignore_ascii_case(self.tag.as_bytes()));
        let inline = tag[tag.len() - 2] == b'/' || name.map_or(false, is_void_name);

        match self.mode {
            Mode::Seeking => {
                if !is_target {
                    return Ok(());
                }
                if let Some(ref filter) = self.attribute_filter {
                    if find_ignore_case(tag, filter.as_bytes()).is_none() {
                        trace!("<{}> candidate without attribute match, skipped", self.tag);
                        return Ok(());
                    }
                }
                self.store.clear();
                self.store.append(tag);
                if inline {
                    // a void or self-terminated target is a whole match
                    return self.emit_fragment(emit);
                }
                self.depth = 1;
                self.mode = Mode::Accumulating;
                *mark = gt + 1;
            }
            Mode::Accumulating => {
                if is_target && !inline {
                    self.depth += 1;
                }
                if spanned {
                    self.store.append(tag);
                    *mark = gt + 1;
                }
            }
            Mode::Done => {}
        }
        Ok(())
    }

    /// Filter and deliver the captured fragment, then reset for reuse
    fn emit_fragment<F>(&mut self, emit: &mut F) -> Result<(), Error>
    where
        F: FnMut(&ChunkStore) -> Result<Flow, Error>,
    {
        if let Some(ref search) = self.search_text {
            if !self.store.contains(search.as_bytes(), false)? {
                trace!("<{}> candidate without search text, dropped", self.tag);
                self.store.clear();
                return Ok(());
            }
        }
        let flow = emit(&self.store)?;
        self.matches += 1;
        debug!("emitted match {} for <{}>", self.matches, self.tag);
        self.store.clear();
        if flow == Flow::Stop {
            trace!("listener stopped the scan");
            self.mode = Mode::Done;
        } else if !self.select_all {
            self.mode = Mode::Done;
        }
        Ok(())
    }

    /// Flush the window tail past `mark` into the store when capturing
    fn flush_tail(&mut self, data: &[u8], mark: usize) {
        if self.mode == Mode::Accumulating && mark < data.len() {
            self.store.append(&data[mark..]);
        }
    }
}

/// Check if the byte after `<` can begin markup
#[inline]
fn opens_markup(b: u8) -> bool {
    b == b'/' || b == b'!' || b == b'?' || is_name_start_char(b)
}

/// Quote-aware search for the `>` closing a tag.
///
/// `in_quote` carries the open quote character across windows; it is
/// updated in place when the search suspends inside a quoted value.
fn find_tag_end(data: &[u8], from: usize, in_quote: &mut Option<u8>) -> Option<usize> {
    let mut pos = from;
    loop {
        match *in_quote {
            Some(q) => match memchr(q, &data[pos..]) {
                Some(off) => {
                    pos += off + 1;
                    *in_quote = None;
                }
                None => return None,
            },
            None => match memchr3(b'>', b'"', b'\'', &data[pos..]) {
                Some(off) => {
                    let at = pos + off;
                    if data[at] == b'>' {
                        return Some(at);
                    }
                    *in_quote = Some(data[at]);
                    pos = at + 1;
                }
                None => return None,
            },
        }
    }
}

/// Find the `>` of a `-->` comment terminator at or after `from`.
///
/// `seam` supplies the two bytes that preceded `data[0]`, so a
/// terminator split across windows is still recognized.
fn find_comment_close(data: &[u8], from: usize, seam: [u8; 2]) -> Option<usize> {
    let mut pos = from;
    while let Some(off) = memchr(b'>', &data[pos..]) {
        let at = pos + off;
        let d1 = if at >= 1 { data[at - 1] } else { seam[1] };
        let d2 = if at >= 2 {
            data[at - 2]
        } else if at == 1 {
            seam[1]
        } else {
            seam[0]
        };
        if d1 == b'-' && d2 == b'-' {
            return Some(at);
        }
        pos = at + 1;
    }
    None
}

/// Last two bytes of `prev` then `data`, carried across a refill
fn comment_seam(prev: [u8; 2], data: &[u8]) -> [u8; 2] {
    match data.len() {
        0 => prev,
        1 => [prev[1], data[0]],
        n => [data[n - 2], data[n - 1]],
    }
}

/// Element name at `offset` within a tag's raw text
fn tag_name(tag: &[u8], offset: usize) -> Option<&[u8]> {
    let mut cursor = Cursor::new(tag);
    cursor.set_position(offset);
    cursor.read_name()
}

/// Void-element check over raw name bytes
fn is_void_name(name: &[u8]) -> bool {
    VOID_ELEMENTS.iter().any(|v| name.eq_ignore_ascii_case(v.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sax::listener::TagSelection;
    use std::io::Cursor;

    fn scan_to_vec(input: &[u8], config: ScanConfig) -> (Vec<u8>, usize) {
        let scanner = TagScanner::new(Cursor::new(input.to_vec()), config).unwrap();
        let mut out = Vec::new();
        let count = scanner.write_to(&mut out).unwrap();
        (out, count)
    }

    #[test]
    fn test_single_match_exact_bytes() {
        let (out, count) = scan_to_vec(
            b"before<item attr=\"1\">body</item>after",
            ScanConfig::new("item"),
        );
        assert_eq!(count, 1);
        assert_eq!(out, b"<item attr=\"1\">body</item>");
    }

    #[test]
    fn test_all_matches_in_document_order() {
        let (out, count) =
            scan_to_vec(b"<b>1</b>x<b>2</b>y<b>3</b>", ScanConfig::new("b").select_all());
        assert_eq!(count, 3);
        assert_eq!(out, b"<b>1</b><b>2</b><b>3</b>");
    }

    #[test]
    fn test_nested_target_is_one_fragment() {
        let input = b"<div><div>in</div></div>";
        let (out, count) = scan_to_vec(input, ScanConfig::new("div").select_all());
        assert_eq!(count, 1);
        assert_eq!(out, input);
    }

    #[test]
    fn test_void_target_never_tracks_depth() {
        let (out, count) = scan_to_vec(
            b"x<img src=\"a\"/>y<img>z",
            ScanConfig::new("img").select_all(),
        );
        assert_eq!(count, 2);
        assert_eq!(out, b"<img src=\"a\"/><img>");
    }

    #[test]
    fn test_inline_target_inside_match_keeps_depth() {
        let input = b"<div>a<div/>b</div>";
        let (out, count) = scan_to_vec(input, ScanConfig::new("div").select_all());
        assert_eq!(count, 1);
        assert_eq!(out, input);
    }

    #[test]
    fn test_attribute_filter_present() {
        let input = b"<table width=\"100%\"><tr><td>v</td></tr></table>";
        let (out, count) = scan_to_vec(
            input,
            ScanConfig::new("table").attribute_filter("100%").select_all(),
        );
        assert_eq!(count, 1);
        assert_eq!(out, input);
    }

    #[test]
    fn test_attribute_filter_absent() {
        let input = b"<table border=\"1\"><tr><td>v</td></tr></table>";
        let (out, count) =
            scan_to_vec(input, ScanConfig::new("table").attribute_filter("100%"));
        assert_eq!(count, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_search_text_filter_case_insensitive() {
        let (out, count) = scan_to_vec(
            b"<td>alpha</td><td>beta</td>",
            ScanConfig::new("td").search_text("ALPHA").select_all(),
        );
        assert_eq!(count, 1);
        assert_eq!(out, b"<td>alpha</td>");
    }

    #[test]
    fn test_every_window_size_reconstructs_tags() {
        // Quoted '>' in the opener, a comment hiding a close tag, and a
        // trailing non-match, scanned at every window size down to one
        // byte.
        let input: &[u8] = b"pre<item a=\"v>x\"><!-- </item> -->mid</item>post";
        let expected = &input[3..input.len() - 4];
        for window in 1..=input.len() {
            let config = ScanConfig::new("item").select_all().window_size(window);
            let (out, count) = scan_to_vec(input, config);
            assert_eq!(count, 1, "window size {}", window);
            assert_eq!(out, expected, "window size {}", window);
        }
    }

    #[test]
    fn test_attribute_filter_on_spanning_opener() {
        let input = b"<table width=\"100%\"><tr><td>x</td></tr></table>";
        for window in [4usize, 6, 9] {
            let config = ScanConfig::new("table")
                .attribute_filter("100%")
                .window_size(window);
            let (out, count) = scan_to_vec(input, config);
            assert_eq!(count, 1, "window size {}", window);
            assert_eq!(out, input, "window size {}", window);
        }
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let input = b"junk<p>one</p>mid<p>two</p>end";
        let (first, count) = scan_to_vec(input, ScanConfig::new("p").select_all());
        assert_eq!(count, 2);
        let (second, recount) = scan_to_vec(&first, ScanConfig::new("p").select_all());
        assert_eq!(recount, 2);
        assert_eq!(second, first);
    }

    #[test]
    fn test_default_stops_after_first_match() {
        let (out, count) = scan_to_vec(b"<p>one</p><p>two</p>", ScanConfig::new("p"));
        assert_eq!(count, 1);
        assert_eq!(out, b"<p>one</p>");
    }

    #[test]
    fn test_unclosed_capture_discarded() {
        let (out, count) = scan_to_vec(b"<div>never closed", ScanConfig::new("div"));
        assert_eq!(count, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_unmatched_end_tag_ignored() {
        let (out, count) = scan_to_vec(b"</div><div>x</div>", ScanConfig::new("div"));
        assert_eq!(count, 1);
        assert_eq!(out, b"<div>x</div>");
    }

    #[test]
    fn test_empty_element_still_emitted() {
        let (out, count) = scan_to_vec(b"<div></div>", ScanConfig::new("div"));
        assert_eq!(count, 1);
        assert_eq!(out, b"<div></div>");
    }

    #[test]
    fn test_literal_angle_bracket_in_content() {
        let input = b"<td>1 < 2</td>";
        let (out, count) = scan_to_vec(input, ScanConfig::new("td"));
        assert_eq!(count, 1);
        assert_eq!(out, input);
    }

    #[test]
    fn test_search_text_across_chunk_boundary() {
        let (out, count) = scan_to_vec(
            b"<td>xxabcdefgyy</td>",
            ScanConfig::new("td").search_text("abcdefg").chunk_capacity(8),
        );
        assert_eq!(count, 1);
        assert_eq!(out, b"<td>xxabcdefgyy</td>");
    }

    #[test]
    fn test_config_validation() {
        let reader = Cursor::new(Vec::new());
        assert!(matches!(
            TagScanner::new(reader, ScanConfig::new("")),
            Err(Error::EmptyTagName)
        ));

        let reader = Cursor::new(Vec::new());
        assert!(matches!(
            TagScanner::new(reader, ScanConfig::new("td").window_size(0)),
            Err(Error::WindowSizeZero)
        ));

        let reader = Cursor::new(Vec::new());
        assert!(matches!(
            TagScanner::new(reader, ScanConfig::new("td").attribute_filter("")),
            Err(Error::EmptyAttributeFilter)
        ));

        let reader = Cursor::new(Vec::new());
        assert!(matches!(
            TagScanner::new(reader, ScanConfig::new("td").search_text("")),
            Err(Error::EmptySearchText)
        ));

        let reader = Cursor::new(Vec::new());
        assert!(matches!(
            TagScanner::new(
                reader,
                ScanConfig::new("td").search_text("abcdefgh").window_size(4)
            ),
            Err(Error::SearchTextTooLong { .. })
        ));

        let reader = Cursor::new(Vec::new());
        assert!(matches!(
            TagScanner::new(
                reader,
                ScanConfig::new("td").search_text("abcdefghij").chunk_capacity(8)
            ),
            Err(Error::NeedleTooLong { .. })
        ));
    }

    #[test]
    fn test_io_error_propagates() {
        struct FailingReader;

        impl std::io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }

        let scanner = TagScanner::new(FailingReader, ScanConfig::new("td")).unwrap();
        let mut out = Vec::new();
        assert!(matches!(scanner.write_to(&mut out), Err(Error::Io(_))));
    }

    /// Collects the text of every td in replayed fragments
    #[derive(Default)]
    struct CellCollector {
        texts: Vec<String>,
    }

    impl TagListener for CellCollector {
        fn tag_start(&mut self, name: &str) -> TagSelection {
            if name.eq_ignore_ascii_case("td") {
                TagSelection::text_only()
            } else {
                TagSelection::Skip
            }
        }

        fn text(&mut self, _name: &str, text: &str) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn test_run_replays_fragment_with_auto_close() {
        let input = b"<html><table><tr><td>a<td>b</tr></table></html>";
        let scanner =
            TagScanner::new(Cursor::new(input.to_vec()), ScanConfig::new("table")).unwrap();
        let mut cells = CellCollector::default();
        let count = scanner.run(&mut cells).unwrap();
        assert_eq!(count, 1);
        assert_eq!(cells.texts, vec!["a", "b"]);
    }

    /// Stops the pass at the first closed element
    #[derive(Default)]
    struct StopAfterFirst {
        seen: usize,
    }

    impl TagListener for StopAfterFirst {
        fn tag_start(&mut self, _name: &str) -> TagSelection {
            TagSelection::text_only()
        }

        fn tag_end(&mut self, _name: &str) -> Flow {
            self.seen += 1;
            Flow::Stop
        }
    }

    #[test]
    fn test_listener_stop_halts_scan() {
        let input = b"<i>a</i><i>b</i><i>c</i>";
        let scanner = TagScanner::new(
            Cursor::new(input.to_vec()),
            ScanConfig::new("i").select_all(),
        )
        .unwrap();
        let mut listener = StopAfterFirst::default();
        let count = scanner.run(&mut listener).unwrap();
        assert_eq!(count, 1);
        assert_eq!(listener.seen, 1);
    }
}
