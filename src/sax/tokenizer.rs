//! Fragment replay tokenizer
//!
//! Walks a finite captured fragment as a relaxed SAX-style pass:
//! - Explicit open-element stack (never recursion)
//! - Per-tag listener selection: skip, or collect attributes/text
//! - Structural auto-close for td/tr/option/li with scope boundaries
//! - Entity-decoded text and attribute value delivery
//!
//! Malformed markup never fails the pass; unterminated constructs and
//! mismatched end tags are resolved heuristically.

use log::trace;

use crate::core::attributes::parse_attributes;
use crate::core::cursor::{is_name_start_char, Cursor};
use crate::core::entities::decode_text;
use crate::sax::listener::{Flow, TagAttribute, TagListener, TagSelection};

/// Element names that never take a close tag
pub(crate) const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "input"];

/// An open, not-yet-closed element on the tokenizer stack
struct OpenElement {
    /// Name as written in the start tag
    name: String,
    /// Decoded text accumulator; None when text was not requested
    text: Option<String>,
    /// Fragment index where this element's trailing unconsumed text begins
    text_mark: usize,
}

/// Second-pass tokenizer over a captured fragment.
///
/// Replays the fragment as start/attribute/text/end callbacks on a
/// `TagListener`. One tokenizer replays one fragment; `run` consumes it.
pub struct ElementTokenizer<'a> {
    input: &'a [u8],
    stack: Vec<OpenElement>,
}

impl<'a> ElementTokenizer<'a> {
    /// Create a tokenizer over the given fragment
    pub fn new(input: &'a [u8]) -> Self {
        ElementTokenizer {
            input,
            stack: Vec::new(),
        }
    }

    /// Replay the whole fragment into the listener.
    ///
    /// Returns `Flow::Stop` if the listener halted the pass early. The
    /// document callbacks bracket the pass in both cases.
    pub fn run<L: TagListener>(mut self, listener: &mut L) -> Flow {
        listener.document_start();
        let flow = self.replay(listener);
        listener.document_end();
        flow
    }

    fn replay<L: TagListener>(&mut self, listener: &mut L) -> Flow {
        let mut cursor = Cursor::new(self.input);

        loop {
            let lt = match cursor.find_tag_start() {
                Some(i) => i,
                None => break,
            };
            cursor.set_position(lt);

            match cursor.peek_at(1) {
                Some(b'/') => {
                    let gt = match cursor.find_byte(b'>') {
                        Some(i) => i,
                        // Unterminated end tag at fragment end is literal text
                        None => break,
                    };
                    cursor.set_position(lt + 2);
                    match cursor.read_name() {
                        Some(name_bytes) => {
                            let name = String::from_utf8_lossy(name_bytes).into_owned();
                            self.flush_text(lt);
                            if self.handle_end_tag(&name, listener) == Flow::Stop {
                                return Flow::Stop;
                            }
                        }
                        // Bogus end tag like `</ >`: drop it
                        None => self.flush_text(lt),
                    }
                    self.set_marks(gt + 1);
                    cursor.set_position(gt + 1);
                }
                Some(b'!') | Some(b'?') => {
                    self.flush_text(lt);
                    let end = self.markup_declaration_end(lt);
                    self.set_marks(end);
                    cursor.set_position(end);
                }
                Some(c) if is_name_start_char(c) => {
                    let gt = match cursor.find_tag_end_quoted() {
                        Some(i) => i,
                        // Unterminated start tag at fragment end is literal text
                        None => break,
                    };
                    cursor.set_position(lt + 1);
                    let name_bytes = match cursor.read_name() {
                        Some(n) => n,
                        None => {
                            cursor.set_position(lt + 1);
                            continue;
                        }
                    };
                    let name = String::from_utf8_lossy(name_bytes).into_owned();
                    let name_end = cursor.position();

                    self.flush_text(lt);
                    if self.handle_start_tag(&name, lt, name_end, gt, listener) == Flow::Stop {
                        return Flow::Stop;
                    }
                    self.set_marks(gt + 1);
                    cursor.set_position(gt + 1);
                }
                // A '<' that opens no markup is literal text
                _ => cursor.set_position(lt + 1),
            }
        }

        // End of fragment: flush trailing text, then force-close everything
        self.flush_text(self.input.len());
        if !self.stack.is_empty() {
            trace!("end of fragment, force-closing {} element(s)", self.stack.len());
        }
        self.close_from(0, listener)
    }

    /// Deliver a start tag: implied closes, br broadcast, selection,
    /// attribute extraction, stack push.
    fn handle_start_tag<L: TagListener>(
        &mut self,
        name: &str,
        lt: usize,
        name_end: usize,
        gt: usize,
        listener: &mut L,
    ) -> Flow {
        if let Some(idx) = self.find_implied(implied_closees(name, false)) {
            trace!("<{}> implies closing {} open element(s)", name, self.stack.len() - idx);
            if self.close_from(idx, listener) == Flow::Stop {
                return Flow::Stop;
            }
        }

        // <br> marks a line break in every accumulating ancestor
        if name.eq_ignore_ascii_case("br") {
            for entry in &mut self.stack {
                if let Some(acc) = entry.text.as_mut() {
                    acc.push('\n');
                }
            }
        }

        let inline = gt > lt && self.input[gt - 1] == b'/' || is_void_element(name);

        match listener.tag_start(name) {
            TagSelection::Skip => {}
            TagSelection::Collect { attributes, text } => {
                let mut accepted = true;
                if !attributes.is_empty() {
                    let interior = &self.input[name_end..gt];
                    let values = select_attributes(interior, &attributes);
                    accepted = listener.attributes(name, &values);
                }
                if accepted && !inline {
                    self.stack.push(OpenElement {
                        name: name.to_string(),
                        text: if text { Some(String::new()) } else { None },
                        text_mark: gt + 1,
                    });
                }
            }
        }

        Flow::Continue
    }

    /// Deliver an end tag: implied closes, then close through the nearest
    /// literal match; unmatched end tags are ignored.
    fn handle_end_tag<L: TagListener>(&mut self, name: &str, listener: &mut L) -> Flow {
        if let Some(idx) = self.find_implied(implied_closees(name, true)) {
            trace!("</{}> implies closing {} open element(s)", name, self.stack.len() - idx);
            if self.close_from(idx, listener) == Flow::Stop {
                return Flow::Stop;
            }
        }

        match self
            .stack
            .iter()
            .rposition(|e| e.name.eq_ignore_ascii_case(name))
        {
            Some(idx) => self.close_from(idx, listener),
            None => {
                trace!("ignoring unmatched end tag </{}>", name);
                Flow::Continue
            }
        }
    }

    /// Close every element at or above `idx`, innermost first.
    ///
    /// Each close delivers the element's text (if requested and non-empty)
    /// followed by its end callback.
    fn close_from<L: TagListener>(&mut self, idx: usize, listener: &mut L) -> Flow {
        while self.stack.len() > idx {
            let entry = match self.stack.pop() {
                Some(e) => e,
                None => break,
            };
            if let Some(text) = entry.text {
                if !text.is_empty() {
                    listener.text(&entry.name, &text);
                }
            }
            if listener.tag_end(&entry.name) == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    /// Find the deepest open element force-closable by the current trigger,
    /// scanning from the top of the stack and never crossing a scope
    /// boundary.
    fn find_implied(&self, closees: &[&str]) -> Option<usize> {
        if closees.is_empty() {
            return None;
        }
        let mut found = None;
        for (i, entry) in self.stack.iter().enumerate().rev() {
            if name_in(&entry.name, IMPLIED_BOUNDARIES) {
                break;
            }
            if name_in(&entry.name, closees) {
                found = Some(i);
            }
        }
        found
    }

    /// Append the pending text run `[mark, upto)` to every accumulating
    /// open element, entity-decoded, and advance all marks to `upto`.
    fn flush_text(&mut self, upto: usize) {
        let input = self.input;
        for entry in &mut self.stack {
            if entry.text_mark < upto {
                if let Some(acc) = entry.text.as_mut() {
                    let run = decode_text(&input[entry.text_mark..upto]);
                    acc.push_str(&String::from_utf8_lossy(run.as_ref()));
                }
                entry.text_mark = upto;
            }
        }
    }

    /// Move every open element's trailing-text index past consumed markup
    fn set_marks(&mut self, pos: usize) {
        for entry in &mut self.stack {
            entry.text_mark = pos;
        }
    }

    /// Extent of a `<!...>` or `<?...>` construct starting at `lt`.
    ///
    /// `<!--` runs to the next `>` preceded by two dashes (the dashes
    /// may be the opener's own, so `<!-->` is a closed empty comment);
    /// everything else runs to the next `>`. Unterminated constructs
    /// swallow the rest of the fragment.
    fn markup_declaration_end(&self, lt: usize) -> usize {
        let mut cursor = Cursor::new(self.input);
        cursor.set_position(lt);
        if cursor.starts_with(b"<!--") {
            cursor.set_position(lt + 4);
            while let Some(gt) = cursor.find_byte(b'>') {
                if self.input[gt - 1] == b'-' && self.input[gt - 2] == b'-' {
                    return gt + 1;
                }
                cursor.set_position(gt + 1);
            }
            self.input.len()
        } else {
            cursor.set_position(lt + 1);
            match cursor.find_byte(b'>') {
                Some(gt) => gt + 1,
                None => self.input.len(),
            }
        }
    }
}

/// Check if a name is one of the implicitly-void elements
#[inline]
pub(crate) fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| name.eq_ignore_ascii_case(v))
}

/// Scope boundaries an implied close never crosses
const IMPLIED_BOUNDARIES: &[&str] = &["table", "select", "ul", "ol"];

/// Elements a trigger tag force-closes before it is processed itself.
///
/// A start trigger also closes its own kind (a new cell closes the open
/// cell); an end trigger closes only the children its container implies
/// shut, since the literal match that follows closes the element proper.
fn implied_closees(name: &str, end_tag: bool) -> &'static [&'static str] {
    if name.eq_ignore_ascii_case("td") {
        if end_tag { &[] } else { &["td"] }
    } else if name.eq_ignore_ascii_case("tr") {
        if end_tag { &["td"] } else { &["td", "tr"] }
    } else if name.eq_ignore_ascii_case("table") {
        &["td", "tr"]
    } else if name.eq_ignore_ascii_case("option") {
        if end_tag { &[] } else { &["option"] }
    } else if name.eq_ignore_ascii_case("select") {
        &["option"]
    } else if name.eq_ignore_ascii_case("li") {
        if end_tag { &[] } else { &["li"] }
    } else if name.eq_ignore_ascii_case("ul") || name.eq_ignore_ascii_case("ol") {
        &["li"]
    } else {
        &[]
    }
}

/// ASCII case-insensitive set membership
#[inline]
fn name_in(name: &str, set: &[&str]) -> bool {
    set.iter().any(|s| name.eq_ignore_ascii_case(s))
}

/// Resolve declared attribute names against a tag's raw interior.
///
/// The first pair matching a declared name wins; declared names with no
/// match yield an empty value.
fn select_attributes(interior: &[u8], declared: &[String]) -> Vec<TagAttribute> {
    let parsed = parse_attributes(interior);
    declared
        .iter()
        .map(|want| {
            let value = parsed
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(want.as_bytes()))
                .map(|a| String::from_utf8_lossy(a.value.as_ref()).into_owned())
                .unwrap_or_default();
            TagAttribute {
                name: want.clone(),
                value,
            }
        })
        .collect()
}
