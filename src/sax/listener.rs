//! Listener contract for fragment replay
//!
//! Implement `TagListener` to turn a replayed fragment into application
//! data. The tokenizer consults the listener once per start tag; the
//! returned `TagSelection` decides whether the tag is tracked, which
//! attribute values it wants, and whether its text content is accumulated.

/// Per-tag processing decision returned by `TagListener::tag_start`.
///
/// Created once per start-tag event and consumed by the matching close;
/// never persisted by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSelection {
    /// Ignore this tag entirely; nested tags are still visited
    Skip,
    /// Track this tag until it closes
    Collect {
        /// Attribute names to extract, delivered in this order
        attributes: Vec<String>,
        /// Accumulate the element's text content
        text: bool,
    },
}

impl TagSelection {
    /// Track the tag and accumulate its text, no attributes
    pub fn text_only() -> Self {
        TagSelection::Collect {
            attributes: Vec::new(),
            text: true,
        }
    }

    /// Track the tag and extract the named attributes, no text
    pub fn attributes(names: &[&str]) -> Self {
        TagSelection::Collect {
            attributes: names.iter().map(|n| n.to_string()).collect(),
            text: false,
        }
    }
}

/// Continue-or-stop signal returned from end-tag callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep delivering events
    Continue,
    /// Halt replay immediately
    Stop,
}

/// An extracted attribute delivered to `TagListener::attributes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAttribute {
    /// Declared name, echoed from the `TagSelection`
    pub name: String,
    /// First matching value in the tag, entity-decoded; empty if absent
    pub value: String,
}

/// Trait for receiving fragment replay events
///
/// The tokenizer calls these methods as it walks a captured fragment.
/// All callbacks take `&mut self`; listeners are plain mutable state.
pub trait TagListener {
    /// Called once before any tag events
    fn document_start(&mut self) {}

    /// Decide how to process a start tag
    ///
    /// # Arguments
    /// * `name` - Tag name as written in the markup
    fn tag_start(&mut self, name: &str) -> TagSelection;

    /// Receive requested attribute values for a tracked tag
    ///
    /// Returning false drops the tag: it is not tracked and produces no
    /// further callbacks (nested tags are still visited).
    fn attributes(&mut self, _name: &str, _attrs: &[TagAttribute]) -> bool {
        true
    }

    /// Receive accumulated, entity-decoded text for a closing element
    ///
    /// Only called when the element's `TagSelection` requested text and
    /// any text was collected.
    fn text(&mut self, _name: &str, _text: &str) {}

    /// Called when a tracked element closes (explicitly or implicitly)
    fn tag_end(&mut self, _name: &str) -> Flow {
        Flow::Continue
    }

    /// Called once after the last tag event
    fn document_end(&mut self) {}
}
