//! SAX-style fragment replay
//!
//! Event-based walking of captured HTML fragments.
//!
//! ## Architecture
//!
//! The tokenizer drives a caller-supplied listener over one fragment:
//!
//! ```text
//! ElementTokenizer ---> TagListener
//!        |                  |
//!        v                  v
//!   open-element       TagSelection
//!      stack          (per start tag)
//! ```
//!
//! ## Callbacks
//!
//! - `document_start` / `document_end` - bracket the pass
//! - `tag_start` - start tag seen; returns what to collect for it
//! - `attributes` - requested attribute values; can veto the tag
//! - `text` - accumulated, entity-decoded text of a closing element
//! - `tag_end` - element closed; can stop the pass
//!
//! ## Malformed input
//!
//! Missing end tags are resolved by structural auto-close (table cells,
//! rows, options, list items) and by force-closing at end of fragment.
//! Nothing in a fragment makes the replay fail.

pub mod listener;
pub mod tokenizer;

pub use listener::{Flow, TagAttribute, TagListener, TagSelection};
pub use tokenizer::ElementTokenizer;
