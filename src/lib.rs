//! tagsieve - Streaming extraction of HTML fragments in bounded memory
//!
//! Layers:
//! - stream: windowed scanner isolating whole elements of one target tag
//!   from an unbounded reader (TagScanner)
//! - sax: second-pass tokenizer replaying a captured fragment as
//!   start/end/text/attribute events (ElementTokenizer)
//! - core: chunked capture store, byte cursor, entity decoding,
//!   attribute extraction
//!
//! The scanner never holds the input in full: it reads through one
//! fixed-size window and keeps only the element currently being
//! captured. Malformed markup is tolerated, not rejected; missing close
//! tags for table and list elements are inferred during replay.
//!
//! # Example
//!
//! ```
//! use tagsieve::{ScanConfig, TagScanner};
//!
//! let html = r#"<div id="greeting">hello <b>world</b></div><div>other</div>"#;
//! let config = ScanConfig::new("div").attribute_filter("greeting");
//! let scanner = TagScanner::new(html.as_bytes(), config)?;
//!
//! let mut out = Vec::new();
//! let count = scanner.write_to(&mut out)?;
//! assert_eq!(count, 1);
//! assert_eq!(out, br#"<div id="greeting">hello <b>world</b></div>"#);
//! # Ok::<(), tagsieve::Error>(())
//! ```

pub mod core;
pub mod error;
pub mod sax;
pub mod stream;

pub use crate::core::store::{ChunkStore, StoreSlice};
pub use error::Error;
pub use sax::{ElementTokenizer, Flow, TagAttribute, TagListener, TagSelection};
pub use stream::{ScanConfig, TagScanner, Window};

/// Scan an in-memory document and collect each matched fragment.
///
/// How many fragments can match is the config's concern; the default
/// stops after the first.
pub fn extract_fragments(html: &[u8], config: ScanConfig) -> Result<Vec<Vec<u8>>, Error> {
    let scanner = TagScanner::new(html, config)?;
    let mut fragments = Vec::new();
    scanner.scan(|store| {
        let mut buf = Vec::with_capacity(store.len());
        store.write_to(&mut buf)?;
        fragments.push(buf);
        Ok(Flow::Continue)
    })?;
    Ok(fragments)
}

/// Scan an in-memory document and return the matched fragments
/// concatenated as one string.
pub fn extract_to_string(html: &str, config: ScanConfig) -> Result<String, Error> {
    let scanner = TagScanner::new(html.as_bytes(), config)?;
    let mut out = Vec::new();
    scanner.write_to(&mut out)?;
    // fragments are sliced only at ASCII delimiter positions, so UTF-8
    // input yields UTF-8 fragments
    match String::from_utf8(out) {
        Ok(s) => Ok(s),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}
