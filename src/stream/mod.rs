//! Streaming extraction layer
//!
//! - `window`: fixed-size reusable read buffer over any `io::Read`
//! - `scanner`: depth-counting tag scanner that finds whole elements of
//!   one target tag across window refills
//!
//! Memory stays bounded by the window size plus the capture store of
//! the current candidate; the input is never held in full.

pub mod scanner;
pub mod window;

pub use scanner::{ScanConfig, TagScanner};
pub use window::Window;
