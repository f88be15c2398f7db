//! Core parsing primitives
//!
//! Fundamental building blocks shared by both passes:
//! - Cursor: SIMD-accelerated delimiter detection using memchr
//! - ChunkStore: chunked element accumulator with boundary-spanning search
//! - Entities: HTML entity decoding with Cow (zero-copy when possible)
//! - Attributes: tolerant attribute parsing

pub mod attributes;
pub mod cursor;
pub mod entities;
pub mod store;
