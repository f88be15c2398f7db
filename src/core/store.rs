//! Chunked element accumulator
//!
//! Append-only byte store backed by fixed-capacity chunks:
//! - Chunks are reused in place on clear (no deallocation)
//! - Substring search spans chunk boundaries via a small scratch overlap
//! - Sub-range views resolve chunk offsets without copying

use std::io::Write;

use memchr::{memchr, memchr2, memmem};

use crate::error::Error;

/// Default capacity of each chunk in bytes
pub const DEFAULT_CHUNK_CAPACITY: usize = 4096;

/// Growable byte store made of fixed-capacity chunks.
///
/// All chunks except the last non-empty one are full. The store is cleared
/// and refilled once per captured element; clearing resets write cursors
/// without releasing chunk memory.
pub struct ChunkStore {
    chunks: Vec<Vec<u8>>,
    capacity: usize,
    len: usize,
}

impl ChunkStore {
    /// Create a store with the default chunk capacity
    pub fn new() -> Self {
        Self::with_chunk_capacity(DEFAULT_CHUNK_CAPACITY)
    }

    /// Create a store with a specific chunk capacity
    ///
    /// A capacity of zero is rounded up to one byte per chunk.
    pub fn with_chunk_capacity(capacity: usize) -> Self {
        ChunkStore {
            chunks: Vec::new(),
            capacity: capacity.max(1),
            len: 0,
        }
    }

    /// Logical length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the store holds no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Per-chunk capacity in bytes
    #[inline]
    pub fn chunk_capacity(&self) -> usize {
        self.capacity
    }

    /// Append bytes, filling the current chunk before touching the next.
    ///
    /// Cleared chunks are refilled in place; a new chunk is allocated only
    /// when every existing one is full.
    pub fn append(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            let idx = self.len / self.capacity;
            if idx == self.chunks.len() {
                self.chunks.push(Vec::with_capacity(self.capacity));
            }
            let chunk = &mut self.chunks[idx];
            let take = (self.capacity - chunk.len()).min(bytes.len());
            chunk.extend_from_slice(&bytes[..take]);
            self.len += take;
            bytes = &bytes[take..];
        }
    }

    /// Test whether `needle` occurs anywhere in the logical sequence,
    /// including occurrences that straddle a chunk boundary.
    ///
    /// Bounding the needle to one chunk's capacity keeps the boundary check
    /// limited to adjacent chunk pairs.
    pub fn contains(&self, needle: &[u8], case_sensitive: bool) -> Result<bool, Error> {
        if needle.len() > self.capacity {
            return Err(Error::NeedleTooLong {
                len: needle.len(),
                capacity: self.capacity,
            });
        }
        if needle.is_empty() {
            return Ok(true);
        }

        let used = self.used_chunks();
        for chunk in used {
            if find_in(chunk, needle, case_sensitive).is_some() {
                return Ok(true);
            }
        }

        // Boundary pass: trailing needle.len()-1 bytes of chunk i joined
        // with the leading needle.len()-1 bytes of chunk i+1.
        let overlap = needle.len() - 1;
        if overlap > 0 && used.len() > 1 {
            let mut scratch = Vec::with_capacity(overlap * 2);
            for pair in used.windows(2) {
                let left = &pair[0];
                let right = &pair[1];
                scratch.clear();
                scratch.extend_from_slice(&left[left.len() - overlap..]);
                scratch.extend_from_slice(&right[..overlap.min(right.len())]);
                if find_in(&scratch, needle, case_sensitive).is_some() {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// View of the logical range `[start, end)` without copying.
    ///
    /// Out-of-range bounds are clamped to the logical length.
    pub fn slice(&self, start: usize, end: usize) -> StoreSlice<'_> {
        let end = end.min(self.len);
        let start = start.min(end);
        StoreSlice {
            store: self,
            start,
            end,
        }
    }

    /// Write the whole accumulated content to a sink in chunk order
    pub fn write_to<W: Write>(&self, sink: &mut W) -> std::io::Result<()> {
        for chunk in self.used_chunks() {
            sink.write_all(chunk)?;
        }
        Ok(())
    }

    /// Reset every chunk's write cursor for reuse (no deallocation)
    pub fn clear(&mut self) {
        for chunk in &mut self.chunks {
            chunk.clear();
        }
        self.len = 0;
    }

    /// Chunks that currently hold data
    fn used_chunks(&self) -> &[Vec<u8>] {
        let n = (self.len + self.capacity - 1) / self.capacity;
        &self.chunks[..n]
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-copying view of a `ChunkStore` sub-range.
///
/// The covered bytes may span several chunks; `segments` yields them as
/// contiguous slices in order.
pub struct StoreSlice<'a> {
    store: &'a ChunkStore,
    start: usize,
    end: usize,
}

impl<'a> StoreSlice<'a> {
    /// Length of the viewed range in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the viewed range is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Iterate the covered bytes as contiguous per-chunk slices
    pub fn segments(&self) -> Segments<'a> {
        Segments {
            chunks: &self.store.chunks,
            capacity: self.store.capacity,
            pos: self.start,
            end: self.end,
        }
    }

    /// Write the viewed range to a sink
    pub fn write_to<W: Write>(&self, sink: &mut W) -> std::io::Result<()> {
        for segment in self.segments() {
            sink.write_all(segment)?;
        }
        Ok(())
    }

    /// Copy the viewed range into a new Vec
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for segment in self.segments() {
            out.extend_from_slice(segment);
        }
        out
    }
}

/// Iterator over the contiguous slices covered by a `StoreSlice`
pub struct Segments<'a> {
    chunks: &'a [Vec<u8>],
    capacity: usize,
    pos: usize,
    end: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.end {
            return None;
        }
        let idx = self.pos / self.capacity;
        let off = self.pos % self.capacity;
        let chunk = &self.chunks[idx];
        let take = (chunk.len() - off).min(self.end - self.pos);
        self.pos += take;
        Some(&chunk[off..off + take])
    }
}

/// Find `needle` in `haystack` under the requested case mode
#[inline]
pub(crate) fn find_in(haystack: &[u8], needle: &[u8], case_sensitive: bool) -> Option<usize> {
    if case_sensitive {
        memmem::find(haystack, needle)
    } else {
        find_ignore_case(haystack, needle)
    }
}

/// ASCII case-insensitive substring search.
///
/// Scans candidate positions by the needle's first byte (both case
/// variants) and confirms with a folded comparison.
pub(crate) fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    let lo = needle[0].to_ascii_lowercase();
    let hi = needle[0].to_ascii_uppercase();
    let mut pos = 0;
    while pos < haystack.len() {
        let found = if lo == hi {
            memchr(lo, &haystack[pos..])
        } else {
            memchr2(lo, hi, &haystack[pos..])
        };
        let at = match found {
            Some(i) => pos + i,
            None => return None,
        };
        if at + needle.len() > haystack.len() {
            return None;
        }
        if haystack[at..at + needle.len()].eq_ignore_ascii_case(needle) {
            return Some(at);
        }
        pos = at + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(store: &ChunkStore) -> Vec<u8> {
        let mut out = Vec::new();
        store.write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_append_spans_chunks() {
        let mut store = ChunkStore::with_chunk_capacity(4);
        store.append(b"hello ");
        store.append(b"world");
        assert_eq!(store.len(), 11);
        assert_eq!(contents(&store), b"hello world");
    }

    #[test]
    fn test_clear_reuses_chunks() {
        let mut store = ChunkStore::with_chunk_capacity(4);
        store.append(b"abcdefgh");
        store.clear();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(contents(&store), b"");

        store.append(b"0123456789");
        assert_eq!(contents(&store), b"0123456789");
    }

    #[test]
    fn test_contains_within_chunk() {
        let mut store = ChunkStore::with_chunk_capacity(16);
        store.append(b"some text here");
        assert!(store.contains(b"text", true).unwrap());
        assert!(!store.contains(b"TEXT", true).unwrap());
        assert!(store.contains(b"TEXT", false).unwrap());
        assert!(!store.contains(b"absent", false).unwrap());
    }

    #[test]
    fn test_contains_across_every_boundary_offset() {
        let needle = b"needle";
        // Place the needle so that `lead` bytes land at the end of the
        // first chunk and the rest spill into the second.
        for lead in 0..=needle.len() {
            let mut store = ChunkStore::with_chunk_capacity(8);
            let filler = vec![b'x'; 8 - lead];
            store.append(&filler);
            store.append(needle);
            store.append(b"yyyy");
            assert!(
                store.contains(needle, true).unwrap(),
                "missed needle with {} leading bytes in chunk 0",
                lead
            );
            assert!(store.contains(b"NeEdLe", false).unwrap());
            assert!(!store.contains(b"needles", true).unwrap());
        }
    }

    #[test]
    fn test_contains_needle_longer_than_chunk() {
        let mut store = ChunkStore::with_chunk_capacity(4);
        store.append(b"abcdefgh");
        let err = store.contains(b"abcdef", true).unwrap_err();
        assert!(matches!(err, Error::NeedleTooLong { len: 6, capacity: 4 }));
    }

    #[test]
    fn test_contains_empty_needle() {
        let store = ChunkStore::with_chunk_capacity(4);
        assert!(store.contains(b"", true).unwrap());
    }

    #[test]
    fn test_slice_view() {
        let mut store = ChunkStore::with_chunk_capacity(4);
        store.append(b"hello world");

        let view = store.slice(6, 11);
        assert_eq!(view.len(), 5);
        assert_eq!(view.to_vec(), b"world");

        // Segments split at the chunk boundary after position 7
        let segs: Vec<&[u8]> = view.segments().collect();
        assert_eq!(segs, vec![b"wo" as &[u8], b"rld"]);

        let mut out = Vec::new();
        view.write_to(&mut out).unwrap();
        assert_eq!(out, b"world");
    }

    #[test]
    fn test_slice_clamps_out_of_range() {
        let mut store = ChunkStore::with_chunk_capacity(4);
        store.append(b"abc");
        assert_eq!(store.slice(1, 100).to_vec(), b"bc");
        assert_eq!(store.slice(50, 100).len(), 0);
        assert!(store.slice(2, 2).is_empty());
    }

    #[test]
    fn test_find_ignore_case() {
        assert_eq!(find_ignore_case(b"abcDEF", b"cde"), Some(2));
        assert_eq!(find_ignore_case(b"abcDEF", b"xyz"), None);
        assert_eq!(find_ignore_case(b"100%", b"100%"), Some(0));
        assert_eq!(find_ignore_case(b"aaab", b"ab"), Some(2));
    }
}
