//! Windowed stream reading
//!
//! Reads input through a single fixed-size reusable buffer. Every
//! refill replaces the window's contents with one read from the source;
//! nothing carries over, so callers must flush whatever they still need
//! before asking for more.

use std::io::Read;

/// Default window size in bytes
pub const DEFAULT_WINDOW_SIZE: usize = 2048;

/// Fixed-size read window over a byte stream
pub struct Window<R: Read> {
    reader: R,
    buf: Box<[u8]>,
    len: usize,
    eof: bool,
}

impl<R: Read> Window<R> {
    /// Create a window of the given size over a reader.
    ///
    /// The size must be at least 1; `ScanConfig` validation enforces
    /// this on the public construction path.
    pub fn new(reader: R, size: usize) -> Self {
        Window {
            reader,
            buf: vec![0u8; size].into_boxed_slice(),
            len: 0,
            eof: false,
        }
    }

    /// Replace the window's contents with the next read from the source.
    ///
    /// Issues a single read call; the window may come back partially
    /// filled. Returns false once the source is exhausted.
    pub fn refill(&mut self) -> std::io::Result<bool> {
        if self.eof {
            return Ok(false);
        }
        let read = self.reader.read(&mut self.buf)?;
        self.len = read;
        if read == 0 {
            self.eof = true;
            Ok(false)
        } else {
            Ok(true)
        }
    }

    /// Current window contents
    pub fn contents(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Check if the source is exhausted
    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_refill_replaces_contents() {
        let cursor = Cursor::new(b"abcdefghij".to_vec());
        let mut window = Window::new(cursor, 4);

        assert!(window.refill().unwrap());
        assert_eq!(window.contents(), b"abcd");
        assert!(window.refill().unwrap());
        assert_eq!(window.contents(), b"efgh");
        assert!(window.refill().unwrap());
        assert_eq!(window.contents(), b"ij");
        assert!(!window.refill().unwrap());
        assert!(window.is_eof());
    }

    #[test]
    fn test_refill_after_eof_stays_exhausted() {
        let cursor = Cursor::new(b"x".to_vec());
        let mut window = Window::new(cursor, 8);

        assert!(window.refill().unwrap());
        assert!(!window.refill().unwrap());
        assert!(!window.refill().unwrap());
    }

    #[test]
    fn test_empty_source() {
        let cursor = Cursor::new(Vec::new());
        let mut window = Window::new(cursor, 8);

        assert!(!window.refill().unwrap());
        assert!(window.is_eof());
        assert!(window.contents().is_empty());
    }
}
