//! Circular Byte Window
//!
//! CRITICAL: `push` and `compare` never allocate.
//! The ring simulates an unbounded sliding window over a byte stream:
//! - Storage is allocated once at construction and never grows
//! - Each push past capacity evicts exactly the oldest byte
//! - Comparison runs directly against the wrapped storage layout
//!
//! # Invariants
//! - `len <= capacity` and `write_pos < capacity`.
//! - While filling, `oldest == 0`. Once full, `oldest == write_pos` and the
//!   ring stays full for the rest of its life.
//! - Logical content is `len` bytes read from `oldest`, wrapping at the end of
//!   storage. Slots outside that range are stale and never compared.

use std::fmt;
use std::io;

use log::debug;

/// Fill state of a ring. The only transition is `Filling -> Full`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingState {
    /// Fewer than `capacity` bytes have ever been pushed
    Filling,
    /// Every push evicts the oldest byte
    Full,
}

/// Fixed-capacity circular byte window for streaming pattern detection
#[derive(Clone, Debug)]
pub struct ByteRing {
    /// Pre-allocated storage, length == capacity
    buffer: Vec<u8>,
    /// Next slot to be written
    write_pos: usize,
    /// Slot of the oldest retained byte
    oldest: usize,
    /// Number of retained bytes
    len: usize,
}

impl ByteRing {
    /// Create a ring with fixed capacity - NO dynamic growth
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }
        debug!("ByteRing allocated with capacity {}", capacity);

        Ok(Self {
            buffer: vec![0u8; capacity], // Pre-allocate once
            write_pos: 0,
            oldest: 0,
            len: 0,
        })
    }

    /// Write one byte, evicting the oldest byte if the ring is full. O(1).
    #[inline]
    pub fn push(&mut self, byte: u8) {
        let capacity = self.buffer.len();

        self.buffer[self.write_pos] = byte;
        self.write_pos += 1;
        if self.write_pos == capacity {
            self.write_pos = 0;
        }

        if self.len == capacity {
            // Oldest byte was just overwritten
            self.oldest = self.write_pos;
        } else {
            self.len += 1;
        }
    }

    /// Check whether the window, read from its oldest byte, starts with
    /// `pattern`.
    ///
    /// Strict: returns false until at least `pattern.len()` bytes are
    /// retained, so stale storage is never compared. A pattern longer than
    /// the capacity never matches. The empty pattern always matches.
    ///
    /// With capacity equal to the pattern length this is "window equals
    /// pattern". O(pattern length), no allocation, no mutation.
    pub fn compare(&self, pattern: &[u8]) -> bool {
        if pattern.len() > self.len {
            return false;
        }
        self.range_eq(0, pattern)
    }

    /// Check whether the newest `suffix.len()` retained bytes equal `suffix`.
    ///
    /// Same strict gate as [`compare`](Self::compare). Lets a window larger
    /// than the pattern report a match after every push.
    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        if suffix.len() > self.len {
            return false;
        }
        self.range_eq(self.len - suffix.len(), suffix)
    }

    /// Compare the logical range `[offset, offset + needle.len())` against
    /// `needle`. Caller guarantees the range is retained.
    fn range_eq(&self, offset: usize, needle: &[u8]) -> bool {
        let (head, tail) = self.segments();

        if offset >= head.len() {
            let start = offset - head.len();
            return &tail[start..start + needle.len()] == needle;
        }

        let in_head = (head.len() - offset).min(needle.len());
        head[offset..offset + in_head] == needle[..in_head]
            && tail[..needle.len() - in_head] == needle[in_head..]
    }

    /// Retained bytes as up to two slices in oldest-to-newest order.
    ///
    /// The second slice is empty unless the window wraps the end of storage.
    pub fn segments(&self) -> (&[u8], &[u8]) {
        let capacity = self.buffer.len();
        let start = self.oldest;

        if self.len <= capacity - start {
            (&self.buffer[start..start + self.len], &[])
        } else {
            let first = capacity - start;
            (&self.buffer[start..], &self.buffer[..self.len - first])
        }
    }

    /// Copy the window into a new linear buffer, oldest byte first.
    ///
    /// Allocates; don't call this in a loop.
    pub fn to_vec(&self) -> Vec<u8> {
        let (head, tail) = self.segments();
        let mut out = Vec::with_capacity(self.len);
        out.extend_from_slice(head);
        out.extend_from_slice(tail);
        out
    }

    /// Decode the window as UTF-8. See [`to_vec`](Self::to_vec) for caveats.
    ///
    /// A window that starts or ends inside a multi-byte sequence is an error.
    pub fn to_text(&self) -> Result<String, RingError> {
        String::from_utf8(self.to_vec()).map_err(|e| RingError::InvalidUtf8(e.to_string()))
    }

    /// Get ring capacity
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes currently retained
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    pub fn state(&self) -> RingState {
        if self.is_full() {
            RingState::Full
        } else {
            RingState::Filling
        }
    }

    /// Storage slot of the oldest retained byte
    pub fn oldest_index(&self) -> usize {
        self.oldest
    }

    /// Storage slot the next push writes to
    pub fn write_index(&self) -> usize {
        self.write_pos
    }
}

impl Extend<u8> for ByteRing {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for byte in iter {
            self.push(byte);
        }
    }
}

impl<'a> Extend<&'a u8> for ByteRing {
    fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
        for &byte in iter {
            self.push(byte);
        }
    }
}

/// Every byte is accepted; older bytes fall out of the window.
impl io::Write for ByteRing {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.extend(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Lossy UTF-8 rendering of the window
impl fmt::Display for ByteRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_vec()))
    }
}

/// Ring construction and decoding errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RingError {
    ZeroCapacity,
    EmptyPattern,
    PatternTooLong { pattern_len: usize, capacity: usize },
    InvalidUtf8(String),
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingError::ZeroCapacity => write!(f, "Ring capacity must be at least 1"),
            RingError::EmptyPattern => write!(f, "Search pattern must not be empty"),
            RingError::PatternTooLong { pattern_len, capacity } => write!(
                f,
                "Pattern of {} bytes can never match in a ring of capacity {}",
                pattern_len, capacity
            ),
            RingError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {}", e),
        }
    }
}

impl std::error::Error for RingError {}
