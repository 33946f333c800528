//! Streaming Pattern Scanner
//!
//! Drives a [`ByteRing`] one byte at a time and reports when the most recent
//! bytes equal the search pattern. A match does not consume the window, so
//! overlapping occurrences are all reported.
//!
//! Usage with a reader:
//! 1. Size the ring to hold the pattern.
//! 2. Feed bytes from a buffered source until a match is reported.
//! 3. Rewind the source by the pattern length if the match itself is wanted.

use std::fmt;
use std::io::{self, BufRead, Read, Seek, SeekFrom};

use super::byte_ring::{ByteRing, RingError};
use crate::config::ScannerConfig;
use crate::telemetry;

/// A byte sequence to search for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    /// Pattern name (for logging)
    pub name: String,
    /// Exact bytes to match, no case folding
    pub bytes: Vec<u8>,
}

impl Pattern {
    /// Create a pattern from a string, named after itself
    pub fn from_string(s: &str) -> Self {
        Self {
            name: s.to_string(),
            bytes: s.as_bytes().to_vec(),
        }
    }

    /// Create a pattern with a custom name
    pub fn new(name: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of scanning bytes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanResult {
    /// Continue scanning, no match yet
    Continue,
    /// Pattern match found
    Match(PatternMatch),
}

/// Details of a pattern match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    /// Stream offset of the first matched byte
    pub start: u64,
    /// Stream offset just past the last matched byte
    pub end: u64,
    /// Name of the matched pattern
    pub pattern_name: String,
}

/// Single-pattern scanner over a fixed-capacity window
#[derive(Clone, Debug)]
pub struct StreamScanner {
    window: ByteRing,
    pattern: Pattern,
    /// Total bytes scanned
    position: u64,
    /// Whether to emit a scan event per match
    log_matches: bool,
}

impl StreamScanner {
    /// Create a scanner whose window holds `capacity` bytes.
    ///
    /// The capacity must fit the pattern; a smaller window could never match.
    pub fn new(pattern: Pattern, capacity: usize) -> Result<Self, RingError> {
        if pattern.is_empty() {
            return Err(RingError::EmptyPattern);
        }
        if capacity > 0 && capacity < pattern.len() {
            return Err(RingError::PatternTooLong {
                pattern_len: pattern.len(),
                capacity,
            });
        }

        Ok(Self {
            window: ByteRing::new(capacity)?,
            pattern,
            position: 0,
            log_matches: false,
        })
    }

    /// Create a scanner with the window sized exactly to the pattern
    pub fn for_pattern(pattern: Pattern) -> Result<Self, RingError> {
        let capacity = pattern.len();
        Self::new(pattern, capacity)
    }

    /// Create a scanner from configuration
    pub fn from_config(config: &ScannerConfig) -> Result<Self, RingError> {
        let scanner = Self::new(config.to_pattern(), config.window_capacity())?;
        Ok(scanner.with_match_logging(config.log_matches))
    }

    /// Enable or disable a scan event per match
    pub fn with_match_logging(mut self, enabled: bool) -> Self {
        self.log_matches = enabled;
        self
    }

    /// Push one byte and test the newest bytes against the pattern.
    ///
    /// O(pattern length); allocates only when reporting a match.
    #[inline]
    pub fn scan_byte(&mut self, byte: u8) -> ScanResult {
        self.window.push(byte);
        self.position += 1;

        if !self.window.ends_with(&self.pattern.bytes) {
            return ScanResult::Continue;
        }

        let found = PatternMatch {
            start: self.position - self.pattern.len() as u64,
            end: self.position,
            pattern_name: self.pattern.name.clone(),
        };
        if self.log_matches {
            telemetry::event_matched(&found, self.window.capacity()).emit();
        }
        ScanResult::Match(found)
    }

    /// Scan a slice of bytes, returns first match if found.
    ///
    /// Bytes after the match are not scanned. Window state carries over
    /// between calls, so a pattern split across chunks is still found.
    pub fn scan_bytes(&mut self, bytes: &[u8]) -> ScanResult {
        for &byte in bytes {
            if let result @ ScanResult::Match(_) = self.scan_byte(byte) {
                return result;
            }
        }
        ScanResult::Continue
    }

    /// Get total bytes scanned
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Borrow the window holding the most recent bytes
    pub fn window(&self) -> &ByteRing {
        &self.window
    }
}

/// Read until `pattern` is found, returning the offset just past the match.
///
/// Returns `Ok(None)` at end of stream. Wrap unbuffered sources in a
/// `BufReader`: bytes are pulled one at a time.
pub fn find_in_reader<R: Read>(reader: R, pattern: &Pattern) -> Result<Option<u64>, ScanError> {
    let mut scanner = StreamScanner::for_pattern(pattern.clone())?;

    for byte in reader.bytes() {
        if let ScanResult::Match(m) = scanner.scan_byte(byte?) {
            return Ok(Some(m.end));
        }
    }

    telemetry::event_exhausted(&pattern.name, scanner.position()).emit();
    Ok(None)
}

/// Advance `reader` to the first byte of the first occurrence of `pattern`.
///
/// Returns true when found. Otherwise the reader is left at end of stream.
pub fn seek_to_match<R: BufRead + Seek>(
    reader: &mut R,
    pattern: &Pattern,
) -> Result<bool, ScanError> {
    if find_in_reader(reader.by_ref(), pattern)?.is_none() {
        return Ok(false);
    }

    // The match is the last `pattern.len()` bytes consumed
    let rewind = i64::try_from(pattern.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pattern too long to rewind"))?;
    reader.seek(SeekFrom::Current(-rewind))?;
    Ok(true)
}

/// Errors from scanning a reader
#[derive(Debug)]
pub enum ScanError {
    Ring(RingError),
    Io(io::Error),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Ring(e) => write!(f, "Invalid scanner: {}", e),
            ScanError::Io(e) => write!(f, "Read failed: {}", e),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Ring(e) => Some(e),
            ScanError::Io(e) => Some(e),
        }
    }
}

impl From<RingError> for ScanError {
    fn from(e: RingError) -> Self {
        ScanError::Ring(e)
    }
}

impl From<io::Error> for ScanError {
    fn from(e: io::Error) -> Self {
        ScanError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    /// Byte count after which the first match should be reported
    fn first_match_end(data: &str, find: &str) -> usize {
        data.find(find).unwrap() + find.len()
    }

    fn assert_found(data: &str, find: &str) {
        let mut scanner = StreamScanner::for_pattern(Pattern::from_string(find)).unwrap();

        for (i, &b) in data.as_bytes().iter().enumerate() {
            if let ScanResult::Match(m) = scanner.scan_byte(b) {
                assert_eq!(scanner.window().to_text().unwrap(), find);
                assert!(scanner.window().compare(find.as_bytes()));
                assert_eq!(i + 1, first_match_end(data, find));
                assert_eq!(m.end as usize, i + 1);
                assert_eq!(m.start as usize, i + 1 - find.len());
                return;
            }
        }
        panic!("Expected to find '{}'", find);
    }

    #[test]
    fn test_exact_match_timing() {
        assert_found("foofoo", "foo");
        assert_found("eedle eedle needl haysneedletack", "needle");
    }

    #[test]
    fn test_multibyte_stream() {
        assert_found(" test 🍀 stringLucky", "Lucky");
        assert_found("🍀🦀🍀", "🦀");
    }

    #[test]
    fn test_overlapping_matches() {
        let mut scanner = StreamScanner::for_pattern(Pattern::from_string("aa")).unwrap();
        let ends: Vec<u64> = b"aaaa"
            .iter()
            .filter_map(|&b| match scanner.scan_byte(b) {
                ScanResult::Match(m) => Some(m.end),
                ScanResult::Continue => None,
            })
            .collect();
        assert_eq!(ends, vec![2, 3, 4]);
    }

    #[test]
    fn test_cross_chunk_match() {
        let mut scanner = StreamScanner::new(Pattern::from_string("hello"), 64).unwrap();

        assert_eq!(scanner.scan_bytes(b"say hel"), ScanResult::Continue);
        match scanner.scan_bytes(b"lo world") {
            ScanResult::Match(m) => {
                assert_eq!(m.start, 4);
                assert_eq!(m.end, 9);
                assert_eq!(m.pattern_name, "hello");
            }
            ScanResult::Continue => panic!("Expected match"),
        }
        // Scanning stopped right after the match
        assert_eq!(scanner.position(), 9);
    }

    #[test]
    fn test_no_match() {
        let mut scanner = StreamScanner::new(Pattern::from_string("bogus"), 200).unwrap();
        let data: Vec<u8> = (0..255u8).collect();
        assert_eq!(scanner.scan_bytes(&data), ScanResult::Continue);
        assert_eq!(scanner.position(), 255);
    }

    #[test]
    fn test_invalid_scanners() {
        assert_eq!(
            StreamScanner::for_pattern(Pattern::new("empty", b"")).unwrap_err(),
            RingError::EmptyPattern
        );
        assert_eq!(
            StreamScanner::new(Pattern::from_string("ABCDEFGHI"), 8).unwrap_err(),
            RingError::PatternTooLong { pattern_len: 9, capacity: 8 }
        );
        assert_eq!(
            StreamScanner::new(Pattern::from_string("abc"), 0).unwrap_err(),
            RingError::ZeroCapacity
        );
    }

    #[test]
    fn test_binary_pattern() {
        let pattern = Pattern::new("magic", &[0x00, 0xFF, 0x7F]);
        let mut scanner = StreamScanner::for_pattern(pattern).unwrap();
        let result = scanner.scan_bytes(&[0xFF, 0x00, 0x00, 0xFF, 0x7F, 0x01]);
        assert!(matches!(result, ScanResult::Match(ref m) if m.start == 2 && m.end == 5));
    }

    #[test]
    fn test_find_in_reader() {
        let data = b"header......MARKERpayload";
        let marker = Pattern::from_string("MARKER");
        let end = find_in_reader(BufReader::new(&data[..]), &marker).unwrap();
        assert_eq!(end, Some(18));

        let missing = find_in_reader(&data[..], &Pattern::from_string("absent")).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_seek_to_match() {
        let source = Cursor::new(b"junk junk START of payload".to_vec());
        let mut reader = BufReader::with_capacity(4, source);
        assert!(seek_to_match(&mut reader, &Pattern::from_string("START")).unwrap());

        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "START of payload");
    }

    #[test]
    fn test_seek_to_match_missing() {
        let mut reader = Cursor::new(b"nothing here".to_vec());
        assert!(!seek_to_match(&mut reader, &Pattern::from_string("START")).unwrap());
        assert_eq!(reader.position(), 12);
    }

    #[test]
    fn test_reader_error_propagates() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "boom"))
            }
        }

        let err = find_in_reader(Broken, &Pattern::from_string("x")).unwrap_err();
        assert!(matches!(err, ScanError::Io(_)));
        assert!(err.to_string().contains("boom"));
    }
}
