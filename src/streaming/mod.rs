//! Streaming module for allocation-free substring detection
//!
//! This module provides streaming primitives that:
//! - Use fixed memory allocation (circular byte window)
//! - Never re-scan bytes already seen
//! - Compare patterns directly against wrapped storage

pub mod byte_ring;
pub mod stream_scanner;

pub use byte_ring::{ByteRing, RingError, RingState};
pub use stream_scanner::{
    find_in_reader, seek_to_match, Pattern, PatternMatch, ScanError, ScanResult, StreamScanner,
};
