//! High speed circular byte buffer for scanning streams for a byte sequence
//!
//! A single fixed-size buffer holds the most recent bytes of a stream.
//! `push` and `compare` never allocate, so the window can sit in the
//! innermost loop of a reader.
//!
//! General usage:
//! 1. Create a [`ByteRing`] large enough to hold the bytes you are looking for.
//! 2. Push bytes (from a buffered source!) until `compare` finds them.
//! 3. Rewind your source by the pattern length, if appropriate.
//!
//! [`StreamScanner`], [`find_in_reader`] and [`seek_to_match`] package
//! those steps.

pub mod config;
pub mod streaming;
pub mod telemetry;

pub use config::{ConfigError, ScannerConfig};
pub use streaming::{
    find_in_reader, seek_to_match, ByteRing, Pattern, PatternMatch, RingError, RingState,
    ScanError, ScanResult, StreamScanner,
};
