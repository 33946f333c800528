//! Telemetry Module
//!
//! Scan events are serialized to JSON and emitted through the `log` facade,
//! so whatever logger the host installs can collect them.

use log::{info, warn};
use serde::Serialize;

use crate::streaming::PatternMatch;

/// Scan event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanEventType {
    /// The newest window bytes equal the pattern
    PatternMatched,
    /// End of stream reached without a match
    StreamExhausted,
}

/// Scan event for logging
#[derive(Debug, Clone, Serialize)]
pub struct ScanEvent {
    /// Event type
    pub event_type: ScanEventType,
    /// Pattern name
    pub pattern: String,
    /// Total bytes scanned when the event fired
    pub position: u64,
    /// Stream offset of the first matched byte
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_start: Option<u64>,
    /// Window capacity in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl ScanEvent {
    /// Create a new scan event
    pub fn new(event_type: ScanEventType, pattern: &str, position: u64) -> Self {
        Self {
            event_type,
            pattern: pattern.to_string(),
            position,
            match_start: None,
            capacity: None,
        }
    }

    /// Set match start offset
    pub fn with_match_start(mut self, start: u64) -> Self {
        self.match_start = Some(start);
        self
    }

    /// Set window capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Log the event
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => info!("[BYTERING] {}", json),
            Err(e) => warn!("Failed to serialize scan event: {}", e),
        }
    }
}

/// Create a pattern matched event
pub fn event_matched(found: &PatternMatch, capacity: usize) -> ScanEvent {
    ScanEvent::new(ScanEventType::PatternMatched, &found.pattern_name, found.end)
        .with_match_start(found.start)
        .with_capacity(capacity)
}

/// Create a stream exhausted event
pub fn event_exhausted(pattern: &str, position: u64) -> ScanEvent {
    ScanEvent::new(ScanEventType::StreamExhausted, pattern, position)
}
