//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs:
//!
//! ```json
//! {"streams": {"characters": {"cursor": "2014-04-29T14:18:17-0400"}}}
//! ```

use crate::stream::parse_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete state for the connector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream state
    #[serde(default)]
    pub streams: BTreeMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.streams.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.streams.entry(stream.to_string()).or_default()
    }

    /// Get cursor for a stream
    pub fn get_cursor(&self, stream: &str) -> Option<&str> {
        self.streams.get(stream)?.cursor.as_deref()
    }

    /// Set cursor for a stream unconditionally
    pub fn set_cursor(&mut self, stream: &str, cursor: String) {
        self.get_stream_mut(stream).cursor = Some(cursor);
    }

    /// Move a stream's cursor forward, returning whether it moved
    pub fn advance_cursor(&mut self, stream: &str, candidate: &str) -> bool {
        if !cursor_is_newer(self.get_cursor(stream), candidate) {
            return false;
        }
        self.set_cursor(stream, candidate.to_string());
        true
    }
}

/// State for a single stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamState {
    /// Highest `modified` value seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Whether `candidate` should replace `stored`
///
/// The candidate must parse as a timestamp. It wins when nothing usable is
/// stored, or when it is strictly later than the stored value.
pub fn cursor_is_newer(stored: Option<&str>, candidate: &str) -> bool {
    let Some(candidate) = parse_timestamp(candidate) else {
        return false;
    };
    match stored.and_then(parse_timestamp) {
        Some(stored) => candidate > stored,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_state_default() {
        let state = State::new();
        assert!(state.streams.is_empty());
    }

    #[test]
    fn test_state_cursor() {
        let mut state = State::new();
        assert!(state.get_cursor("characters").is_none());

        state.set_cursor("characters", "2024-01-01T00:00:00Z".to_string());
        assert_eq!(state.get_cursor("characters"), Some("2024-01-01T00:00:00Z"));
    }

    #[test_case(None, "2020-01-01T00:00:00Z", true ; "nothing stored")]
    #[test_case(Some("2020-01-01T00:00:00Z"), "2021-01-01T00:00:00Z", true ; "later")]
    #[test_case(Some("2021-01-01T00:00:00Z"), "2020-01-01T00:00:00Z", false ; "earlier")]
    #[test_case(Some("2020-01-01T00:00:00Z"), "2020-01-01T00:00:00Z", false ; "equal")]
    #[test_case(Some("2020-01-01T00:00:00-0500"), "2020-01-01T04:00:00Z", false ; "earlier across offsets")]
    #[test_case(Some("garbage"), "2020-01-01T00:00:00Z", true ; "stored unparseable")]
    #[test_case(Some("2020-01-01T00:00:00Z"), "garbage", false ; "candidate unparseable")]
    fn test_cursor_is_newer(stored: Option<&str>, candidate: &str, expected: bool) {
        assert_eq!(cursor_is_newer(stored, candidate), expected);
    }

    #[test]
    fn test_advance_cursor_is_monotonic() {
        let mut state = State::new();
        assert!(state.advance_cursor("comics", "2020-01-01T00:00:00Z"));
        assert!(!state.advance_cursor("comics", "2019-01-01T00:00:00Z"));
        assert!(state.advance_cursor("comics", "2020-06-01T00:00:00Z"));
        assert_eq!(state.get_cursor("comics"), Some("2020-06-01T00:00:00Z"));
    }

    #[test]
    fn test_state_serialization() {
        let mut state = State::new();
        state.set_cursor("characters", "2014-04-29T14:18:17-0400".to_string());
        state.get_stream_mut("comics");

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "streams": {
                    "characters": {"cursor": "2014-04-29T14:18:17-0400"},
                    "comics": {}
                }
            })
        );

        let restored: State = serde_json::from_value(json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_state_deserialize_empty() {
        let state: State = serde_json::from_str("{}").unwrap();
        assert!(state.streams.is_empty());
    }
}
