//! Request history tracking for debugging and diagnostics.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Direction of a recorded exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    Request,
    Response,
}

/// A recorded request or response.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub msg_type: MessageType,
    pub method: String,
    pub address: String,
    pub body: Option<Value>,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Tracks the most recent exchanges with a bridge.
#[derive(Debug, Clone)]
pub struct RequestHistory {
    last_error: Option<String>,
    start_time: Instant,
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl Default for RequestHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            last_error: None,
            start_time: Instant::now(),
            entries: Vec::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    pub fn record(&mut self, msg_type: MessageType, method: &str, address: &str, body: Option<&Value>) {
        self.entries.push(HistoryEntry {
            msg_type,
            method: method.to_string(),
            address: address.to_string(),
            body: body.cloned(),
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Requests recorded with the given HTTP method, oldest first.
    pub fn requests<'a>(&'a self, method: &'a str) -> impl Iterator<Item = &'a HistoryEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.msg_type == MessageType::Request && e.method == method)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_error = None;
    }

    pub fn summary(&self) -> HistorySummary {
        let count = |t: MessageType| self.entries.iter().filter(|e| e.msg_type == t).count();
        HistorySummary {
            request_count: count(MessageType::Request),
            response_count: count(MessageType::Response),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Summary of request history for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub request_count: usize,
    pub response_count: usize,
    pub total_entries: usize,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_message() {
        let mut history = RequestHistory::new();
        history.record(
            MessageType::Request,
            "PUT",
            "/api/user/lights/1/state",
            Some(&json!({"on": true})),
        );

        assert_eq!(history.len(), 1);
        assert_eq!(history.requests("PUT").count(), 1);
        assert_eq!(history.requests("GET").count(), 0);
    }

    #[test]
    fn test_record_error() {
        let mut history = RequestHistory::new();
        history.record_error("Connection timeout");
        assert_eq!(history.last_error(), Some("Connection timeout"));
        history.clear();
        assert!(history.last_error().is_none());
    }

    #[test]
    fn test_max_entries() {
        let mut history = RequestHistory::with_max_entries(2);
        for i in 0..5 {
            history.record(MessageType::Request, "GET", &format!("/api/{}", i), None);
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].address, "/api/3");
    }

    #[test]
    fn test_summary() {
        let mut history = RequestHistory::new();
        history.record(MessageType::Request, "GET", "/api/user", None);
        history.record(MessageType::Response, "GET", "/api/user", Some(&json!({})));
        let summary = history.summary();
        assert_eq!(summary.request_count, 1);
        assert_eq!(summary.response_count, 1);
        assert_eq!(summary.total_entries, 2);
    }
}
