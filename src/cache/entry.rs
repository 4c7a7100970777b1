//! Cache Entry Module
//!
//! Defines the stored representation of an upstream response.

use bytes::Bytes;
use chrono::{DateTime, Utc};

// == Cached Response ==
/// A stored copy of an upstream response, keyed in a store by request URL.
///
/// Entries are overwritten wholesale on every store write; they are never
/// merged, and insertion order is irrelevant. Clones are cheap: the body is
/// reference-counted `Bytes`, so the stored copy and the copy returned to
/// the caller share one buffer.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// HTTP status code of the upstream response
    pub status: u16,
    /// Response headers as received from upstream
    pub headers: Vec<(String, String)>,
    /// Full response body
    pub body: Bytes,
    /// When this copy was written to a store
    pub stored_at: DateTime<Utc>,
}

impl CachedResponse {
    // == Constructor ==
    /// Creates a new cached response stamped with the current time.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            stored_at: Utc::now(),
        }
    }

    /// Age of this stored copy in seconds.
    ///
    /// Clock skew can make the difference negative; clamp to zero so the
    /// age is always displayable.
    pub fn age_seconds(&self) -> i64 {
        (Utc::now() - self.stored_at).num_seconds().max(0)
    }

    /// True when the upstream response carried a success status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the first header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
