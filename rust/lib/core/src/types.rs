use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Upper bound for a single page, whatever the caller asks for.
pub const MAX_PAGE_SIZE: usize = 200;

/// Parameters for list/query operations.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Maximum number of results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl ListParams {
    /// The requested limit, capped at [`MAX_PAGE_SIZE`].
    pub fn page_size(&self) -> usize {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T: Serialize> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Current time as an RFC 3339 string with fixed microsecond precision.
///
/// The fixed width keeps timestamps lexicographically ordered, so
/// `ORDER BY created_at` on a TEXT column is chronological.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
