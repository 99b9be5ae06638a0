use serde::Serialize;

/// Result of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleFollow {
    pub following: bool,
}
