use serde::Serialize;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    /// 1-based position.
    pub rank: usize,
    pub post_id: String,
    pub count: u64,
    pub restaurant_name: String,
    pub genre: String,
    pub image_url: Option<String>,
    /// Review leaderboard only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dishes: Option<String>,
    /// Review leaderboard only: first 80 characters plus "...".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_preview: Option<String>,
}
