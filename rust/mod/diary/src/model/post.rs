use serde::{Deserialize, Serialize};

use super::{LikeCounts, ProfileView};

/// A recorded restaurant visit. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owner.
    pub user_id: String,

    pub restaurant_name: String,
    pub genre: String,
    #[serde(default)]
    pub closed_days: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub address: String,

    /// Public URL of the uploaded photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub visit_date: String,
    #[serde(default)]
    pub companions: String,

    /// Spend as the user wrote it, e.g. "¥3,000".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// Spend as a number; summed into the owner's gold total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_numeric: Option<i64>,

    #[serde(default)]
    pub dishes: String,
    #[serde(default)]
    pub review_content: String,

    /// Ratings, each an integer in 1..=5.
    pub taste_rating: u8,
    pub price_rating: u8,
    pub atmosphere_rating: u8,
    pub overall_rating: u8,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Input for creating a post.
///
/// Ratings arrive as plain JSON numbers; anything that is not a whole number
/// in 1..=5 is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub restaurant_name: String,
    pub genre: String,
    pub closed_days: String,
    pub hours: String,
    pub address: String,
    pub image_url: Option<String>,
    pub visit_date: String,
    pub companions: String,
    pub amount: Option<String>,
    pub amount_numeric: Option<i64>,
    pub dishes: String,
    pub review_content: String,
    pub taste_rating: f64,
    pub price_rating: f64,
    pub atmosphere_rating: f64,
    pub overall_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedPost {
    pub id: String,
}

/// Which posts a feed shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PostFilter {
    #[default]
    All,
    /// Everyone else's posts (the "discover" feed).
    ExcludeUser(String),
    /// One user's posts.
    ForUser(String),
}

/// A post annotated with its like counts, for feeds.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    #[serde(flatten)]
    pub post: Post,
    pub article_likes_count: u64,
    pub review_likes_count: u64,
}

impl PostSummary {
    pub fn new(post: Post, counts: LikeCounts) -> Self {
        Self {
            post,
            article_likes_count: counts.article,
            review_likes_count: counts.review,
        }
    }
}

/// A single post as shown on its own page.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub article_likes_count: u64,
    pub review_likes_count: u64,
    /// Whether the viewer has article-liked this post. False when anonymous.
    pub user_article_liked: bool,
    /// Whether the viewer has review-liked this post. False when anonymous.
    pub user_review_liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<ProfileView>,
}
