use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two independent like categories.
///
/// `Article` rewards the post as a whole (photo, ambience), `Review` rewards
/// the written review. Each feeds its own leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeKind {
    Article,
    Review,
}

impl LikeKind {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeKind::Article => "article",
            LikeKind::Review => "review",
        }
    }
}

impl fmt::Display for LikeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LikeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(LikeKind::Article),
            "review" => Ok(LikeKind::Review),
            other => Err(format!("unknown like kind: {:?}, expected 'article' or 'review'", other)),
        }
    }
}

/// A stored like. At most one exists per (post, user, kind).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeEvent {
    /// Store-assigned insertion sequence.
    pub seq: i64,
    pub post_id: String,
    pub user_id: String,
    pub kind: LikeKind,
    pub created_at: String,
}

/// Like totals for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LikeCounts {
    pub article: u64,
    pub review: u64,
}

impl LikeCounts {
    pub fn bump(&mut self, kind: LikeKind) {
        match kind {
            LikeKind::Article => self.article += 1,
            LikeKind::Review => self.review += 1,
        }
    }
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleLike {
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for kind in [LikeKind::Article, LikeKind::Review] {
            assert_eq!(kind.to_string().parse::<LikeKind>().unwrap(), kind);
        }
        assert!("photo".parse::<LikeKind>().is_err());
        assert_eq!(serde_json::to_string(&LikeKind::Review).unwrap(), "\"review\"");
    }

    #[test]
    fn test_counts_bump() {
        let mut counts = LikeCounts::default();
        counts.bump(LikeKind::Article);
        counts.bump(LikeKind::Article);
        counts.bump(LikeKind::Review);
        assert_eq!(counts, LikeCounts { article: 2, review: 1 });
    }
}
