use serde::{Deserialize, Serialize};

use crate::progression::{self, LevelProgress};

/// One profile per user. `xp` is the only gamification state that is stored;
/// level and title are derived on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub xp: u64,
    pub display_name: String,
    pub favorite_food: String,
    pub bio: String,
    pub target_restaurant: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A profile with its derived progression.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub level: u32,
    pub title: &'static str,
    pub progress: LevelProgress,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        let progress = progression::progress_to_next_level(profile.xp);
        Self {
            level: progress.level,
            title: progression::title_for_xp(profile.xp),
            progress,
            profile,
        }
    }
}

/// Input for editing one's own profile. `favorite_food` is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub display_name: String,
    pub favorite_food: String,
    pub bio: String,
    pub target_restaurant: String,
}

/// Per-user statistics for the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    /// Sum of recorded spend across the user's posts.
    pub total_gold: i64,
    pub total_xp: u64,
    pub genre_distribution: std::collections::BTreeMap<String, u64>,
    pub article_likes_received: u64,
    pub review_likes_received: u64,
    pub post_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
}
