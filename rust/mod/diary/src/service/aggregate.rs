use std::cmp::Reverse;
use std::collections::HashMap;

use crate::model::{LikeCounts, LikeKind, Post, ProfileStats, RankEntry};
use crate::service::{DiaryService, Filter, degrade};

/// Characters of review text shown on the review leaderboard.
const REVIEW_PREVIEW_CHARS: usize = 80;

fn review_preview(content: &str) -> String {
    let head: String = content.chars().take(REVIEW_PREVIEW_CHARS).collect();
    format!("{}...", head)
}

impl DiaryService {
    /// Like totals for one post.
    pub fn count_likes(&self, post_id: &str) -> LikeCounts {
        let rows = degrade(
            self.select_rows("likes", "kind", &[Filter::eq("post_id", post_id)], None, None),
            "like count",
        );
        let mut counts = LikeCounts::default();
        for kind in rows.iter().filter_map(|r| r.get_str("kind")?.parse::<LikeKind>().ok()) {
            counts.bump(kind);
        }
        counts
    }

    /// Like totals for many posts in a single query. Every requested id is
    /// present in the result, zero if it has no likes.
    pub fn count_likes_for_posts(&self, post_ids: &[String]) -> HashMap<String, LikeCounts> {
        let mut counts: HashMap<String, LikeCounts> = post_ids
            .iter()
            .map(|id| (id.clone(), LikeCounts::default()))
            .collect();
        if post_ids.is_empty() {
            return counts;
        }

        let rows = degrade(
            self.select_rows(
                "likes",
                "post_id, kind",
                &[Filter::any_of("post_id", post_ids.iter().map(String::as_str))],
                None,
                None,
            ),
            "batched like count",
        );
        for row in &rows {
            let (Some(post_id), Some(kind)) = (row.get_str("post_id"), row.get_str("kind")) else {
                continue;
            };
            if let (Some(c), Ok(kind)) = (counts.get_mut(post_id), kind.parse::<LikeKind>()) {
                c.bump(kind);
            }
        }
        counts
    }

    /// Leaderboard of posts by likes of `kind`.
    ///
    /// Likes are tallied first, then the ranked posts are fetched in one
    /// query and merged in. Ties go to the post that was liked first.
    pub fn rank_posts(&self, kind: LikeKind, limit: usize) -> Vec<RankEntry> {
        let likes = degrade(
            self.select_rows("likes", "seq, post_id", &[Filter::eq("kind", kind.as_str())], None, None),
            "ranking tally",
        );

        // post_id -> (count, earliest seq)
        let mut tally: HashMap<&str, (u64, i64)> = HashMap::new();
        for row in &likes {
            let (Some(post_id), Some(seq)) = (row.get_str("post_id"), row.get_i64("seq")) else {
                continue;
            };
            let entry = tally.entry(post_id).or_insert((0, seq));
            entry.0 += 1;
            entry.1 = entry.1.min(seq);
        }

        let mut ranked: Vec<(&str, u64, i64)> = tally
            .into_iter()
            .map(|(id, (count, first))| (id, count, first))
            .collect();
        ranked.sort_by_key(|&(id, count, first)| (Reverse(count), first, id));
        ranked.truncate(limit);
        if ranked.is_empty() {
            return Vec::new();
        }

        let posts: Vec<Post> = degrade(
            self.list_records(
                "posts",
                &[Filter::any_of("id", ranked.iter().map(|(id, _, _)| *id))],
                None,
                None,
            ),
            "ranking posts",
        );
        let posts: HashMap<&str, &Post> = posts.iter().map(|p| (p.id.as_str(), p)).collect();

        ranked
            .iter()
            .enumerate()
            .map(|(i, &(post_id, count, _))| {
                let post = posts.get(post_id);
                // Review entries always carry both fields, empty when the post is gone.
                let (dishes, preview) = match kind {
                    LikeKind::Review => (
                        Some(post.map(|p| p.dishes.clone()).unwrap_or_default()),
                        Some(review_preview(post.map(|p| p.review_content.as_str()).unwrap_or(""))),
                    ),
                    LikeKind::Article => (None, None),
                };
                RankEntry {
                    rank: i + 1,
                    post_id: post_id.to_string(),
                    count,
                    restaurant_name: post.map(|p| p.restaurant_name.clone()).unwrap_or_default(),
                    genre: post.map(|p| p.genre.clone()).unwrap_or_default(),
                    image_url: post.and_then(|p| p.image_url.clone()),
                    dishes,
                    review_preview: preview,
                }
            })
            .collect()
    }

    /// Statistics for a user's profile page. Each figure degrades to zero
    /// independently.
    pub fn profile_stats(&self, user_id: &str) -> ProfileStats {
        let mut stats = ProfileStats::default();

        let profile = degrade(
            self.select_rows("profiles", "xp", &[Filter::eq("id", user_id)], None, None),
            "profile xp",
        );
        stats.total_xp = profile
            .first()
            .and_then(|r| r.get_i64("xp"))
            .unwrap_or(0)
            .max(0) as u64;

        let posts = degrade(
            self.select_rows(
                "posts",
                "id, genre, amount_numeric",
                &[Filter::eq("user_id", user_id)],
                None,
                None,
            ),
            "profile posts",
        );
        let mut post_ids = Vec::with_capacity(posts.len());
        for row in &posts {
            if let Some(id) = row.get_str("id") {
                post_ids.push(id.to_string());
            }
            if let Some(genre) = row.get_str("genre") {
                *stats.genre_distribution.entry(genre.to_string()).or_insert(0) += 1;
            }
            let spent = row.get_i64("amount_numeric").unwrap_or(0).max(0);
            stats.total_gold = stats.total_gold.saturating_add(spent);
        }
        stats.post_count = posts.len() as u64;

        for counts in self.count_likes_for_posts(&post_ids).values() {
            stats.article_likes_received += counts.article;
            stats.review_likes_received += counts.review;
        }

        stats.follower_count = degrade(
            self.count_rows("follows", &[Filter::eq("following_id", user_id)]),
            "follower count",
        );
        stats.following_count = degrade(
            self.count_rows("follows", &[Filter::eq("follower_id", user_id)]),
            "following count",
        );
        stats
    }
}
