use foodlog_core::{ListParams, ListResult, new_id, now_rfc3339};

use crate::model::{CreatedPost, LikeCounts, LikeKind, Post, PostFilter, PostForm, PostSummary, PostView};
use crate::progression::XP_PER_POST;
use crate::service::{DiaryError, DiaryService, Filter, degrade};

/// Accept a rating only if it is a whole number from 1 to 5.
fn rating(field: &str, value: f64) -> Result<u8, DiaryError> {
    if value.fract() == 0.0 && (1.0..=5.0).contains(&value) {
        Ok(value as u8)
    } else {
        Err(DiaryError::Validation(format!(
            "{} must be a whole number from 1 to 5, got {}",
            field, value
        )))
    }
}

fn required(field: &str, value: &str) -> Result<String, DiaryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DiaryError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

impl DiaryService {
    /// Record a restaurant visit for the actor and award post XP.
    pub fn create_post(&self, actor: Option<&str>, form: PostForm) -> Result<CreatedPost, DiaryError> {
        let user_id = actor.ok_or(DiaryError::AuthRequired)?;

        let restaurant_name = required("restaurant_name", &form.restaurant_name)?;
        let genre = required("genre", &form.genre)?;
        if form.amount_numeric.is_some_and(|n| n < 0) {
            return Err(DiaryError::Validation("amount_numeric cannot be negative".into()));
        }

        let post = Post {
            id: new_id(),
            user_id: user_id.to_string(),
            restaurant_name,
            genre,
            closed_days: form.closed_days,
            hours: form.hours,
            address: form.address,
            image_url: form.image_url.filter(|u| !u.is_empty()),
            visit_date: form.visit_date,
            companions: form.companions,
            amount: form.amount,
            amount_numeric: form.amount_numeric,
            dishes: form.dishes,
            review_content: form.review_content,
            taste_rating: rating("taste_rating", form.taste_rating)?,
            price_rating: rating("price_rating", form.price_rating)?,
            atmosphere_rating: rating("atmosphere_rating", form.atmosphere_rating)?,
            overall_rating: rating("overall_rating", form.overall_rating)?,
            created_at: now_rfc3339(),
        };

        self.insert_record(
            "posts",
            &post.id,
            &post,
            &[
                ("user_id", post.user_id.clone().into()),
                ("genre", post.genre.clone().into()),
                ("amount_numeric", post.amount_numeric.into()),
                ("created_at", post.created_at.clone().into()),
            ],
        )?;
        tracing::info!("{} posted {} ({})", user_id, post.id, post.restaurant_name);

        // The post stands even if the award fails.
        if let Err(e) = self.award_xp(user_id, XP_PER_POST) {
            tracing::error!("failed to award post xp to {}: {}", user_id, e);
        }

        Ok(CreatedPost { id: post.id })
    }

    /// A single post with its like counts, the viewer's own likes and the
    /// author's profile.
    pub fn get_post_view(&self, post_id: &str, viewer: Option<&str>) -> Result<PostView, DiaryError> {
        let post: Post = self.get_record("posts", post_id)?;

        let likes = degrade(self.post_likes(post_id), "post likes");
        let mut counts = LikeCounts::default();
        for like in &likes {
            counts.bump(like.kind);
        }
        let viewer_liked = |kind: LikeKind| {
            viewer.is_some_and(|v| likes.iter().any(|l| l.kind == kind && l.user_id == v))
        };

        Ok(PostView {
            article_likes_count: counts.article,
            review_likes_count: counts.review,
            user_article_liked: viewer_liked(LikeKind::Article),
            user_review_liked: viewer_liked(LikeKind::Review),
            author: self.get_profile(&post.user_id).ok(),
            post,
        })
    }

    /// A page of posts, newest first, each with its like counts.
    pub fn list_posts(&self, filter: PostFilter, params: &ListParams) -> ListResult<PostSummary> {
        let filters = match &filter {
            PostFilter::All => vec![],
            PostFilter::ExcludeUser(id) => vec![Filter::ne("user_id", id.as_str())],
            PostFilter::ForUser(id) => vec![Filter::eq("user_id", id.as_str())],
        };

        let posts: Vec<Post> = degrade(
            self.list_records(
                "posts",
                &filters,
                Some("created_at DESC, rowid DESC"),
                Some((params.page_size(), params.offset)),
            ),
            "post feed",
        );
        let total = degrade(self.count_rows("posts", &filters), "post feed count") as usize;

        let ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
        let mut counts = self.count_likes_for_posts(&ids);
        let items = posts
            .into_iter()
            .map(|post| {
                let c = counts.remove(&post.id).unwrap_or_default();
                PostSummary::new(post, c)
            })
            .collect();

        ListResult { items, total }
    }
}
