use foodlog_core::now_rfc3339;
use foodlog_sql::Row;

use crate::model::{LikeEvent, LikeKind, ToggleFollow, ToggleLike};
use crate::progression::XP_PER_LIKE;
use crate::service::{DiaryError, DiaryService, Filter, degrade};

fn like_from_row(row: &Row) -> Option<LikeEvent> {
    Some(LikeEvent {
        seq: row.get_i64("seq")?,
        post_id: row.get_str("post_id")?.to_string(),
        user_id: row.get_str("user_id")?.to_string(),
        kind: row.get_str("kind")?.parse().ok()?,
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
    })
}

impl DiaryService {
    /// Like or unlike a post.
    ///
    /// Unliking never takes back the XP the like earned. A like on one's own
    /// post is stored but earns nothing.
    pub fn toggle_like(
        &self,
        actor: Option<&str>,
        post_id: &str,
        kind: LikeKind,
    ) -> Result<ToggleLike, DiaryError> {
        let user_id = actor.ok_or(DiaryError::AuthRequired)?;

        let key = [
            Filter::eq("post_id", post_id),
            Filter::eq("user_id", user_id),
            Filter::eq("kind", kind.as_str()),
        ];
        if self.delete_rows("likes", &key)? > 0 {
            tracing::info!("{} removed {} like on {}", user_id, kind, post_id);
            return Ok(ToggleLike { liked: false });
        }

        let owner = self.post_owner(post_id)?;
        let inserted = self.insert_row(
            "likes",
            &[
                ("post_id", post_id.into()),
                ("user_id", user_id.into()),
                ("kind", kind.as_str().into()),
                ("created_at", now_rfc3339().into()),
            ],
        )?;
        if !inserted {
            // A concurrent toggle got there first and already paid out.
            tracing::debug!("{} like on {} by {} already present", kind, post_id, user_id);
            return Ok(ToggleLike { liked: true });
        }
        tracing::info!("{} added {} like on {}", user_id, kind, post_id);

        if owner != user_id {
            // The like is recorded either way.
            if let Err(e) = self.award_xp(&owner, XP_PER_LIKE) {
                tracing::error!("failed to award like xp to {}: {}", owner, e);
            }
        }
        Ok(ToggleLike { liked: true })
    }

    /// Follow or unfollow another user.
    pub fn toggle_follow(&self, actor: Option<&str>, followee_id: &str) -> Result<ToggleFollow, DiaryError> {
        let follower_id = actor.ok_or(DiaryError::AuthRequired)?;
        if follower_id == followee_id {
            return Err(DiaryError::SelfFollow);
        }

        let key = [
            Filter::eq("follower_id", follower_id),
            Filter::eq("following_id", followee_id),
        ];
        if self.delete_rows("follows", &key)? > 0 {
            tracing::info!("{} unfollowed {}", follower_id, followee_id);
            return Ok(ToggleFollow { following: false });
        }

        let inserted = self.insert_row(
            "follows",
            &[
                ("follower_id", follower_id.into()),
                ("following_id", followee_id.into()),
                ("created_at", now_rfc3339().into()),
            ],
        )?;
        if inserted {
            tracing::info!("{} followed {}", follower_id, followee_id);
        }
        Ok(ToggleFollow { following: true })
    }

    /// Whether `follower_id` follows `followee_id`. False when the store
    /// cannot answer.
    pub fn is_following(&self, follower_id: &str, followee_id: &str) -> bool {
        let count = self.count_rows(
            "follows",
            &[
                Filter::eq("follower_id", follower_id),
                Filter::eq("following_id", followee_id),
            ],
        );
        degrade(count, "follow lookup") > 0
    }

    /// Every like on a post, oldest first.
    pub fn post_likes(&self, post_id: &str) -> Result<Vec<LikeEvent>, DiaryError> {
        let rows = self.select_rows(
            "likes",
            "seq, post_id, user_id, kind, created_at",
            &[Filter::eq("post_id", post_id)],
            Some("seq"),
            None,
        )?;
        Ok(rows.iter().filter_map(like_from_row).collect())
    }

    fn post_owner(&self, post_id: &str) -> Result<String, DiaryError> {
        let rows = self.select_rows("posts", "user_id", &[Filter::eq("id", post_id)], None, None)?;
        rows.first()
            .and_then(|r| r.get_str("user_id"))
            .map(str::to_string)
            .ok_or_else(|| DiaryError::NotFound(format!("posts/{}", post_id)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use foodlog_sql::{SQLStore, SqliteStore};

    use crate::model::LikeKind;
    use crate::service::testing::{RacingLikes, post_form, service_over, test_service};
    use crate::service::{DiaryError, Filter};

    fn xp(svc: &crate::service::DiaryService, user: &str) -> u64 {
        svc.get_profile(user).map(|p| p.profile.xp).unwrap_or(0)
    }

    fn stored_likes(svc: &crate::service::DiaryService, post_id: &str) -> u64 {
        svc.count_rows("likes", &[Filter::eq("post_id", post_id)]).unwrap()
    }

    #[test]
    fn test_like_toggle_twice_restores_state() {
        let (svc, _dir) = test_service();
        let post = svc.create_post(Some("owner"), post_form("トラットリア", "イタリアン")).unwrap();

        assert!(svc.toggle_like(Some("fan"), &post.id, LikeKind::Article).unwrap().liked);
        assert!(!svc.toggle_like(Some("fan"), &post.id, LikeKind::Article).unwrap().liked);
        assert_eq!(stored_likes(&svc, &post.id), 0);

        assert!(svc.toggle_like(Some("fan"), &post.id, LikeKind::Article).unwrap().liked);
        assert_eq!(stored_likes(&svc, &post.id), 1);
    }

    #[test]
    fn test_like_lost_to_concurrent_insert() {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let (svc, _dir) = service_over(Arc::new(RacingLikes(sql)));
        let post = svc.create_post(Some("owner"), post_form("焼肉屋", "焼肉")).unwrap();

        // The other insert wins; this toggle reports the like and pays nothing.
        assert!(svc.toggle_like(Some("fan"), &post.id, LikeKind::Article).unwrap().liked);
        assert_eq!(stored_likes(&svc, &post.id), 1);
        assert_eq!(xp(&svc, "owner"), 100);

        assert!(!svc.toggle_like(Some("fan"), &post.id, LikeKind::Article).unwrap().liked);
        assert_eq!(stored_likes(&svc, &post.id), 0);
    }

    #[test]
    fn test_like_kinds_are_independent() {
        let (svc, _dir) = test_service();
        let post = svc.create_post(Some("owner"), post_form("鮨処", "和食")).unwrap();

        svc.toggle_like(Some("fan"), &post.id, LikeKind::Article).unwrap();
        svc.toggle_like(Some("fan"), &post.id, LikeKind::Review).unwrap();
        let counts = svc.count_likes(&post.id);
        assert_eq!((counts.article, counts.review), (1, 1));
    }

    #[test]
    fn test_like_xp_is_not_reversed() {
        let (svc, _dir) = test_service();
        let post = svc.create_post(Some("owner"), post_form("ラーメン屋", "ラーメン")).unwrap();
        assert_eq!(xp(&svc, "owner"), 100);

        svc.toggle_like(Some("fan"), &post.id, LikeKind::Review).unwrap();
        assert_eq!(xp(&svc, "owner"), 120);

        svc.toggle_like(Some("fan"), &post.id, LikeKind::Review).unwrap();
        assert_eq!(xp(&svc, "owner"), 120);

        // Liking again pays out again.
        svc.toggle_like(Some("fan"), &post.id, LikeKind::Review).unwrap();
        assert_eq!(xp(&svc, "owner"), 140);
        assert_eq!(xp(&svc, "fan"), 0);
    }

    #[test]
    fn test_self_like_earns_nothing() {
        let (svc, _dir) = test_service();
        let post = svc.create_post(Some("owner"), post_form("カフェ", "カフェ")).unwrap();

        assert!(svc.toggle_like(Some("owner"), &post.id, LikeKind::Article).unwrap().liked);
        assert_eq!(xp(&svc, "owner"), 100);
        assert_eq!(svc.count_likes(&post.id).article, 1);
    }

    #[test]
    fn test_like_requires_login_and_post() {
        let (svc, _dir) = test_service();
        assert!(matches!(
            svc.toggle_like(None, "p1", LikeKind::Article),
            Err(DiaryError::AuthRequired)
        ));
        assert!(matches!(
            svc.toggle_like(Some("fan"), "missing", LikeKind::Article),
            Err(DiaryError::NotFound(_))
        ));
        assert_eq!(stored_likes(&svc, "missing"), 0);
    }

    #[test]
    fn test_post_likes_in_insertion_order() {
        let (svc, _dir) = test_service();
        let post = svc.create_post(Some("owner"), post_form("食堂", "定食")).unwrap();
        svc.toggle_like(Some("b"), &post.id, LikeKind::Review).unwrap();
        svc.toggle_like(Some("a"), &post.id, LikeKind::Article).unwrap();

        let likes = svc.post_likes(&post.id).unwrap();
        let seen: Vec<(&str, LikeKind)> = likes.iter().map(|l| (l.user_id.as_str(), l.kind)).collect();
        assert_eq!(seen, vec![("b", LikeKind::Review), ("a", LikeKind::Article)]);
        assert!(likes[0].seq < likes[1].seq);
        assert!(svc.post_likes("missing").unwrap().is_empty());
    }

    #[test]
    fn test_follow_toggle() {
        let (svc, _dir) = test_service();
        assert!(!svc.is_following("a", "b"));

        assert!(svc.toggle_follow(Some("a"), "b").unwrap().following);
        assert!(svc.is_following("a", "b"));
        assert!(!svc.is_following("b", "a"));

        assert!(!svc.toggle_follow(Some("a"), "b").unwrap().following);
        assert!(!svc.is_following("a", "b"));
    }

    #[test]
    fn test_follow_earns_no_xp() {
        let (svc, _dir) = test_service();
        svc.toggle_follow(Some("a"), "b").unwrap();
        assert_eq!(xp(&svc, "a"), 0);
        assert_eq!(xp(&svc, "b"), 0);
    }

    #[test]
    fn test_self_follow_rejected() {
        let (svc, _dir) = test_service();
        assert!(matches!(svc.toggle_follow(Some("a"), "a"), Err(DiaryError::SelfFollow)));
        assert!(!svc.is_following("a", "a"));
        assert_eq!(svc.count_rows("follows", &[]).unwrap(), 0);
    }

    #[test]
    fn test_follow_requires_login() {
        let (svc, _dir) = test_service();
        assert!(matches!(svc.toggle_follow(None, "b"), Err(DiaryError::AuthRequired)));
    }
}
