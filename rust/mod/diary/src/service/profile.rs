use foodlog_core::now_rfc3339;
use foodlog_sql::Row;

use crate::model::{Profile, ProfileForm, ProfileView};
use crate::progression::apply_xp_delta;
use crate::service::{DiaryError, DiaryService, Filter};

/// How many times an XP update is retried after losing a race.
const XP_UPDATE_ATTEMPTS: usize = 16;

const PROFILE_COLUMNS: &str =
    "id, xp, display_name, favorite_food, bio, target_restaurant, created_at, updated_at";

fn profile_from_row(row: &Row) -> Profile {
    let text = |col: &str| row.get_str(col).unwrap_or_default().to_string();
    Profile {
        id: text("id"),
        xp: row.get_i64("xp").unwrap_or(0).max(0) as u64,
        display_name: text("display_name"),
        favorite_food: text("favorite_food"),
        bio: text("bio"),
        target_restaurant: text("target_restaurant"),
        created_at: text("created_at"),
        updated_at: text("updated_at"),
    }
}

/// XP is stored in a signed column.
fn stored_xp(xp: u64) -> i64 {
    i64::try_from(xp).unwrap_or(i64::MAX)
}

impl DiaryService {
    /// Get a profile with its derived level, title and progress.
    pub fn get_profile(&self, user_id: &str) -> Result<ProfileView, DiaryError> {
        let rows = self.select_rows("profiles", PROFILE_COLUMNS, &[Filter::eq("id", user_id)], None, None)?;
        let row = rows
            .first()
            .ok_or_else(|| DiaryError::NotFound(format!("profiles/{}", user_id)))?;
        Ok(profile_from_row(row).into())
    }

    /// Create an empty profile for `user_id` unless one exists, then return it.
    pub fn ensure_profile(&self, user_id: &str) -> Result<ProfileView, DiaryError> {
        let now = now_rfc3339();
        let created = self.insert_row(
            "profiles",
            &[
                ("id", user_id.into()),
                ("xp", 0i64.into()),
                ("created_at", now.clone().into()),
                ("updated_at", now.into()),
            ],
        )?;
        if created {
            tracing::info!("created profile {}", user_id);
        }
        self.get_profile(user_id)
    }

    /// Edit the actor's own profile. Text fields are trimmed and
    /// `favorite_food` must not be blank.
    pub fn update_profile(&self, actor: Option<&str>, form: ProfileForm) -> Result<ProfileView, DiaryError> {
        let user_id = actor.ok_or(DiaryError::AuthRequired)?;

        let favorite_food = form.favorite_food.trim();
        if favorite_food.is_empty() {
            return Err(DiaryError::Validation("favorite_food is required".into()));
        }

        self.ensure_profile(user_id)?;
        self.update_rows(
            "profiles",
            &[
                ("display_name", form.display_name.trim().into()),
                ("favorite_food", favorite_food.into()),
                ("bio", form.bio.trim().into()),
                ("target_restaurant", form.target_restaurant.trim().into()),
                ("updated_at", now_rfc3339().into()),
            ],
            &[Filter::eq("id", user_id)],
        )?;

        tracing::info!("updated profile {}", user_id);
        self.get_profile(user_id)
    }

    /// Add `delta` to a user's XP and return the new total.
    ///
    /// Compare-and-set on the stored value: a concurrent award makes the
    /// UPDATE match nothing and the loop re-reads. A missing profile is
    /// created with the delta applied to zero.
    pub(crate) fn award_xp(&self, user_id: &str, delta: i64) -> Result<u64, DiaryError> {
        for _ in 0..XP_UPDATE_ATTEMPTS {
            let rows = self.select_rows("profiles", "xp", &[Filter::eq("id", user_id)], None, None)?;
            let now = now_rfc3339();

            let settled = match rows.first() {
                Some(row) => {
                    let old = row.get_i64("xp").unwrap_or(0);
                    let new = stored_xp(apply_xp_delta(old.max(0) as u64, delta));
                    let updated = self.update_rows(
                        "profiles",
                        &[("xp", new.into()), ("updated_at", now.into())],
                        &[Filter::eq("id", user_id), Filter::eq("xp", old)],
                    )?;
                    (updated == 1).then_some(new)
                }
                None => {
                    let new = stored_xp(apply_xp_delta(0, delta));
                    let inserted = self.insert_row(
                        "profiles",
                        &[
                            ("id", user_id.into()),
                            ("xp", new.into()),
                            ("created_at", now.clone().into()),
                            ("updated_at", now.into()),
                        ],
                    )?;
                    inserted.then_some(new)
                }
            };

            if let Some(xp) = settled {
                tracing::info!("awarded {} xp to {} (total {})", delta, user_id, xp);
                return Ok(xp as u64);
            }
            tracing::debug!("xp update for {} raced, retrying", user_id);
            std::thread::yield_now();
        }

        Err(DiaryError::Store(format!(
            "xp update for {} did not settle after {} attempts",
            user_id, XP_UPDATE_ATTEMPTS
        )))
    }
}
