//! XP → level / title progression. Pure functions, no I/O.
//!
//! Level thresholds grow geometrically: level 1 starts at 0 XP, level 2 at
//! 200 XP, and every further level needs 1.5× the previous threshold
//! (`floor(200 × 1.5^(L−2))`). Levels stop at [`MAX_LEVEL`].

use serde::Serialize;

/// XP awarded to the author for every post.
pub const XP_PER_POST: i64 = 100;

/// XP awarded to a post's owner for every like received from someone else.
pub const XP_PER_LIKE: i64 = 20;

pub const MAX_LEVEL: u32 = 99;

/// Title tiers, ascending by the XP needed to earn them.
pub const TITLE_TIERS: [(u64, &str); 6] = [
    (0, "食の見習い"),
    (200, "パスタの求道者"),
    (500, "美食の探求者"),
    (1000, "美食の富豪"),
    (2000, "伝説の美食家"),
    (5000, "食の王"),
];

/// Progress within the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub level: u32,
    /// XP span of the current level. Zero at the level cap.
    pub required: u64,
    /// XP earned inside the current level. Zero at the level cap.
    pub progress: u64,
}

/// Cumulative XP needed to reach `level`. Saturates at `u64::MAX` for levels
/// whose threshold no longer fits.
pub fn level_threshold(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let Ok(exp) = i32::try_from(level - 2) else {
        return u64::MAX;
    };
    // Float-to-int `as` casts saturate.
    (200.0 * 1.5f64.powi(exp)).floor() as u64
}

/// Largest level whose threshold is at most `xp`, capped at [`MAX_LEVEL`].
pub fn level_for_xp(xp: u64) -> u32 {
    let mut level = 1;
    while level < MAX_LEVEL && level_threshold(level + 1) <= xp {
        level += 1;
    }
    level
}

/// Label of the highest title tier reached by `xp`.
pub fn title_for_xp(xp: u64) -> &'static str {
    TITLE_TIERS
        .iter()
        .rev()
        .find(|(threshold, _)| xp >= *threshold)
        .map(|(_, title)| *title)
        .unwrap_or(TITLE_TIERS[0].1)
}

pub fn progress_to_next_level(xp: u64) -> LevelProgress {
    let level = level_for_xp(xp);
    if level >= MAX_LEVEL {
        return LevelProgress {
            level,
            required: 0,
            progress: 0,
        };
    }
    let current = level_threshold(level);
    LevelProgress {
        level,
        required: level_threshold(level + 1) - current,
        progress: xp - current,
    }
}

/// New cumulative XP after applying `delta`. Never negative.
pub fn apply_xp_delta(current: u64, delta: i64) -> u64 {
    if delta >= 0 {
        current.saturating_add(delta as u64)
    } else {
        current.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(level_threshold(0), 0);
        assert_eq!(level_threshold(1), 0);
        assert_eq!(level_threshold(2), 200);
        assert_eq!(level_threshold(3), 300);
        assert_eq!(level_threshold(4), 450);
        assert_eq!(level_threshold(5), 675);
        assert_eq!(level_threshold(6), 1012);
        assert_eq!(level_threshold(7), 1518);
        assert_eq!(level_threshold(MAX_LEVEL), u64::MAX);
        assert_eq!(level_threshold(MAX_LEVEL + 1), u64::MAX);
        assert_eq!(level_threshold(i32::MAX as u32 + 2), u64::MAX);
        assert_eq!(level_threshold(u32::MAX), u64::MAX);
    }

    #[test]
    fn test_level_for_xp_known_points() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(199), 1);
        assert_eq!(level_for_xp(200), 2);
        assert_eq!(level_for_xp(299), 2);
        assert_eq!(level_for_xp(300), 3);
        assert_eq!(level_for_xp(449), 3);
        // 450 <= 500 < 675
        assert_eq!(level_for_xp(500), 4);
        assert_eq!(level_for_xp(675), 5);
    }

    #[test]
    fn test_level_is_monotonic_and_at_least_one() {
        let mut previous = 1;
        for xp in (0..200_000u64).step_by(7) {
            let level = level_for_xp(xp);
            assert!(level >= 1);
            assert!(level >= previous, "level dropped at xp={}", xp);
            previous = level;
        }
    }

    #[test]
    fn test_level_cap() {
        assert_eq!(level_for_xp(u64::MAX), MAX_LEVEL);
        let p = progress_to_next_level(u64::MAX);
        assert_eq!(p.level, MAX_LEVEL);
        assert_eq!(p.required, 0);
        assert_eq!(p.progress, 0);
    }

    #[test]
    fn test_titles() {
        assert_eq!(title_for_xp(0), "食の見習い");
        assert_eq!(title_for_xp(199), "食の見習い");
        assert_eq!(title_for_xp(200), "パスタの求道者");
        assert_eq!(title_for_xp(999), "美食の探求者");
        assert_eq!(title_for_xp(1000), "美食の富豪");
        assert_eq!(title_for_xp(5000), "食の王");
        assert_eq!(title_for_xp(u64::MAX), "食の王");
    }

    #[test]
    fn test_title_is_step_function() {
        let rank = |title: &str| TITLE_TIERS.iter().position(|(_, t)| *t == title).unwrap();
        let mut previous = 0;
        for xp in 0..6000u64 {
            let r = rank(title_for_xp(xp));
            assert!(r >= previous, "title regressed at xp={}", xp);
            previous = r;
        }
    }

    #[test]
    fn test_progress_to_next_level() {
        assert_eq!(
            progress_to_next_level(0),
            LevelProgress { level: 1, required: 200, progress: 0 }
        );
        assert_eq!(
            progress_to_next_level(250),
            LevelProgress { level: 2, required: 100, progress: 50 }
        );
        assert_eq!(
            progress_to_next_level(500),
            LevelProgress { level: 4, required: 225, progress: 50 }
        );
    }

    #[test]
    fn test_apply_xp_delta() {
        assert_eq!(apply_xp_delta(0, XP_PER_POST), 100);
        assert_eq!(apply_xp_delta(100, XP_PER_LIKE), 120);
        assert_eq!(apply_xp_delta(10, -50), 0);
        assert_eq!(apply_xp_delta(u64::MAX, XP_PER_LIKE), u64::MAX);
        assert_eq!(apply_xp_delta(5, i64::MIN), 0);
    }
}
