use foodlog_sql::SQLStore;

use crate::service::DiaryError;

/// Initialize the SQLite schema for all diary records.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), DiaryError> {
    let statements = [
        // Profiles: one per user, id issued by the identity provider.
        // xp is the only stored gamification state.
        "CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            xp INTEGER NOT NULL DEFAULT 0 CHECK (xp >= 0),
            display_name TEXT NOT NULL DEFAULT '',
            favorite_food TEXT NOT NULL DEFAULT '',
            bio TEXT NOT NULL DEFAULT '',
            target_restaurant TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",

        // Posts: JSON record plus the columns feeds and stats filter on
        "CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            genre TEXT NOT NULL,
            amount_numeric INTEGER,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_posts_user ON posts(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at)",

        // Likes: the unique key is the toggle invariant; seq orders ties
        "CREATE TABLE IF NOT EXISTS likes (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('article', 'review')),
            created_at TEXT NOT NULL,
            UNIQUE (post_id, user_id, kind)
        )",
        "CREATE INDEX IF NOT EXISTS idx_likes_kind ON likes(kind)",

        // Follows: directed edges, no self-follow
        "CREATE TABLE IF NOT EXISTS follows (
            follower_id TEXT NOT NULL,
            following_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (follower_id, following_id),
            CHECK (follower_id <> following_id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_follows_following ON follows(following_id)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])?;
    }

    Ok(())
}
