use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use diary::model::{LikeKind, PostForm};
use diary::service::DiaryService;
use foodlog_blob::FileStore;
use foodlog_sql::SqliteStore;

fn seeded_service(posts: usize, fans: usize) -> (Arc<DiaryService>, Vec<String>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
    let blob = Arc::new(FileStore::open(dir.path(), "http://localhost/blobs").unwrap());
    let svc = DiaryService::new(sql, blob).unwrap();

    let mut ids = Vec::with_capacity(posts);
    for i in 0..posts {
        let form = PostForm {
            restaurant_name: format!("店-{}", i),
            genre: ["和食", "中華", "イタリアン"][i % 3].to_string(),
            review_content: "おいしかった".repeat(20),
            taste_rating: 4.0,
            price_rating: 3.0,
            atmosphere_rating: 4.0,
            overall_rating: 4.0,
            ..Default::default()
        };
        let created = svc.create_post(Some(&format!("author-{}", i % 10)), form).unwrap();
        // Skewed popularity so the ranking has real ordering work.
        for f in 0..(i % fans) {
            let fan = format!("fan-{}", f);
            svc.toggle_like(Some(&fan), &created.id, LikeKind::Article).unwrap();
            if f % 2 == 0 {
                svc.toggle_like(Some(&fan), &created.id, LikeKind::Review).unwrap();
            }
        }
        ids.push(created.id);
    }
    (svc, ids, dir)
}

fn bench_rank_posts(c: &mut Criterion) {
    let (svc, _ids, _dir) = seeded_service(500, 40);

    c.bench_function("rank_posts_article_top10", |b| {
        b.iter(|| {
            let ranking = svc.rank_posts(LikeKind::Article, black_box(10));
            assert_eq!(ranking.len(), 10);
        });
    });

    c.bench_function("rank_posts_review_top50", |b| {
        b.iter(|| {
            let ranking = svc.rank_posts(LikeKind::Review, black_box(50));
            assert_eq!(ranking.len(), 50);
        });
    });
}

fn bench_count_likes_for_posts(c: &mut Criterion) {
    let (svc, ids, _dir) = seeded_service(500, 40);
    let page: Vec<String> = ids.iter().take(50).cloned().collect();

    c.bench_function("count_likes_for_posts_50", |b| {
        b.iter(|| {
            let counts = svc.count_likes_for_posts(black_box(&page));
            assert_eq!(counts.len(), 50);
        });
    });
}

fn bench_profile_stats(c: &mut Criterion) {
    let (svc, _ids, _dir) = seeded_service(500, 40);

    c.bench_function("profile_stats", |b| {
        b.iter(|| {
            let stats = svc.profile_stats(black_box("author-3"));
            assert_eq!(stats.post_count, 50);
        });
    });
}

criterion_group!(
    benches,
    bench_rank_posts,
    bench_count_likes_for_posts,
    bench_profile_stats
);
criterion_main!(benches);
