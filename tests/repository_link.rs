//! PostgreSQL repository tests. Need `DATABASE_URL`; run with
//! `cargo test -- --ignored`.

use serde_json::json;
use shortifyme::domain::entities::{LinkOrder, NewLink, SortColumn, SortDirection};
use shortifyme::domain::repositories::LinkRepository;
use shortifyme::error::AppError;
use shortifyme::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::task::JoinSet;

fn new_link(title: &str, code: &str) -> NewLink {
    NewLink {
        title: title.to_string(),
        target_url: format!("https://example.com/{code}"),
        short_code: code.to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let created = repo.create(new_link("Docs", "docs")).await.unwrap();
    assert_eq!(created.short_code, "docs");
    assert_eq!(created.clicks, 0);

    let by_code = repo.find_by_code("docs").await.unwrap().unwrap();
    assert_eq!(by_code, created);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id, created);

    assert!(repo.find_by_code("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_code_conflicts(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.create(new_link("First", "dup")).await.unwrap();
    let err = repo.create(new_link("Second", "dup")).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
    assert_eq!(err.to_error_info().details, json!({ "code": "dup" }));
    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(repo.find_by_code("dup").await.unwrap().unwrap().title, "First");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_increments_are_not_lost(pool: PgPool) {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let id = repo.create(new_link("Hot", "hot")).await.unwrap().id;

    let mut tasks = JoinSet::new();
    for _ in 0..50 {
        let repo = repo.clone();
        tasks.spawn(async move { repo.increment_clicks(id).await.unwrap() });
    }
    while let Some(updated) = tasks.join_next().await {
        assert!(updated.unwrap());
    }

    assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().clicks, 50);
    assert!(!repo.increment_clicks(id + 1000).await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_list_orders(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    for (title, code) in [("Bravo", "b"), ("Alpha", "a"), ("Charlie", "c")] {
        repo.create(new_link(title, code)).await.unwrap();
    }

    let by_title = repo
        .list(LinkOrder {
            column: SortColumn::Title,
            direction: SortDirection::Asc,
        })
        .await
        .unwrap();
    let titles: Vec<_> = by_title.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Alpha", "Bravo", "Charlie"]);

    let default = repo.list(LinkOrder::from_params(Some("bogus"), None)).await.unwrap();
    let codes: Vec<_> = default.iter().map(|l| l.short_code.as_str()).collect();
    assert_eq!(codes, ["c", "a", "b"]);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_is_idempotent(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let link = repo.create(new_link("Gone", "gone")).await.unwrap();

    let removed = repo.delete(link.id).await.unwrap().unwrap();
    assert_eq!(removed.short_code, "gone");
    assert!(repo.delete(link.id).await.unwrap().is_none());
    assert!(repo.find_by_code("gone").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_health_check(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    assert!(repo.health_check().await);
}
