use crate::application::ports::repositories::{
    Filter, FindOptions, PaginateOptions, Projection, Repository, Sort, UpdateOptions,
};
use crate::domain::entities::{Bookmark, BookmarkPatch, Entity, NewBookmark};
use crate::infrastructure::database::MongoBookmarkRepository;
use mongodb::bson::oid::ObjectId;
use mongodb::Database;

/// Each test gets its own database, dropped afterwards. Tests are skipped
/// when `MONGODB_TEST_URI` is unset.
async fn test_database() -> Option<Database> {
    let uri = bm_core::config::optional_env("MONGODB_TEST_URI")?;
    let name = format!("bm_test_{}", ObjectId::new().to_hex());
    let database = bm_core::db::connect(&uri, "bm-api-tests", Some(&name))
        .await
        .expect("connect");
    Some(database)
}

fn input(title: &str, description: &str) -> NewBookmark {
    NewBookmark {
        title: title.to_string(),
        url: "https://test.com".to_string(),
        description: Some(description.to_string()),
        tags: Some(vec!["test".to_string()]),
    }
}

#[tokio::test]
async fn crud_round_trip_against_mongodb() {
    let Some(database) = test_database().await else {
        return;
    };
    let repo = MongoBookmarkRepository::new(&database);
    repo.ping().await.expect("ping");
    assert_eq!(repo.collection_name(), "bookmarks");

    let created = repo
        .create(input("Test Bookmark", "Test Description"))
        .await
        .expect("create");
    let found = repo
        .find_by_id(created.id(), &FindOptions::default())
        .await
        .expect("find")
        .expect("present");
    assert_eq!(found.title(), "Test Bookmark");
    assert_eq!(found.tags().to_vec(), vec!["test".to_string()]);

    let patch = BookmarkPatch {
        title: Some("Updated Title".to_string()),
        ..Default::default()
    };
    let before = repo
        .find_by_id_and_update(created.id(), &patch, &UpdateOptions::default())
        .await
        .expect("update")
        .expect("matched");
    assert_eq!(before.title(), "Test Bookmark");
    let after = repo
        .find_by_id(created.id(), &FindOptions::default())
        .await
        .expect("find")
        .expect("present");
    assert_eq!(after.title(), "Updated Title");
    assert_eq!(after.description(), "Test Description");
    assert!(after.updated_at() >= after.created_at());

    let removed = repo
        .find_by_id_and_delete(created.id())
        .await
        .expect("delete");
    assert!(removed.is_some());
    assert!(repo
        .find_by_id("mock-id", &FindOptions::default())
        .await
        .expect("malformed id")
        .is_none());

    database.drop().await.expect("drop");
}

#[tokio::test]
async fn search_paginate_and_project_against_mongodb() {
    let Some(database) = test_database().await else {
        return;
    };
    let repo = MongoBookmarkRepository::new(&database);

    for (title, description) in [
        ("Alpha", "first TEST entry"),
        ("Beta", "nothing to see"),
        ("Gamma test", "third entry"),
        ("Delta (c++)", "regex metacharacters"),
    ] {
        repo.create(input(title, description)).await.expect("create");
    }

    let search = Filter::Or(vec![
        Filter::contains("title", "test"),
        Filter::contains("description", "test"),
    ]);
    let page = repo
        .find_and_paginate(
            &search,
            &PaginateOptions {
                page: Some(1),
                limit: Some(1),
                sort: Some(Sort::ascending("title")),
            },
        )
        .await
        .expect("paginate");
    assert_eq!(page.total, 2);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].title(), "Alpha");

    let literal = repo
        .count(&Filter::contains("title", "(c++)"))
        .await
        .expect("count");
    assert_eq!(literal, 1);

    let rows = repo
        .find_projected(
            &Filter::All,
            &Projection::include(&["title"]),
            &FindOptions {
                sort: Some(Sort::descending("title")),
                ..Default::default()
            },
        )
        .await
        .expect("projected");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["title"], "Gamma test");
    assert!(rows[0]["id"].is_string());
    assert!(rows[0].get("url").is_none());

    let removed = repo.delete_many(&Filter::All).await.expect("delete_many");
    assert_eq!(removed, 4);

    let leftover: Option<Bookmark> = repo
        .find_one(&Filter::All, &FindOptions::default())
        .await
        .expect("find_one");
    assert!(leftover.is_none());
    database.drop().await.expect("drop");
}
