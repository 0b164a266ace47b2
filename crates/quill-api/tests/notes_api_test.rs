//! Integration tests for the owner-scoped note operations.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{register_and_login, request, test_app};

#[tokio::test]
async fn test_create_then_list_roundtrip() {
    let app = test_app();
    let (token, alice_id) = register_and_login(&app, "alice", "pw1").await;

    let (status, created) = request(
        &app,
        "POST",
        "/api/notes",
        Some(&token),
        Some(json!({
            "title": "T",
            "content": "<p>x</p>",
            "tags": [],
            "pinned": false,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "T");
    assert!(created["id"].is_string());
    // Stamped with the registered account id.
    assert_eq!(created["ownerId"], alice_id.to_string());

    let (status, listed) = request(&app, "GET", "/api/notes", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "T");
    assert_eq!(listed[0]["ownerId"], alice_id.to_string());
}

#[tokio::test]
async fn test_create_ignores_client_supplied_owner() {
    let app = test_app();
    let (token, alice_id) = register_and_login(&app, "alice", "pw1").await;

    let forged_owner = "11111111-1111-1111-1111-111111111111";
    let (status, created) = request(
        &app,
        "POST",
        "/api/notes",
        Some(&token),
        Some(json!({
            "title": "T",
            "content": "<p>x</p>",
            "ownerId": forged_owner,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Owner comes from the resolved session identity, never the payload.
    assert_ne!(created["ownerId"], forged_owner);
    assert_eq!(created["ownerId"], alice_id.to_string());
}

#[tokio::test]
async fn test_cross_owner_access_is_indistinguishable_from_missing() {
    let app = test_app();
    let (alice, _) = register_and_login(&app, "alice", "pw1").await;
    let (bob, _) = register_and_login(&app, "bob", "pw2").await;

    let (_, note) = request(
        &app,
        "POST",
        "/api/notes",
        Some(&alice),
        Some(json!({"title": "secret", "content": "<p>x</p>"})),
    )
    .await;
    let note_id = note["id"].as_str().unwrap().to_string();

    // Bob updating Alice's note vs. updating a nonexistent id: same status,
    // same body.
    let (real_status, real_body) = request(
        &app,
        "PUT",
        &format!("/api/notes/{}", note_id),
        Some(&bob),
        Some(json!({"title": "mine now"})),
    )
    .await;
    let (fake_status, fake_body) = request(
        &app,
        "PUT",
        &format!("/api/notes/{}", uuid::Uuid::new_v4()),
        Some(&bob),
        Some(json!({"title": "mine now"})),
    )
    .await;
    assert_eq!(real_status, StatusCode::NOT_FOUND);
    assert_eq!(fake_status, StatusCode::NOT_FOUND);
    assert_eq!(real_body, fake_body);

    // Same for delete.
    let (status, delete_body) = request(
        &app,
        "DELETE",
        &format!("/api/notes/{}", note_id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(delete_body, real_body);

    // Bob's list never contains Alice's note.
    let (_, bob_notes) = request(&app, "GET", "/api/notes", Some(&bob), None).await;
    assert!(bob_notes.as_array().unwrap().is_empty());

    // And Alice still has it, untouched.
    let (_, alice_notes) = request(&app, "GET", "/api/notes", Some(&alice), None).await;
    let alice_notes = alice_notes.as_array().unwrap();
    assert_eq!(alice_notes.len(), 1);
    assert_eq!(alice_notes[0]["title"], "secret");
}

#[tokio::test]
async fn test_list_orders_pinned_before_recency() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice", "pw1").await;

    let (_, older) = request(
        &app,
        "POST",
        "/api/notes",
        Some(&token),
        Some(json!({"title": "older", "content": "x", "lastModified": 100})),
    )
    .await;
    request(
        &app,
        "POST",
        "/api/notes",
        Some(&token),
        Some(json!({"title": "newer", "content": "x", "lastModified": 200})),
    )
    .await;

    // Unpinned: most recently modified first.
    let (_, listed) = request(&app, "GET", "/api/notes", Some(&token), None).await;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["newer", "older"]);

    // Pinning the older note overrides recency.
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/notes/{}", older["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({"pinned": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = request(&app, "GET", "/api/notes", Some(&token), None).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed[0]["title"], "older");
    assert_eq!(listed[0]["pinned"], true);
    assert_eq!(listed[1]["title"], "newer");
}

#[tokio::test]
async fn test_list_is_idempotent_under_no_writes() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice", "pw1").await;

    for (title, lm) in [("a", 300), ("b", 100), ("c", 200)] {
        request(
            &app,
            "POST",
            "/api/notes",
            Some(&token),
            Some(json!({"title": title, "content": "x", "lastModified": lm})),
        )
        .await;
    }

    let (_, first) = request(&app, "GET", "/api/notes", Some(&token), None).await;
    let (_, second) = request(&app, "GET", "/api/notes", Some(&token), None).await;
    assert_eq!(first, second);

    let titles: Vec<&str> = first
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["a", "c", "b"]);
}

#[tokio::test]
async fn test_update_applies_only_supplied_fields() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice", "pw1").await;

    let (_, note) = request(
        &app,
        "POST",
        "/api/notes",
        Some(&token),
        Some(json!({
            "title": "T",
            "content": "<p>x</p>",
            "tags": ["work"],
            "lastModified": 100,
        })),
    )
    .await;

    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/notes/{}", note["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({"title": "T2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "T2");
    assert_eq!(updated["content"], "<p>x</p>");
    assert_eq!(updated["tags"], json!(["work"]));
    // Every successful mutation restamps the ordering key.
    assert!(updated["lastModified"].as_i64().unwrap() > 100);
}

#[tokio::test]
async fn test_delete_confirms_and_removes() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice", "pw1").await;

    let (_, note) = request(
        &app,
        "POST",
        "/api/notes",
        Some(&token),
        Some(json!({"title": "T", "content": "x"})),
    )
    .await;
    let path = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, body) = request(&app, "DELETE", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note deleted");

    // Gone now: a second delete is the shared not-found shape.
    let (status, _) = request(&app, "DELETE", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = request(&app, "GET", "/api/notes", Some(&token), None).await;
    assert!(listed.as_array().unwrap().is_empty());
}
