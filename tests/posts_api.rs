//! Posts API integration tests
//!
//! End-to-end tests for post creation, listing, editing, deletion, and
//! likes, run over the full router with in-memory collaborators.

use axum::http::StatusCode;
use axum_test::TestServer;
use mosaic::routes::create_router;
use mosaic::testing::{seed_account, seed_admin, seed_post, TestHarness};
use serde_json::json;

fn server(h: &TestHarness) -> TestServer {
    TestServer::new(create_router(h.state())).unwrap()
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

const BOUNDARY: &str = "mosaic-test-boundary";

/// A multipart form with the standard post fields plus a small PNG part
fn post_form(title: &str, description: &str, category: &str) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [
        ("title", title),
        ("description", description),
        ("category", category),
    ] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"media\"; filename=\"pic.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"not-really-a-png");
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_create_post_uploads_media() {
    let h = TestHarness::new();
    let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
    let session = h.session_for(&alice);
    let server = server(&h);

    let response = server
        .post("/api/posts")
        .add_header("Authorization", bearer(&session))
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(post_form("Sunset ride", "A long ride along the coast road", "cycling").into())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Sunset ride");
    assert_eq!(body["author_id"], alice.id.to_string());
    assert!(body["media_url"].as_str().is_some());

    assert_eq!(h.media.uploaded().len(), 1);
}

/// A multipart form with only a media file part
fn media_form(content_type: &str, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"media\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_replace_media_swaps_asset_and_deletes_old() {
    let h = TestHarness::new();
    let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
    let bob = seed_account(&h, "bob", "bob@example.com", "password123", true).await;
    let server = server(&h);

    let response = server
        .post("/api/posts")
        .add_header("Authorization", bearer(&h.session_for(&alice)))
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(post_form("Sunset ride", "A long ride along the coast road", "cycling").into())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    let post_id = created["id"].as_str().unwrap().to_string();
    let old_url = created["media_url"].as_str().unwrap().to_string();
    let old_public_id = h.media.uploaded()[0].clone();

    // A stranger cannot swap someone else's media
    let response = server
        .put(&format!("/api/posts/media/{post_id}"))
        .add_header("Authorization", bearer(&h.session_for(&bob)))
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(media_form("video/mp4", b"not-really-a-video").into())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert!(h.media.deleted().is_empty());

    // The owner can; the old asset is removed from the host
    let response = server
        .put(&format!("/api/posts/media/{post_id}"))
        .add_header("Authorization", bearer(&h.session_for(&alice)))
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(media_form("video/mp4", b"not-really-a-video").into())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_ne!(body["media_url"].as_str().unwrap(), old_url);
    assert_eq!(body["media_content_type"], "video/mp4");
    assert_eq!(h.media.deleted(), vec![old_public_id]);
    assert_eq!(h.media.uploaded().len(), 2);
}

#[tokio::test]
async fn test_replace_media_requires_a_file() {
    let h = TestHarness::new();
    let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
    let post = seed_post(&h, &alice, "No new file").await;
    let server = server(&h);

    // Form with no media part at all
    let empty_form = format!("--{BOUNDARY}--\r\n").into_bytes();
    let response = server
        .put(&format!("/api/posts/media/{}", post.id))
        .add_header("Authorization", bearer(&h.session_for(&alice)))
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(empty_form.into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Wrong content type is rejected before anything is touched
    let response = server
        .put(&format!("/api/posts/media/{}", post.id))
        .add_header("Authorization", bearer(&h.session_for(&alice)))
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(media_form("application/pdf", b"%PDF-").into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(h.media.uploaded().is_empty());
}

#[tokio::test]
async fn test_create_post_requires_session() {
    let h = TestHarness::new();
    let server = server(&h);

    let response = server
        .post("/api/posts")
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(post_form("Sunset ride", "A long ride along the coast road", "cycling").into())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_post_validates_fields() {
    let h = TestHarness::new();
    let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
    let session = h.session_for(&alice);
    let server = server(&h);

    // Title below the 2-character minimum
    let response = server
        .post("/api/posts")
        .add_header("Authorization", bearer(&session))
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(post_form("x", "A long enough description", "cycling").into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(h.media.uploaded().len(), 0);
}

#[tokio::test]
async fn test_owner_can_edit_admin_cannot() {
    let h = TestHarness::new();
    let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
    let admin = seed_admin(&h, "root", "root@example.com", "password123").await;
    let post = seed_post(&h, &alice, "Original title").await;
    let server = server(&h);

    let response = server
        .put(&format!("/api/posts/{}", post.id))
        .add_header("Authorization", bearer(&h.session_for(&alice)))
        .json(&json!({"title": "Renamed title"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(h.posts.get(post.id).unwrap().title, "Renamed title");

    // Admins moderate by deletion, not by rewriting someone's words
    let response = server
        .put(&format!("/api/posts/{}", post.id))
        .add_header("Authorization", bearer(&h.session_for(&admin)))
        .json(&json!({"title": "Admin was here"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_rules_and_media_cleanup() {
    let h = TestHarness::new();
    let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
    let bob = seed_account(&h, "bob", "bob@example.com", "password123", true).await;
    let admin = seed_admin(&h, "root", "root@example.com", "password123").await;
    let server = server(&h);

    let post = seed_post(&h, &alice, "To be deleted").await;

    // A stranger cannot delete someone else's post
    let response = server
        .delete(&format!("/api/posts/{}", post.id))
        .add_header("Authorization", bearer(&h.session_for(&bob)))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // An admin can
    let response = server
        .delete(&format!("/api/posts/{}", post.id))
        .add_header("Authorization", bearer(&h.session_for(&admin)))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(h.posts.get(post.id).is_none());
}

#[tokio::test]
async fn test_like_toggles() {
    let h = TestHarness::new();
    let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
    let bob = seed_account(&h, "bob", "bob@example.com", "password123", true).await;
    let post = seed_post(&h, &alice, "Likeable").await;
    let server = server(&h);

    let response = server
        .put(&format!("/api/posts/like/{}", post.id))
        .add_header("Authorization", bearer(&h.session_for(&bob)))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(h.posts.get(post.id).unwrap().likes, vec![bob.id]);

    // Same caller again removes the like
    let response = server
        .put(&format!("/api/posts/like/{}", post.id))
        .add_header("Authorization", bearer(&h.session_for(&bob)))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(h.posts.get(post.id).unwrap().likes.is_empty());
}

#[tokio::test]
async fn test_listing_is_public_and_paginated() {
    let h = TestHarness::new();
    let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
    for i in 0..5 {
        seed_post(&h, &alice, &format!("Post {i}")).await;
    }
    let server = server(&h);

    // No session needed to read
    let response = server.get("/api/posts").add_query_param("page", 1).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 3);

    let response = server.get("/api/posts").add_query_param("page", 2).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = server.get("/api/posts/count").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 5);

    // A page number beyond the data, however large, is an empty page
    let response = server
        .get("/api/posts")
        .add_query_param("page", u32::MAX)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_unknown_post_is_404() {
    let h = TestHarness::new();
    let server = server(&h);

    let response = server
        .get(&format!("/api/posts/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
