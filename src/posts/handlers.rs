//! Post Handlers
//!
//! HTTP handlers for the post endpoints:
//!
//! - `POST /api/posts` - create a post (multipart, media file required)
//! - `GET /api/posts` - list posts, optional category filter and paging
//! - `GET /api/posts/count` - total number of posts
//! - `GET /api/posts/{id}` - fetch one post
//! - `PUT /api/posts/{id}` - patch title/description/category (owner only)
//! - `PUT /api/posts/media/{id}` - replace the media file (owner only)
//! - `DELETE /api/posts/{id}` - delete (owner or admin)
//! - `PUT /api/posts/like/{id}` - toggle the caller's like
//!
//! Creation is multipart because the media file rides along with the text
//! fields; everything else is JSON.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::handlers::types::MessageResponse;
use crate::error::ApiError;
use crate::media::MediaStore;
use crate::middleware::AuthUser;
use crate::posts::model::{validate_new_post, validate_patch, Post, PostPatch, PostResponse};
use crate::posts::store::PostStore;
use crate::server::state::AppState;

/// Page size when a `page` query parameter is given
const POSTS_PER_PAGE: u32 = 3;

/// Upload size cap for media files: 1 MiB
const MAX_MEDIA_BYTES: usize = 1024 * 1024;

/// Collected fields of a multipart create-post request
#[derive(Default)]
struct CreatePostFields {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    media: Option<(Vec<u8>, String)>,
}

/// Create post handler
///
/// Accepts a multipart form with `title`, `description`, `category`, and a
/// `media` file part. The file is required and must be an image or a video
/// of at most 1 MiB; it is uploaded to the media host before the record is
/// written.
///
/// # Errors
///
/// * `400 Bad Request` - missing/invalid fields, missing file, wrong type, too large
/// * `401 Unauthorized` - no valid session
/// * `500 Internal Server Error` - media host or store failure
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let mut fields = CreatePostFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("Malformed multipart request"))?
    {
        match field.name() {
            Some("title") => {
                fields.title = Some(read_text(field).await?);
            }
            Some("description") => {
                fields.description = Some(read_text(field).await?);
            }
            Some("category") => {
                fields.category = Some(read_text(field).await?);
            }
            Some("media") => {
                fields.media = Some(read_media(field).await?);
            }
            _ => {}
        }
    }

    let title = fields.title.unwrap_or_default();
    let description = fields.description.unwrap_or_default();
    let category = fields.category.unwrap_or_default();
    validate_new_post(&title, &description, &category)?;

    let (bytes, content_type) = fields
        .media
        .ok_or_else(|| ApiError::validation("No file provided"))?;

    let asset = state.media.upload(bytes, &content_type).await?;

    let post = Post::new(user.account_id, title, description, category, Some(asset));
    state.posts.insert(&post).await?;

    tracing::info!("Post {} created by account {}", post.id, user.account_id);
    Ok((StatusCode::CREATED, Json(post.into())))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|_| ApiError::validation("Malformed multipart request"))
}

/// Read a media file part, enforcing the type and size rules
async fn read_media(
    field: axum::extract::multipart::Field<'_>,
) -> Result<(Vec<u8>, String), ApiError> {
    let content_type = field
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_default();
    if !content_type.starts_with("image/") && !content_type.starts_with("video/") {
        return Err(ApiError::validation("Unsupported file format"));
    }
    let bytes = field
        .bytes()
        .await
        .map_err(|_| ApiError::validation("Malformed multipart request"))?;
    if bytes.len() > MAX_MEDIA_BYTES {
        return Err(ApiError::validation("File too large, 1 MB maximum"));
    }
    Ok((bytes.to_vec(), content_type))
}

/// Query parameters for post listing
#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    /// 1-based page number; omitting it returns everything
    pub page: Option<u32>,
    /// Exact category filter
    pub category: Option<String>,
}

/// List posts, newest first
pub async fn get_posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state
        .posts
        .list(query.category.as_deref(), query.page, POSTS_PER_PAGE)
        .await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Total number of posts
pub async fn get_post_count(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = state.posts.count().await?;
    Ok(Json(serde_json::json!({ "count": count })))
}

/// Fetch a single post
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(post.into()))
}

/// Patch a post's text fields; owner only
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<PostPatch>,
) -> Result<Json<PostResponse>, ApiError> {
    validate_patch(&patch)?;

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    user.require_owner(post.author_id)?;

    if let Some(title) = patch.title {
        post.title = title;
    }
    if let Some(description) = patch.description {
        post.description = description;
    }
    if let Some(category) = patch.category {
        post.category = category;
    }

    state.posts.save(&post).await?;
    tracing::info!("Post {} updated by account {}", post.id, user.account_id);
    Ok(Json(post.into()))
}

/// Replace a post's media file; owner only
///
/// Accepts a multipart form with a single `media` file part under the same
/// type and size rules as creation. The old asset is removed from the
/// media host before the new one is uploaded; if the upload then fails the
/// post keeps pointing at the already-deleted asset. That window is
/// accepted; nothing here compensates with a rollback.
///
/// # Errors
///
/// * `400 Bad Request` - missing file, wrong type, too large
/// * `403 Forbidden` - caller is not the owner
/// * `404 Not Found` - no such post
/// * `500 Internal Server Error` - media host or store failure
pub async fn update_post_media(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<PostResponse>, ApiError> {
    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    user.require_owner(post.author_id)?;

    let mut media = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("Malformed multipart request"))?
    {
        if field.name() == Some("media") {
            media = Some(read_media(field).await?);
        }
    }
    let (bytes, content_type) = media.ok_or_else(|| ApiError::validation("No file provided"))?;

    if let Some(public_id) = &post.media_public_id {
        state.media.delete(public_id).await?;
    }
    let asset = state.media.upload(bytes, &content_type).await?;

    post.media_url = Some(asset.url);
    post.media_public_id = Some(asset.public_id);
    post.media_content_type = Some(asset.content_type);
    state.posts.save(&post).await?;

    tracing::info!("Post {} media replaced by account {}", post.id, user.account_id);
    Ok(Json(post.into()))
}

/// Delete a post; owner or admin
///
/// The media asset is removed from the media host first; if that fails the
/// record stays, so the post never points at a file that was deleted under
/// it.
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    user.require_owner_or_admin(post.author_id)?;

    if let Some(public_id) = &post.media_public_id {
        state.media.delete(public_id).await?;
    }
    state.posts.delete(post.id).await?;

    tracing::info!("Post {} deleted by account {}", post.id, user.account_id);
    Ok(Json(MessageResponse::new("Post deleted")))
}

/// Toggle the caller's like on a post
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    post.toggle_like(user.account_id);
    state.posts.save(&post).await?;

    Ok(Json(post.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::AuthenticatedUser;
    use crate::testing::{seed_account, seed_admin, seed_post, TestHarness};

    fn as_user(account: &crate::auth::accounts::Account) -> AuthUser {
        AuthUser(AuthenticatedUser {
            account_id: account.id,
            username: account.username.clone(),
            is_admin: account.is_admin,
        })
    }

    #[tokio::test]
    async fn test_update_rejects_non_owner() {
        let h = TestHarness::new();
        let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
        let bob = seed_account(&h, "bob", "bob@example.com", "password123", true).await;
        let post = seed_post(&h, &alice, "Original title").await;

        let patch = PostPatch {
            title: Some("Hijacked".to_string()),
            description: None,
            category: None,
        };
        let result = update_post(
            State(h.state()),
            as_user(&bob),
            Path(post.id),
            Json(patch),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
        assert_eq!(h.posts.get(post.id).unwrap().title, "Original title");
    }

    #[tokio::test]
    async fn test_admin_cannot_edit_but_can_delete() {
        let h = TestHarness::new();
        let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
        let admin = seed_admin(&h, "root", "root@example.com", "password123").await;
        let post = seed_post(&h, &alice, "A post").await;

        let patch = PostPatch {
            title: Some("Edited by admin".to_string()),
            description: None,
            category: None,
        };
        let edit = update_post(
            State(h.state()),
            as_user(&admin),
            Path(post.id),
            Json(patch),
        )
        .await;
        assert!(matches!(edit, Err(ApiError::Forbidden(_))));

        let delete = delete_post(State(h.state()), as_user(&admin), Path(post.id)).await;
        assert!(delete.is_ok());
        assert!(h.posts.get(post.id).is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_media_asset() {
        let h = TestHarness::new();
        let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;

        let asset = h
            .media
            .upload(vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        let public_id = asset.public_id.clone();
        let post = Post::new(
            alice.id,
            "With media".into(),
            "A long enough description".into(),
            "general".into(),
            Some(asset),
        );
        h.posts.insert(&post).await.unwrap();

        delete_post(State(h.state()), as_user(&alice), Path(post.id))
            .await
            .unwrap();

        assert_eq!(h.media.deleted(), vec![public_id]);
        assert!(h.posts.get(post.id).is_none());
    }

    #[tokio::test]
    async fn test_toggle_like_twice_is_a_noop() {
        let h = TestHarness::new();
        let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
        let bob = seed_account(&h, "bob", "bob@example.com", "password123", true).await;
        let post = seed_post(&h, &alice, "Likeable").await;

        toggle_like(State(h.state()), as_user(&bob), Path(post.id))
            .await
            .unwrap();
        assert_eq!(h.posts.get(post.id).unwrap().likes, vec![bob.id]);

        toggle_like(State(h.state()), as_user(&bob), Path(post.id))
            .await
            .unwrap();
        assert!(h.posts.get(post.id).unwrap().likes.is_empty());
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let h = TestHarness::new();
        let alice = seed_account(&h, "alice", "alice@example.com", "password123", true).await;
        for i in 0..5 {
            seed_post(&h, &alice, &format!("Post {i}")).await;
        }

        let query = PostsQuery {
            page: Some(2),
            category: None,
        };
        let page = get_posts(State(h.state()), Query(query)).await.unwrap();
        assert_eq!(page.0.len(), 2);
    }
}
