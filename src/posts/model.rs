//! Post Model
//!
//! The post record, its validation rules, and the response shape returned
//! to clients.
//!
//! # Validation
//!
//! - title: 2-200 characters after trimming
//! - description: at least 10 characters after trimming
//! - category: required, non-empty

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::media::MediaAsset;

/// A post record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID (UUID)
    pub id: Uuid,
    /// Authoring account
    pub author_id: Uuid,
    /// Title (2-200 chars)
    pub title: String,
    /// Body text (at least 10 chars)
    pub description: String,
    /// Free-form category label
    pub category: String,
    /// Public URL of the attached media file
    pub media_url: Option<String>,
    /// Media-host identifier for the attachment
    pub media_public_id: Option<String>,
    /// MIME type of the attachment
    pub media_content_type: Option<String>,
    /// Accounts that currently like this post
    pub likes: Vec<Uuid>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: Uuid,
        title: String,
        description: String,
        category: String,
        media: Option<MediaAsset>,
    ) -> Self {
        let now = Utc::now();
        let (media_url, media_public_id, media_content_type) = match media {
            Some(asset) => (Some(asset.url), Some(asset.public_id), Some(asset.content_type)),
            None => (None, None, None),
        };
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            description,
            category,
            media_url,
            media_public_id,
            media_content_type,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add the account's like, or remove it if already present
    pub fn toggle_like(&mut self, account_id: Uuid) {
        if let Some(index) = self.likes.iter().position(|id| *id == account_id) {
            self.likes.remove(index);
        } else {
            self.likes.push(account_id);
        }
    }
}

/// Partial update applied by the post owner
#[derive(Debug, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Post shape returned to clients
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub media_url: Option<String>,
    pub media_content_type: Option<String>,
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_string(),
            author_id: post.author_id.to_string(),
            title: post.title,
            description: post.description,
            category: post.category,
            media_url: post.media_url,
            media_content_type: post.media_content_type,
            likes: post.likes.iter().map(|id| id.to_string()).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Validate the fields of a new post
pub fn validate_new_post(title: &str, description: &str, category: &str) -> Result<(), ApiError> {
    validate_title(title)?;
    validate_description(description)?;
    if category.trim().is_empty() {
        return Err(ApiError::validation("Category is required"));
    }
    Ok(())
}

/// Validate a patch; only present fields are checked
pub fn validate_patch(patch: &PostPatch) -> Result<(), ApiError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(description) = &patch.description {
        validate_description(description)?;
    }
    if let Some(category) = &patch.category {
        if category.trim().is_empty() {
            return Err(ApiError::validation("Category is required"));
        }
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    let len = title.trim().chars().count();
    if !(2..=200).contains(&len) {
        return Err(ApiError::validation("Title must be 2-200 characters"));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.trim().chars().count() < 10 {
        return Err(ApiError::validation(
            "Description must be at least 10 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_post_accepts_good_input() {
        assert!(validate_new_post("Hello", "A long enough description", "music").is_ok());
    }

    #[test]
    fn test_validate_new_post_rejects_short_title() {
        assert!(validate_new_post("H", "A long enough description", "music").is_err());
    }

    #[test]
    fn test_validate_new_post_rejects_short_description() {
        assert!(validate_new_post("Hello", "too short", "music").is_err());
    }

    #[test]
    fn test_validate_new_post_rejects_blank_category() {
        assert!(validate_new_post("Hello", "A long enough description", "  ").is_err());
    }

    #[test]
    fn test_validate_patch_ignores_absent_fields() {
        let patch = PostPatch {
            title: None,
            description: None,
            category: None,
        };
        assert!(validate_patch(&patch).is_ok());
    }

    #[test]
    fn test_toggle_like_round_trip() {
        let mut post = Post::new(
            Uuid::new_v4(),
            "Hello".into(),
            "A long enough description".into(),
            "music".into(),
            None,
        );
        let liker = Uuid::new_v4();

        post.toggle_like(liker);
        assert_eq!(post.likes, vec![liker]);

        post.toggle_like(liker);
        assert!(post.likes.is_empty());
    }
}
