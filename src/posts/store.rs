//! Post Store
//!
//! Store contract for post records and the Postgres implementation. Likes
//! live in a `uuid[]` column on the post row, so every mutation (including
//! a like toggle) is a single-record write.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::posts::model::Post;

const POST_COLUMNS: &str = "id, author_id, title, description, category, media_url, \
     media_public_id, media_content_type, likes, created_at, updated_at";

/// Store contract for posts
///
/// `list` returns newest-first; when `page` is given, the result is that
/// page of `per_page` records.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
    async fn insert(&self, post: &Post) -> Result<(), StoreError>;
    async fn save(&self, post: &Post) -> Result<(), StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
    async fn list(
        &self,
        category: Option<&str>,
        page: Option<u32>,
        per_page: u32,
    ) -> Result<Vec<Post>, StoreError>;
    async fn count(&self) -> Result<i64, StoreError>;
}

/// Postgres-backed post store
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, description, category, media_url,
                               media_public_id, media_content_type, likes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.category)
        .bind(&post.media_url)
        .bind(&post.media_public_id)
        .bind(&post.media_content_type)
        .bind(&post.likes)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, description = $3, category = $4, media_url = $5,
                media_public_id = $6, media_content_type = $7, likes = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.category)
        .bind(&post.media_url)
        .bind(&post.media_public_id)
        .bind(&post.media_content_type)
        .bind(&post.likes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(
        &self,
        category: Option<&str>,
        page: Option<u32>,
        per_page: u32,
    ) -> Result<Vec<Post>, StoreError> {
        let offset = page.map(|p| (p.max(1) - 1) as i64 * per_page as i64);

        let posts = match (category, offset) {
            (Some(category), Some(offset)) => {
                sqlx::query_as::<_, Post>(&format!(
                    "SELECT {POST_COLUMNS} FROM posts WHERE category = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                ))
                .bind(category)
                .bind(per_page as i64)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(category), None) => {
                sqlx::query_as::<_, Post>(&format!(
                    "SELECT {POST_COLUMNS} FROM posts WHERE category = $1 \
                     ORDER BY created_at DESC"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            (None, Some(offset)) => {
                sqlx::query_as::<_, Post>(&format!(
                    "SELECT {POST_COLUMNS} FROM posts \
                     ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                ))
                .bind(per_page as i64)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            (None, None) => {
                sqlx::query_as::<_, Post>(&format!(
                    "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(posts)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
