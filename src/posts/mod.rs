//! Posts Module
//!
//! User posts with an attached media file, a category, and per-account
//! likes. Media bytes are never stored here; they go to the external media
//! host and only the resulting URL and public id live on the record.
//!
//! # Module Structure
//!
//! ```text
//! posts/
//! ├── mod.rs       - Module exports
//! ├── model.rs     - Post record, validation, response types
//! ├── store.rs     - PostStore trait and Postgres implementation
//! └── handlers.rs  - HTTP handlers for /api/posts
//! ```

/// Post record and validation
pub mod model;

/// Post store contract and Postgres implementation
pub mod store;

/// HTTP handlers for post endpoints
pub mod handlers;

pub use model::{Post, PostResponse};
pub use store::{PgPostStore, PostStore};
