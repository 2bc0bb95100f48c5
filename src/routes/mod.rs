//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! The routes module is organized into focused submodules:
//!
//! - **`router`** - Main router creation and route assembly
//! - **`api_routes`** - Public and protected route definitions
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - Public/protected route sets
//! ```
//!
//! # Route Organization
//!
//! Public routes handle registration, login, the emailed verification and
//! reset links, and post reads. Protected routes carry the session
//! middleware and handle account info plus post writes. Everything else
//! falls through to a 404 handler.

/// Main router creation
pub mod router;

/// Public and protected route definitions
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
