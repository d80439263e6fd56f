//! patrika/crates/pk-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Patrika:
//! slug generation, article resolution, and author identity matching.

pub mod models;
pub mod traits;
pub mod error;
pub mod slug;
pub mod identity;
pub mod resolver;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
