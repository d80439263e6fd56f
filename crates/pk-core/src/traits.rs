//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::error::Result;
use crate::models::{Article, AuthorProfile};
use uuid::Uuid;

/// Data persistence contract for articles and author profiles.
///
/// Storage failures surface as `AppError::StorageUnavailable`, never as
/// `NotFound`; an absent row is `Ok(None)`. Write-time uniqueness of
/// `(author_id, slug)` is enforced here, not by the resolver.
#[async_trait]
pub trait ArticleRepo: Send + Sync {
    // Article Operations
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>>;
    /// Indexed point lookup for the persisted-slug resolution mode.
    async fn find_by_author_and_slug(&self, author_id: Uuid, slug: &str) -> Result<Option<Article>>;
    /// Bulk read of the full corpus, newest first. Used by the legacy scan
    /// and the feed; O(n) per call, no caching.
    async fn list_articles(&self) -> Result<Vec<Article>>;
    /// Rejects a duplicate `(author_id, slug)` with `Conflict`.
    async fn create_article(&self, article: Article) -> Result<()>;

    // Profile Operations
    async fn get_profile(&self, author_id: Uuid) -> Result<Option<AuthorProfile>>;
    async fn find_profile_by_username(&self, username: &str) -> Result<Option<AuthorProfile>>;
    async fn create_profile(&self, profile: AuthorProfile) -> Result<()>;

    // Migration Operations
    /// One-time backfill: persist recomputed slugs onto legacy rows.
    /// Returns the number of rows updated.
    async fn backfill_slugs(&self) -> Result<u64>;
}
