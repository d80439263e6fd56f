//! # Domain Models
//!
//! These structs represent the core entities of Patrika.
//! We use UUID v7 for time-ordered, globally unique identification.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// A published article.
///
/// `slug` is present only on the newest schema generation. It is computed
/// once at creation and never rewritten: edits to `title` do not regenerate
/// it, because the stability of public URLs takes priority over slug/title
/// consistency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    /// Rich text; opaque to the addressing core
    pub content: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub category: String,
    pub thumbnail_url: Option<String>,
    pub author_id: Uuid,
    /// Used for deterministic newest-first ordering during corpus scans
    pub created_at: DateTime<Utc>,
    /// The canonical URL token, scoped to `(author_id, slug)`; legacy rows lack it
    pub slug: Option<String>,
}

/// How a record participates in slug resolution, decided by whether a
/// persisted slug is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// The persisted slug is compared directly (indexed lookup or scan)
    PersistedSlug,
    /// The slug must be recomputed from the title on every read
    LegacyScan,
}

impl Article {
    pub fn resolution_mode(&self) -> ResolutionMode {
        match self.slug.as_deref() {
            Some(s) if !s.is_empty() => ResolutionMode::PersistedSlug,
            _ => ResolutionMode::LegacyScan,
        }
    }
}

/// An author's public profile. `username` is a human-chosen handle and may
/// be absent; display falls back to a synthetic token (see `identity`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub author_id: Uuid,
    pub username: Option<String>,
}

/// A resolved lookup: the article plus the displayable author string.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub author: String,
}
