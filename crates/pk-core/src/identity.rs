//! # Author Identity
//!
//! Decides whether a URL author token legitimately denotes an article's
//! author. Pure functions; no I/O.

use crate::models::AuthorProfile;
use uuid::Uuid;

/// The displayable author token: the profile username when present and
/// non-empty, else a synthetic `user_` token built from the first 8 hex
/// characters of the author id.
pub fn display_identity(author_id: Uuid, profile: Option<&AuthorProfile>) -> String {
    match profile.and_then(|p| p.username.as_deref()) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("user_{}", &author_id.simple().to_string()[..8]),
    }
}

/// Dual acceptance: historical links may encode either the displayable
/// identity or the raw author id, so both forms are honored.
pub fn matches(author_id: Uuid, profile: Option<&AuthorProfile>, token: &str) -> bool {
    if token == display_identity(author_id, profile) {
        return true;
    }
    Uuid::parse_str(token).map(|id| id == author_id).unwrap_or(false)
}
