//! # pk-api
//!
//! The web routing and orchestration layer for Patrika.

pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the routes for the journal.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            // Canonical article address (e.g., /author/alice/quantum-computing-basics)
            .route("/author/{author}/{slug}", web::get().to(handlers::author_article))
            // Direct id links used by card components
            .route("/article/{id}", web::get().to(handlers::article_by_id))
            // The article feed
            .route("/articles", web::get().to(handlers::list_articles))
            // The publishing endpoint
            .route("/articles", web::post().to(handlers::create_article))
            // One-time slug migration for legacy rows
            .route("/admin/backfill-slugs", web::post().to(handlers::backfill_slugs)),
    );
}
