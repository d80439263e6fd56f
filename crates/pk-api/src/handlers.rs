//! # pk-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use pk_core::error::AppError;
use pk_core::identity;
use pk_core::models::{Article, ResolvedArticle};
use pk_core::resolver::ArticleResolver;
use pk_core::slug::slug_for_title;
use pk_core::traits::ArticleRepo;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Box<dyn ArticleRepo>,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub category: String,
    pub thumbnail_url: Option<String>,
    pub author_id: Uuid,
}

/// Resolves the canonical article address `/author/{author}/{slug}`.
pub async fn author_article(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (author_token, slug) = path.into_inner();

    let resolver = ArticleResolver::new(data.repo.as_ref());
    match resolver.resolve(&author_token, &slug).await {
        Ok(resolved) => HttpResponse::Ok().json(resolved),
        Err(err) => error_response(err),
    }
}

/// Direct id lookup used by card links (`/article/{id}`).
pub async fn article_by_id(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let article = match data.repo.get_article(id).await {
        Ok(Some(article)) => article,
        Ok(None) => return error_response(AppError::NotFound),
        Err(err) => return error_response(err),
    };

    match with_author(data.repo.as_ref(), article).await {
        Ok(resolved) => HttpResponse::Ok().json(resolved),
        Err(err) => error_response(err),
    }
}

/// The read-only article feed, newest first, with resolved display authors.
pub async fn list_articles(data: web::Data<AppState>) -> impl Responder {
    let articles = match data.repo.list_articles().await {
        Ok(articles) => articles,
        Err(err) => return error_response(err),
    };

    let mut feed = Vec::with_capacity(articles.len());
    for article in articles {
        match with_author(data.repo.as_ref(), article).await {
            Ok(resolved) => feed.push(resolved),
            Err(err) => return error_response(err),
        }
    }

    HttpResponse::Ok().json(feed)
}

/// Orchestrates article creation: the slug is computed exactly once here
/// and persisted with the row; it is never regenerated afterwards.
pub async fn create_article(
    data: web::Data<AppState>,
    form: web::Json<CreateArticleRequest>,
) -> impl Responder {
    let form = form.into_inner();
    if form.title.trim().is_empty() {
        return error_response(AppError::Validation("title must not be empty".to_string()));
    }

    let id = Uuid::now_v7();
    // Punctuation-only titles fall back to a hash token; an empty slug is
    // never persisted.
    let slug = slug_for_title(&form.title, id);

    let article = Article {
        id,
        title: form.title,
        content: form.content,
        abstract_text: form.abstract_text,
        category: form.category,
        thumbnail_url: form.thumbnail_url,
        author_id: form.author_id,
        created_at: Utc::now(),
        slug: Some(slug.clone()),
    };

    if let Err(err) = data.repo.create_article(article.clone()).await {
        return error_response(err);
    }

    match with_author(data.repo.as_ref(), article).await {
        Ok(resolved) => {
            let location = format!("/author/{}/{}", resolved.author, slug);
            HttpResponse::Created()
                .insert_header(("Location", location))
                .json(resolved)
        }
        Err(err) => error_response(err),
    }
}

/// Runs the one-time slug backfill for legacy rows.
pub async fn backfill_slugs(data: web::Data<AppState>) -> impl Responder {
    match data.repo.backfill_slugs().await {
        Ok(updated) => {
            log::info!("slug backfill updated {updated} legacy rows");
            HttpResponse::Ok().json(json!({ "updated": updated }))
        }
        Err(err) => error_response(err),
    }
}

async fn with_author(
    repo: &dyn ArticleRepo,
    article: Article,
) -> pk_core::error::Result<ResolvedArticle> {
    let profile = repo.get_profile(article.author_id).await?;
    let author = identity::display_identity(article.author_id, profile.as_ref());
    Ok(ResolvedArticle { article, author })
}

/// Maps the error taxonomy to HTTP. `NotFound` and `AuthorMismatch` render
/// the identical 404 body: a slug's existence under another author must not
/// be observable. The distinction is kept in debug logs only.
fn error_response(err: AppError) -> HttpResponse {
    match err {
        AppError::NotFound | AppError::AuthorMismatch => {
            log::debug!("lookup failed: {err}");
            HttpResponse::NotFound().json(json!({ "error": "article not found" }))
        }
        AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({ "error": msg })),
        AppError::StorageUnavailable(msg) => {
            log::error!("storage unavailable: {msg}");
            HttpResponse::ServiceUnavailable().json(json!({ "error": "storage unavailable" }))
        }
    }
}
