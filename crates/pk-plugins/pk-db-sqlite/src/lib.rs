//! # pk-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational
//! model and the `pk-core` domain models. New rows always carry a persisted
//! slug; legacy rows (`slug IS NULL`) predate slug persistence and are
//! served by the resolver's corpus scan until `backfill_slugs` migrates them.

use async_trait::async_trait;
use pk_core::error::{AppError, Result};
use pk_core::models::{Article, AuthorProfile};
use pk_core::slug::slug_for_title;
use pk_core::traits::ArticleRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

pub struct SqliteArticleRepo {
    pool: SqlitePool,
}

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

fn storage_err(e: sqlx::Error) -> AppError {
    AppError::StorageUnavailable(e.to_string())
}

fn row_to_article(row: &SqliteRow) -> Article {
    Article {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        title: row.get("title"),
        content: row.get("content"),
        abstract_text: row.get("abstract"),
        category: row.get("category"),
        thumbnail_url: row.get("thumbnail_url"),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        created_at: row.get("created_at"),
        slug: row.get("slug"),
    }
}

fn row_to_profile(row: &SqliteRow) -> AuthorProfile {
    AuthorProfile {
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        username: row.get("username"),
    }
}

impl SqliteArticleRepo {
    /// Connects (creating the database file if needed) and ensures the
    /// schema. The partial unique index is the write-time enforcement of
    /// `(author_id, slug)` uniqueness; legacy rows are exempt via the
    /// `WHERE slug IS NOT NULL` clause.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(storage_err)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(storage_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS profiles (
                author_id BLOB PRIMARY KEY,
                username TEXT UNIQUE
            )",
        )
        .execute(&pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS articles (
                id BLOB PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                abstract TEXT NOT NULL,
                category TEXT NOT NULL,
                thumbnail_url TEXT,
                author_id BLOB NOT NULL,
                created_at TEXT NOT NULL,
                slug TEXT
            )",
        )
        .execute(&pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_articles_author_slug
             ON articles (author_id, slug) WHERE slug IS NOT NULL",
        )
        .execute(&pool)
        .await
        .map_err(storage_err)?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ArticleRepo for SqliteArticleRepo {
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(row.as_ref().map(row_to_article))
    }

    /// The indexed point lookup backing the persisted-slug resolution mode.
    async fn find_by_author_and_slug(&self, author_id: Uuid, slug: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE author_id = ? AND slug = ?")
            .bind(uuid_to_blob(author_id))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(row.as_ref().map(row_to_article))
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query("SELECT * FROM articles ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(rows.iter().map(row_to_article).collect())
    }

    /// Inserts a new-generation row. The slug must already be assigned
    /// (callers substitute the fallback token for empty titles); a
    /// `(author_id, slug)` collision is rejected as `Conflict` rather than
    /// shadowing the earlier article.
    async fn create_article(&self, article: Article) -> Result<()> {
        let slug = match article.slug.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                return Err(AppError::Validation(
                    "article must carry a non-empty slug".to_string(),
                ))
            }
        };

        sqlx::query(
            "INSERT INTO articles (id, title, content, abstract, category, thumbnail_url, author_id, created_at, slug)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(article.id))
        .bind(article.title)
        .bind(article.content)
        .bind(article.abstract_text)
        .bind(article.category)
        .bind(article.thumbnail_url)
        .bind(uuid_to_blob(article.author_id))
        .bind(article.created_at)
        .bind(&slug)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("slug {slug:?} already exists for this author"))
            }
            _ => storage_err(e),
        })?;
        Ok(())
    }

    async fn get_profile(&self, author_id: Uuid) -> Result<Option<AuthorProfile>> {
        let row = sqlx::query("SELECT author_id, username FROM profiles WHERE author_id = ?")
            .bind(uuid_to_blob(author_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(row.as_ref().map(row_to_profile))
    }

    async fn find_profile_by_username(&self, username: &str) -> Result<Option<AuthorProfile>> {
        let row = sqlx::query("SELECT author_id, username FROM profiles WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(row.as_ref().map(row_to_profile))
    }

    async fn create_profile(&self, profile: AuthorProfile) -> Result<()> {
        sqlx::query("INSERT INTO profiles (author_id, username) VALUES (?, ?)")
            .bind(uuid_to_blob(profile.author_id))
            .bind(profile.username)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict("username already taken".to_string())
                }
                _ => storage_err(e),
            })?;
        Ok(())
    }

    /// One-time migration for legacy rows: recompute each missing slug from
    /// the title (with the empty-title fallback) and persist it. A row whose
    /// recomputed slug collides with an existing `(author_id, slug)` pair is
    /// left unslugged; persisted slugs are public URLs and are never
    /// rewritten to make room.
    async fn backfill_slugs(&self) -> Result<u64> {
        let rows = sqlx::query("SELECT id, title FROM articles WHERE slug IS NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        let mut updated = 0u64;
        for row in rows {
            let id = blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice());
            let title: String = row.get("title");
            let slug = slug_for_title(&title, id);

            let result = sqlx::query("UPDATE articles SET slug = ? WHERE id = ?")
                .bind(&slug)
                .bind(uuid_to_blob(id))
                .execute(&self.pool)
                .await;

            match result {
                Ok(_) => updated += 1,
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    log::warn!("backfill: slug {slug:?} collides for article {id}, leaving row unslugged");
                }
                Err(e) => return Err(storage_err(e)),
            }
        }
        Ok(updated)
    }
}
