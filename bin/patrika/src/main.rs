//! # Patrika Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_web::{web, App, HttpServer};
use pk_api::handlers::AppState;

// Feature-gated imports: storage backends are compiled to order
#[cfg(feature = "db-sqlite")]
use pk_db_sqlite::SqliteArticleRepo;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:patrika.db".to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // 1. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let repo = SqliteArticleRepo::new(&database_url)
        .await
        .expect("Failed to init SQLite");

    // 2. Wrap in AppState (dynamic dispatch keeps the API crate backend-agnostic)
    let state = web::Data::new(AppState {
        repo: Box::new(repo),
    });

    log::info!("Patrika starting on http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(pk_api::middleware::standard_middleware())
            .wrap(pk_api::middleware::cors_policy())
            .configure(pk_api::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
