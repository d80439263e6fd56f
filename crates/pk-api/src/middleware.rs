//! patrika/crates/pk-api/src/middleware.rs Middleware
//!
//! Request logging and CORS for the Patrika API.

use actix_web::middleware::Logger;
use actix_cors::Cors;

// Returns the standard request logger for the Patrika API.
pub fn standard_middleware() -> Logger {
    // The 'default' logger outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

// Configures CORS (Cross-Origin Resource Sharing)
// Important if the reader UI and API ever live on different subdomains.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .max_age(3600)
}
