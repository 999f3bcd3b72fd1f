pub mod app;
pub mod config;
mod error;
pub mod newsletter_client;
pub mod templ_manager;
pub mod web;

// re-export
pub use app::{serve, App, AppState};
pub use error::{Error, Result};
pub use newsletter_client::NewsletterClient;

use tracing_subscriber::EnvFilter;

/// Pretty, timeless console logging for local development.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mailgate=debug,tower_http=debug")),
        )
        .without_time()
        .init();
}

pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
