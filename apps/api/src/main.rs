mod config;
mod errors;
mod html;
mod mailer;
mod quote;
mod rate_limit;
mod resume;
mod routes;
mod state;
mod validate;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::mailer::SmtpMailer;
use crate::rate_limit::{RateLimiter, DEFAULT_LIMIT, DEFAULT_WINDOW};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Tracing targets use the crate name with underscores.
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting site API v{}", env!("CARGO_PKG_VERSION"));

    // Outbound mail goes through the SMTP mailer; handlers only see the trait.
    let mailer = Arc::new(SmtpMailer);

    // Per-IP throttle for résumé submissions.
    let rate_limiter = Arc::new(RateLimiter::new(DEFAULT_LIMIT, DEFAULT_WINDOW));

    let state = AppState {
        config: config.clone(),
        mailer,
        rate_limiter,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
