use std::sync::Arc;

use crate::config::Config;
use crate::mailer::Mailer;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Outbound mail seam. Default: `SmtpMailer`. Tests swap in a recording mock.
    pub mailer: Arc<dyn Mailer>,
    /// Per-IP throttle for the résumé endpoint.
    pub rate_limiter: Arc<RateLimiter>,
}
