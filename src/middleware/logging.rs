use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Initialize the tracing system.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(&config.level)));

    let registry = Registry::default().with(env_filter);

    if config.json_format {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339()),
            )
            .init();
    }

    tracing::info!(
        json = config.json_format,
        "Tracing initialized at level {}",
        level_directive(&config.level)
    );
}

fn level_directive(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info", // Default to info
    }
}

/// Log every request line with the resulting status and elapsed time
pub async fn log_request<B>(request: Request<B>, next: Next<B>) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::info!("New request: {} {}", method, uri);

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if response.status().is_success() {
        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms,
            "A new response has been sent: {} {}",
            method,
            uri
        );
    } else {
        tracing::warn!(
            status = response.status().as_u16(),
            elapsed_ms,
            "Request failed: {} {}",
            method,
            uri
        );
    }

    response
}
