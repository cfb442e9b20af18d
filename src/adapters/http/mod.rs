//! HTTP adapters - REST API implementations.
//!
//! `api_router` assembles the full application: deal endpoints behind the
//! auth middleware, an unauthenticated health probe, and the shared
//! trace/CORS/timeout layers.

pub mod deal;
pub mod middleware;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use tower_http::{cors::{AllowOrigin, CorsLayer}, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::ports::DealRepository;

pub use deal::{deal_routes, DealHandlers};
pub use middleware::{auth_middleware, AuthState, RequireAuth};

/// Transport options for the assembled router.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

impl From<&ServerConfig> for HttpOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            cors_origins: config.cors_origins_list(),
        }
    }
}

/// Builds the application router.
pub fn api_router(
    repository: Arc<dyn DealRepository>,
    validator: AuthState,
    options: &HttpOptions,
) -> Router {
    let deals = deal_routes(DealHandlers::new(repository))
        .layer(from_fn_with_state(validator, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api/deals", deals)
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_server_config() {
        let config = ServerConfig {
            request_timeout_secs: 12,
            cors_origins: Some("https://app.manaiger.example, ,http://localhost:3000".to_string()),
            ..ServerConfig::default()
        };

        let options = HttpOptions::from(&config);

        assert_eq!(options.request_timeout, Duration::from_secs(12));
        assert_eq!(
            options.cors_origins,
            vec!["https://app.manaiger.example", "http://localhost:3000"]
        );
    }
}
