//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::config::config::ServerConfig;
use crate::error::AppError;
use crate::security::middleware::{identity_middleware, security_headers_middleware};
use axum::{Router, extract::DefaultBodyLimit, http::HeaderValue};
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::post_routes::create_post_router())
        .merge(routes::group_routes::create_group_router())
        .merge(routes::profile_routes::create_profile_router())
        .merge(routes::feed_routes::create_feed_router());

    Router::new()
        .nest("/api/v1", api)
        .nest("/auth", routes::auth_routes::create_auth_router())
        // Resolve the caller before any handler runs
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            identity_middleware,
        ))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(app_state)
}

/// 为路由器加上 HTTP 层：请求日志、CORS、超时和请求体大小限制
pub fn with_http_layers(router: Router, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    router
        .layer(DefaultBodyLimit::max(server.max_request_size))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn initialize_api(app_state: AppState, server: &ServerConfig) -> Result<Router, AppError> {
    tracing::info!("Initializing API router...");
    Ok(with_http_layers(create_router(app_state), server))
}
