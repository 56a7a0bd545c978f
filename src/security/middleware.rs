//! Security Middleware Module
//!
//! Provides Axum middleware for caller identification and security headers,
//! plus the extractors handlers use to read the resolved identity.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use tracing::{debug, warn};

use crate::api::app_state::AppState;
use crate::error::AppError;
use crate::models::{Identity, Username};
use crate::security::auth::Credentials;

/// Identity middleware
///
/// Absent credentials leave the caller anonymous. Credentials that are present
/// but invalid are rejected with `401`.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = Credentials::from_headers(req.headers());

    let identity = if credentials.is_empty() {
        Identity::Anonymous
    } else {
        let claims = state
            .authenticator
            .authenticate(&credentials)
            .await
            .inspect_err(|e| warn!("Rejected credentials: {}", e))?;
        Identity::User(claims.username()?)
    };

    debug!("Request identity: {:?}", identity);
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Build the login boundary redirect carrying the original path in `next`
pub fn login_redirect(login_url: &str, next: &str) -> AppError {
    AppError::LoginRequired(format!("{}?next={}", login_url, urlencoding::encode(next)))
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().unwrap_or_default())
    }
}

/// Authenticated caller
///
/// Rejects anonymous callers with a redirect to the login boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser(pub Username);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(Identity::User(username)) = parts.extensions.get::<Identity>() {
            return Ok(CurrentUser(username.clone()));
        }

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let next = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        debug!("Anonymous request to {} needs login", next);
        Err(login_redirect(&state.login_url, &next))
    }
}

/// Security headers middleware
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("X-XSS-Protection", HeaderValue::from_static("1; mode=block"));
    headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'self'"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
