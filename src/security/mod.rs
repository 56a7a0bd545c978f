//! Security Module
//!
//! Provides security features for the Blogfeed API:
//! - Authentication (API Key + JWT)
//! - Caller identity resolution
//! - Security Middleware

pub mod auth;
pub mod middleware;

pub use auth::{
    ApiKeyAuth, Authenticator, Claims, CombinedAuthenticator, Credentials, JwtAuth,
    JwtTokenGenerator,
};
pub use middleware::{CurrentUser, identity_middleware, login_redirect, security_headers_middleware};
