//! Authentication Module
//!
//! Resolves request credentials into the username of the caller:
//! - API Key authentication (key -> username mapping from configuration)
//! - JWT (JSON Web Token) authentication, `sub` carries the username

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::config::SecurityConfig;
use crate::error::{AppError, Result};
use crate::models::Username;

/// Credentials for authentication
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    /// API key (if provided)
    pub api_key: Option<String>,
    /// JWT token (if provided)
    pub jwt_token: Option<String>,
}

impl Credentials {
    pub fn new(api_key: Option<String>, jwt_token: Option<String>) -> Self {
        Self { api_key, jwt_token }
    }

    /// Parse an `Authorization` header value (`ApiKey <key>` or `Bearer <token>`)
    pub fn from_authorization_header(auth_header: Option<&str>) -> Self {
        match auth_header {
            Some(header) => {
                if let Some(key) = header.strip_prefix("ApiKey ") {
                    Self::new(Some(key.trim().to_string()), None)
                } else if let Some(token) = header.strip_prefix("Bearer ") {
                    Self::new(None, Some(token.trim().to_string()))
                } else {
                    Self::default()
                }
            }
            None => Self::default(),
        }
    }

    /// Extract credentials from request headers.
    ///
    /// `Authorization` wins over `X-API-Key` when both are present.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let from_auth = Self::from_authorization_header(
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
        );
        if !from_auth.is_empty() {
            return from_auth;
        }

        match headers.get("X-API-Key").and_then(|v| v.to_str().ok()) {
            Some(key) => Self::new(Some(key.to_string()), None),
            None => Self::default(),
        }
    }

    /// No credentials at all, the caller is anonymous
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.jwt_token.is_none()
    }
}

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token not before timestamp
    pub nbf: usize,
    /// Issued at timestamp
    pub iat: usize,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Unique token ID
    pub jti: String,
}

impl Claims {
    pub fn new(sub: String, expiry_seconds: u64, issuer: String, audience: String) -> Self {
        let iat = Utc::now().timestamp() as usize;

        Self {
            sub,
            exp: iat + expiry_seconds as usize,
            nbf: iat,
            iat,
            iss: issuer,
            aud: audience,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// The authenticated username
    pub fn username(&self) -> Result<Username> {
        Username::parse(&self.sub)
            .map_err(|_| AppError::Authentication(format!("Invalid subject: {:?}", self.sub)))
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() as usize > self.exp
    }
}

/// Authentication trait for different authentication methods
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate credentials and return the claims of the caller
    async fn authenticate(&self, credentials: &Credentials) -> Result<Claims>;
    /// Get the authenticator type
    fn authenticator_type(&self) -> &'static str;
}

/// API Key based authentication
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    /// Valid API keys map (key -> username)
    valid_keys: HashMap<String, String>,
}

impl ApiKeyAuth {
    pub fn new(valid_keys: HashMap<String, String>) -> Self {
        Self { valid_keys }
    }

    pub fn is_enabled(&self) -> bool {
        !self.valid_keys.is_empty()
    }
}

#[async_trait]
impl Authenticator for ApiKeyAuth {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Claims> {
        let api_key = credentials
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::Authentication("No API key provided".to_string()))?;

        let username = self
            .valid_keys
            .get(api_key)
            .ok_or_else(|| AppError::Authentication("Invalid API key".to_string()))?;

        // API keys don't expire
        Ok(Claims {
            sub: username.clone(),
            exp: i32::MAX as usize,
            nbf: 0,
            iat: Utc::now().timestamp() as usize,
            iss: "blogfeed".to_string(),
            aud: "blogfeed-api".to_string(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    fn authenticator_type(&self) -> &'static str {
        "ApiKey"
    }
}

/// JWT based authentication
#[derive(Clone)]
pub struct JwtAuth {
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl JwtAuth {
    pub fn new(secret: &str, issuer: String, audience: String) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }

    /// Validate a token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.clone()]);
        validation.set_audience(&[self.audience.clone()]);
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| AppError::Authentication(format!("Invalid JWT token: {}", e)))
    }
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for JwtAuth {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Claims> {
        let jwt_token = credentials
            .jwt_token
            .as_ref()
            .ok_or_else(|| AppError::Authentication("No JWT token provided".to_string()))?;

        self.validate_token(jwt_token)
    }

    fn authenticator_type(&self) -> &'static str {
        "JWT"
    }
}

/// Combined authenticator that tries API key first, then JWT
#[derive(Debug, Clone)]
pub struct CombinedAuthenticator {
    api_key_auth: Option<ApiKeyAuth>,
    jwt_auth: Option<JwtAuth>,
}

impl CombinedAuthenticator {
    pub fn new(api_key_auth: Option<ApiKeyAuth>, jwt_auth: Option<JwtAuth>) -> Self {
        Self {
            api_key_auth,
            jwt_auth,
        }
    }

    /// Create from the security section of the configuration
    pub fn from_config(config: &SecurityConfig) -> Self {
        let api_key_auth = Some(ApiKeyAuth::new(config.api_keys.clone()))
            .filter(ApiKeyAuth::is_enabled);

        let jwt_auth = if config.jwt_secret.is_empty() {
            None
        } else {
            Some(JwtAuth::new(
                &config.jwt_secret,
                config.jwt_issuer.clone(),
                config.jwt_audience.clone(),
            ))
        };

        Self::new(api_key_auth, jwt_auth)
    }
}

#[async_trait]
impl Authenticator for CombinedAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Claims> {
        if credentials.api_key.is_some() {
            if let Some(api_key_auth) = &self.api_key_auth {
                return api_key_auth.authenticate(credentials).await;
            }
        }

        if credentials.jwt_token.is_some() {
            if let Some(jwt_auth) = &self.jwt_auth {
                return jwt_auth.authenticate(credentials).await;
            }
        }

        Err(AppError::Authentication(
            "No valid authentication method provided".to_string(),
        ))
    }

    fn authenticator_type(&self) -> &'static str {
        "Combined"
    }
}

/// JWT token generation helper
pub struct JwtTokenGenerator {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    expiry_seconds: u64,
}

impl JwtTokenGenerator {
    pub fn new(secret: &str, issuer: String, audience: String, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            expiry_seconds,
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
            config.jwt_expiry_seconds,
        )
    }

    /// Generate a token whose subject is `username`
    pub fn generate_token(&self, username: &Username) -> Result<String> {
        let claims = Claims::new(
            username.to_string(),
            self.expiry_seconds,
            self.issuer.clone(),
            self.audience.clone(),
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Authentication(format!("Failed to generate token: {}", e)))
    }
}
