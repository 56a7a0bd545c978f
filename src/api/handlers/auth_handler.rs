use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::app_state::AppState, error::AppError, error::ErrorResponse,
    security::middleware::CurrentUser,
};

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub next: Option<String>,
}

/// 登录入口
///
/// 未登录的请求被重定向到这里，响应中带回原始地址。
pub async fn login(Query(params): Query<LoginParams>) -> impl IntoResponse {
    let mut body = ErrorResponse::new(
        "LOGIN_REQUIRED",
        "Authenticate with an API key or a bearer token",
    );
    if let Some(next) = params.next.as_deref() {
        body = body.with_details(next);
    }
    (StatusCode::UNAUTHORIZED, Json(body))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
}

/// 为当前用户签发 JWT
pub async fn issue_token(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let token = state.token_generator.generate_token(&user)?;
    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
    }))
}
