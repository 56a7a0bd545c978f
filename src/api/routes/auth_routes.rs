//! Auth Routes
//!
//! 登录入口与令牌签发，挂载在 `/auth` 下。

use crate::api::handlers::auth_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建认证路由器
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/token", post(issue_token))
}
