//! Group Routes

use crate::api::handlers::group_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建分组路由器
pub fn create_group_router() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/:slug", get(group_posts))
}
