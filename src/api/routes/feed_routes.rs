//! Feed Routes

use crate::api::handlers::follow_handler::get_feed;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建信息流路由器
pub fn create_feed_router() -> Router<AppState> {
    Router::new().route("/feed", get(get_feed))
}
