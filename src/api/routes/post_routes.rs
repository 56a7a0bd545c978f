//! Post Routes
//!
//! 帖子与评论相关的 API 路由。

use crate::api::handlers::post_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建帖子路由器
pub fn create_post_router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/profiles/:username/posts/:post_id", get(get_post))
        .route("/profiles/:username/posts/:post_id/edit", post(edit_post))
        .route("/profiles/:username/posts/:post_id/comment", post(add_comment))
}
