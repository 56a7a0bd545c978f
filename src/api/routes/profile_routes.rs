//! Profile Routes
//!
//! 用户、个人主页与关注操作的 API 路由。

use crate::api::handlers::{follow_handler::*, profile_handler::*};
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::app_state::AppState;

/// 创建个人主页路由器
pub fn create_profile_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_user))
        .route("/users/:username", delete(delete_user))
        .route("/profiles/:username", get(get_profile))
        .route("/profiles/:username/followers", get(list_followers))
        .route("/profiles/:username/following", get(list_following))
        .route("/profiles/:username/follow", post(follow_author))
        .route("/profiles/:username/unfollow", post(unfollow_author))
        .route("/profiles/:username/toggle", post(toggle_follow))
}
