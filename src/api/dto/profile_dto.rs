//! 用户与个人主页 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::post_dto::PostPageResponse;
use crate::models::{FollowOutcome, User, Username};

/// 注册用户请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserRequest {
    /// 用户名
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    /// 邮箱（可选）
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

/// 用户响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            date_joined: user.date_joined,
        }
    }
}

/// 个人主页
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub author: UserResponse,
    /// 当前用户是否关注了该作者
    pub is_follow: bool,
    pub followers_count: u64,
    pub following_count: u64,
    pub posts: PostPageResponse,
}

/// 关注列表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameListResponse {
    pub username: String,
    pub users: Vec<String>,
    pub total: usize,
}

impl UsernameListResponse {
    pub fn new(username: &Username, users: Vec<Username>) -> Self {
        Self {
            username: username.to_string(),
            total: users.len(),
            users: users.into_iter().map(|u| u.to_string()).collect(),
        }
    }
}

/// 关注操作结果，随重定向一同写入响应头
pub fn outcome_header_value(outcome: FollowOutcome) -> &'static str {
    match outcome {
        FollowOutcome::Followed => "followed",
        FollowOutcome::AlreadyFollowing => "already_following",
        FollowOutcome::SelfFollowIgnored => "self_follow_ignored",
        FollowOutcome::Unfollowed => "unfollowed",
        FollowOutcome::NotFollowing => "not_following",
    }
}
