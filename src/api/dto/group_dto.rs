//! 分组 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::post_dto::PostPageResponse;
use crate::models::Group;

/// 创建分组请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 50))]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// 分组响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub slug: String,
    pub title: String,
    pub description: String,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            slug: group.slug,
            title: group.title,
            description: group.description,
        }
    }
}

/// 分组页面：分组信息及其帖子
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPageResponse {
    pub group: GroupResponse,
    pub posts: PostPageResponse,
}
