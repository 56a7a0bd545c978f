//! 帖子 DTO
//!
//! 帖子、评论相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Comment, Post, PostPatch};
use crate::services::Page;

/// 分页查询参数
///
/// 页码按原样接收，非法值由分页逻辑容错处理。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// 发布帖子请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// 正文
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    /// 分组 slug
    #[serde(default)]
    pub group: Option<String>,
    /// 图片路径
    #[serde(default)]
    #[validate(length(max = 255))]
    pub image: Option<String>,
}

/// 编辑帖子请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditPostRequest {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub image: Option<String>,
}

impl From<EditPostRequest> for PostPatch {
    fn from(request: EditPostRequest) -> Self {
        Self {
            text: request.text,
            group: request.group,
            image: request.image,
        }
    }
}

/// 评论请求
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

/// 帖子响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: u64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date,
            author: post.author.to_string(),
            group: post.group,
            image: post.image,
        }
    }
}

/// 评论响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: u64,
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author.to_string(),
            text: comment.text,
            created: comment.created,
        }
    }
}

/// 帖子详情
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    /// 作者的帖子总数
    pub author_posts_count: u64,
    /// 当前用户是否关注了作者
    pub is_follow: bool,
    pub comments: Vec<CommentResponse>,
}

/// 帖子列表页
pub type PostPageResponse = Page<PostResponse>;
