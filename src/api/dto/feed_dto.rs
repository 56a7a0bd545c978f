//! 信息流 DTO

use serde::{Deserialize, Serialize};

use super::post_dto::PostPageResponse;

/// 关注信息流页面
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    /// 信息流覆盖的作者
    pub authors: Vec<String>,
    pub posts: PostPageResponse,
}
