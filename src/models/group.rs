//! 主题分组模型

use serde::{Deserialize, Serialize};

/// 帖子分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// 唯一短标识
    pub slug: String,
    /// 标题
    pub title: String,
    /// 描述
    pub description: String,
}

impl Group {
    pub fn new(slug: &str, title: &str, description: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}
