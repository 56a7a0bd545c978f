//! 评论数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Username;

/// 评论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// 所属帖子
    pub post_id: u64,
    pub author: Username,
    pub text: String,
    /// 评论时间
    pub created: DateTime<Utc>,
}

/// 待创建的评论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: u64,
    pub author: Username,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl NewComment {
    pub fn new(post_id: u64, author: &Username, text: &str) -> Self {
        Self {
            post_id,
            author: author.clone(),
            text: text.to_string(),
            created: Utc::now(),
        }
    }

    pub fn into_comment(self, id: u64) -> Comment {
        Comment {
            id,
            post_id: self.post_id,
            author: self.author,
            text: self.text,
            created: self.created,
        }
    }
}
