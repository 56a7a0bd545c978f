//! 关注关系模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Username;

/// 有向关注边：`follower` 关注 `followed`
///
/// 只能通过 [`FollowEdge::new`] 构造，自关注的边无法被创建。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowEdge {
    follower: Username,
    followed: Username,
    created_at: DateTime<Utc>,
}

impl FollowEdge {
    /// 创建关注边，`follower == followed` 时返回 `None`
    pub fn new(follower: &Username, followed: &Username) -> Option<Self> {
        if follower == followed {
            return None;
        }

        Some(Self {
            follower: follower.clone(),
            followed: followed.clone(),
            created_at: Utc::now(),
        })
    }

    /// 跳过自关注检查，仅供测试存储层的防线
    #[cfg(test)]
    pub(crate) fn unchecked(follower: &Username, followed: &Username) -> Self {
        Self {
            follower: follower.clone(),
            followed: followed.clone(),
            created_at: Utc::now(),
        }
    }

    /// 关注者
    pub fn follower(&self) -> &Username {
        &self.follower
    }

    /// 被关注的作者
    pub fn followed(&self) -> &Username {
        &self.followed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 存储层使用的唯一键
    pub fn key(&self) -> (Username, Username) {
        (self.follower.clone(), self.followed.clone())
    }
}

/// 关注操作结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    /// 新建了关注边
    Followed,
    /// 已关注，未做改动
    AlreadyFollowing,
    /// 自关注被忽略
    SelfFollowIgnored,
    /// 删除了关注边
    Unfollowed,
    /// 本就未关注
    NotFollowing,
}

impl FollowOutcome {
    /// 是否改变了关注关系
    pub fn changed(&self) -> bool {
        matches!(self, FollowOutcome::Followed | FollowOutcome::Unfollowed)
    }
}

/// 关注统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowStats {
    /// 粉丝数
    pub followers_count: u64,
    /// 关注数
    pub following_count: u64,
}
