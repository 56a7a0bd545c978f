//! 关注关系服务
//!
//! 关注关系只有一张有向边表，从关注者和作者两侧查询时使用两个显式命名的操作，
//! 不根据调用方推断角色。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::models::{FollowEdge, FollowOutcome, FollowStats, Identity, Username};
use crate::storage::repository::FollowRepository;

/// 关注关系服务 trait
///
/// 对合法的用户身份，关注与取消关注从不失败：自关注和重复关注都被静默吸收。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipService: Send + Sync {
    /// `follower` 是否关注了 `followed`，匿名身份恒为 `false`
    async fn exists(&self, follower: &Identity, followed: &Username) -> Result<bool>;

    /// 从关注者一侧提问：`follower` 是否关注了 `author`
    async fn is_following_user(&self, follower: &Identity, author: &Username) -> Result<bool> {
        self.exists(follower, author).await
    }

    /// 从作者一侧提问：`author` 是否被 `follower` 关注
    async fn is_followed_by(&self, author: &Username, follower: &Identity) -> Result<bool> {
        self.exists(follower, author).await
    }

    /// 关注作者，幂等
    async fn follow(&self, follower: &Username, followed: &Username) -> Result<FollowOutcome>;

    /// 取消关注，幂等
    async fn unfollow(&self, follower: &Username, followed: &Username) -> Result<FollowOutcome>;

    /// 已关注则取消，否则关注
    async fn toggle(&self, follower: &Username, followed: &Username) -> Result<FollowOutcome>;

    /// 用户关注的作者
    async fn following(&self, user: &Username) -> Result<Vec<Username>>;

    /// 关注该作者的用户
    async fn followers(&self, user: &Username) -> Result<Vec<Username>>;

    /// 关注统计
    async fn stats(&self, user: &Username) -> Result<FollowStats>;
}

/// 关注关系服务实现
pub struct RelationshipServiceImpl {
    repository: Arc<dyn FollowRepository>,
}

impl RelationshipServiceImpl {
    pub fn new(repository: Arc<dyn FollowRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RelationshipService for RelationshipServiceImpl {
    async fn exists(&self, follower: &Identity, followed: &Username) -> Result<bool> {
        match follower.user() {
            Some(follower) => self.repository.exists(follower, followed).await,
            None => Ok(false),
        }
    }

    async fn follow(&self, follower: &Username, followed: &Username) -> Result<FollowOutcome> {
        let Some(edge) = FollowEdge::new(follower, followed) else {
            debug!("Ignoring self-follow by {}", follower);
            return Ok(FollowOutcome::SelfFollowIgnored);
        };

        if self.repository.insert(&edge).await? {
            debug!("{} now follows {}", follower, followed);
            Ok(FollowOutcome::Followed)
        } else {
            Ok(FollowOutcome::AlreadyFollowing)
        }
    }

    async fn unfollow(&self, follower: &Username, followed: &Username) -> Result<FollowOutcome> {
        if self.repository.remove(follower, followed).await? {
            debug!("{} unfollowed {}", follower, followed);
            Ok(FollowOutcome::Unfollowed)
        } else {
            Ok(FollowOutcome::NotFollowing)
        }
    }

    async fn toggle(&self, follower: &Username, followed: &Username) -> Result<FollowOutcome> {
        if self.repository.exists(follower, followed).await? {
            self.unfollow(follower, followed).await
        } else {
            self.follow(follower, followed).await
        }
    }

    async fn following(&self, user: &Username) -> Result<Vec<Username>> {
        self.repository.list_followed(user).await
    }

    async fn followers(&self, user: &Username) -> Result<Vec<Username>> {
        self.repository.list_followers(user).await
    }

    async fn stats(&self, user: &Username) -> Result<FollowStats> {
        Ok(FollowStats {
            followers_count: self.repository.count_followers(user).await?,
            following_count: self.repository.count_followed(user).await?,
        })
    }
}

/// 创建关注关系服务
pub fn create_relationship_service(
    repository: Arc<dyn FollowRepository>,
) -> Box<dyn RelationshipService> {
    Box::new(RelationshipServiceImpl::new(repository))
}
