use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Comment, FollowEdge, Group, NewComment, NewPost, Post, PostPatch, PostQuery, User, Username,
};

/// 用户仓储 trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户，用户名已存在时返回验证错误
    async fn create(&self, user: &User) -> Result<User>;

    /// 根据用户名获取用户
    async fn get(&self, username: &Username) -> Result<Option<User>>;

    /// 删除用户
    ///
    /// 级联删除：该用户参与的全部关注边、其帖子（连同帖子下的评论）以及其评论。
    async fn delete(&self, username: &Username) -> Result<bool>;

    /// 列出用户
    async fn list(&self, limit: usize, start: usize) -> Result<Vec<User>>;
}

/// 分组仓储 trait
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// 创建分组，slug 已存在时返回验证错误
    async fn create(&self, group: &Group) -> Result<Group>;

    async fn get(&self, slug: &str) -> Result<Option<Group>>;

    /// 删除分组，分组下的帖子解除分组
    async fn delete(&self, slug: &str) -> Result<bool>;

    async fn list(&self) -> Result<Vec<Group>>;
}

/// 帖子仓储 trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// 创建帖子并分配 ID
    async fn create(&self, post: NewPost) -> Result<Post>;

    async fn get(&self, id: u64) -> Result<Option<Post>>;

    async fn update(&self, id: u64, patch: &PostPatch) -> Result<Option<Post>>;

    /// 删除帖子及其评论
    async fn delete(&self, id: u64) -> Result<bool>;

    /// 按条件列出帖子，发布时间倒序，同一时间按 ID 倒序
    async fn list(&self, query: &PostQuery, limit: usize, start: usize) -> Result<Vec<Post>>;

    /// 按条件统计数量
    async fn count(&self, query: &PostQuery) -> Result<u64>;
}

/// 评论仓储 trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment>;

    /// 列出帖子的评论，最新的在前
    async fn list_by_post(&self, post_id: u64) -> Result<Vec<Comment>>;

    async fn count_by_post(&self, post_id: u64) -> Result<u64>;
}

/// 关注关系仓储 trait
///
/// `(follower, followed)` 在存储层唯一。
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// 插入关注边，已存在时返回 `false` 且不做改动
    async fn insert(&self, edge: &FollowEdge) -> Result<bool>;

    /// 删除关注边，不存在时返回 `false`
    async fn remove(&self, follower: &Username, followed: &Username) -> Result<bool>;

    async fn exists(&self, follower: &Username, followed: &Username) -> Result<bool>;

    /// 被 `follower` 关注的作者
    async fn list_followed(&self, follower: &Username) -> Result<Vec<Username>>;

    /// 关注了 `followed` 的用户
    async fn list_followers(&self, followed: &Username) -> Result<Vec<Username>>;

    async fn count_followed(&self, follower: &Username) -> Result<u64>;

    async fn count_followers(&self, followed: &Username) -> Result<u64>;
}
