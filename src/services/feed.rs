//! 关注信息流
//!
//! 聚合用户关注的全部作者的帖子，按发布时间倒序，同一时间按帖子 ID 倒序。

use futures_util::stream::{self, Stream, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{Identity, Post, PostQuery, Username};
use crate::services::follow::RelationshipService;
use crate::storage::repository::PostRepository;

/// 某个用户的信息流
///
/// 惰性求值：构造时只确定作者集合，帖子在 `page` / `stream` 时才查询，
/// 每次调用都从头开始。
pub struct Feed {
    authors: Vec<Username>,
    posts: Arc<dyn PostRepository>,
}

impl Feed {
    fn new(authors: Vec<Username>, posts: Arc<dyn PostRepository>) -> Self {
        Self { authors, posts }
    }

    /// 信息流覆盖的作者
    pub fn authors(&self) -> &[Username] {
        &self.authors
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    fn query(&self) -> PostQuery {
        PostQuery::ByAuthors(self.authors.clone())
    }

    /// 帖子总数
    pub async fn count(&self) -> Result<u64> {
        if self.is_empty() {
            return Ok(0);
        }
        self.posts.count(&self.query()).await
    }

    /// 取出 `[offset, offset + limit)` 范围内的帖子
    pub async fn page(&self, offset: usize, limit: usize) -> Result<Vec<Post>> {
        if self.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        self.posts.list(&self.query(), limit, offset).await
    }

    /// 按批次拉取的帖子流
    pub fn stream(&self, batch_size: usize) -> impl Stream<Item = Result<Post>> + Send + '_ {
        let batch_size = batch_size.max(1);
        stream::try_unfold(0usize, move |offset| async move {
            let batch = self.page(offset, batch_size).await?;
            if batch.is_empty() {
                return Ok(None);
            }
            let next = offset + batch.len();
            Ok::<_, AppError>(Some((stream::iter(batch.into_iter().map(Ok::<Post, AppError>)), next)))
        })
        .try_flatten()
    }
}

/// 信息流聚合器
#[derive(Clone)]
pub struct FeedAggregator {
    relationships: Arc<dyn RelationshipService>,
    posts: Arc<dyn PostRepository>,
}

impl FeedAggregator {
    pub fn new(relationships: Arc<dyn RelationshipService>, posts: Arc<dyn PostRepository>) -> Self {
        Self {
            relationships,
            posts,
        }
    }

    /// 构造用户的信息流，匿名身份得到空信息流
    pub async fn feed_for(&self, identity: &Identity) -> Result<Feed> {
        let authors = match identity.user() {
            Some(user) => self.relationships.following(user).await?,
            None => Vec::new(),
        };
        debug!("Feed for {:?} covers {} authors", identity, authors.len());
        Ok(Feed::new(authors, self.posts.clone()))
    }
}
