//! 帖子服务
//!
//! 帖子、分组与评论的业务规则。

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::{Comment, Group, NewComment, NewPost, Post, PostPatch, PostQuery, Username};
use crate::storage::Storage;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]{1,50}$").expect("valid slug pattern"));

/// 编辑结果
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// 已更新
    Updated(Post),
    /// 编辑者不是作者，帖子未改动
    NotAuthor,
}

/// 帖子服务 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostService: Send + Sync {
    /// 发布帖子，正文不能为空，指定的分组必须存在
    async fn create_post(
        &self,
        author: &Username,
        text: &str,
        group: Option<String>,
        image: Option<String>,
    ) -> Result<Post>;

    /// 编辑帖子，只有作者本人可以修改
    async fn edit_post(
        &self,
        editor: &Username,
        author: &Username,
        post_id: u64,
        patch: PostPatch,
    ) -> Result<EditOutcome>;

    /// 获取 `author` 名下的帖子
    async fn get_post(&self, author: &Username, post_id: u64) -> Result<Post>;

    async fn list(&self, query: &PostQuery, offset: usize, limit: usize) -> Result<Vec<Post>>;

    async fn count(&self, query: &PostQuery) -> Result<u64>;

    /// 评论帖子，空白评论被忽略
    async fn add_comment(
        &self,
        commenter: &Username,
        author: &Username,
        post_id: u64,
        text: &str,
    ) -> Result<Option<Comment>>;

    /// 帖子的评论，最新的在前
    async fn comments(&self, post_id: u64) -> Result<Vec<Comment>>;

    async fn create_group(&self, slug: &str, title: &str, description: &str) -> Result<Group>;

    async fn get_group(&self, slug: &str) -> Result<Group>;

    async fn list_groups(&self) -> Result<Vec<Group>>;
}

/// 帖子服务实现
pub struct PostServiceImpl {
    storage: Storage,
}

impl PostServiceImpl {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    async fn ensure_group(&self, group: Option<&str>) -> Result<()> {
        if let Some(slug) = group {
            if self.storage.groups.get(slug).await?.is_none() {
                warn!("Rejected unknown group {:?}", slug);
                return Err(AppError::Validation(format!("Unknown group: {}", slug)));
            }
        }
        Ok(())
    }
}

fn require_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Post text must not be blank".to_string()));
    }
    Ok(())
}

#[async_trait]
impl PostService for PostServiceImpl {
    async fn create_post(
        &self,
        author: &Username,
        text: &str,
        group: Option<String>,
        image: Option<String>,
    ) -> Result<Post> {
        require_text(text)?;
        self.ensure_group(group.as_deref()).await?;

        let post = self
            .storage
            .posts
            .create(NewPost::new(author, text).with_group(group).with_image(image))
            .await?;
        debug!("Created post {} by {}", post.id, author);
        Ok(post)
    }

    async fn edit_post(
        &self,
        editor: &Username,
        author: &Username,
        post_id: u64,
        patch: PostPatch,
    ) -> Result<EditOutcome> {
        let post = self.get_post(author, post_id).await?;
        if &post.author != editor {
            debug!("{} may not edit post {} by {}", editor, post_id, author);
            return Ok(EditOutcome::NotAuthor);
        }

        require_text(&patch.text)?;
        self.ensure_group(patch.group.as_deref()).await?;

        let updated = self
            .storage
            .posts
            .update(post_id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;
        Ok(EditOutcome::Updated(updated))
    }

    async fn get_post(&self, author: &Username, post_id: u64) -> Result<Post> {
        match self.storage.posts.get(post_id).await? {
            Some(post) if &post.author == author => Ok(post),
            _ => Err(AppError::NotFound(format!(
                "Post {} by {} not found",
                post_id, author
            ))),
        }
    }

    async fn list(&self, query: &PostQuery, offset: usize, limit: usize) -> Result<Vec<Post>> {
        self.storage.posts.list(query, limit, offset).await
    }

    async fn count(&self, query: &PostQuery) -> Result<u64> {
        self.storage.posts.count(query).await
    }

    async fn add_comment(
        &self,
        commenter: &Username,
        author: &Username,
        post_id: u64,
        text: &str,
    ) -> Result<Option<Comment>> {
        let post = self.get_post(author, post_id).await?;
        if text.trim().is_empty() {
            debug!("Ignoring blank comment on post {}", post.id);
            return Ok(None);
        }

        let comment = self
            .storage
            .comments
            .create(NewComment::new(post.id, commenter, text))
            .await?;
        Ok(Some(comment))
    }

    async fn comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        self.storage.comments.list_by_post(post_id).await
    }

    async fn create_group(&self, slug: &str, title: &str, description: &str) -> Result<Group> {
        if !SLUG_PATTERN.is_match(slug) {
            return Err(AppError::Validation(format!("Invalid group slug: {:?}", slug)));
        }
        if title.trim().is_empty() {
            return Err(AppError::Validation("Group title must not be blank".to_string()));
        }

        self.storage
            .groups
            .create(&Group::new(slug, title, description))
            .await
    }

    async fn get_group(&self, slug: &str) -> Result<Group> {
        self.storage
            .groups
            .get(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", slug)))
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.storage.groups.list().await
    }
}

/// 创建帖子服务
pub fn create_post_service(storage: Storage) -> Box<dyn PostService> {
    Box::new(PostServiceImpl::new(storage))
}
