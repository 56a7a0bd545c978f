//! 进程内存储
//!
//! 所有表共用一把读写锁，检查与写入在同一临界区内完成，
//! 因此并发的重复关注只会留下一条边。

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{AppError, Result};
use crate::models::{
    Comment, FollowEdge, Group, NewComment, NewPost, Post, PostPatch, PostQuery, User, Username,
    newest_first,
};
use crate::storage::repository::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Username, User>,
    groups: BTreeMap<String, Group>,
    posts: BTreeMap<u64, Post>,
    comments: BTreeMap<u64, Comment>,
    /// 按插入顺序保存的关注边
    follows: Vec<FollowEdge>,
    follow_keys: HashSet<(Username, Username)>,
    next_post_id: u64,
    next_comment_id: u64,
}

impl Tables {
    fn remove_edges_where(&mut self, predicate: impl Fn(&FollowEdge) -> bool) {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.follows).into_iter().partition(|e| predicate(e));
        for edge in removed {
            self.follow_keys.remove(&edge.key());
        }
        self.follows = kept;
    }
}

/// 内存存储，实现全部仓储 trait
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<User> {
        let mut tables = self.tables.write();
        if tables.users.contains_key(&user.username) {
            return Err(AppError::Validation(format!(
                "A user with username {} already exists",
                user.username
            )));
        }
        tables.users.insert(user.username.clone(), user.clone());
        Ok(user.clone())
    }

    async fn get(&self, username: &Username) -> Result<Option<User>> {
        Ok(self.tables.read().users.get(username).cloned())
    }

    async fn delete(&self, username: &Username) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.users.remove(username).is_none() {
            return Ok(false);
        }

        tables.remove_edges_where(|e| e.follower() == username || e.followed() == username);

        let authored: HashSet<u64> = tables
            .posts
            .values()
            .filter(|p| &p.author == username)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|id, _| !authored.contains(id));
        tables
            .comments
            .retain(|_, c| &c.author != username && !authored.contains(&c.post_id));

        Ok(true)
    }

    async fn list(&self, limit: usize, start: usize) -> Result<Vec<User>> {
        let tables = self.tables.read();
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users.into_iter().skip(start).take(limit).collect())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn create(&self, group: &Group) -> Result<Group> {
        let mut tables = self.tables.write();
        if tables.groups.contains_key(&group.slug) {
            return Err(AppError::Validation(format!(
                "A group with slug {} already exists",
                group.slug
            )));
        }
        tables.groups.insert(group.slug.clone(), group.clone());
        Ok(group.clone())
    }

    async fn get(&self, slug: &str) -> Result<Option<Group>> {
        Ok(self.tables.read().groups.get(slug).cloned())
    }

    async fn delete(&self, slug: &str) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.groups.remove(slug).is_none() {
            return Ok(false);
        }
        for post in tables.posts.values_mut() {
            if post.group.as_deref() == Some(slug) {
                post.group = None;
            }
        }
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Group>> {
        Ok(self.tables.read().groups.values().cloned().collect())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post> {
        let mut tables = self.tables.write();
        tables.next_post_id += 1;
        let post = post.into_post(tables.next_post_id);
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get(&self, id: u64) -> Result<Option<Post>> {
        Ok(self.tables.read().posts.get(&id).cloned())
    }

    async fn update(&self, id: u64, patch: &PostPatch) -> Result<Option<Post>> {
        let mut tables = self.tables.write();
        Ok(tables.posts.get_mut(&id).map(|post| {
            patch.apply(post);
            post.clone()
        }))
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.posts.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(true)
    }

    async fn list(&self, query: &PostQuery, limit: usize, start: usize) -> Result<Vec<Post>> {
        let tables = self.tables.read();
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        posts.sort_by(newest_first);
        Ok(posts.into_iter().skip(start).take(limit).collect())
    }

    async fn count(&self, query: &PostQuery) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.posts.values().filter(|p| query.matches(p)).count() as u64)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write();
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(AppError::NotFound(format!("Post not found: {}", comment.post_id)));
        }
        tables.next_comment_id += 1;
        let comment = comment.into_comment(tables.next_comment_id);
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_by_post(&self, post_id: u64) -> Result<Vec<Comment>> {
        let tables = self.tables.read();
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn count_by_post(&self, post_id: u64) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.comments.values().filter(|c| c.post_id == post_id).count() as u64)
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn insert(&self, edge: &FollowEdge) -> Result<bool> {
        if edge.follower() == edge.followed() {
            return Ok(false);
        }
        let mut tables = self.tables.write();
        if !tables.follow_keys.insert(edge.key()) {
            return Ok(false);
        }
        tables.follows.push(edge.clone());
        Ok(true)
    }

    async fn remove(&self, follower: &Username, followed: &Username) -> Result<bool> {
        let mut tables = self.tables.write();
        if !tables.follow_keys.remove(&(follower.clone(), followed.clone())) {
            return Ok(false);
        }
        tables
            .follows
            .retain(|e| !(e.follower() == follower && e.followed() == followed));
        Ok(true)
    }

    async fn exists(&self, follower: &Username, followed: &Username) -> Result<bool> {
        let tables = self.tables.read();
        Ok(tables.follow_keys.contains(&(follower.clone(), followed.clone())))
    }

    async fn list_followed(&self, follower: &Username) -> Result<Vec<Username>> {
        let tables = self.tables.read();
        Ok(tables
            .follows
            .iter()
            .filter(|e| e.follower() == follower)
            .map(|e| e.followed().clone())
            .collect())
    }

    async fn list_followers(&self, followed: &Username) -> Result<Vec<Username>> {
        let tables = self.tables.read();
        Ok(tables
            .follows
            .iter()
            .filter(|e| e.followed() == followed)
            .map(|e| e.follower().clone())
            .collect())
    }

    async fn count_followed(&self, follower: &Username) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.follows.iter().filter(|e| e.follower() == follower).count() as u64)
    }

    async fn count_followers(&self, followed: &Username) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.follows.iter().filter(|e| e.followed() == followed).count() as u64)
    }
}
