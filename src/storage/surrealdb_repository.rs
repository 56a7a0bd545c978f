//! SurrealDB 仓储实现
//!
//! 记录 ID 由 SurrealDB 生成，业务标识（用户名、slug、帖子序号）保存为带唯一索引的普通字段。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use surrealdb::{Surreal, engine::any::Any, error::Db as DbError};

use crate::error::{AppError, Result};
use crate::models::{
    Comment, FollowEdge, Group, NewComment, NewPost, Post, PostPatch, PostQuery, User, Username,
};
use crate::storage::repository::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

/// 帖子存储行
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostRow {
    post_id: u64,
    text: String,
    pub_date: DateTime<Utc>,
    /// 排序键（微秒时间戳）
    pub_ts: i64,
    author: Username,
    group_slug: Option<String>,
    image: Option<String>,
}

impl PostRow {
    fn from_post(post: &Post) -> Self {
        Self {
            post_id: post.id,
            text: post.text.clone(),
            pub_date: post.pub_date,
            pub_ts: post.pub_date.timestamp_micros(),
            author: post.author.clone(),
            group_slug: post.group.clone(),
            image: post.image.clone(),
        }
    }

    fn into_post(self) -> Post {
        Post {
            id: self.post_id,
            text: self.text,
            pub_date: self.pub_date,
            author: self.author,
            group: self.group_slug,
            image: self.image,
        }
    }
}

/// 评论存储行
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommentRow {
    comment_id: u64,
    post_id: u64,
    author: Username,
    text: String,
    created: DateTime<Utc>,
    created_ts: i64,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.comment_id,
            post_id: self.post_id,
            author: self.author,
            text: self.text,
            created: self.created,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct CounterRow {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct UsernameRow {
    username: Username,
}

/// 被删除的关注边，只取关注者字段
#[derive(Debug, Deserialize)]
struct RemovedEdgeRow {
    follower: Username,
}

const POST_FIELDS: &str = "post_id, text, pub_date, pub_ts, author, group_slug, image";
const COMMENT_FIELDS: &str = "comment_id, post_id, author, text, created, created_ts";

/// 唯一索引冲突
///
/// 嵌入式引擎返回结构化错误；远程引擎只带回错误文本。
fn is_unique_violation(err: &surrealdb::Error) -> bool {
    match err {
        surrealdb::Error::Db(DbError::IndexExists { .. }) => true,
        surrealdb::Error::Db(_) => false,
        other => other.to_string().contains("already contains"),
    }
}

fn post_filter(query: &PostQuery) -> (&'static str, serde_json::Value) {
    match query {
        PostQuery::All => ("", serde_json::Value::Null),
        PostQuery::ByAuthor(author) => ("WHERE author = $filter", json!(author.as_str())),
        PostQuery::ByGroup(slug) => ("WHERE group_slug = $filter", json!(slug)),
        PostQuery::ByAuthors(authors) => (
            "WHERE author IN $filter",
            json!(authors.iter().map(Username::as_str).collect::<Vec<_>>()),
        ),
    }
}

/// SurrealDB 仓储，实现全部仓储 trait
#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Any>,
}

impl SurrealStore {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    /// 递增并返回指定计数器
    async fn next_id(&self, counter: &str) -> Result<u64> {
        let rows: Vec<CounterRow> = self
            .db
            .query("UPSERT type::thing('counter', $name) SET value += 1 RETURN AFTER")
            .bind(("name", counter.to_string()))
            .await?
            .take(0)?;
        rows.first()
            .map(|r| r.value)
            .ok_or_else(|| AppError::Database(format!("Counter {} did not advance", counter)))
    }

    async fn count_where(&self, sql: &str, filter: serde_json::Value) -> Result<u64> {
        let rows: Vec<CountRow> = self
            .db
            .query(sql.to_string())
            .bind(("filter", filter))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    async fn usernames_where(&self, sql: &str, username: &Username) -> Result<Vec<Username>> {
        let rows: Vec<UsernameRow> = self
            .db
            .query(sql.to_string())
            .bind(("username", username.as_str().to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|r| r.username).collect())
    }
}

#[async_trait]
impl UserRepository for SurrealStore {
    async fn create(&self, user: &User) -> Result<User> {
        let response = self
            .db
            .query("CREATE user CONTENT $user")
            .bind(("user", user.clone()))
            .await?;

        match response.check() {
            Ok(_) => Ok(user.clone()),
            Err(e) if is_unique_violation(&e) => Err(AppError::Validation(format!(
                "A user with username {} already exists",
                user.username
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, username: &Username) -> Result<Option<User>> {
        let users: Vec<User> = self
            .db
            .query("SELECT * OMIT id FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.as_str().to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    async fn delete(&self, username: &Username) -> Result<bool> {
        if UserRepository::get(self, username).await?.is_none() {
            return Ok(false);
        }

        let query = "
            BEGIN TRANSACTION;
            LET $authored = (SELECT VALUE post_id FROM post WHERE author = $username);
            DELETE comment WHERE author = $username OR post_id IN $authored;
            DELETE post WHERE author = $username;
            DELETE follow WHERE follower = $username OR followed = $username;
            DELETE user WHERE username = $username;
            COMMIT TRANSACTION;
        ";
        self.db
            .query(query)
            .bind(("username", username.as_str().to_string()))
            .await?
            .check()?;
        Ok(true)
    }

    async fn list(&self, limit: usize, start: usize) -> Result<Vec<User>> {
        let users: Vec<User> = self
            .db
            .query("SELECT * OMIT id FROM user ORDER BY username ASC LIMIT $limit START $start")
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(users)
    }
}

#[async_trait]
impl GroupRepository for SurrealStore {
    async fn create(&self, group: &Group) -> Result<Group> {
        let response = self
            .db
            .query("CREATE post_group CONTENT $group")
            .bind(("group", group.clone()))
            .await?;

        match response.check() {
            Ok(_) => Ok(group.clone()),
            Err(e) if is_unique_violation(&e) => Err(AppError::Validation(format!(
                "A group with slug {} already exists",
                group.slug
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, slug: &str) -> Result<Option<Group>> {
        let groups: Vec<Group> = self
            .db
            .query("SELECT * OMIT id FROM post_group WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;
        Ok(groups.into_iter().next())
    }

    async fn delete(&self, slug: &str) -> Result<bool> {
        if GroupRepository::get(self, slug).await?.is_none() {
            return Ok(false);
        }

        let query = "
            BEGIN TRANSACTION;
            UPDATE post SET group_slug = NONE WHERE group_slug = $slug;
            DELETE post_group WHERE slug = $slug;
            COMMIT TRANSACTION;
        ";
        self.db
            .query(query)
            .bind(("slug", slug.to_string()))
            .await?
            .check()?;
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Group>> {
        let groups: Vec<Group> = self
            .db
            .query("SELECT * OMIT id FROM post_group ORDER BY slug ASC")
            .await?
            .take(0)?;
        Ok(groups)
    }
}

#[async_trait]
impl PostRepository for SurrealStore {
    async fn create(&self, post: NewPost) -> Result<Post> {
        let post = post.into_post(self.next_id("post").await?);
        self.db
            .query("CREATE post CONTENT $post")
            .bind(("post", PostRow::from_post(&post)))
            .await?
            .check()?;
        Ok(post)
    }

    async fn get(&self, id: u64) -> Result<Option<Post>> {
        let rows: Vec<PostRow> = self
            .db
            .query(format!("SELECT {} FROM post WHERE post_id = $id LIMIT 1", POST_FIELDS))
            .bind(("id", id))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(PostRow::into_post))
    }

    async fn update(&self, id: u64, patch: &PostPatch) -> Result<Option<Post>> {
        if PostRepository::get(self, id).await?.is_none() {
            return Ok(None);
        }

        self.db
            .query("UPDATE post SET text = $text, group_slug = $group, image = $image WHERE post_id = $id")
            .bind(("text", patch.text.clone()))
            .bind(("group", patch.group.clone()))
            .bind(("image", patch.image.clone()))
            .bind(("id", id))
            .await?
            .check()?;

        PostRepository::get(self, id).await
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        if PostRepository::get(self, id).await?.is_none() {
            return Ok(false);
        }

        let query = "
            BEGIN TRANSACTION;
            DELETE comment WHERE post_id = $id;
            DELETE post WHERE post_id = $id;
            COMMIT TRANSACTION;
        ";
        self.db.query(query).bind(("id", id)).await?.check()?;
        Ok(true)
    }

    async fn list(&self, query: &PostQuery, limit: usize, start: usize) -> Result<Vec<Post>> {
        let (clause, filter) = post_filter(query);
        let sql = format!(
            "SELECT {} FROM post {} ORDER BY pub_ts DESC, post_id DESC LIMIT $limit START $start",
            POST_FIELDS, clause
        );
        let rows: Vec<PostRow> = self
            .db
            .query(sql)
            .bind(("filter", filter))
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn count(&self, query: &PostQuery) -> Result<u64> {
        let (clause, filter) = post_filter(query);
        self.count_where(&format!("SELECT count() FROM post {} GROUP ALL", clause), filter)
            .await
    }
}

#[async_trait]
impl CommentRepository for SurrealStore {
    async fn create(&self, comment: NewComment) -> Result<Comment> {
        if PostRepository::get(self, comment.post_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Post not found: {}", comment.post_id)));
        }

        let comment = comment.into_comment(self.next_id("comment").await?);
        let row = CommentRow {
            comment_id: comment.id,
            post_id: comment.post_id,
            author: comment.author.clone(),
            text: comment.text.clone(),
            created: comment.created,
            created_ts: comment.created.timestamp_micros(),
        };
        self.db
            .query("CREATE comment CONTENT $comment")
            .bind(("comment", row))
            .await?
            .check()?;
        Ok(comment)
    }

    async fn list_by_post(&self, post_id: u64) -> Result<Vec<Comment>> {
        let rows: Vec<CommentRow> = self
            .db
            .query(format!(
                "SELECT {} FROM comment WHERE post_id = $id ORDER BY created_ts DESC, comment_id DESC",
                COMMENT_FIELDS
            ))
            .bind(("id", post_id))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn count_by_post(&self, post_id: u64) -> Result<u64> {
        self.count_where(
            "SELECT count() FROM comment WHERE post_id = $filter GROUP ALL",
            json!(post_id),
        )
        .await
    }
}

#[async_trait]
impl FollowRepository for SurrealStore {
    async fn insert(&self, edge: &FollowEdge) -> Result<bool> {
        if edge.follower() == edge.followed() {
            return Ok(false);
        }

        let response = self
            .db
            .query("CREATE follow CONTENT $edge")
            .bind(("edge", edge.clone()))
            .await?;

        // 唯一索引拦截了重复边
        match response.check() {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, follower: &Username, followed: &Username) -> Result<bool> {
        let removed: Vec<RemovedEdgeRow> = self
            .db
            .query("DELETE follow WHERE follower = $follower AND followed = $followed RETURN BEFORE")
            .bind(("follower", follower.as_str().to_string()))
            .bind(("followed", followed.as_str().to_string()))
            .await?
            .take(0)?;
        Ok(removed.iter().any(|row| &row.follower == follower))
    }

    async fn exists(&self, follower: &Username, followed: &Username) -> Result<bool> {
        let rows: Vec<CountRow> = self
            .db
            .query("SELECT count() FROM follow WHERE follower = $follower AND followed = $followed GROUP ALL")
            .bind(("follower", follower.as_str().to_string()))
            .bind(("followed", followed.as_str().to_string()))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count > 0).unwrap_or(false))
    }

    async fn list_followed(&self, follower: &Username) -> Result<Vec<Username>> {
        self.usernames_where(
            "SELECT followed AS username, created_at FROM follow WHERE follower = $username ORDER BY created_at ASC",
            follower,
        )
        .await
    }

    async fn list_followers(&self, followed: &Username) -> Result<Vec<Username>> {
        self.usernames_where(
            "SELECT follower AS username, created_at FROM follow WHERE followed = $username ORDER BY created_at ASC",
            followed,
        )
        .await
    }

    async fn count_followed(&self, follower: &Username) -> Result<u64> {
        self.count_where(
            "SELECT count() FROM follow WHERE follower = $filter GROUP ALL",
            json!(follower.as_str()),
        )
        .await
    }

    async fn count_followers(&self, followed: &Username) -> Result<u64> {
        self.count_where(
            "SELECT count() FROM follow WHERE followed = $filter GROUP ALL",
            json!(followed.as_str()),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::{DatabaseBackend, DatabaseConfig};
    use crate::storage::surrealdb::SurrealPool;
    use chrono::Duration;

    fn name(s: &str) -> Username {
        Username::new(s)
    }

    async fn mem_store() -> SurrealStore {
        let pool = SurrealPool::new(DatabaseConfig {
            backend: DatabaseBackend::SurrealDB,
            url: "mem://".into(),
            namespace: "blogfeed".into(),
            database: "test".into(),
            username: "root".into(),
            password: "root".into(),
        })
        .await
        .unwrap();
        SurrealStore::new(pool.inner().await.unwrap())
    }

    async fn seed_users(store: &SurrealStore, names: &[&str]) {
        for n in names {
            UserRepository::create(store, &User::new(name(n))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_post_ids_are_sequential() {
        let store = mem_store().await;
        let first = PostRepository::create(&store, NewPost::new(&name("alice"), "1")).await.unwrap();
        let second = PostRepository::create(&store, NewPost::new(&name("alice"), "2")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        let stored = PostRepository::get(&store, second.id).await.unwrap().unwrap();
        assert_eq!(stored.text, "2");
        assert_eq!(stored.author, name("alice"));
    }

    #[tokio::test]
    async fn test_duplicate_edge_is_not_inserted() {
        let store = mem_store().await;
        let edge = FollowEdge::new(&name("bob"), &name("alice")).unwrap();

        assert!(store.insert(&edge).await.unwrap());
        assert!(!store.insert(&edge).await.unwrap());
        assert_eq!(store.count_followed(&name("bob")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_self_edge_is_never_persisted() {
        let store = mem_store().await;
        let alice = name("alice");

        assert!(!store.insert(&FollowEdge::unchecked(&alice, &alice)).await.unwrap());
        assert!(!store.exists(&alice, &alice).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let store = mem_store().await;
        store.insert(&FollowEdge::new(&name("bob"), &name("alice")).unwrap()).await.unwrap();

        assert!(store.remove(&name("bob"), &name("alice")).await.unwrap());
        assert!(!store.remove(&name("bob"), &name("alice")).await.unwrap());
        assert!(!store.exists(&name("bob"), &name("alice")).await.unwrap());
        assert!(store.insert(&FollowEdge::new(&name("bob"), &name("alice")).unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn test_lookups_from_both_sides() {
        let store = mem_store().await;
        store.insert(&FollowEdge::new(&name("bob"), &name("alice")).unwrap()).await.unwrap();
        store.insert(&FollowEdge::new(&name("corvex"), &name("alice")).unwrap()).await.unwrap();

        assert_eq!(store.list_followed(&name("bob")).await.unwrap(), vec![name("alice")]);
        let mut followers = store.list_followers(&name("alice")).await.unwrap();
        followers.sort();
        assert_eq!(followers, vec![name("bob"), name("corvex")]);
        assert_eq!(store.count_followers(&name("alice")).await.unwrap(), 2);
        assert_eq!(store.count_followers(&name("bob")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_followed_authors_newest_first_with_ties() {
        let store = mem_store().await;
        let now = Utc::now();
        let alice = name("alice");
        let corvex = name("corvex");

        PostRepository::create(&store, NewPost::new(&alice, "old").published_at(now - Duration::hours(1)))
            .await
            .unwrap();
        PostRepository::create(&store, NewPost::new(&alice, "tie1").published_at(now)).await.unwrap();
        PostRepository::create(&store, NewPost::new(&corvex, "tie2").published_at(now)).await.unwrap();
        PostRepository::create(&store, NewPost::new(&name("bob"), "own")).await.unwrap();

        let authors = PostQuery::ByAuthors(vec![alice, corvex]);
        let texts: Vec<String> = PostRepository::list(&store, &authors, 10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["tie2", "tie1", "old"]);
        assert_eq!(PostRepository::count(&store, &authors).await.unwrap(), 3);

        let second: Vec<String> = PostRepository::list(&store, &authors, 2, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(second, vec!["old"]);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = mem_store().await;
        seed_users(&store, &["alice"]).await;
        let result = UserRepository::create(&store, &User::new(name("alice"))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let store = mem_store().await;
        seed_users(&store, &["alice", "bob", "corvex"]).await;
        store.insert(&FollowEdge::new(&name("bob"), &name("alice")).unwrap()).await.unwrap();
        store.insert(&FollowEdge::new(&name("alice"), &name("corvex")).unwrap()).await.unwrap();
        store.insert(&FollowEdge::new(&name("bob"), &name("corvex")).unwrap()).await.unwrap();

        let alice_post = PostRepository::create(&store, NewPost::new(&name("alice"), "by alice")).await.unwrap();
        let bob_post = PostRepository::create(&store, NewPost::new(&name("bob"), "by bob")).await.unwrap();
        CommentRepository::create(&store, NewComment::new(alice_post.id, &name("bob"), "on alice"))
            .await
            .unwrap();
        CommentRepository::create(&store, NewComment::new(bob_post.id, &name("alice"), "from alice"))
            .await
            .unwrap();
        CommentRepository::create(&store, NewComment::new(bob_post.id, &name("corvex"), "from corvex"))
            .await
            .unwrap();

        assert!(UserRepository::delete(&store, &name("alice")).await.unwrap());
        assert!(!UserRepository::delete(&store, &name("alice")).await.unwrap());

        assert!(!store.exists(&name("bob"), &name("alice")).await.unwrap());
        assert!(!store.exists(&name("alice"), &name("corvex")).await.unwrap());
        assert!(store.exists(&name("bob"), &name("corvex")).await.unwrap());
        assert!(PostRepository::get(&store, alice_post.id).await.unwrap().is_none());
        assert_eq!(store.count_by_post(alice_post.id).await.unwrap(), 0);
        let remaining = store.list_by_post(bob_post.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].author, name("corvex"));
    }

    #[tokio::test]
    async fn test_group_delete_detaches_posts() {
        let store = mem_store().await;
        GroupRepository::create(&store, &Group::new("rust", "Rust", "")).await.unwrap();
        let post = PostRepository::create(
            &store,
            NewPost::new(&name("alice"), "in group").with_group(Some("rust".into())),
        )
        .await
        .unwrap();

        assert!(GroupRepository::delete(&store, "rust").await.unwrap());

        let post = PostRepository::get(&store, post.id).await.unwrap().unwrap();
        assert!(post.group.is_none());
        assert!(GroupRepository::get(&store, "rust").await.unwrap().is_none());
    }
}
