//! 帖子数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Username;

/// 帖子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// 顺序分配的 ID
    pub id: u64,
    /// 正文
    pub text: String,
    /// 发布时间
    pub pub_date: DateTime<Utc>,
    /// 作者
    pub author: Username,
    /// 所属分组
    pub group: Option<String>,
    /// 图片路径
    pub image: Option<String>,
}

/// 待创建的帖子，ID 由存储层分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: Username,
    pub group: Option<String>,
    pub image: Option<String>,
}

impl NewPost {
    pub fn new(author: &Username, text: &str) -> Self {
        Self {
            text: text.to_string(),
            pub_date: Utc::now(),
            author: author.clone(),
            group: None,
            image: None,
        }
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn published_at(mut self, pub_date: DateTime<Utc>) -> Self {
        self.pub_date = pub_date;
        self
    }

    /// 绑定存储层分配的 ID
    pub fn into_post(self, id: u64) -> Post {
        Post {
            id,
            text: self.text,
            pub_date: self.pub_date,
            author: self.author,
            group: self.group,
            image: self.image,
        }
    }
}

/// 帖子修改内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<String>,
}

impl PostPatch {
    pub fn apply(&self, post: &mut Post) {
        post.text = self.text.clone();
        post.group = self.group.clone();
        post.image = self.image.clone();
    }
}

/// 帖子查询条件
#[derive(Debug, Clone, PartialEq)]
pub enum PostQuery {
    /// 全部帖子
    All,
    /// 指定作者
    ByAuthor(Username),
    /// 指定分组
    ByGroup(String),
    /// 作者集合中的任一作者
    ByAuthors(Vec<Username>),
}

impl PostQuery {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostQuery::All => true,
            PostQuery::ByAuthor(author) => &post.author == author,
            PostQuery::ByGroup(slug) => post.group.as_deref() == Some(slug.as_str()),
            PostQuery::ByAuthors(authors) => authors.contains(&post.author),
        }
    }
}

/// 帖子默认排序：发布时间倒序，同一时间按 ID 倒序
pub fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
    b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_newest_first_breaks_ties_by_id() {
        let now = Utc::now();
        let alice = Username::new("alice");
        let older = NewPost::new(&alice, "older").published_at(now - Duration::minutes(1)).into_post(3);
        let first = NewPost::new(&alice, "first").published_at(now).into_post(1);
        let second = NewPost::new(&alice, "second").published_at(now).into_post(2);

        let mut posts = vec![older, first, second];
        posts.sort_by(newest_first);

        let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_query_matches() {
        let post = NewPost::new(&Username::new("alice"), "hi")
            .with_group(Some("rust".into()))
            .into_post(1);

        assert!(PostQuery::All.matches(&post));
        assert!(PostQuery::ByGroup("rust".into()).matches(&post));
        assert!(!PostQuery::ByAuthor(Username::new("bob")).matches(&post));
        assert!(PostQuery::ByAuthors(vec![Username::new("bob"), Username::new("alice")]).matches(&post));
        assert!(!PostQuery::ByAuthors(vec![]).matches(&post));
    }
}
