//! Blogfeed - 带作者关注与关注信息流的博客服务
//!
//! 用户发布帖子、关注作者，并按时间倒序阅读所关注作者的帖子。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;
