//! Routes 模块
//!
//! 定义 API 路由。

pub mod auth_routes;
pub mod feed_routes;
pub mod group_routes;
pub mod post_routes;
pub mod profile_routes;
