//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod auth_handler;
pub mod follow_handler;
pub mod group_handler;
pub mod post_handler;
pub mod profile_handler;

pub use auth_handler::*;
pub use follow_handler::*;
pub use group_handler::*;
pub use post_handler::*;
pub use profile_handler::*;
