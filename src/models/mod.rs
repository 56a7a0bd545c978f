//! 核心数据模型模块
//!
//! 定义用户、关注关系、帖子、分组和评论。

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

pub use comment::*;
pub use follow::*;
pub use group::*;
pub use post::*;
pub use user::*;
