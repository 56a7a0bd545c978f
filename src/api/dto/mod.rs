//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod feed_dto;
pub mod group_dto;
pub mod post_dto;
pub mod profile_dto;

pub use feed_dto::*;
pub use group_dto::*;
pub use post_dto::*;
pub use profile_dto::*;
