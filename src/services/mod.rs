//! 服务模块

pub mod feed;
pub mod follow;
pub mod pagination;
pub mod post;
pub mod user;

pub use feed::{Feed, FeedAggregator};
pub use follow::{RelationshipService, RelationshipServiceImpl, create_relationship_service};
pub use pagination::{Page, Pagination};
pub use post::{EditOutcome, PostService, PostServiceImpl, create_post_service};
pub use user::{UserService, UserServiceImpl, create_user_service};
