use crate::config::config::AppConfig;
use crate::security::auth::{Authenticator, CombinedAuthenticator, JwtTokenGenerator};
use crate::services::{
    FeedAggregator, PostService, RelationshipService, UserService, create_post_service,
    create_relationship_service, create_user_service,
};
use crate::storage::Storage;
use std::sync::Arc;

/// Application state containing all shared services and security components
#[derive(Clone)]
pub struct AppState {
    /// User registration and lookup
    pub user_service: Arc<dyn UserService>,
    /// Posts, groups and comments
    pub post_service: Arc<dyn PostService>,
    /// Follow edges between users
    pub relationship_service: Arc<dyn RelationshipService>,
    /// Follow feed
    pub feed: FeedAggregator,
    /// Authenticator for API key and JWT validation
    pub authenticator: Arc<dyn Authenticator>,
    /// Issues JWTs for authenticated callers
    pub token_generator: Arc<JwtTokenGenerator>,
    /// Where unauthenticated callers are redirected
    pub login_url: String,
    /// Items per page
    pub page_size: usize,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("user_service", &"Arc<dyn UserService>")
            .field("post_service", &"Arc<dyn PostService>")
            .field("relationship_service", &"Arc<dyn RelationshipService>")
            .field("feed", &"FeedAggregator")
            .field("authenticator", &self.authenticator.authenticator_type())
            .field("token_generator", &"Arc<JwtTokenGenerator>")
            .field("login_url", &self.login_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        storage: Storage,
        user_service: Box<dyn UserService>,
        post_service: Box<dyn PostService>,
        relationship_service: Box<dyn RelationshipService>,
        authenticator: Box<dyn Authenticator>,
        token_generator: JwtTokenGenerator,
        login_url: String,
        page_size: usize,
    ) -> Self {
        let relationship_service: Arc<dyn RelationshipService> = Arc::from(relationship_service);
        let feed = FeedAggregator::new(relationship_service.clone(), storage.posts.clone());

        Self {
            user_service: Arc::from(user_service),
            post_service: Arc::from(post_service),
            relationship_service,
            feed,
            authenticator: Arc::from(authenticator),
            token_generator: Arc::new(token_generator),
            login_url,
            page_size: page_size.max(1),
        }
    }

    /// Wire the default services over `storage` using the given configuration
    pub fn from_config(storage: Storage, config: &AppConfig) -> Self {
        Self::new(
            storage.clone(),
            create_user_service(storage.users.clone()),
            create_post_service(storage.clone()),
            create_relationship_service(storage.follows.clone()),
            Box::new(CombinedAuthenticator::from_config(&config.security)),
            JwtTokenGenerator::from_config(&config.security),
            config.security.login_url.clone(),
            config.feed.page_size,
        )
    }
}
