use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::post_handler::{found, profile_path};
use crate::{
    api::{
        app_state::AppState,
        dto::{
            feed_dto::FeedResponse,
            post_dto::{PageParams, PostResponse},
            profile_dto::outcome_header_value,
        },
    },
    error::AppError,
    models::{FollowOutcome, Identity, Username},
    security::middleware::CurrentUser,
    services::{Page, Pagination},
};

/// 关注操作结果所在的响应头
pub const FOLLOW_OUTCOME_HEADER: &str = "X-Follow-Outcome";

pub async fn get_feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let feed = state.feed.feed_for(&Identity::User(user)).await?;
    let total = feed.count().await?;
    let pagination = Pagination::resolve(params.page.as_deref(), state.page_size, total);
    let posts = feed.page(pagination.offset(), pagination.page_size).await?;

    Ok(Json(FeedResponse {
        authors: feed.authors().iter().map(|a| a.to_string()).collect(),
        posts: Page::new(pagination, total, posts).map(PostResponse::from),
    }))
}

#[derive(Debug, Clone, Copy)]
enum FollowAction {
    Follow,
    Unfollow,
    Toggle,
}

/// 作者必须存在，随后重定向到作者主页
async fn act_on_author(
    state: &AppState,
    follower: Username,
    username: String,
    action: FollowAction,
) -> Result<Response, AppError> {
    let author = state.user_service.get(&Username::new(username)).await?.username;
    let relationships = &state.relationship_service;
    let outcome: FollowOutcome = match action {
        FollowAction::Follow => relationships.follow(&follower, &author).await?,
        FollowAction::Unfollow => relationships.unfollow(&follower, &author).await?,
        FollowAction::Toggle => relationships.toggle(&follower, &author).await?,
    };
    debug!("{} {:?} {}: {:?}", follower, action, author, outcome);

    let mut response = found(profile_path(&author));
    response.headers_mut().insert(
        FOLLOW_OUTCOME_HEADER,
        HeaderValue::from_static(outcome_header_value(outcome)),
    );
    Ok(response)
}

pub async fn follow_author(
    State(state): State<AppState>,
    CurrentUser(follower): CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    act_on_author(&state, follower, username, FollowAction::Follow).await
}

pub async fn unfollow_author(
    State(state): State<AppState>,
    CurrentUser(follower): CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    act_on_author(&state, follower, username, FollowAction::Unfollow).await
}

pub async fn toggle_follow(
    State(state): State<AppState>,
    CurrentUser(follower): CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    act_on_author(&state, follower, username, FollowAction::Toggle).await
}
