use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info};
use validator::Validate;

use super::post_handler::post_page;
use crate::{
    api::{
        app_state::AppState,
        dto::{post_dto::PageParams, profile_dto::*},
    },
    error::AppError,
    models::{Identity, PostQuery, Username},
    security::middleware::CurrentUser,
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let user = state
        .user_service
        .register(
            &request.username,
            &request.first_name,
            &request.last_name,
            request.email.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let username = Username::new(username);
    if caller != username {
        return Err(AppError::Authorization(format!(
            "{} may not delete {}",
            caller, username
        )));
    }

    state.user_service.delete(&username).await?;
    info!("User {} deleted their account", username);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let author = state.user_service.get(&Username::new(username)).await?;
    debug!("Profile of {} viewed by {:?}", author.username, identity);

    let is_follow = state
        .relationship_service
        .is_followed_by(&author.username, &identity)
        .await?;
    let stats = state.relationship_service.stats(&author.username).await?;
    let posts = post_page(&state, PostQuery::ByAuthor(author.username.clone()), &params).await?;

    Ok(Json(ProfileResponse {
        author: author.into(),
        is_follow,
        followers_count: stats.followers_count,
        following_count: stats.following_count,
        posts,
    }))
}

pub async fn list_followers(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.get(&Username::new(username)).await?;
    let followers = state.relationship_service.followers(&user.username).await?;
    Ok(Json(UsernameListResponse::new(&user.username, followers)))
}

pub async fn list_following(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.get(&Username::new(username)).await?;
    let following = state.relationship_service.following(&user.username).await?;
    Ok(Json(UsernameListResponse::new(&user.username, following)))
}
