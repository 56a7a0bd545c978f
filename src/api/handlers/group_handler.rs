use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use validator::Validate;

use super::post_handler::post_page;
use crate::{
    api::{
        app_state::AppState,
        dto::{group_dto::*, post_dto::PageParams},
    },
    error::AppError,
    models::PostQuery,
    security::middleware::CurrentUser,
};

pub async fn list_groups(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let groups = state.post_service.list_groups().await?;
    Ok(Json(
        groups
            .into_iter()
            .map(GroupResponse::from)
            .collect::<Vec<_>>(),
    ))
}

pub async fn create_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    debug!("{} creating group {}", user, request.slug);

    let group = state
        .post_service
        .create_group(&request.slug, &request.title, &request.description)
        .await?;

    Ok((StatusCode::CREATED, Json(GroupResponse::from(group))))
}

pub async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let group = state.post_service.get_group(&slug).await?;
    let posts = post_page(&state, PostQuery::ByGroup(group.slug.clone()), &params).await?;

    Ok(Json(GroupPageResponse {
        group: group.into(),
        posts,
    }))
}
