use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;
use validator::Validate;

use crate::{
    api::{app_state::AppState, dto::post_dto::*},
    error::AppError,
    models::{Identity, PostQuery, Username},
    security::middleware::CurrentUser,
    services::{EditOutcome, Page, Pagination},
};

/// `302 Found` 跳转
pub(crate) fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

pub(crate) fn profile_path(username: &Username) -> String {
    format!("/api/v1/profiles/{}", urlencoding::encode(username.as_str()))
}

pub(crate) fn post_path(author: &Username, post_id: u64) -> String {
    format!("{}/posts/{}", profile_path(author), post_id)
}

/// 按查询条件取出一页帖子
pub(crate) async fn post_page(
    state: &AppState,
    query: PostQuery,
    params: &PageParams,
) -> Result<PostPageResponse, AppError> {
    let total = state.post_service.count(&query).await?;
    let pagination = Pagination::resolve(params.page.as_deref(), state.page_size, total);
    let posts = state
        .post_service
        .list(&query, pagination.offset(), pagination.page_size)
        .await?;

    Ok(Page::new(pagination, total, posts).map(PostResponse::from))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Listing posts: page={:?}", params.page);
    Ok(Json(post_page(&state, PostQuery::All, &params).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(author): CurrentUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let post = state
        .post_service
        .create_post(&author, &request.text, request.group, request.image)
        .await?;
    let location = post_path(&author, post.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PostResponse::from(post)),
    ))
}

pub async fn get_post(
    State(state): State<AppState>,
    identity: Identity,
    Path((username, post_id)): Path<(String, u64)>,
) -> Result<impl IntoResponse, AppError> {
    let author = Username::new(username);
    let post = state.post_service.get_post(&author, post_id).await?;

    let author_posts_count = state
        .post_service
        .count(&PostQuery::ByAuthor(author.clone()))
        .await?;
    let is_follow = state
        .relationship_service
        .is_followed_by(&author, &identity)
        .await?;
    let comments = state.post_service.comments(post.id).await?;

    Ok(Json(PostDetailResponse {
        post: post.into(),
        author_posts_count,
        is_follow,
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

pub async fn edit_post(
    State(state): State<AppState>,
    CurrentUser(editor): CurrentUser,
    Path((username, post_id)): Path<(String, u64)>,
    Json(request): Json<EditPostRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let author = Username::new(username);

    match state
        .post_service
        .edit_post(&editor, &author, post_id, request.into())
        .await?
    {
        EditOutcome::Updated(post) => Ok(Json(PostResponse::from(post)).into_response()),
        EditOutcome::NotAuthor => Ok(found(post_path(&author, post_id))),
    }
}

pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(commenter): CurrentUser,
    Path((username, post_id)): Path<(String, u64)>,
    Json(request): Json<CommentRequest>,
) -> Result<Response, AppError> {
    let author = Username::new(username);
    state
        .post_service
        .add_comment(&commenter, &author, post_id, &request.text)
        .await?;

    Ok(found(post_path(&author, post_id)))
}
