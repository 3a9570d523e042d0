//! Board HTTP Handlers
//!
//! Thread browsing and posting, generic over the storage backend. The
//! auth middleware has already attached [`CurrentUser`] by the time any
//! of these run.

use auth::{AuthState, CurrentUser};
use axum::Extension;
use axum::Json;
use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use board::rules::{validate_content, validate_title};
use board::{BoardRepository, PostId, UserId};
use kernel::error::app_error::{AppError, AppResult};
use serde::Deserialize;
use uuid::Uuid;

use crate::dto::{IndexResponse, PostPageResponse, PostView, UserView};

/// Posts shown on the front page
const FRONT_PAGE_SIZE: i64 = 50;

/// GET /
pub async fn index<R>(
    State(state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<IndexResponse>>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    let posts = state
        .repo
        .page_posts(0, FRONT_PAGE_SIZE)
        .await
        .map_err(|e| e.to_app_error())?;

    Ok(Json(IndexResponse {
        viewer: current.user().map(UserView::from),
        posts: posts.iter().map(PostView::from).collect(),
    }))
}

/// GET /post/{id}
pub async fn post_page<R>(
    State(state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<PostPageResponse>>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    let post_id = parse_id(&id, "malformed post id").map(PostId::from_uuid)?;

    let page = state
        .repo
        .get_post_page_data(post_id)
        .await
        .map_err(|e| e.to_app_error())?;

    Ok(Json(PostPageResponse::new(
        current.user().map(UserView::from),
        page,
    )))
}

/// POST /createpost form fields
#[derive(Debug, Deserialize)]
pub struct CreatePostForm {
    pub title: String,
    pub content: String,
}

/// POST /createpost
pub async fn create_post<R>(
    State(state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<CreatePostForm>,
) -> AppResult<Response>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    let Some(user) = current.user() else {
        return Ok(Redirect::temporary("/").into_response());
    };

    validate_title(&form.title).map_err(|e| AppError::bad_request(e.to_string()))?;
    validate_content(&form.content).map_err(|e| AppError::bad_request(e.to_string()))?;

    let post_id = state
        .repo
        .add_post(&form.title, &form.content, user.id)
        .await
        .map_err(|e| e.to_app_error())?;

    Ok(Redirect::to(&format!("/post/{post_id}")).into_response())
}

/// POST /createcomment form fields
#[derive(Debug, Deserialize)]
pub struct CreateCommentForm {
    pub post_id: String,
    pub comment: String,
}

/// POST /createcomment
pub async fn create_comment<R>(
    State(state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<CreateCommentForm>,
) -> AppResult<Response>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    let Some(user) = current.user() else {
        return Ok(Redirect::temporary("/").into_response());
    };

    let post_id = parse_id(&form.post_id, "malformed post id").map(PostId::from_uuid)?;
    validate_content(&form.comment).map_err(|e| AppError::bad_request(e.to_string()))?;

    state
        .repo
        .add_comment(&form.comment, post_id, user.id)
        .await
        .map_err(|e| e.to_app_error())?;

    Ok(Redirect::to(&format!("/post/{post_id}")).into_response())
}

/// GET /self
pub async fn self_profile<R>(
    State(_state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Response>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    match current.user() {
        Some(user) => Ok(Json(UserView::from(user)).into_response()),
        None => Ok(Redirect::temporary("/").into_response()),
    }
}

/// GET /user/{id}
pub async fn user_profile<R>(
    State(state): State<AuthState<R>>,
    Path(id): Path<String>,
) -> AppResult<Json<UserView>>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_id(&id, "malformed user id").map(UserId::from_uuid)?;

    let user = state
        .repo
        .get_user(user_id)
        .await
        .map_err(|e| e.to_app_error())?;

    Ok(Json(UserView::from(&user)))
}

fn parse_id(raw: &str, message: &'static str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request(message))
}
