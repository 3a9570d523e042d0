//! HTTP Handlers
//!
//! Sign-up/sign-in accept classic form fields (`username`, `password`,
//! optional `redirect`) and answer with a redirect plus the session
//! cookie; page rendering belongs to whatever sits in front of this API.

use axum::Json;
use axum::extract::{Form, State};
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Extension;
use board::BoardRepository;
use platform::cookie::extract_cookie;

use crate::application::{
    SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{SessionStatusResponse, SignInForm, SignUpForm};
use crate::presentation::middleware::{AuthState, CurrentUser};

fn redirect_target(redirect: Option<String>) -> String {
    match redirect {
        Some(target) if !target.is_empty() => target,
        _ => "/".to_string(),
    }
}

/// POST /signup
pub async fn sign_up<R>(
    State(state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<SignUpForm>,
) -> AuthResult<Response>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    if current.is_authenticated() {
        return Ok(Redirect::temporary("/").into_response());
    }

    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );
    let output = use_case
        .execute(SignUpInput {
            username: form.username,
            password: form.password,
        })
        .await?;

    let target = redirect_target(form.redirect);
    Ok((
        [(SET_COOKIE, output.ticket.cookie)],
        Redirect::to(&target),
    )
        .into_response())
}

/// POST /signin
pub async fn sign_in<R>(
    State(state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<SignInForm>,
) -> AuthResult<Response>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    if current.is_authenticated() {
        return Ok(Redirect::temporary("/").into_response());
    }

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );
    let output = use_case
        .execute(SignInInput {
            username: form.username,
            password: form.password,
        })
        .await?;

    let target = redirect_target(form.redirect);
    Ok((
        [(SET_COOKIE, output.ticket.cookie)],
        Redirect::to(&target),
    )
        .into_response())
}

/// POST /logout
///
/// Requires a currently-valid session.
pub async fn log_out<R>(
    State(state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    if !current.is_authenticated() {
        return Err(AuthError::Unauthenticated);
    }

    // The middleware just authenticated this request, so the cookie has
    // to be here; not finding it is our own inconsistency.
    let token = extract_cookie(&headers, &state.config.session_cookie_name)
        .ok_or_else(|| AuthError::Internal("session cookie missing after authentication".into()))?;

    let use_case = SignOutUseCase::new(state.sessions.clone(), state.config.clone());
    let cookie = use_case.execute(&token);

    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// GET /status
pub async fn session_status<R>(
    State(_state): State<AuthState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> Json<SessionStatusResponse>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    match current.user() {
        Some(user) => Json(SessionStatusResponse {
            authenticated: true,
            user_id: Some(user.id.to_string()),
            user_name: Some(user.name.clone()),
        }),
        None => Json(SessionStatusResponse {
            authenticated: false,
            user_id: None,
            user_name: None,
        }),
    }
}
