//! Router Assembly
//!
//! Board routes plus the auth routes, with the identity middleware
//! wrapped around everything.

use auth::{AuthState, attach_current_user, auth_router};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use board::BoardRepository;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Build the full application router for a backend
pub fn app_router<R>(state: AuthState<R>) -> Router
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    let board_routes = Router::new()
        .route("/", get(handlers::index::<R>))
        .route("/post/{id}", get(handlers::post_page::<R>))
        .route("/createpost", post(handlers::create_post::<R>))
        .route("/createcomment", post(handlers::create_comment::<R>))
        .route("/self", get(handlers::self_profile::<R>))
        .route("/user/{id}", get(handlers::user_profile::<R>))
        .with_state(state.clone());

    board_routes
        .merge(auth_router(state.clone()))
        .layer(middleware::from_fn_with_state(
            state,
            attach_current_user::<R>,
        ))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{AuthConfig, SessionStore};
    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use board::JsonDatabase;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;
    use tower::ServiceExt;

    async fn setup(dir: &std::path::Path) -> Router {
        let db = JsonDatabase::connect(dir, "api.json", Duration::from_secs(60))
            .await
            .unwrap();
        let state = AuthState {
            repo: Arc::new(db),
            sessions: SessionStore::new(),
            config: Arc::new(AuthConfig::development()),
        };
        app_router(state)
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, format!("session_token={cookie}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, format!("session_token={cookie}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn sign_up(app: &Router, name: &str) -> String {
        let response = app
            .clone()
            .oneshot(form_post(
                "/signup",
                &format!("username={name}&password=secret"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        response.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .strip_prefix("session_token=")
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_index_empty_board() {
        let dir = tempdir().unwrap();
        let app = setup(dir.path()).await;

        let response = app.oneshot(get_request("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(body["viewer"].is_null());
        assert_eq!(body["posts"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_create_post_redirects_home() {
        let dir = tempdir().unwrap();
        let app = setup(dir.path()).await;

        let response = app
            .oneshot(form_post("/createpost", "title=t&content=c", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()["location"], "/");
    }

    #[tokio::test]
    async fn test_post_and_comment_flow() {
        let dir = tempdir().unwrap();
        let app = setup(dir.path()).await;
        let token = sign_up(&app, "courtier").await;

        // Create a post and follow the redirect target.
        let response = app
            .clone()
            .oneshot(form_post(
                "/createpost",
                "title=hello&content=first+post",
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()["location"].to_str().unwrap().to_string();
        let post_id = location.strip_prefix("/post/").unwrap().to_string();

        // Comment on it.
        let response = app
            .clone()
            .oneshot(form_post(
                "/createcomment",
                &format!("post_id={post_id}&comment=hi"),
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // The thread page aggregates post, poster and comment author.
        let response = app
            .clone()
            .oneshot(get_request(&location, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["post"]["title"], "hello");
        assert_eq!(body["poster"]["name"], "courtier");
        assert_eq!(body["viewer"]["name"], "courtier");
        let comments = body["comments"].as_array().unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["content"], "hi");
        assert_eq!(comments[0]["poster"]["name"], "courtier");

        // And it shows up on the front page.
        let response = app.oneshot(get_request("/", None)).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["posts"][0]["commentCount"], 1);
    }

    #[tokio::test]
    async fn test_unknown_post_is_404() {
        let dir = tempdir().unwrap();
        let app = setup(dir.path()).await;

        let response = app
            .oneshot(get_request(
                &format!("/post/{}", uuid::Uuid::now_v7()),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_post_id_is_400() {
        let dir = tempdir().unwrap();
        let app = setup(dir.path()).await;

        let response = app
            .oneshot(get_request("/post/not-a-uuid", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_self_profile() {
        let dir = tempdir().unwrap();
        let app = setup(dir.path()).await;

        // Anonymous: bounced home.
        let response = app
            .clone()
            .oneshot(get_request("/self", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        // Signed in: own profile.
        let token = sign_up(&app, "courtier").await;
        let response = app
            .oneshot(get_request("/self", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["name"], "courtier");
    }
}
