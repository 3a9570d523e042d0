//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Sign up form fields
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    /// Where to send the client afterwards; defaults to `/`
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Sign in form fields
#[derive(Debug, Clone, Deserialize)]
pub struct SignInForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}
