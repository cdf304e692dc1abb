//! Blog API endpoint paths and request/response bodies.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

pub const SIGN_IN: &str = "/auth/signin";

pub const SIGN_UP: &str = "/auth/signup";

/// Exchanges a refresh token for a new pair. Called without a bearer token.
pub const REFRESH: &str = "/auth/refresh";

pub const BOARDS: &str = "/api/boards";

pub const BOARD_CATEGORIES: &str = "/api/boards/categories";

pub const USER_SCRAPS: &str = "/api/users/scraps";

pub const USER_UPDATE_NAME: &str = "/api/users/update-name";

pub const USER_CHANGE_PASSWORD: &str = "/api/users/change-password";

pub const USER_PROFILE_IMAGE: &str = "/api/users/profile-image";

/// `/api/boards/{id}`
pub fn board(id: i64) -> String {
    format!("{BOARDS}/{id}")
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SignInRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest<'a> {
    pub username: &'a str,
    pub name: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

/// Token pair returned by sign-in and refresh.
///
/// Both fields are optional so a partial answer can be detected instead of
/// failing deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateNameRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

/// Error body of a non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
