//! Session Handlers
//!
//! Admin login, token verification, refresh and logout.

use axum::{extract::State, http::HeaderMap, Json};

use crate::api::state::AppState;
use crate::auth::{bearer_token, Authenticated};
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, LoginResponse, RefreshResponse, UserInfo, VerifyResponse};

/// Handler for POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let (token, claims) = state
        .identity
        .authenticate(&request.into_credentials())
        .await?;

    Ok(Json(LoginResponse {
        message: "login successful".to_string(),
        access_token: token.access_token,
        expires_at: token.expires_at,
        user: UserInfo::from(&claims),
    }))
}

/// Handler for GET /api/auth/verify
pub async fn verify(Authenticated(claims): Authenticated) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        user: UserInfo::from(&claims),
        expires_at: claims.expires_at,
    })
}

/// Handler for POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
) -> Result<Json<RefreshResponse>> {
    let (token, _) = state.identity.refresh(&claims).await?;
    Ok(Json(RefreshResponse {
        message: "token refreshed".to_string(),
        access_token: token.access_token,
        expires_at: token.expires_at,
    }))
}

/// Handler for POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    _caller: Authenticated,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let token = bearer_token(&headers)?;
    state.identity.revoke(token).await;
    Ok(Json(serde_json::json!({ "message": "logged out" })))
}
