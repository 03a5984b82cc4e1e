use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};
use tracing::debug;

use shared_models::auth::{AuthResponse, UserProfile};
use shared_models::error::AppError;

use crate::models::{LoginRequest, RedirectQuery, SignupRequest, ThemeBody};
use crate::services::preferences::ThemePreferences;
use crate::services::session::ProfileSession;
use crate::services::validation::sanitize_destination;

// Where to send the client after signing in: an explicit `from`, else
// whatever the guard remembered, else home.
async fn redirect_target(session: &ProfileSession, query: RedirectQuery) -> String {
    let remembered = session.take_destination().await;

    query
        .from
        .as_deref()
        .and_then(sanitize_destination)
        .or(remembered)
        .unwrap_or_else(|| "/".to_string())
}

pub async fn login(
    State(session): State<Arc<ProfileSession>>,
    Query(query): Query<RedirectQuery>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    debug!("Login for {}", request.email);

    let profile = session.login(request).await?;
    let redirect_to = redirect_target(&session, query).await;

    Ok(Json(AuthResponse { profile, redirect_to }))
}

pub async fn signup(
    State(session): State<Arc<ProfileSession>>,
    Query(query): Query<RedirectQuery>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    debug!("Signup for {}", request.email);

    let profile = session.signup(request).await?;
    let redirect_to = redirect_target(&session, query).await;

    Ok(Json(AuthResponse { profile, redirect_to }))
}

pub async fn logout(State(session): State<Arc<ProfileSession>>) -> Result<StatusCode, AppError> {
    session.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(State(session): State<Arc<ProfileSession>>) -> Result<Json<UserProfile>, AppError> {
    session
        .current()
        .await
        .map(Json)
        .ok_or_else(|| AppError::Auth("Not signed in".to_string()))
}

pub async fn get_theme(
    State(preferences): State<Arc<ThemePreferences>>,
) -> Result<Json<ThemeBody>, AppError> {
    let theme = preferences.get().await?;
    Ok(Json(ThemeBody { theme }))
}

pub async fn set_theme(
    State(preferences): State<Arc<ThemePreferences>>,
    Json(body): Json<ThemeBody>,
) -> Result<Json<ThemeBody>, AppError> {
    let theme = preferences.set(body.theme).await?;
    Ok(Json(ThemeBody { theme }))
}
