use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::preferences::ThemePreferences;
use crate::services::session::ProfileSession;

pub fn auth_routes(session: Arc<ProfileSession>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/signup", post(handlers::signup))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .with_state(session)
}

pub fn preference_routes(preferences: Arc<ThemePreferences>) -> Router {
    Router::new()
        .route(
            "/preferences/theme",
            get(handlers::get_theme).put(handlers::set_theme),
        )
        .with_state(preferences)
}
