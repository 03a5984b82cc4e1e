use std::sync::Arc;

use axum::{
    response::Redirect,
    routing::get,
    Router,
};

use auth_cell::{auth_routes, preference_routes, ProfileSession, ThemePreferences};
use symptom_checker_cell::{symptom_checker_routes, SymptomCheckerState};

pub struct AppState {
    pub session: Arc<ProfileSession>,
    pub preferences: Arc<ThemePreferences>,
    pub symptom_checker: SymptomCheckerState,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "SymptaCare API is running!" }))
        .merge(auth_routes(state.session.clone()))
        .merge(preference_routes(state.preferences))
        .nest(
            "/symptom-checker",
            symptom_checker_routes(state.symptom_checker, state.session),
        )
        // Unknown paths go home
        .fallback(|| async { Redirect::to("/") })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use diagnosis_cell::DiagnosisClient;
    use shared_storage::MemoryStore;
    use shared_utils::test_utils::TestConfig;
    use tower::ServiceExt;

    use super::*;

    async fn create_test_router() -> Router {
        let store = Arc::new(MemoryStore::new());
        let diagnosis = DiagnosisClient::new(&TestConfig::default().to_app_config()).unwrap();
        let session = Arc::new(ProfileSession::initialize(store.clone()).await.unwrap());
        let symptom_checker = SymptomCheckerState::new(Arc::new(diagnosis), &session).await;

        create_router(AppState {
            session,
            preferences: Arc::new(ThemePreferences::new(store)),
            symptom_checker,
        })
    }

    #[tokio::test]
    async fn test_unknown_route_redirects_home() {
        let app = create_test_router().await;

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_symptom_checker_is_guarded() {
        let app = create_test_router().await;

        let response = app
            .oneshot(Request::builder().uri("/symptom-checker").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?from=%2Fsymptom-checker"
        );
    }

    #[tokio::test]
    async fn test_theme_routes_mounted_at_root() {
        let app = create_test_router().await;

        let response = app
            .oneshot(Request::builder().uri("/preferences/theme").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
