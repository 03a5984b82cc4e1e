use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use auth_cell::{require_profile, ProfileSession};
use diagnosis_cell::DiagnosisClient;

use crate::handlers;
use crate::services::registry::ConversationRegistry;

#[derive(Clone)]
pub struct SymptomCheckerState {
    pub diagnosis: Arc<DiagnosisClient>,
    pub conversations: Arc<ConversationRegistry>,
}

impl SymptomCheckerState {
    /// Conversations are torn down when their owner signs out of `session`.
    pub async fn new(diagnosis: Arc<DiagnosisClient>, session: &ProfileSession) -> Self {
        let conversations = Arc::new(ConversationRegistry::new());
        session.register_logout_hook(conversations.clone()).await;

        Self {
            diagnosis,
            conversations,
        }
    }
}

/// Every route here needs a signed-in profile; mount under `/symptom-checker`.
pub fn symptom_checker_routes(state: SymptomCheckerState, session: Arc<ProfileSession>) -> Router {
    Router::new()
        .route("/", get(handlers::form_page))
        .route("/sessions", post(handlers::start_conversation))
        .route(
            "/sessions/{id}",
            get(handlers::get_conversation).delete(handlers::delete_conversation),
        )
        .route("/sessions/{id}/inputs", post(handlers::submit_input))
        .route("/sessions/{id}/restart", post(handlers::restart_conversation))
        .route("/sessions/{id}/report", get(handlers::get_report))
        .route("/sessions/{id}/report.txt", get(handlers::download_report))
        .layer(middleware::from_fn_with_state(session, require_profile))
        .with_state(state)
}
