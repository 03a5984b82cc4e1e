use axum::{
    extract::{Extension, Json, Path, Query, Request, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use diagnosis_cell::DiagnoseRequest;
use report_cell::AssessmentReport;
use shared_models::auth::UserProfile;
use shared_models::error::AppError;
use shared_models::symptom::SymptomFormData;
use shared_utils::extractor::extract_profile;

use crate::conversation::{Conversation, Effect, Event};
use crate::error::ConversationError;
use crate::form::{validate_submission, FormDefaults};
use crate::models::{FormPage, LocationQuery, UserInput};
use crate::router::SymptomCheckerState;

pub async fn form_page(request: Request) -> Result<Json<FormPage>, AppError> {
    let profile = extract_profile(&request)?;

    Ok(Json(FormPage {
        greeting: format!("Hi {}, tell us what's bothering you.", profile.name),
        defaults: FormDefaults::for_profile(&profile),
    }))
}

pub async fn start_conversation(
    State(state): State<SymptomCheckerState>,
    Extension(profile): Extension<UserProfile>,
    Json(form): Json<SymptomFormData>,
) -> Result<(StatusCode, Json<Conversation>), AppError> {
    let form = validate_submission(form, &profile)?;
    let conversation = Conversation::start(form, &profile);

    let conversation = state.conversations.insert(conversation).await;
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn get_conversation(
    State(state): State<SymptomCheckerState>,
    Extension(profile): Extension<UserProfile>,
    Path(id): Path<Uuid>,
) -> Result<Json<Conversation>, AppError> {
    Ok(Json(state.conversations.get(id, &profile.email).await?))
}

/// Records an answer and, once gathering is over, runs the analysis before
/// responding. The analysis runs as its own task, so the conversation still
/// reaches its report if this request is dropped.
pub async fn submit_input(
    State(state): State<SymptomCheckerState>,
    Extension(profile): Extension<UserProfile>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserInput>,
) -> Result<Json<Conversation>, AppError> {
    let effect = state
        .conversations
        .update(id, &profile.email, |c| c.apply(Event::InputSubmitted(input)))
        .await?;

    if let Effect::RequestDiagnosis(request) = effect {
        debug!("Conversation {} requesting diagnosis", id);
        run_analysis(&state, id, profile.email.clone(), *request)
            .await
            .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))??;
    }

    Ok(Json(state.conversations.get(id, &profile.email).await?))
}

fn run_analysis(
    state: &SymptomCheckerState,
    id: Uuid,
    owner: String,
    request: DiagnoseRequest,
) -> JoinHandle<Result<(), ConversationError>> {
    let diagnosis = state.diagnosis.clone();
    let conversations = state.conversations.clone();

    tokio::spawn(async move {
        // The registry lock is released while the request is in flight
        let outcome = diagnosis.diagnose_symptoms(&request).await;
        conversations
            .update(id, &owner, |c| c.apply(Event::from(outcome)))
            .await
            .map(|_| ())
    })
}

pub async fn restart_conversation(
    State(state): State<SymptomCheckerState>,
    Extension(profile): Extension<UserProfile>,
    Path(id): Path<Uuid>,
) -> Result<Json<Conversation>, AppError> {
    state
        .conversations
        .update(id, &profile.email, |c| c.apply(Event::RestartRequested))
        .await?;

    Ok(Json(state.conversations.get(id, &profile.email).await?))
}

pub async fn delete_conversation(
    State(state): State<SymptomCheckerState>,
    Extension(profile): Extension<UserProfile>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.conversations.remove(id, &profile.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn load_report(
    state: &SymptomCheckerState,
    profile: &UserProfile,
    id: Uuid,
    location: &LocationQuery,
) -> Result<AssessmentReport, AppError> {
    let conversation = state.conversations.get(id, &profile.email).await?;
    let report = conversation.report()?.clone();
    Ok(report.with_location(location.coordinates()))
}

pub async fn get_report(
    State(state): State<SymptomCheckerState>,
    Extension(profile): Extension<UserProfile>,
    Path(id): Path<Uuid>,
    Query(location): Query<LocationQuery>,
) -> Result<Json<AssessmentReport>, AppError> {
    Ok(Json(load_report(&state, &profile, id, &location).await?))
}

pub async fn download_report(
    State(state): State<SymptomCheckerState>,
    Extension(profile): Extension<UserProfile>,
    Path(id): Path<Uuid>,
    Query(location): Query<LocationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = load_report(&state, &profile, id, &location).await?;
    let file_name = report.export_file_name();
    info!("Exporting report for conversation {} as {}", id, file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        report.to_plain_text(),
    ))
}
