use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use diagnosis_cell::{build_enhanced_request, DiagnoseRequest, DiagnoseResponse, DiagnosisOutcome, ResponseSource};
use report_cell::AssessmentReport;
use shared_models::auth::UserProfile;
use shared_models::symptom::SymptomFormData;

use crate::error::ConversationError;
use crate::models::{Message, Stage, UserInput, PAIN_SCALE_MAX, PAIN_SCALE_MIN};

pub const PAIN_QUESTION: &str = "Let me ask you a few questions to better understand your condition. \
Are you experiencing any pain? If yes, on a scale of 1-10, how would you rate it?";
pub const ANALYZING_MESSAGE: &str = "Thank you for the information. I'm analyzing your symptoms now...";
pub const FALLBACK_WARNING: &str = "I couldn't reach the analysis service, so this assessment was \
prepared offline from your answers. Please treat it with extra caution.";

/// Discrete inputs to the conversation.
#[derive(Debug, Clone)]
pub enum Event {
    InputSubmitted(UserInput),
    AnalysisResolved(DiagnoseResponse),
    AnalysisFailed { fallback: DiagnoseResponse, reason: String },
    RestartRequested,
}

impl Event {
    fn action(&self) -> &'static str {
        match self {
            Event::InputSubmitted(_) => "submit input",
            Event::AnalysisResolved(_) | Event::AnalysisFailed { .. } => "complete analysis",
            Event::RestartRequested => "restart",
        }
    }
}

impl From<DiagnosisOutcome> for Event {
    fn from(outcome: DiagnosisOutcome) -> Self {
        match outcome.source {
            ResponseSource::Remote => Event::AnalysisResolved(outcome.response),
            ResponseSource::Fallback { reason } => Event::AnalysisFailed {
                fallback: outcome.response,
                reason,
            },
        }
    }
}

/// Work the caller must do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    RequestDiagnosis(Box<DiagnoseRequest>),
}

/// One run through gathering, analysis and recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: Uuid,
    /// E-mail of the profile that started it.
    #[serde(skip)]
    pub owner: String,
    pub stage: Stage,
    pub form: SymptomFormData,
    pub inputs: Vec<String>,
    pub pain_level: Option<u8>,
    pub messages: Vec<Message>,
    #[serde(skip)]
    pub medical_history: Vec<String>,
    #[serde(skip)]
    pub report: Option<AssessmentReport>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn start(form: SymptomFormData, profile: &UserProfile) -> Self {
        let now = Utc::now();
        let mut conversation = Self {
            id: Uuid::new_v4(),
            owner: profile.email.clone(),
            stage: Stage::Gathering,
            form,
            inputs: Vec::new(),
            pain_level: None,
            messages: Vec::new(),
            medical_history: profile.medical_history(),
            report: None,
            created_at: now,
            updated_at: now,
        };
        conversation.greet();

        info!("Conversation {} started", conversation.id);
        conversation
    }

    pub fn report(&self) -> Result<&AssessmentReport, ConversationError> {
        match (self.stage, &self.report) {
            (Stage::Recommendation, Some(report)) => Ok(report),
            _ => Err(ConversationError::ReportNotReady(self.id)),
        }
    }

    /// Applies one event. The stage only ever moves forward, except through
    /// an explicit restart.
    pub fn apply(&mut self, event: Event) -> Result<Effect, ConversationError> {
        let from = self.stage;

        let effect = match (from, event) {
            (Stage::Gathering, Event::InputSubmitted(input)) => self.capture_input(input)?,
            (Stage::Analysis, Event::AnalysisResolved(response)) => {
                self.finish(response);
                Effect::None
            }
            (Stage::Analysis, Event::AnalysisFailed { fallback, reason }) => {
                warn!("Conversation {} using fallback assessment: {}", self.id, reason);
                self.messages.push(Message::bot(FALLBACK_WARNING));
                self.finish(fallback);
                Effect::None
            }
            (Stage::Gathering | Stage::Recommendation, Event::RestartRequested) => {
                self.restart();
                Effect::None
            }
            (stage, event) => {
                return Err(ConversationError::InvalidTransition {
                    stage,
                    action: event.action(),
                })
            }
        };

        self.updated_at = Utc::now();
        debug!("Conversation {}: {} -> {}", self.id, from, self.stage);
        Ok(effect)
    }

    fn greet(&mut self) {
        self.messages.push(Message::bot(format!(
            "Hi there! I'm your SymptaCare assistant. I see you're experiencing: \"{}\".",
            self.form.symptoms
        )));
        self.messages.push(Message::bot(PAIN_QUESTION));
        self.messages.push(Message::pain_scale());
    }

    fn capture_input(&mut self, input: UserInput) -> Result<Effect, ConversationError> {
        let recorded = match &input {
            UserInput::PainScale { level } => {
                if !(PAIN_SCALE_MIN..=PAIN_SCALE_MAX).contains(level) {
                    return Err(ConversationError::InvalidInput(format!(
                        "Pain level must be between {} and {}",
                        PAIN_SCALE_MIN, PAIN_SCALE_MAX
                    )));
                }
                format!("Pain level: {}/{}", level, PAIN_SCALE_MAX)
            }
            UserInput::Text { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(ConversationError::InvalidInput("Message cannot be empty".to_string()));
                }
                text.to_string()
            }
        };

        if let Some(level) = input.pain_level() {
            self.pain_level = Some(level);
        }
        self.messages.push(Message::user(recorded.clone()));
        self.inputs.push(recorded);

        // A single answer is enough to start the analysis
        self.messages.push(Message::bot(ANALYZING_MESSAGE));
        self.stage = Stage::Analysis;

        Ok(Effect::RequestDiagnosis(Box::new(self.diagnose_request())))
    }

    fn diagnose_request(&self) -> DiagnoseRequest {
        DiagnoseRequest {
            pain_level: self.pain_level,
            medical_history: self.medical_history.clone(),
            ..build_enhanced_request(&self.form, &self.inputs)
        }
    }

    fn finish(&mut self, response: DiagnoseResponse) {
        let report = AssessmentReport::build(&response, &self.form, Utc::now());

        self.messages.push(Message::report(report.clone()));
        self.report = Some(report);
        self.stage = Stage::Recommendation;
        info!("Conversation {} reached recommendation", self.id);
    }

    fn restart(&mut self) {
        self.stage = Stage::Gathering;
        self.inputs.clear();
        self.pain_level = None;
        self.report = None;
        self.messages.clear();
        self.greet();
        info!("Conversation {} restarted", self.id);
    }
}
