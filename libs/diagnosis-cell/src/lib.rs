// Diagnosis Cell - remote diagnosis client plus local response repair
pub mod error;
pub mod models;
pub mod services;

pub use error::DiagnosisError;
pub use models::{
    normalize_severity,
    Condition,
    DiagnoseRequest,
    DiagnoseResponse,
    DiagnosisOutcome,
    ResponseSource,
    Severity,
    UrgencyLevel,
};
pub use services::client::DiagnosisClient;
pub use services::request::{build_enhanced_request, map_gender_for_api};
