// Report Cell - presentation of a finished assessment
pub mod emergency;
pub mod models;
pub mod render;

pub use emergency::EmergencyLinks;
pub use models::{AssessmentReport, ConfidenceBand, PatientInfo, RankedCondition, SeverityGauge};
