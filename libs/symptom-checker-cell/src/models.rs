use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use report_cell::AssessmentReport;

pub const PAIN_SCALE_MIN: u8 = 1;
pub const PAIN_SCALE_MAX: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Gathering,
    Analysis,
    Recommendation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Gathering => "gathering",
            Stage::Analysis => "analysis",
            Stage::Recommendation => "recommendation",
        };
        f.write_str(name)
    }
}

/// An answer submitted while gathering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserInput {
    PainScale { level: u8 },
    Text { text: String },
}

impl UserInput {
    /// Pain level carried by the input. A free-text answer that is just a
    /// number on the scale counts as a pain-scale selection.
    pub fn pain_level(&self) -> Option<u8> {
        match self {
            UserInput::PainScale { level } => Some(*level),
            UserInput::Text { text } => text
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|level| (PAIN_SCALE_MIN..=PAIN_SCALE_MAX).contains(level)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { author: Author, text: String },
    PainScale { min: u8, max: u8 },
    Report { report: Box<AssessmentReport> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sent_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl Message {
    pub fn new(content: MessageContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            sent_at: Utc::now(),
            content,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(MessageContent::Text {
            author: Author::Bot,
            text: text.into(),
        })
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageContent::Text {
            author: Author::User,
            text: text.into(),
        })
    }

    pub fn pain_scale() -> Self {
        Self::new(MessageContent::PainScale {
            min: PAIN_SCALE_MIN,
            max: PAIN_SCALE_MAX,
        })
    }

    pub fn report(report: AssessmentReport) -> Self {
        Self::new(MessageContent::Report {
            report: Box::new(report),
        })
    }

    pub fn is_report(&self) -> bool {
        matches!(self.content, MessageContent::Report { .. })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl LocationQuery {
    pub fn coordinates(&self) -> Option<report_cell::emergency::Coordinates> {
        let (lat, lon) = self.lat.zip(self.lon)?;
        report_cell::emergency::Coordinates::new(lat, lon)
    }
}

/// What the symptom checker page shows before a conversation starts.
#[derive(Debug, Clone, Serialize)]
pub struct FormPage {
    pub greeting: String,
    pub defaults: crate::form::FormDefaults,
}
