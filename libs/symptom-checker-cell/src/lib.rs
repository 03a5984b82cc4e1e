// Symptom Checker Cell - symptom form and the guided conversation that ends in a report
pub mod conversation;
pub mod error;
pub mod form;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use conversation::{Conversation, Effect, Event};
pub use error::ConversationError;
pub use models::{Author, Message, MessageContent, Stage, UserInput};
pub use router::{symptom_checker_routes, SymptomCheckerState};
pub use services::registry::ConversationRegistry;
