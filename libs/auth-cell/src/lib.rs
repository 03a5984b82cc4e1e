// Auth Cell - local, unverified profile store and the route guard built on it
pub mod guard;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use guard::require_profile;
pub use models::{LoginRequest, SignupRequest, Theme};
pub use router::{auth_routes, preference_routes};
pub use services::preferences::ThemePreferences;
pub use services::session::{LogoutHook, ProfileSession};
