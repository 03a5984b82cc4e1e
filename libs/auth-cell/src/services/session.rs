use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_models::auth::UserProfile;
use shared_models::error::AppError;
use shared_storage::{KeyValueStore, USER_KEY};

use crate::models::{LoginRequest, SignupRequest};
use crate::services::validation::{is_valid_email, sanitize_destination, split_list};

/// Per-profile state elsewhere in the app that must go when its owner signs
/// out or is replaced by another profile.
#[async_trait]
pub trait LogoutHook: Send + Sync {
    async fn on_logout(&self, profile: &UserProfile);
}

/// The signed-in profile, mirrored to the `user` key of the persisted store.
/// There is no password check and no expiry: holding a profile is being
/// signed in.
pub struct ProfileSession {
    store: Arc<dyn KeyValueStore>,
    profile: RwLock<Option<UserProfile>>,
    return_to: RwLock<Option<String>>,
    logout_hooks: RwLock<Vec<Arc<dyn LogoutHook>>>,
}

impl ProfileSession {
    pub async fn initialize(store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let profile = match store.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => {
                    info!("Restored stored profile for {}", profile.email);
                    Some(profile)
                }
                Err(e) => {
                    warn!("Discarding unreadable stored profile: {}", e);
                    store.remove(USER_KEY).await?;
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            store,
            profile: RwLock::new(profile),
            return_to: RwLock::new(None),
            logout_hooks: RwLock::new(Vec::new()),
        })
    }

    pub async fn register_logout_hook(&self, hook: Arc<dyn LogoutHook>) {
        self.logout_hooks.write().await.push(hook);
    }

    pub async fn login(&self, request: LoginRequest) -> Result<UserProfile, AppError> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError("Please fill in all fields".to_string()));
        }
        if !is_valid_email(email) {
            return Err(AppError::ValidationError("Please enter a valid email address".to_string()));
        }

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

        self.persist(UserProfile::new(name, email)).await
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<UserProfile, AppError> {
        let name = request.name.trim();
        let email = request.email.trim();
        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError(
                "Name, email and password are required".to_string(),
            ));
        }
        if request.password != request.confirm_password {
            return Err(AppError::ValidationError("Passwords do not match".to_string()));
        }
        if !is_valid_email(email) {
            return Err(AppError::ValidationError("Please enter a valid email address".to_string()));
        }

        let profile = UserProfile {
            height: non_blank(request.height),
            weight: non_blank(request.weight),
            age: request.age,
            gender: non_blank(request.gender),
            medical_conditions: split_list(request.medical_conditions.as_deref()),
            allergies: split_list(request.allergies.as_deref()),
            role: non_blank(request.role),
            ..UserProfile::new(name, email)
        };

        self.persist(profile).await
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        let previous = {
            let mut guard = self.profile.write().await;
            self.store.remove(USER_KEY).await?;
            guard.take()
        };

        if let Some(profile) = previous {
            info!("Signed out {}", profile.email);
            self.run_logout_hooks(&profile).await;
        }
        Ok(())
    }

    pub async fn current(&self) -> Option<UserProfile> {
        self.profile.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.profile.read().await.is_some()
    }

    /// Path to bounce back to after the next login or signup.
    pub async fn remember_destination(&self, path: &str) {
        if let Some(path) = sanitize_destination(path) {
            debug!("Remembering destination {}", path);
            *self.return_to.write().await = Some(path);
        }
    }

    pub async fn take_destination(&self) -> Option<String> {
        self.return_to.write().await.take()
    }

    async fn persist(&self, profile: UserProfile) -> Result<UserProfile, AppError> {
        let raw = serde_json::to_string(&profile)
            .map_err(|e| AppError::Internal(format!("Failed to serialize profile: {}", e)))?;

        let previous = {
            let mut guard = self.profile.write().await;
            self.store.set(USER_KEY, raw).await?;
            guard.replace(profile.clone())
        };

        info!("Signed in {}", profile.email);
        if let Some(previous) = previous.filter(|p| p.email != profile.email) {
            self.run_logout_hooks(&previous).await;
        }
        Ok(profile)
    }

    async fn run_logout_hooks(&self, profile: &UserProfile) {
        let hooks = self.logout_hooks.read().await.clone();
        for hook in hooks {
            hook.on_logout(profile).await;
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
