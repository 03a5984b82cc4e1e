use std::sync::Arc;

use tracing::{info, warn};

use shared_models::error::AppError;
use shared_storage::{KeyValueStore, THEME_KEY};

use crate::models::Theme;

pub struct ThemePreferences {
    store: Arc<dyn KeyValueStore>,
}

impl ThemePreferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self) -> Result<Theme, AppError> {
        let theme = match self.store.get(THEME_KEY).await? {
            Some(raw) => raw.parse::<Theme>().unwrap_or_else(|e| {
                warn!("{}; using system theme", e);
                Theme::System
            }),
            None => Theme::default(),
        };
        Ok(theme)
    }

    pub async fn set(&self, theme: Theme) -> Result<Theme, AppError> {
        self.store.set(THEME_KEY, theme.to_string()).await?;
        info!("Theme set to {}", theme);
        Ok(theme)
    }
}
