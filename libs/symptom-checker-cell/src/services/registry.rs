use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use auth_cell::LogoutHook;
use shared_models::auth::UserProfile;

use crate::conversation::Conversation;
use crate::error::ConversationError;

/// In-memory conversations by id. Nothing here is persisted, and every lookup
/// is scoped to the profile that started the conversation: another profile
/// sees `NotFound`.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    conversations: RwLock<HashMap<Uuid, Conversation>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, conversation: Conversation) -> Conversation {
        let snapshot = conversation.clone();
        self.conversations
            .write()
            .await
            .insert(conversation.id, conversation);
        snapshot
    }

    pub async fn get(&self, id: Uuid, owner: &str) -> Result<Conversation, ConversationError> {
        self.conversations
            .read()
            .await
            .get(&id)
            .filter(|c| c.owner == owner)
            .cloned()
            .ok_or(ConversationError::NotFound(id))
    }

    /// Runs `f` against the stored conversation under the write lock.
    pub async fn update<F, R>(&self, id: Uuid, owner: &str, f: F) -> Result<R, ConversationError>
    where
        F: FnOnce(&mut Conversation) -> Result<R, ConversationError>,
    {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(&id)
            .filter(|c| c.owner == owner)
            .ok_or(ConversationError::NotFound(id))?;
        f(conversation)
    }

    pub async fn remove(&self, id: Uuid, owner: &str) -> Result<(), ConversationError> {
        let mut conversations = self.conversations.write().await;
        match conversations.get(&id) {
            Some(c) if c.owner == owner => {
                conversations.remove(&id);
                debug!("Conversation {} removed", id);
                Ok(())
            }
            _ => Err(ConversationError::NotFound(id)),
        }
    }

    /// Drops every conversation started by `owner`; returns how many went.
    pub async fn remove_owned_by(&self, owner: &str) -> usize {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|_, c| c.owner != owner);
        before - conversations.len()
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LogoutHook for ConversationRegistry {
    async fn on_logout(&self, profile: &UserProfile) {
        let removed = self.remove_owned_by(&profile.email).await;
        info!("Cleared {} conversation(s) for {}", removed, profile.email);
    }
}
