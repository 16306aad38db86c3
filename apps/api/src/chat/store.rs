use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::chat::conversation::Conversation;
use crate::errors::AppError;

/// In-process conversation store. Each conversation is owned by one entry;
/// nothing is shared between entries.
#[derive(Clone, Default)]
pub struct ConversationStore {
    inner: Arc<RwLock<HashMap<Uuid, Conversation>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, conversation: Conversation) -> Uuid {
        let id = conversation.id;
        self.inner.write().await.insert(id, conversation);
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<Conversation, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Writes back a conversation that must already exist.
    pub async fn replace(&self, conversation: Conversation) -> Result<(), AppError> {
        let mut guard = self.inner.write().await;
        let slot = guard
            .get_mut(&conversation.id)
            .ok_or_else(|| not_found(conversation.id))?;
        *slot = conversation;
        Ok(())
    }

    pub async fn remove(&self, id: Uuid) -> Result<Conversation, AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found(id))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Conversation {id} not found"))
}
