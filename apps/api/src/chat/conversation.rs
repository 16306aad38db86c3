use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::personas::Persona;
use crate::extraction::{ApplicantRecord, ConversationType};
use crate::llm_client::{ChatMessage, ChatModel, Role};

pub const GREETING: &str = "What can I do for you?";

/// Options chosen when a conversation is opened.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationOptions {
    #[serde(default)]
    pub persona: Persona,
    /// Defaults to the persona's type.
    pub conversation_type: Option<ConversationType>,
    #[serde(default)]
    pub model: ChatModel,
    #[serde(default)]
    pub show_tokens: bool,
}

/// One chat session. Owns its history and the applicant record built from it.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: Uuid,
    pub persona: Persona,
    pub conversation_type: ConversationType,
    pub model: ChatModel,
    pub show_tokens: bool,
    pub messages: Vec<ChatMessage>,
    pub applicant: ApplicantRecord,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(options: ConversationOptions) -> Self {
        let ConversationOptions {
            persona,
            conversation_type,
            model,
            show_tokens,
        } = options;
        Self {
            id: Uuid::new_v4(),
            persona,
            conversation_type: conversation_type
                .unwrap_or_else(|| persona.default_conversation_type()),
            model,
            show_tokens,
            messages: seed_messages(persona),
            applicant: ApplicantRecord::default(),
            created_at: Utc::now(),
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Drops the last message if it is a user message. Used when a turn fails.
    pub fn pop_user(&mut self) -> Option<ChatMessage> {
        match self.messages.last() {
            Some(m) if m.role == Role::User => self.messages.pop(),
            _ => None,
        }
    }

    /// Everything except the system prompt.
    pub fn visible_messages(&self) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.role != Role::System)
            .collect()
    }

    /// Number of user turns so far.
    pub fn turns(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }

    /// Restarts the session: fresh prompt and greeting, unknown applicant.
    pub fn clear_history(&mut self) {
        self.messages = seed_messages(self.persona);
        self.applicant = ApplicantRecord::default();
    }
}

fn seed_messages(persona: Persona) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(persona.system_prompt()),
        ChatMessage::assistant(GREETING),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_seeds_prompt_and_greeting() {
        let conversation = Conversation::new(ConversationOptions {
            persona: Persona::FullQuestionnaire,
            ..Default::default()
        });
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].role, Role::System);
        assert_eq!(conversation.messages[1].content, GREETING);
        assert_eq!(
            conversation.conversation_type,
            ConversationType::LifeInsurance
        );
        assert_eq!(conversation.applicant, ApplicantRecord::default());
    }

    #[test]
    fn test_explicit_type_overrides_persona_default() {
        let conversation = Conversation::new(ConversationOptions {
            persona: Persona::FullQuestionnaire,
            conversation_type: Some(ConversationType::General),
            ..Default::default()
        });
        assert_eq!(conversation.conversation_type, ConversationType::General);
    }

    #[test]
    fn test_visible_messages_hide_system_prompt() {
        let mut conversation = Conversation::new(ConversationOptions::default());
        conversation.push_user("Hello");
        conversation.push_assistant("Hi there");
        let visible = conversation.visible_messages();
        assert_eq!(visible.len(), 3);
        assert!(visible.iter().all(|m| m.role != Role::System));
        assert_eq!(conversation.turns(), 1);
    }

    #[test]
    fn test_pop_user_only_removes_trailing_user_message() {
        let mut conversation = Conversation::new(ConversationOptions::default());
        assert!(conversation.pop_user().is_none());
        conversation.push_user("Hello");
        assert_eq!(conversation.pop_user().map(|m| m.content), Some("Hello".to_string()));
        assert_eq!(conversation.messages.len(), 2);
    }

    #[test]
    fn test_clear_history_resets_record() {
        let mut conversation = Conversation::new(ConversationOptions {
            persona: Persona::MiniQuestionnaire,
            ..Default::default()
        });
        conversation.push_user("I'm Jane");
        conversation.applicant.first_name = Some("Jane".to_string());

        conversation.clear_history();

        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.turns(), 0);
        assert_eq!(conversation.applicant, ApplicantRecord::default());
    }
}
