// Conversation host: personas, per-conversation history and the turn loop.
// Model calls go through llm_client; field updates go through extraction.

pub mod conversation;
pub mod handlers;
pub mod personas;
pub mod store;
pub mod tokens;
pub mod turn;
