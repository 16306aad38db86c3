use serde::{Deserialize, Serialize};

use crate::extraction::schema::{ExtractionSchema, APPLICANT_SCHEMA};

/// Conversation type tag set by the host. Parsing is total: unrecognised tags
/// fall back to `General`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ConversationType {
    LifeInsurance,
    DocumentQa,
    #[default]
    General,
}

impl ConversationType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "life_insurance" => ConversationType::LifeInsurance,
            "document_qa" => ConversationType::DocumentQa,
            _ => ConversationType::General,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConversationType::LifeInsurance => "life_insurance",
            ConversationType::DocumentQa => "document_qa",
            ConversationType::General => "general",
        }
    }
}

impl From<String> for ConversationType {
    fn from(tag: String) -> Self {
        ConversationType::from_tag(&tag)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Route {
    Extract(&'static ExtractionSchema),
    Passthrough,
}

/// Only life-insurance conversations extract applicant fields.
pub fn route(conversation_type: ConversationType) -> Route {
    match conversation_type {
        ConversationType::LifeInsurance => Route::Extract(&APPLICANT_SCHEMA),
        ConversationType::DocumentQa | ConversationType::General => Route::Passthrough,
    }
}
