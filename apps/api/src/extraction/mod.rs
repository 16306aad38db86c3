// Structured applicant-field extraction and merge.
// Field values come from the extraction service; everything else here is pure.

pub mod extractor;
pub mod handlers;
pub mod merge;
pub mod outcome;
pub mod prompts;
pub mod record;
pub mod route;
pub mod rules;
pub mod schema;
pub mod service;

pub use extractor::{Extractor, TurnUpdate};
pub use record::ApplicantRecord;
pub use route::ConversationType;
