use serde::Serialize;
use tracing::{info, warn};

use crate::extraction::record::{CandidateRecord, FieldError};
use crate::extraction::schema::{ExtractionSchema, Field};

/// Diagnostic attached to every extraction. None of these are fatal: a degraded
/// outcome always comes with an all-unknown candidate, so the merge is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Every schema field was populated.
    Complete,
    /// Some fields populated. The normal case.
    Partial {
        populated: Vec<Field>,
        missing: Vec<Field>,
    },
    /// Nothing meaningful was extracted.
    Empty,
    /// The reply did not conform to the schema or an enabled rule.
    SchemaInvalid { errors: Vec<FieldError> },
    /// The extraction service failed or timed out.
    ServiceFailed { reason: String },
}

impl ExtractionOutcome {
    pub fn classify(schema: &ExtractionSchema, candidate: &CandidateRecord) -> Self {
        let populated = candidate.populated(schema);
        if populated.is_empty() {
            return ExtractionOutcome::Empty;
        }
        let missing: Vec<Field> = schema
            .field_names()
            .filter(|f| !populated.contains(f))
            .collect();
        if missing.is_empty() {
            ExtractionOutcome::Complete
        } else {
            ExtractionOutcome::Partial { populated, missing }
        }
    }

    /// True when the turn produced no usable field updates.
    pub fn is_degraded(&self) -> bool {
        !matches!(
            self,
            ExtractionOutcome::Complete | ExtractionOutcome::Partial { .. }
        )
    }

    /// Emits the `(query, outcome)` audit event.
    pub fn log(&self, query: &str) {
        match self {
            ExtractionOutcome::Complete => info!("Full extraction for query '{query}'"),
            ExtractionOutcome::Partial { populated, .. } => {
                info!("Partial extraction for query '{query}': {populated:?}")
            }
            ExtractionOutcome::Empty => warn!("No extracted data for query '{query}'"),
            ExtractionOutcome::SchemaInvalid { errors } => {
                warn!("Extraction failed validation for query '{query}': {errors:?}")
            }
            ExtractionOutcome::ServiceFailed { reason } => {
                warn!("Extraction service failed for query '{query}': {reason}")
            }
        }
    }
}
