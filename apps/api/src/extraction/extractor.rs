use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::extraction::merge::merge;
use crate::extraction::outcome::ExtractionOutcome;
use crate::extraction::record::{ApplicantRecord, CandidateRecord};
use crate::extraction::route::{route, ConversationType, Route};
use crate::extraction::rules::ValidationRules;
use crate::extraction::schema::{ExtractionRequest, ExtractionSchema};
use crate::extraction::service::{ExtractionError, ExtractionService};

/// Result of one extraction call. A degraded outcome always carries an
/// all-unknown candidate.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub candidate: CandidateRecord,
    pub outcome: ExtractionOutcome,
}

impl Extraction {
    fn degraded(outcome: ExtractionOutcome) -> Self {
        Self {
            candidate: CandidateRecord::default(),
            outcome,
        }
    }
}

/// Record after one conversation turn. `outcome` is `None` on passthrough.
#[derive(Debug, Clone, Serialize)]
pub struct TurnUpdate {
    pub record: ApplicantRecord,
    pub outcome: Option<ExtractionOutcome>,
}

/// Runs extraction against a service and folds results into applicant records.
/// Failures never escape: they become outcomes and no-op merges.
#[derive(Clone)]
pub struct Extractor {
    service: Arc<dyn ExtractionService>,
    rules: ValidationRules,
    timeout: Option<Duration>,
}

impl Extractor {
    pub fn new(service: Arc<dyn ExtractionService>) -> Self {
        Self {
            service,
            rules: ValidationRules::none(),
            timeout: None,
        }
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Asks the service to fill `schema` from `text` and checks the reply.
    pub async fn extract(&self, text: &str, schema: &ExtractionSchema) -> Extraction {
        if text.trim().is_empty() {
            return Extraction::degraded(ExtractionOutcome::Empty);
        }

        let reply = match self.call_service(ExtractionRequest::new(text, schema)).await {
            Ok(reply) => reply,
            Err(e) => {
                return Extraction::degraded(ExtractionOutcome::ServiceFailed {
                    reason: e.to_string(),
                })
            }
        };
        debug!("Extraction reply: {reply}");

        let candidate = match CandidateRecord::from_extraction(schema, &reply) {
            Ok(candidate) => candidate,
            Err(errors) => {
                return Extraction::degraded(ExtractionOutcome::SchemaInvalid { errors })
            }
        };

        let violations = self.rules.check(&candidate);
        if !violations.is_empty() {
            return Extraction::degraded(ExtractionOutcome::SchemaInvalid { errors: violations });
        }

        let outcome = ExtractionOutcome::classify(schema, &candidate);
        Extraction { candidate, outcome }
    }

    /// Routes on the conversation type, then extracts and merges.
    /// Passthrough types return `current` unchanged without calling the service.
    pub async fn filter_response(
        &self,
        text: &str,
        current: &ApplicantRecord,
        conversation_type: ConversationType,
    ) -> TurnUpdate {
        let schema = match route(conversation_type) {
            Route::Extract(schema) => schema,
            Route::Passthrough => {
                return TurnUpdate {
                    record: current.clone(),
                    outcome: None,
                }
            }
        };

        let Extraction { candidate, outcome } = self.extract(text, schema).await;
        outcome.log(text);

        TurnUpdate {
            record: merge(current, &candidate),
            outcome: Some(outcome),
        }
    }

    async fn call_service(
        &self,
        request: ExtractionRequest<'_>,
    ) -> Result<serde_json::Value, ExtractionError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.service.extract(request))
                .await
                .map_err(|_| ExtractionError::Timeout(limit.as_secs()))?,
            None => self.service.extract(request).await,
        }
    }
}
