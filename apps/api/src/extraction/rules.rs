//! Opt-in business rules checked against a candidate before it is merged.
//!
//! None are enabled by default. A violation is reported as a field error and
//! discards the whole candidate, the same as a schema mismatch.

use serde::{Deserialize, Serialize};

use crate::extraction::record::{CandidateRecord, FieldError};
use crate::extraction::schema::Field;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    /// Inclusive bounds on `age`.
    AgeRange { min: f64, max: f64 },
    /// Listed numeric fields must not be negative.
    NonNegative { fields: Vec<Field> },
}

impl FieldRule {
    /// Adult applicants only, capped at 150.
    pub fn adult_age() -> Self {
        FieldRule::AgeRange {
            min: 18.0,
            max: 150.0,
        }
    }

    pub fn non_negative_measurements() -> Self {
        FieldRule::NonNegative {
            fields: vec![Field::Age, Field::Weight, Field::Height, Field::Bmi],
        }
    }

    pub fn check(&self, candidate: &CandidateRecord) -> Vec<FieldError> {
        match self {
            FieldRule::AgeRange { min, max } => match candidate.age {
                Some(age) if age < *min => vec![FieldError::RuleViolation {
                    field: Field::Age,
                    message: format!("age must be {min} or older"),
                }],
                Some(age) if age > *max => vec![FieldError::RuleViolation {
                    field: Field::Age,
                    message: format!("age must be at most {max}"),
                }],
                _ => vec![],
            },
            FieldRule::NonNegative { fields } => fields
                .iter()
                .filter_map(|field| {
                    let value = match field {
                        Field::Age => candidate.age,
                        Field::Weight => candidate.weight,
                        Field::Height => candidate.height,
                        Field::Bmi => candidate.bmi,
                        _ => None,
                    }?;
                    (value < 0.0).then(|| FieldError::RuleViolation {
                        field: *field,
                        message: "must be a positive number".to_string(),
                    })
                })
                .collect(),
        }
    }
}

/// The set of rules an extractor enforces. Empty by default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationRules {
    rules: Vec<FieldRule>,
}

impl ValidationRules {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Builds the rule set from the two configuration switches.
    pub fn from_flags(enforce_age_range: bool, enforce_non_negative: bool) -> Self {
        let mut rules = Self::none();
        if enforce_age_range {
            rules = rules.with(FieldRule::adult_age());
        }
        if enforce_non_negative {
            rules = rules.with(FieldRule::non_negative_measurements());
        }
        rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn check(&self, candidate: &CandidateRecord) -> Vec<FieldError> {
        self.rules.iter().flat_map(|r| r.check(candidate)).collect()
    }
}
