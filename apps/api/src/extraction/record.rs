use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::extraction::schema::{ExtractionSchema, Field, FieldKind};

/// A single scalar slot value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// `""` and `0` count as "not meaningfully present" and never overwrite during merge.
    pub fn is_meaningful(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Number(n) => *n != 0.0,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
        }
    }

    /// Lenient coercion of a JSON reply value into the field's declared kind.
    /// Numeric strings are accepted for number fields and numbers for text fields.
    fn coerce(field: Field, value: &Value) -> Result<Self, FieldError> {
        let coerced = match (field.kind(), value) {
            (FieldKind::Number, Value::Number(n)) => n.as_f64().map(FieldValue::Number),
            (FieldKind::Number, Value::String(s)) => {
                s.trim().parse::<f64>().ok().map(FieldValue::Number)
            }
            (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldKind::Text, Value::Number(n)) => Some(FieldValue::Text(n.to_string())),
            _ => None,
        };
        coerced.ok_or_else(|| FieldError::WrongType {
            field,
            expected: field.kind(),
            found: json_type_name(value).to_string(),
        })
    }
}

/// A single offending field found while checking a candidate against its schema.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("extraction reply is not a JSON object")]
    NotAnObject,

    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    #[error("field '{field}' expected {expected}, got {found}")]
    WrongType {
        field: Field,
        expected: FieldKind,
        found: String,
    },

    #[error("field '{field}' violates rule: {message}")]
    RuleViolation { field: Field, message: String },
}

/// Structured applicant fields accumulated across one conversation.
/// Every field is independently optional; `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub weight_unit: Option<String>,
    pub height_unit: Option<String>,
    #[serde(rename = "BMI")]
    pub bmi: Option<f64>,
}

/// Output of a single extraction call. Same field set as `ApplicantRecord`.
pub type CandidateRecord = ApplicantRecord;

impl ApplicantRecord {
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::FirstName => self.first_name.clone().map(FieldValue::Text),
            Field::LastName => self.last_name.clone().map(FieldValue::Text),
            Field::Age => self.age.map(FieldValue::Number),
            Field::Weight => self.weight.map(FieldValue::Number),
            Field::Height => self.height.map(FieldValue::Number),
            Field::WeightUnit => self.weight_unit.clone().map(FieldValue::Text),
            Field::HeightUnit => self.height_unit.clone().map(FieldValue::Text),
            Field::Bmi => self.bmi.map(FieldValue::Number),
        }
    }

    /// Sets one slot, rejecting a value of the wrong kind.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match (field, value) {
            (Field::FirstName, FieldValue::Text(s)) => self.first_name = Some(s),
            (Field::LastName, FieldValue::Text(s)) => self.last_name = Some(s),
            (Field::WeightUnit, FieldValue::Text(s)) => self.weight_unit = Some(s),
            (Field::HeightUnit, FieldValue::Text(s)) => self.height_unit = Some(s),
            (Field::Age, FieldValue::Number(n)) => self.age = Some(n),
            (Field::Weight, FieldValue::Number(n)) => self.weight = Some(n),
            (Field::Height, FieldValue::Number(n)) => self.height = Some(n),
            (Field::Bmi, FieldValue::Number(n)) => self.bmi = Some(n),
            (field, value) => {
                return Err(FieldError::WrongType {
                    field,
                    expected: field.kind(),
                    found: value.kind().to_string(),
                })
            }
        }
        Ok(())
    }

    /// Fields of `schema` holding a meaningful value, in schema order.
    pub fn populated(&self, schema: &ExtractionSchema) -> Vec<Field> {
        schema
            .field_names()
            .filter(|f| self.get(*f).is_some_and(|v| v.is_meaningful()))
            .collect()
    }

    /// Builds a candidate from a raw extraction reply, checking it against `schema`.
    /// Nulls are unknowns. Any unknown or wrong-typed key fails the whole candidate.
    pub fn from_extraction(
        schema: &ExtractionSchema,
        reply: &Value,
    ) -> Result<CandidateRecord, Vec<FieldError>> {
        let Some(object) = reply.as_object() else {
            return Err(vec![FieldError::NotAnObject]);
        };

        let mut candidate = CandidateRecord::default();
        let mut errors = Vec::new();

        for (key, value) in object {
            let field = match Field::from_name(key) {
                Some(field) if schema.contains(field) => field,
                _ => {
                    errors.push(FieldError::UnknownField { name: key.clone() });
                    continue;
                }
            };
            if value.is_null() {
                continue;
            }
            if let Err(e) = FieldValue::coerce(field, value).and_then(|v| candidate.set(field, v)) {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(candidate)
        } else {
            Err(errors)
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::schema::APPLICANT_SCHEMA;
    use serde_json::json;

    #[test]
    fn test_empty_values_are_not_meaningful() {
        assert!(!FieldValue::Text(String::new()).is_meaningful());
        assert!(!FieldValue::Number(0.0).is_meaningful());
        assert!(FieldValue::Text(" ".to_string()).is_meaningful());
        assert!(FieldValue::Number(-1.0).is_meaningful());
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut record = ApplicantRecord::default();
        let err = record
            .set(Field::Age, FieldValue::Text("thirty".to_string()))
            .unwrap_err();
        assert!(matches!(err, FieldError::WrongType { field: Field::Age, .. }));
        assert_eq!(record, ApplicantRecord::default());
    }

    #[test]
    fn test_record_serializes_bmi_upper_case() {
        let record = ApplicantRecord {
            bmi: Some(22.5),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["BMI"], json!(22.5));
        assert!(value.get("bmi").is_none());
    }

    #[test]
    fn test_record_deserializes_partial_object() {
        let record: ApplicantRecord =
            serde_json::from_value(json!({"first_name": "Jane", "BMI": 21.0})).unwrap();
        assert_eq!(record.first_name.as_deref(), Some("Jane"));
        assert_eq!(record.bmi, Some(21.0));
        assert_eq!(record.age, None);
    }

    #[test]
    fn test_from_extraction_accepts_nulls_and_coerces() {
        let reply = json!({
            "first_name": "Jane",
            "age": "34",
            "weight": 150,
            "weight_unit": "lbs",
            "height": null
        });
        let candidate = ApplicantRecord::from_extraction(&APPLICANT_SCHEMA, &reply).unwrap();
        assert_eq!(candidate.first_name.as_deref(), Some("Jane"));
        assert_eq!(candidate.age, Some(34.0));
        assert_eq!(candidate.weight, Some(150.0));
        assert_eq!(candidate.height, None);
    }

    #[test]
    fn test_from_extraction_reports_unknown_and_wrong_type() {
        let reply = json!({"income": 50000, "age": true, "last_name": "Doe"});
        let errors = ApplicantRecord::from_extraction(&APPLICANT_SCHEMA, &reply).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&FieldError::UnknownField {
            name: "income".to_string()
        }));
        assert!(errors.contains(&FieldError::WrongType {
            field: Field::Age,
            expected: FieldKind::Number,
            found: "boolean".to_string(),
        }));
    }

    #[test]
    fn test_from_extraction_rejects_non_object() {
        let errors = ApplicantRecord::from_extraction(&APPLICANT_SCHEMA, &json!([1, 2])).unwrap_err();
        assert_eq!(errors, vec![FieldError::NotAnObject]);
    }

    #[test]
    fn test_populated_skips_empty_values() {
        let record = ApplicantRecord {
            first_name: Some("Jane".to_string()),
            last_name: Some(String::new()),
            age: Some(0.0),
            height: Some(170.0),
            ..Default::default()
        };
        assert_eq!(
            record.populated(&APPLICANT_SCHEMA),
            vec![Field::FirstName, Field::Height]
        );
    }
}
