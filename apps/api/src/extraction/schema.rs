//! Extraction schema: the declared field set an extraction call targets.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Semantic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
}

impl FieldKind {
    fn json_type(self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Number => "number",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
        })
    }
}

/// One named applicant field. Wire names match the record's JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Age,
    Weight,
    Height,
    WeightUnit,
    HeightUnit,
    #[serde(rename = "BMI")]
    Bmi,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::FirstName,
        Field::LastName,
        Field::Age,
        Field::Weight,
        Field::Height,
        Field::WeightUnit,
        Field::HeightUnit,
        Field::Bmi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Age => "age",
            Field::Weight => "weight",
            Field::Height => "height",
            Field::WeightUnit => "weight_unit",
            Field::HeightUnit => "height_unit",
            Field::Bmi => "BMI",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::FirstName | Field::LastName | Field::WeightUnit | Field::HeightUnit => {
                FieldKind::Text
            }
            Field::Age | Field::Weight | Field::Height | Field::Bmi => FieldKind::Number,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub field: Field,
    pub description: &'static str,
}

/// A fixed set of independently-optional fields, each unknown by default.
#[derive(Debug, Serialize)]
pub struct ExtractionSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

/// The life-insurance applicant schema.
pub static APPLICANT_SCHEMA: ExtractionSchema = ExtractionSchema {
    name: "applicant",
    fields: &[
        FieldSpec {
            field: Field::FirstName,
            description: "the first name of the applicant",
        },
        FieldSpec {
            field: Field::LastName,
            description: "the last name of the applicant",
        },
        FieldSpec {
            field: Field::Age,
            description: "the age of the applicant in years",
        },
        FieldSpec {
            field: Field::Weight,
            description: "the weight of the applicant",
        },
        FieldSpec {
            field: Field::Height,
            description: "the height of the applicant",
        },
        FieldSpec {
            field: Field::WeightUnit,
            description: "the unit the applicant's weight is given in, e.g. lbs or kg",
        },
        FieldSpec {
            field: Field::HeightUnit,
            description: "the unit the applicant's height is given in, e.g. cm or ft",
        },
        FieldSpec {
            field: Field::Bmi,
            description: "the body mass index of the applicant",
        },
    ],
};

impl ExtractionSchema {
    pub fn contains(&self, field: Field) -> bool {
        self.fields.iter().any(|spec| spec.field == field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().map(|spec| spec.field)
    }

    /// JSON-Schema rendering handed to the extraction model. Every property is nullable.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for spec in self.fields {
            properties.insert(
                spec.field.name().to_string(),
                json!({
                    "type": [spec.field.kind().json_type(), "null"],
                    "description": spec.description,
                }),
            );
        }
        json!({
            "type": "object",
            "properties": properties,
            "additionalProperties": false,
        })
    }
}

/// Immutable pairing of a raw utterance and the schema to fill from it.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub text: &'a str,
    pub schema: &'a ExtractionSchema,
}

impl<'a> ExtractionRequest<'a> {
    pub fn new(text: &'a str, schema: &'a ExtractionSchema) -> Self {
        Self { text, schema }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("bmi"), None);
        assert_eq!(Field::from_name("income"), None);
    }

    #[test]
    fn test_bmi_keeps_upper_case_wire_name() {
        assert_eq!(serde_json::to_string(&Field::Bmi).unwrap(), r#""BMI""#);
        assert_eq!(
            serde_json::to_string(&Field::WeightUnit).unwrap(),
            r#""weight_unit""#
        );
    }

    #[test]
    fn test_applicant_schema_covers_every_field() {
        assert_eq!(APPLICANT_SCHEMA.fields.len(), Field::ALL.len());
        for field in Field::ALL {
            assert!(APPLICANT_SCHEMA.contains(field));
        }
    }

    #[test]
    fn test_json_schema_marks_fields_nullable() {
        let schema = APPLICANT_SCHEMA.to_json_schema();
        let age_type = &schema["properties"]["age"]["type"];
        assert_eq!(age_type, &json!(["number", "null"]));
        let name_type = &schema["properties"]["first_name"]["type"];
        assert_eq!(name_type, &json!(["string", "null"]));
        assert_eq!(schema["additionalProperties"], json!(false));
    }
}
