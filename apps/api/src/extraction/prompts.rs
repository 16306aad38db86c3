// Prompt constants for structured field extraction.

/// System prompt for field extraction. Append `JSON_ONLY_SYSTEM`.
pub const EXTRACTION_SYSTEM: &str = "You are a precise information extraction assistant \
    working for a life insurance underwriter. \
    Extract only what the applicant explicitly states. \
    Never guess, infer or compute a value that is not written in the text.";

/// Extraction prompt template. Replace `{schema_json}` and `{text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the properties described by the JSON schema below from the applicant's answer.

JSON SCHEMA:
{schema_json}

Return ONE JSON object whose keys are the schema property names.
Rules:
- Use null for any property the answer does not state.
- Numbers must be JSON numbers, without units. Put units in the matching *_unit property.
- Do NOT add properties that are not in the schema.
- An answer such as "no" or "I'd rather not say" yields every property as null.

APPLICANT ANSWER:
{text}"#;
