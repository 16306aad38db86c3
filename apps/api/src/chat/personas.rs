//! Assistant personas and the scripted system prompts behind them.

use serde::{Deserialize, Serialize};

use crate::extraction::ConversationType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    SimpleAssistant,
    MiniQuestionnaire,
    FullQuestionnaire,
    InsuranceAdvisor,
}

impl Persona {
    pub fn label(self) -> &'static str {
        match self {
            Persona::SimpleAssistant => "Simple AI Assistant",
            Persona::MiniQuestionnaire => "mini questionnaire",
            Persona::FullQuestionnaire => "full questionnaire",
            Persona::InsuranceAdvisor => "Insurance Advisor",
        }
    }

    pub fn system_prompt(self) -> String {
        match self {
            Persona::SimpleAssistant => SIMPLE_ASSISTANT_SYSTEM.to_string(),
            Persona::InsuranceAdvisor => INSURANCE_ADVISOR_SYSTEM.to_string(),
            Persona::MiniQuestionnaire => {
                format!("{QUESTIONNAIRE_PREAMBLE}\n\n{CORE_QUESTIONS}")
            }
            Persona::FullQuestionnaire => {
                format!("{QUESTIONNAIRE_PREAMBLE}\n\n{CORE_QUESTIONS}\n\n{EXTENDED_QUESTIONS}")
            }
        }
    }

    /// Personas that collect applicant details extract fields by default.
    pub fn default_conversation_type(self) -> ConversationType {
        match self {
            Persona::SimpleAssistant => ConversationType::General,
            Persona::MiniQuestionnaire
            | Persona::FullQuestionnaire
            | Persona::InsuranceAdvisor => ConversationType::LifeInsurance,
        }
    }
}

const SIMPLE_ASSISTANT_SYSTEM: &str = "You are a helpful AI bot.";

const INSURANCE_ADVISOR_SYSTEM: &str = "You are a kind and professional insurance agent \
    helper bot collecting a life insurance applicant's relevant information for underwriting.";

const QUESTIONNAIRE_PREAMBLE: &str = "You are a kind and professional insurance agent helper bot \
collecting a life insurance applicant's relevant information for underwriting.
Answer the applicant's reply and stop; do not add questions of your own.
Ask every question below, no matter how many times the applicant answers \"no\".
Check that each answer falls within normal human ranges.
Do not show intermediate calculations or processing steps.
Do not assume any information on the applicant's behalf.
Do not comment on the applicant's perceived health.
Collect the information as a conversational question and answer exchange, and share a \
summary of the key information at the end of the conversation.

Collect the following information:";

const CORE_QUESTIONS: &str = "\
0. **Basic Info**: Full legal name and date of birth.
1. **Last Physician and Treatment**: Was the primary care doctor the last physician seen? If not, who was? What treatment was given or recommended at the last consultation?
2. **Primary Care Doctor**: Name and specialty of the primary care doctor, and the date of the most recent visit.
3. **Physical Stats**: Height and weight.
4. **Weight Loss**: More than 10 lbs lost in the past year? (Yes/No)
  - if yes, the primary reason: a. Diet b. Exercise c. Illness d. Pregnancy e. Other (ask for a description)
  - how much weight was lost in the past year?";

const EXTENDED_QUESTIONS: &str = "\
5. **Medical History**: In the past 10 years, any diagnosis, treatment or consultation for each of:
  A. cardiovascular issues
  B. cancer or tumors
  C. diabetes or endocrine issues
  D. urinary or reproductive system issues
  E. gastrointestinal issues
  F. musculoskeletal issues
  G. respiratory issues
  H. neurological issues
  I. sensory issues (eyes, ears, etc.)
  J. mental health issues
  K. other chronic conditions (please specify)
6. **Physical Deformities and Therapies**: Any amputations, physical deformities, or speech, physical or occupational therapy in the past 10 years? (Yes/No, specify if Yes)
7. **HIV/AIDS**: Diagnosed with or treated for HIV/AIDS in the past 10 years? (Yes/No)
8. **Current Medications**: Any prescription or non-prescription medication not yet disclosed? (Yes/No, specify if Yes)
9. **Substance Use**:
  - Tobacco or tobacco-related products? (Yes/No, specify if Yes)
  - Alcohol? (Yes/No, specify if Yes)
  - Marijuana in the past 5 years? (Yes/No)
10. **Substance Abuse Counseling**: Counseling or treatment for alcohol or drug use had or advised in the past 10 years? (Yes/No)
11. **Pregnancy**: Currently pregnant? (Yes/No, for ages 15 and over)
12. **Disability Benefits**: Received or applied for disability benefits, including worker's compensation or social security disability, in the past 5 years? (Yes/No)
13. **Undisclosed Medical Tests or Appointments**: Any undisclosed medical tests, exams or scheduled appointments in the past 5 years? (Yes/No)
14. **Family Medical History**: Any immediate family member (father, mother, sibling) who died before age 60 of cardiovascular disease or cancer, or was diagnosed with diabetes, mental illness or a hereditary condition? (Yes/No, specify if Yes)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_questionnaire_extends_mini() {
        let mini = Persona::MiniQuestionnaire.system_prompt();
        let full = Persona::FullQuestionnaire.system_prompt();
        assert!(full.starts_with(&mini));
        assert!(full.contains("**Family Medical History**"));
        assert!(!mini.contains("**Medical History**"));
    }

    #[test]
    fn test_questionnaires_extract_by_default() {
        assert_eq!(
            Persona::MiniQuestionnaire.default_conversation_type(),
            ConversationType::LifeInsurance
        );
        assert_eq!(
            Persona::SimpleAssistant.default_conversation_type(),
            ConversationType::General
        );
    }

    #[test]
    fn test_persona_serde_snake_case() {
        let persona: Persona = serde_json::from_str(r#""insurance_advisor""#).unwrap();
        assert_eq!(persona, Persona::InsuranceAdvisor);
        assert_eq!(persona.label(), "Insurance Advisor");
    }
}
