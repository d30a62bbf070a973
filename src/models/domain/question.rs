use serde::{Deserialize, Serialize};

use crate::models::domain::settings::QuestionType;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: u32, // unique within one generation batch only
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>, // four for mcq, two for tf
    pub answer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq, // Four options, one of them is the answer
    Tf,  // True/False statement
}

impl QuestionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mcq" => Some(QuestionKind::Mcq),
            "tf" => Some(QuestionKind::Tf),
            _ => None,
        }
    }

    /// Whether a batch requested as `requested` may contain this kind.
    pub fn fits(self, requested: QuestionType) -> bool {
        matches!(
            (self, requested),
            (_, QuestionType::Mix)
                | (QuestionKind::Mcq, QuestionType::Mcq)
                | (QuestionKind::Tf, QuestionType::Tf)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::Mcq => "Multiple choice",
            QuestionKind::Tf => "True / False",
        }
    }
}

impl Question {
    pub fn is_correct(&self, candidate: &str) -> bool {
        self.answer.trim() == candidate.trim()
    }

    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}
