use std::borrow::Cow;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::{ModelError, ModelResult};
use crate::models::domain::{Question, QuestionKind, QuestionType};
use crate::models::dto::request::GenerationRequest;

pub const MCQ_OPTION_COUNT: usize = 4;
pub const TF_OPTION_COUNT: usize = 2;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("CODE_FENCE is a valid regex pattern")
});

// Raw model output. Doc comments here would end up in the response schema.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct QuizQuestionDto {
    pub id: f64,
    #[serde(rename = "type")]
    #[schemars(extend("enum" = ["mcq", "tf"]))]
    #[validate(length(min = 1))]
    pub question_type: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(default)]
    pub options: Option<Vec<String>>, // null and missing both mean no options
    #[validate(length(min = 1))]
    pub answer: String,
}

impl QuizQuestionDto {
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Cross-field checks the derive cannot express: kind, option shape, answer membership.
    pub fn check_consistency(&self) -> Result<QuestionKind, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let kind = QuestionKind::parse(&self.question_type);
        if kind.is_none() {
            errors.add("type", invalid("unknown_question_type", "type must be mcq or tf"));
        }
        if self.text.trim().is_empty() {
            errors.add("text", invalid("blank", "question text is blank"));
        }
        if self.answer.trim().is_empty() {
            errors.add("answer", invalid("blank", "answer is blank"));
        }

        let bare_true_false = kind == Some(QuestionKind::Tf) && self.options().is_empty();
        if bare_true_false && true_false_pair(&self.answer).is_none() {
            errors.add(
                "answer",
                invalid("answer_not_true_false", "tf answer without options must be true or false"),
            );
        }

        if let Some(kind) = kind.filter(|_| !bare_true_false) {
            let options = self.options();
            let expected = match kind {
                QuestionKind::Mcq => MCQ_OPTION_COUNT,
                QuestionKind::Tf => TF_OPTION_COUNT,
            };
            if options.len() != expected {
                errors.add(
                    "options",
                    invalid("option_count", match kind {
                        QuestionKind::Mcq => "mcq questions need exactly four options",
                        QuestionKind::Tf => "tf questions need exactly two options",
                    }),
                );
            }
            let distinct: HashSet<&str> = options.iter().map(|o| o.trim()).collect();
            if distinct.len() != options.len() || distinct.contains("") {
                errors.add(
                    "options",
                    invalid("option_values", "options must be distinct and non-empty"),
                );
            }
            if !options.iter().any(|o| o.trim() == self.answer.trim()) {
                errors.add(
                    "answer",
                    invalid("answer_not_in_options", "answer is not one of the options"),
                );
            }
        }

        match kind {
            Some(kind) if errors.errors().is_empty() => Ok(kind),
            _ => Err(errors),
        }
    }

    pub fn into_question(self, id: u32, requested: QuestionType) -> ModelResult<Question> {
        self.validate()?;
        let kind = self.check_consistency()?;

        if !kind.fits(requested) {
            return Err(ModelError::Rejected(format!(
                "question {} is {:?} but {} was requested",
                id, kind, requested
            )));
        }

        let (options, answer) = match true_false_pair(&self.answer) {
            Some((pair, answer)) if self.options().is_empty() => (
                pair.iter().map(|o| o.to_string()).collect(),
                answer.to_string(),
            ),
            _ => (
                self.options().iter().map(|o| o.trim().to_string()).collect(),
                self.answer.trim().to_string(),
            ),
        };

        Ok(Question {
            id,
            kind,
            text: self.text.trim().to_string(),
            options: Some(options),
            answer,
        })
    }
}

/// Known true/false word pairs, used when a tf item arrives without options.
static TRUE_FALSE_PAIRS: [[&str; 2]; 3] = [["True", "False"], ["صح", "خطأ"], ["صحيح", "خاطئ"]];

fn true_false_pair(answer: &str) -> Option<(&'static [&'static str; 2], &'static str)> {
    let answer = answer.trim();
    TRUE_FALSE_PAIRS.iter().find_map(|pair| {
        pair.iter()
            .find(|word| word.to_lowercase() == answer.to_lowercase())
            .map(|word| (pair, *word))
    })
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Removes a surrounding markdown code fence, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

/// Parses raw model output into a batch. Any invalid item rejects the whole batch.
/// Items past the requested count are dropped and ids are renumbered from 1.
pub fn parse_question_batch(raw: &str, request: &GenerationRequest) -> ModelResult<Vec<Question>> {
    let items: Vec<QuizQuestionDto> = serde_json::from_str(strip_code_fences(raw))?;

    if items.is_empty() {
        return Err(ModelError::Rejected("model returned no questions".to_string()));
    }
    if items.len() > request.count as usize {
        log::warn!(
            "Model returned {} questions, keeping the first {}",
            items.len(),
            request.count
        );
    }

    items
        .into_iter()
        .take(request.count as usize)
        .enumerate()
        .map(|(index, item)| item.into_question(index as u32 + 1, request.question_type))
        .collect()
}

/// JSON schema of the array the model must answer with.
pub fn question_batch_schema() -> serde_json::Value {
    let mut item = schemars::schema_for!(QuizQuestionDto).to_value();
    if let Some(object) = item.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    json!({ "type": "array", "items": item })
}
