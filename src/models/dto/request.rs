use serde::Deserialize;

use crate::models::domain::settings::DEFAULT_QUESTION_COUNT;
use crate::models::domain::{ChatMessage, Difficulty, QuestionType, Settings};

/// Partial settings update; `None` leaves the current value in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    pub difficulty: Option<Difficulty>,
    pub question_type: Option<QuestionType>,
    pub show_answers: Option<bool>,
    pub file_name: Option<String>,
    pub question_count: Option<i64>, // non-positive counts fall back to the default
    pub chapter_name: Option<String>,
}

impl UpdateSettingsRequest {
    pub fn is_empty(&self) -> bool {
        self.difficulty.is_none()
            && self.question_type.is_none()
            && self.show_answers.is_none()
            && self.file_name.is_none()
            && self.question_count.is_none()
            && self.chapter_name.is_none()
    }

    /// Shallow merge onto `current`.
    pub fn apply_to(&self, current: &Settings) -> Settings {
        let mut merged = current.clone();

        if let Some(difficulty) = self.difficulty {
            merged.difficulty = difficulty;
        }
        if let Some(question_type) = self.question_type {
            merged.question_type = question_type;
        }
        if let Some(show_answers) = self.show_answers {
            merged.show_answers = show_answers;
        }
        if let Some(file_name) = &self.file_name {
            merged.file_name = file_name.clone();
        }
        if let Some(count) = self.question_count {
            merged.question_count = normalize_question_count(count);
        }
        if let Some(chapter_name) = &self.chapter_name {
            merged.chapter_name = chapter_name.clone();
        }

        merged
    }
}

pub fn normalize_question_count(count: i64) -> u32 {
    if count <= 0 {
        DEFAULT_QUESTION_COUNT
    } else {
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Everything the generator needs for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub context: String,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: u32,
    pub chapter: Option<String>,
}

impl GenerationRequest {
    pub fn from_settings(settings: &Settings) -> Self {
        let count = if settings.question_count == 0 {
            DEFAULT_QUESTION_COUNT
        } else {
            settings.question_count
        };

        Self {
            context: settings.generation_context(),
            question_type: settings.question_type,
            difficulty: settings.difficulty,
            count,
            chapter: settings.chapter().map(str::to_string),
        }
    }
}

/// One tutor turn: the study context, prior turns and the new user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub context: String,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_to_only_touches_named_fields() {
        let current = Settings::default();
        let patch = UpdateSettingsRequest {
            difficulty: Some(Difficulty::Hard),
            chapter_name: Some("Chapter 3".to_string()),
            ..Default::default()
        };

        let merged = patch.apply_to(&current);

        assert_eq!(merged.difficulty, Difficulty::Hard);
        assert_eq!(merged.chapter_name, "Chapter 3");
        assert_eq!(merged.question_type, current.question_type);
        assert_eq!(merged.question_count, current.question_count);
        assert_eq!(merged.show_answers, current.show_answers);
        assert_eq!(merged.file_name, current.file_name);
    }

    #[test]
    fn non_positive_counts_default_to_five() {
        assert_eq!(normalize_question_count(0), 5);
        assert_eq!(normalize_question_count(-3), 5);
        assert_eq!(normalize_question_count(12), 12);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(UpdateSettingsRequest::default().is_empty());
        let patch = UpdateSettingsRequest {
            show_answers: Some(false),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: UpdateSettingsRequest =
            serde_json::from_str(r#"{"question_type":"tf","question_count":10}"#).unwrap();

        assert_eq!(patch.question_type, Some(QuestionType::Tf));
        assert_eq!(patch.question_count, Some(10));
        assert!(patch.difficulty.is_none());
    }

    #[test]
    fn generation_request_carries_settings() {
        let settings = Settings {
            difficulty: Difficulty::Easy,
            question_type: QuestionType::Mix,
            show_answers: false,
            file_name: "notes.pdf".to_string(),
            question_count: 8,
            chapter_name: "Cells".to_string(),
        };

        let request = GenerationRequest::from_settings(&settings);

        assert_eq!(request.count, 8);
        assert_eq!(request.question_type, QuestionType::Mix);
        assert_eq!(request.chapter.as_deref(), Some("Cells"));
        assert!(request.context.contains("notes.pdf"));
    }
}
