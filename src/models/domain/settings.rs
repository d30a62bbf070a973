use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DEFAULT_QUESTION_COUNT: u32 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(AppError::ValidationError(format!(
                "unknown difficulty '{}', expected easy, medium or hard",
                other
            ))),
        }
    }
}

/// The kind of questions requested from the generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Mcq,
    Tf,
    Mix, // mcq and tf in one batch
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "mcq"),
            QuestionType::Tf => write!(f, "tf"),
            QuestionType::Mix => write!(f, "mix"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcq" => Ok(QuestionType::Mcq),
            "tf" => Ok(QuestionType::Tf),
            "mix" => Ok(QuestionType::Mix),
            other => Err(AppError::ValidationError(format!(
                "unknown question type '{}', expected mcq, tf or mix",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
    pub show_answers: bool,
    pub file_name: String, // advisory only, the file content is never read
    pub question_count: u32,
    pub chapter_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            difficulty: Difficulty::Medium,
            question_type: QuestionType::Mcq,
            show_answers: true,
            file_name: String::new(),
            question_count: DEFAULT_QUESTION_COUNT,
            chapter_name: String::new(),
        }
    }
}

impl Settings {
    /// Summary of the study material handed to the generator.
    pub fn generation_context(&self) -> String {
        let source = if self.file_name.trim().is_empty() {
            "general study"
        } else {
            self.file_name.trim()
        };
        format!("Content: {}. Chapter: {}.", source, self.chapter_name.trim())
    }

    /// Summary of the study session handed to the tutor.
    pub fn chat_context(&self, questions_generated: usize) -> String {
        let file = if self.file_name.trim().is_empty() {
            "unspecified"
        } else {
            self.file_name.trim()
        };
        format!(
            "File name: {}. Difficulty: {}. Questions generated so far: {}.",
            file, self.difficulty, questions_generated
        )
    }

    pub fn chapter(&self) -> Option<&str> {
        let chapter = self.chapter_name.trim();
        (!chapter.is_empty()).then_some(chapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_first_launch() {
        let settings = Settings::default();

        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.question_type, QuestionType::Mcq);
        assert!(settings.show_answers);
        assert_eq!(settings.question_count, DEFAULT_QUESTION_COUNT);
        assert!(settings.file_name.is_empty());
    }

    #[test]
    fn parses_enums_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" tf ".parse::<QuestionType>().unwrap(), QuestionType::Tf);
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&QuestionType::Mix).unwrap(), "\"mix\"");
        assert_eq!(serde_json::to_string(&Difficulty::Easy).unwrap(), "\"easy\"");
    }

    #[test]
    fn generation_context_falls_back_to_general_study() {
        let mut settings = Settings::default();
        settings.chapter_name = "Photosynthesis".to_string();
        assert_eq!(
            settings.generation_context(),
            "Content: general study. Chapter: Photosynthesis."
        );

        settings.file_name = "biology.pdf".to_string();
        assert!(settings.generation_context().starts_with("Content: biology.pdf."));
    }

    #[test]
    fn chat_context_reports_question_count() {
        let settings = Settings::default();
        let context = settings.chat_context(7);

        assert!(context.contains("unspecified"));
        assert!(context.contains("medium"));
        assert!(context.ends_with("Questions generated so far: 7."));
    }

    #[test]
    fn blank_chapter_is_none() {
        let mut settings = Settings::default();
        settings.chapter_name = "   ".to_string();
        assert_eq!(settings.chapter(), None);
    }
}
