use serde::Serialize;

use crate::{
    constants::prompts::WELCOME_MESSAGE,
    models::{
        domain::{ChatMessage, Question, Settings},
        dto::request::UpdateSettingsRequest,
    },
};

/// One immutable snapshot of the session. Updates return a new snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub settings: Settings,
    pub questions: Vec<Question>,
    pub messages: Vec<ChatMessage>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Default settings, no questions and the tutor's welcome message.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            questions: Vec::new(),
            messages: vec![ChatMessage::model(WELCOME_MESSAGE)],
        }
    }

    pub fn with_settings(&self, patch: &UpdateSettingsRequest) -> Self {
        Self {
            settings: patch.apply_to(&self.settings),
            questions: self.questions.clone(),
            messages: self.messages.clone(),
        }
    }

    pub fn with_questions(&self, questions: Vec<Question>) -> Self {
        Self {
            settings: self.settings.clone(),
            questions,
            messages: self.messages.clone(),
        }
    }

    pub fn with_message(&self, message: ChatMessage) -> Self {
        let mut messages = self.messages.clone();
        messages.push(message);
        Self {
            settings: self.settings.clone(),
            questions: self.questions.clone(),
            messages,
        }
    }
}
