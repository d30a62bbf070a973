pub mod chat_handler;
pub mod question_bank_handler;
pub mod settings_handler;

use std::{fmt, str::FromStr};

use crate::errors::AppError;

/// The three mutually exclusive screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Settings,
    QuestionBank,
    Chat,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Settings => write!(f, "settings"),
            View::QuestionBank => write!(f, "questions"),
            View::Chat => write!(f, "chat"),
        }
    }
}

impl FromStr for View {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "settings" | "" => Ok(View::Settings),
            "questions" | "bank" => Ok(View::QuestionBank),
            "chat" => Ok(View::Chat),
            other => Err(AppError::ValidationError(format!("unknown view '{}'", other))),
        }
    }
}

/// What a view action produced: where to go next, an optional blocking alert
/// and optional text to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewResponse {
    pub view: View,
    pub alert: Option<String>,
    pub body: Option<String>,
}

impl ViewResponse {
    pub fn stay(view: View) -> Self {
        Self {
            view,
            alert: None,
            body: None,
        }
    }

    pub fn navigate(view: View) -> Self {
        Self::stay(view)
    }

    pub fn with_alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = Some(alert.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}
