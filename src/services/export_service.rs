use std::fmt::Write;

use crate::{
    app_state::AppState,
    constants::prompts::SHARE_TITLE,
    models::domain::{Question, QuestionKind},
};

/// Plain text for the platform share sheet or the clipboard.
pub fn share_text(questions: &[Question]) -> String {
    let mut text = format!("{}:", SHARE_TITLE);
    for question in questions {
        let _ = write!(text, "\n{}. {}", question.id, question.text);
    }
    text
}

/// Printable exam sheet. The answer key is only included when answers are shown.
pub fn printable_sheet(state: &AppState) -> String {
    let settings = &state.settings;
    let mut sheet = String::new();

    let _ = writeln!(sheet, "EXAM");
    if let Some(chapter) = settings.chapter() {
        let _ = writeln!(sheet, "Chapter: {}", chapter);
    }
    if !settings.file_name.trim().is_empty() {
        let _ = writeln!(sheet, "Source: {}", settings.file_name.trim());
    }
    let _ = writeln!(
        sheet,
        "Difficulty: {}    Questions: {}",
        settings.difficulty,
        state.questions.len()
    );
    let _ = writeln!(sheet, "Name: ____________________");

    for question in &state.questions {
        let _ = write!(sheet, "\n{}) {}\n", question.id, question.text);
        match question.kind {
            QuestionKind::Mcq => {
                for option in question.options() {
                    let _ = writeln!(sheet, "   [ ] {}", option);
                }
            }
            QuestionKind::Tf => {
                let choices: Vec<String> =
                    question.options().iter().map(|o| format!("( ) {}", o)).collect();
                let _ = writeln!(sheet, "   {}", choices.join("    "));
            }
        }
        if settings.show_answers {
            let _ = writeln!(sheet, "   Correct answer: {}", question.answer);
        }
    }

    sheet
}
