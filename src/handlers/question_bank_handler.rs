use std::fmt::Write;

use crate::{
    app_state::AppState,
    handlers::{View, ViewResponse},
    services::{export_service, SessionService},
};

/// Question cards as text; the correct option is marked when answers are shown.
pub fn render(state: &AppState) -> String {
    if state.questions.is_empty() {
        return "No questions yet. Go to settings and generate some.".to_string();
    }

    let show_answers = state.settings.show_answers;
    let mut out = String::new();
    for question in &state.questions {
        let _ = writeln!(out, "Q{} [{}]", question.id, question.kind.label());
        let _ = writeln!(out, "  {}", question.text);
        for option in question.options() {
            let marker = if show_answers && question.is_correct(option) { "*" } else { "-" };
            let _ = writeln!(out, "    {} {}", marker, option);
        }
    }
    out
}

/// "Delete all" clears the bank and returns to settings.
pub async fn clear_all(session: &SessionService) -> ViewResponse {
    session.set_questions(Vec::new()).await;
    ViewResponse::navigate(View::Settings)
}

pub async fn share(session: &SessionService) -> ViewResponse {
    let state = session.snapshot().await;
    ViewResponse::stay(View::QuestionBank).with_body(export_service::share_text(&state.questions))
}

pub async fn print(session: &SessionService) -> ViewResponse {
    let state = session.snapshot().await;
    ViewResponse::stay(View::QuestionBank).with_body(export_service::printable_sheet(&state))
}
