use std::fmt::Write;

use crate::{
    app_state::AppState,
    constants::prompts::TUTOR_BUSY_NOTICE,
    errors::AppError,
    handlers::{View, ViewResponse},
    models::domain::ChatRole,
    services::SessionService,
};

/// Sends the input box content. Blank input does nothing; a send while a model
/// call is pending changes nothing and returns the busy notice.
pub async fn send(session: &SessionService, input: &str) -> ViewResponse {
    match session.send_chat(input).await {
        Ok(Some(reply)) => ViewResponse::stay(View::Chat).with_body(reply.text),
        Ok(None) => ViewResponse::stay(View::Chat),
        Err(err @ AppError::RequestInFlight(_)) => {
            log::debug!("Ignoring chat send while busy: {}", err);
            ViewResponse::stay(View::Chat).with_body(TUTOR_BUSY_NOTICE)
        }
        Err(err) => ViewResponse::stay(View::Chat).with_alert(err.user_message()),
    }
}

/// The conversation log, oldest first.
pub fn transcript(state: &AppState) -> String {
    let mut out = String::new();
    for message in &state.messages {
        let speaker = match message.role {
            ChatRole::User => "you",
            ChatRole::Model => "tutor",
        };
        let _ = writeln!(out, "[{}] {}: {}", message.timestamp, speaker, message.text);
    }
    out
}
