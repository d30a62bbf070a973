use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    handlers::{View, ViewResponse},
    models::dto::request::UpdateSettingsRequest,
    services::SessionService,
};

pub async fn update_settings(session: &SessionService, patch: &UpdateSettingsRequest) -> AppState {
    session.update_settings(patch).await
}

/// The "generate" button: Idle -> Generating -> Idle.
/// Success moves to the question bank; failure stays here with an alert.
pub async fn start(session: &SessionService) -> ViewResponse {
    match session.start_generation().await {
        Ok(count) => {
            log::info!("Generated {} questions, opening the question bank", count);
            ViewResponse::navigate(View::QuestionBank)
        }
        Err(err @ AppError::RequestInFlight(_)) => {
            log::debug!("Ignoring generate while busy: {}", err);
            ViewResponse::stay(View::Settings)
        }
        Err(err) => ViewResponse::stay(View::Settings).with_alert(err.user_message()),
    }
}

/// Parses `key=value` pairs such as `difficulty=hard count=10 chapter="Cell biology"`.
pub fn parse_patch(input: &str) -> AppResult<UpdateSettingsRequest> {
    let mut patch = UpdateSettingsRequest::default();

    for (key, value) in split_pairs(input)? {
        match key.to_ascii_lowercase().as_str() {
            "difficulty" => patch.difficulty = Some(value.parse()?),
            "type" => patch.question_type = Some(value.parse()?),
            "count" => {
                patch.question_count = Some(value.parse().map_err(|_| {
                    AppError::ValidationError(format!("count must be a number, got '{}'", value))
                })?)
            }
            "answers" => {
                patch.show_answers = Some(match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    other => {
                        return Err(AppError::ValidationError(format!(
                            "answers must be on or off, got '{}'",
                            other
                        )))
                    }
                })
            }
            "file" => patch.file_name = Some(value),
            "chapter" => patch.chapter_name = Some(value),
            other => {
                return Err(AppError::ValidationError(format!(
                    "unknown setting '{}'",
                    other
                )))
            }
        }
    }

    Ok(patch)
}

fn split_pairs(input: &str) -> AppResult<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut chars = input.trim().chars().peekable();

    while chars.peek().is_some() {
        let key: String = chars.by_ref().take_while(|c| *c != '=').collect();
        let key = key.trim().to_string();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(AppError::ValidationError(format!(
                "expected key=value, got '{}'",
                key
            )));
        }

        let value: String = if chars.peek() == Some(&'"') {
            chars.next();
            let quoted: String = chars.by_ref().take_while(|c| *c != '"').collect();
            quoted
        } else {
            chars.by_ref().take_while(|c| !c.is_whitespace()).collect()
        };
        pairs.push((key, value));

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
    }

    Ok(pairs)
}

/// Text summary of the current settings.
pub fn describe(state: &AppState) -> String {
    let settings = &state.settings;
    format!(
        "difficulty={} type={} count={} answers={} file={} chapter={}",
        settings.difficulty,
        settings.question_type,
        settings.question_count,
        if settings.show_answers { "on" } else { "off" },
        if settings.file_name.is_empty() { "-" } else { &settings.file_name },
        if settings.chapter_name.is_empty() { "-" } else { &settings.chapter_name },
    )
}
