use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    config::Config,
    constants::prompts::{generation_success_message, CHAT_FALLBACK_REPLY, EMPTY_REPLY_FALLBACK},
    errors::{AppError, AppResult},
    models::{
        domain::{ChatMessage, ChatRole, Question},
        dto::request::{ChatRequest, GenerationRequest, UpdateSettingsRequest},
    },
    services::{
        model_service::QuizModelService,
        request_guard::{Activity, RequestGate},
    },
};

/// Owner of the session state. Views read snapshots and go through the
/// operations below; model calls are serialized by one request gate.
pub struct SessionService {
    id: String,
    state: RwLock<AppState>,
    gate: RequestGate,
    model: Arc<dyn QuizModelService>,
    chat_history_limit: usize,
}

impl SessionService {
    pub fn new(model: Arc<dyn QuizModelService>, config: &Config) -> Self {
        let id = Uuid::new_v4().to_string();
        log::info!("Starting study session {}", id);

        Self {
            id,
            state: RwLock::new(AppState::new()),
            gate: RequestGate::new(),
            model,
            chat_history_limit: config.chat_history_limit,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    pub fn activity(&self) -> Activity {
        self.gate.current()
    }

    pub async fn update_settings(&self, patch: &UpdateSettingsRequest) -> AppState {
        let mut state = self.state.write().await;
        *state = state.with_settings(patch);
        state.clone()
    }

    pub async fn set_questions(&self, questions: Vec<Question>) -> AppState {
        let mut state = self.state.write().await;
        *state = state.with_questions(questions);
        state.clone()
    }

    pub async fn add_message(&self, message: ChatMessage) -> AppState {
        let mut state = self.state.write().await;
        *state = state.with_message(message);
        state.clone()
    }

    /// Generates a batch from the current settings and installs it.
    ///
    /// On any failure the question list is left exactly as it was and the
    /// error carries the alert for the user. Nothing is retried.
    pub async fn start_generation(&self) -> AppResult<usize> {
        let _token = self.gate.try_acquire(Activity::Generating)?;

        let request = GenerationRequest::from_settings(&self.snapshot().await.settings);
        log::info!(
            "Session {}: generating {} questions ({})",
            self.id,
            request.count,
            request.context
        );

        let questions = self.model.generate_questions(&request).await.map_err(|e| {
            log::error!("Session {}: question generation failed: {}", self.id, e);
            AppError::GenerationFailed(e.to_string())
        })?;

        if questions.is_empty() {
            log::error!("Session {}: model returned an empty batch", self.id);
            return Err(AppError::GenerationFailed(
                "model returned no questions".to_string(),
            ));
        }

        let count = questions.len();
        let mut state = self.state.write().await;
        *state = state
            .with_questions(questions)
            .with_message(ChatMessage::model(generation_success_message(count)));

        log::info!("Session {}: installed {} questions", self.id, count);
        Ok(count)
    }

    /// Sends one tutor message.
    ///
    /// Blank input returns `Ok(None)` and changes nothing. While any model call
    /// is outstanding the send is rejected with `RequestInFlight` and changes
    /// nothing. A failed model call appends the fallback reply instead.
    pub async fn send_chat(&self, input: &str) -> AppResult<Option<ChatMessage>> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let _token = self.gate.try_acquire(Activity::AwaitingReply)?;

        let request = {
            let mut state = self.state.write().await;
            let start = state.messages.len().saturating_sub(self.chat_history_limit);
            let request = ChatRequest {
                context: state.settings.chat_context(state.questions.len()),
                history: state.messages[start..]
                    .iter()
                    .filter(|m| !is_local_fallback(m))
                    .cloned()
                    .collect(),
                message: text.to_string(),
            };
            *state = state.with_message(ChatMessage::user(text));
            request
        };

        let reply = match self.model.chat_reply(&request).await {
            Ok(reply) if reply.trim().is_empty() => {
                log::warn!("Session {}: model returned an empty reply", self.id);
                ChatMessage::model(EMPTY_REPLY_FALLBACK)
            }
            Ok(reply) => ChatMessage::model(reply.trim()),
            Err(e) => {
                log::error!("Session {}: tutor reply failed: {}", self.id, e);
                ChatMessage::model(CHAT_FALLBACK_REPLY)
            }
        };

        self.add_message(reply.clone()).await;
        Ok(Some(reply))
    }
}

/// Replies the session wrote itself after a failed or empty model call.
fn is_local_fallback(message: &ChatMessage) -> bool {
    message.role == ChatRole::Model
        && (message.text == CHAT_FALLBACK_REPLY || message.text == EMPTY_REPLY_FALLBACK)
}
