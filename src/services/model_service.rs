use async_trait::async_trait;

use crate::{
    errors::ModelResult,
    models::{
        domain::Question,
        dto::request::{ChatRequest, GenerationRequest},
    },
};

/// Boundary to the hosted generative model. Each call is one request/response
/// round trip with no retry, caching or streaming.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizModelService: Send + Sync {
    /// Returns a validated batch; any malformed or inconsistent item fails the call.
    async fn generate_questions(&self, request: &GenerationRequest) -> ModelResult<Vec<Question>>;

    async fn chat_reply(&self, request: &ChatRequest) -> ModelResult<String>;
}
