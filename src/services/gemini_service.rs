//! Gemini `generateContent` client behind [`QuizModelService`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    constants::prompts::{question_generation_prompt, tutor_system_instruction},
    errors::{ModelError, ModelResult},
    models::{
        domain::{ChatMessage, ChatRole, Question},
        dto::{
            quiz_dto::{parse_question_batch, question_batch_schema},
            request::{ChatRequest, GenerationRequest},
        },
    },
    services::model_service::QuizModelService,
};

pub struct GeminiModelService {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    thinking_budget: Option<u32>,
    language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_json_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<GeminiThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiModelService {
    pub fn new(config: &Config) -> ModelResult<Self> {
        if config.gemini_api_key.expose_secret().trim().is_empty() {
            return Err(ModelError::MissingCredential);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.model_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            temperature: config.model_temperature,
            thinking_budget: config.model_thinking_budget,
            language: config.quiz_language.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    fn generation_config(&self) -> GeminiGenerationConfig {
        GeminiGenerationConfig {
            temperature: self.temperature,
            thinking_config: self
                .thinking_budget
                .map(|thinking_budget| GeminiThinkingConfig { thinking_budget }),
            ..Default::default()
        }
    }

    fn build_generation_request(&self, request: &GenerationRequest) -> GeminiRequest {
        let prompt = question_generation_prompt(request, &self.language);

        GeminiRequest {
            system_instruction: None,
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                response_mime_type: Some("application/json"),
                response_json_schema: Some(question_batch_schema()),
                ..self.generation_config()
            }),
        }
    }

    fn build_chat_request(&self, request: &ChatRequest) -> GeminiRequest {
        GeminiRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: tutor_system_instruction(&request.context, &self.language),
                }],
            }),
            contents: build_contents(&request.history, &request.message),
            generation_config: Some(self.generation_config()),
        }
    }

    async fn send_request(&self, body: &GeminiRequest) -> ModelResult<String> {
        log::debug!("Sending request to {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            log::error!("Gemini API error: {} - {}", status, response_text);
            return Err(ModelError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&response_text)?;

        if let Some(usage) = &gemini_response.usage_metadata {
            log::info!(
                "Gemini usage - prompt: {:?}, response: {:?}, total: {:?} tokens",
                usage.prompt_token_count,
                usage.candidates_token_count,
                usage.total_token_count
            );
        }

        extract_text(gemini_response)
    }
}

/// Joins the visible text parts of the first candidate, skipping thought summaries.
fn extract_text(response: GeminiResponse) -> ModelResult<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::Rejected("no candidates in response".to_string()))?;

    if let Some(reason) = &candidate.finish_reason {
        if reason != "STOP" {
            log::warn!("Gemini candidate finished with reason {}", reason);
        }
    }

    Ok(candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default())
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

/// Turns the chat log into alternating turns that open with a user turn.
/// Consecutive messages from the same role are folded into one turn.
fn build_contents(history: &[ChatMessage], message: &str) -> Vec<GeminiContent> {
    let mut contents: Vec<GeminiContent> = Vec::new();

    let turns = history
        .iter()
        .skip_while(|m| m.role == ChatRole::Model)
        .map(|m| (role_name(m.role), m.text.as_str()))
        .chain(std::iter::once(("user", message)));

    for (role, text) in turns {
        match contents.last_mut() {
            Some(last) if last.role == Some(role) => last.parts.push(GeminiPart {
                text: text.to_string(),
            }),
            _ => contents.push(GeminiContent {
                role: Some(role),
                parts: vec![GeminiPart {
                    text: text.to_string(),
                }],
            }),
        }
    }

    contents
}

#[async_trait]
impl QuizModelService for GeminiModelService {
    async fn generate_questions(&self, request: &GenerationRequest) -> ModelResult<Vec<Question>> {
        log::info!(
            "Requesting {} {} questions at {} difficulty",
            request.count,
            request.question_type,
            request.difficulty
        );

        let body = self.build_generation_request(request);
        let raw = self.send_request(&body).await?;

        let questions = parse_question_batch(&raw, request).map_err(|e| {
            log::error!("Rejected generated batch: {}", e);
            e
        })?;

        log::info!("Model produced {} valid questions", questions.len());
        Ok(questions)
    }

    async fn chat_reply(&self, request: &ChatRequest) -> ModelResult<String> {
        log::info!("Requesting tutor reply with {} prior turns", request.history.len());

        let body = self.build_chat_request(request);
        self.send_request(&body).await
    }
}
