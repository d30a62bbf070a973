use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use quiz_tutor::{
    config::Config,
    constants::prompts::{CHAT_FALLBACK_REPLY, TUTOR_BUSY_NOTICE},
    errors::{AppError, ModelError, ModelResult},
    handlers::{chat_handler, settings_handler, View},
    models::{
        domain::{ChatRole, Question, QuestionKind, QuestionType},
        dto::{
            quiz_dto::parse_question_batch,
            request::{ChatRequest, GenerationRequest, UpdateSettingsRequest},
        },
    },
    services::{Activity, QuizModelService, SessionService},
};

/// Answers generation with canned model output that still goes through the
/// real validation boundary.
struct CannedModel {
    raw_batch: String,
    generate_calls: AtomicUsize,
    chat_calls: AtomicUsize,
    fail_chat: bool,
}

impl CannedModel {
    fn new(raw_batch: serde_json::Value) -> Self {
        Self {
            raw_batch: raw_batch.to_string(),
            generate_calls: AtomicUsize::new(0),
            chat_calls: AtomicUsize::new(0),
            fail_chat: false,
        }
    }
}

#[async_trait]
impl QuizModelService for CannedModel {
    async fn generate_questions(&self, request: &GenerationRequest) -> ModelResult<Vec<Question>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        parse_question_batch(&self.raw_batch, request)
    }

    async fn chat_reply(&self, request: &ChatRequest) -> ModelResult<String> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_chat {
            return Err(ModelError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(format!("About: {}", request.message))
    }
}

/// Holds every chat reply until the gate is opened.
struct GatedModel {
    gate: Notify,
    chat_calls: AtomicUsize,
}

#[async_trait]
impl QuizModelService for GatedModel {
    async fn generate_questions(&self, _request: &GenerationRequest) -> ModelResult<Vec<Question>> {
        Err(ModelError::Rejected("not used".to_string()))
    }

    async fn chat_reply(&self, _request: &ChatRequest) -> ModelResult<String> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok("Chapter X is about optics.".to_string())
    }
}

fn five_mcq() -> serde_json::Value {
    let items: Vec<serde_json::Value> = (1..=5)
        .map(|i| {
            json!({
                "id": i,
                "type": "mcq",
                "text": format!("Question {}?", i),
                "options": ["alpha", "beta", "gamma", "delta"],
                "answer": "gamma"
            })
        })
        .collect();
    json!(items)
}

fn session_with(model: Arc<dyn QuizModelService>) -> SessionService {
    SessionService::new(model, &Config::from_env())
}

#[tokio::test]
async fn generates_five_well_formed_mcq_questions() {
    let model = Arc::new(CannedModel::new(five_mcq()));
    let session = session_with(model.clone());
    session
        .update_settings(&UpdateSettingsRequest {
            question_count: Some(5),
            question_type: Some(QuestionType::Mcq),
            ..Default::default()
        })
        .await;

    let response = settings_handler::start(&session).await;
    let state = session.snapshot().await;

    assert_eq!(response.view, View::QuestionBank);
    assert_eq!(state.questions.len(), 5);
    for question in &state.questions {
        assert_eq!(question.kind, QuestionKind::Mcq);
        assert_eq!(question.options().len(), 4);
        assert!(question.options().contains(&question.answer));
    }
    assert_eq!(model.generate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_batch_leaves_questions_untouched() {
    let mut bad = five_mcq();
    bad[3]["answer"] = json!("epsilon");
    let session = session_with(Arc::new(CannedModel::new(bad)));
    let good = session_with(Arc::new(CannedModel::new(five_mcq())));
    good.start_generation().await.unwrap();
    session.set_questions(good.snapshot().await.questions).await;
    let before = session.snapshot().await;

    let response = settings_handler::start(&session).await;

    assert_eq!(response.view, View::Settings);
    assert!(response.alert.is_some());
    assert_eq!(session.snapshot().await, before);
}

#[tokio::test]
async fn failed_chat_appends_one_fallback_and_keeps_user_message() {
    let mut model = CannedModel::new(five_mcq());
    model.fail_chat = true;
    let session = session_with(Arc::new(model));

    let response = chat_handler::send(&session, "explain question 2").await;
    let state = session.snapshot().await;

    assert_eq!(response.body.as_deref(), Some(CHAT_FALLBACK_REPLY));
    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.messages[1].role, ChatRole::User);
    assert_eq!(state.messages[1].text, "explain question 2");
    assert_eq!(state.messages[2].text, CHAT_FALLBACK_REPLY);
}

#[tokio::test]
async fn second_send_while_reply_pending_is_a_no_op() {
    let model = Arc::new(GatedModel {
        gate: Notify::new(),
        chat_calls: AtomicUsize::new(0),
    });
    let session = session_with(model.clone());

    let (first, second, _) = futures::future::join3(
        session.send_chat("what is chapter X about"),
        async {
            assert_eq!(session.activity(), Activity::AwaitingReply);
            session.send_chat("what is chapter X about").await
        },
        async { model.gate.notify_one() },
    )
    .await;

    assert!(first.unwrap().is_some());
    assert!(matches!(second, Err(AppError::RequestInFlight(_))));
    assert_eq!(model.chat_calls.load(Ordering::SeqCst), 1);

    let state = session.snapshot().await;
    let user_messages = state
        .messages
        .iter()
        .filter(|m| m.role == ChatRole::User)
        .count();
    assert_eq!(user_messages, 1);
    assert_eq!(session.activity(), Activity::Idle);
}

#[tokio::test]
async fn chat_view_reports_busy_tutor_without_sending() {
    let model = Arc::new(GatedModel {
        gate: Notify::new(),
        chat_calls: AtomicUsize::new(0),
    });
    let session = session_with(model.clone());

    let (_, busy, _) = futures::future::join3(
        chat_handler::send(&session, "first question"),
        chat_handler::send(&session, "second question"),
        async { model.gate.notify_one() },
    )
    .await;

    assert_eq!(busy.view, View::Chat);
    assert_eq!(busy.body.as_deref(), Some(TUTOR_BUSY_NOTICE));
    assert!(busy.alert.is_none());
    assert_eq!(model.chat_calls.load(Ordering::SeqCst), 1);
    let state = session.snapshot().await;
    assert!(state.messages.iter().all(|m| m.text != "second question"));
}

#[tokio::test]
async fn generation_is_rejected_while_chat_is_pending() {
    let model = Arc::new(GatedModel {
        gate: Notify::new(),
        chat_calls: AtomicUsize::new(0),
    });
    let session = session_with(model.clone());

    let (chat, generate, _) = futures::future::join3(
        session.send_chat("hello"),
        session.start_generation(),
        async { model.gate.notify_one() },
    )
    .await;

    assert!(chat.is_ok());
    assert!(matches!(generate, Err(AppError::RequestInFlight(_))));
    assert!(session.snapshot().await.questions.is_empty());
}

#[tokio::test]
async fn settings_merge_leaves_questions_and_messages() {
    let session = session_with(Arc::new(CannedModel::new(five_mcq())));
    session.start_generation().await.unwrap();
    session.send_chat("hi").await.unwrap();
    let before = session.snapshot().await;

    let after = session
        .update_settings(&UpdateSettingsRequest {
            show_answers: Some(false),
            ..Default::default()
        })
        .await;

    assert!(!after.settings.show_answers);
    assert_eq!(after.settings.difficulty, before.settings.difficulty);
    assert_eq!(after.questions, before.questions);
    assert_eq!(after.messages, before.messages);
}
