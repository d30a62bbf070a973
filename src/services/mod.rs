pub mod export_service;
pub mod gemini_service;
pub mod model_service;
pub mod request_guard;
pub mod session_service;

pub use gemini_service::GeminiModelService;
pub use model_service::QuizModelService;
pub use request_guard::{Activity, RequestGate};
pub use session_service::SessionService;
