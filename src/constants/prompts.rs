use crate::models::domain::QuestionType;
use crate::models::dto::request::GenerationRequest;

pub const WELCOME_MESSAGE: &str = "Welcome! I'm your study tutor 🎓 Pick your source file and settings, then generate a set of practice questions and we can go through them together.";

pub const CHAT_FALLBACK_REPLY: &str =
    "Sorry, the assistant hit a technical issue while preparing a reply. Please try again.";

pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, the assistant needs a little more time to think.";

pub const GENERATION_FAILED_ALERT: &str =
    "Something went wrong while generating the questions. Please try again.";

pub const TUTOR_BUSY_NOTICE: &str =
    "The tutor is still busy with the previous request. Your message was not sent, try again in a moment.";

pub const SHARE_TITLE: &str = "Smart quiz questions";

pub fn generation_success_message(count: usize) -> String {
    format!(
        "Generated {} questions successfully! Review them in the question bank or keep chatting with me about the lesson.",
        count
    )
}

fn question_type_instruction(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Mcq => "multiple choice with exactly four options",
        QuestionType::Tf => "true/false statements",
        QuestionType::Mix => "a balanced mix of multiple choice (four options) and true/false",
    }
}

/// Instruction for one generation batch.
pub fn question_generation_prompt(request: &GenerationRequest, language: &str) -> String {
    let focus = request.chapter.as_deref().unwrap_or("the whole available content");

    format!(
        "You are an expert educator writing practice questions for a student.

### Study material
{context}
Current focus: {focus}

### Task
1. Write exactly {count} high-quality questions.
2. Difficulty level: {difficulty}.
3. Question type: {kind}.

### Output
Return ONLY a JSON array. Each element has:
- id: the question number starting at 1
- type: \"mcq\" or \"tf\"
- text: the question in clear, correct {language}
- options: for mcq an array of exactly 4 distinct, plausible options in {language}; for tf exactly 2 options, the words for true and false in {language}
- answer: the correct answer, copied character for character from the options

No markdown, no commentary outside the JSON.",
        context = request.context,
        focus = focus,
        count = request.count,
        difficulty = request.difficulty,
        kind = question_type_instruction(request.question_type),
        language = language,
    )
}

/// System instruction for the tutor, scoped to the current study context.
pub fn tutor_system_instruction(context: &str, language: &str) -> String {
    format!(
        "You are a smart, encouraging study tutor.
Current study context: {context}
Help the student understand the material, explain the generated questions and give study tips.
Reply in {language}, professionally and concisely.",
        context = context,
        language = language,
    )
}
