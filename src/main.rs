use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use quiz_tutor::{
    config::Config,
    handlers::{chat_handler, question_bank_handler, settings_handler, View, ViewResponse},
    services::{GeminiModelService, SessionService},
};

const HELP: &str = "commands:
  set key=value ...   difficulty=easy|medium|hard type=mcq|tf|mix count=N answers=on|off file=NAME chapter=\"TEXT\"
  settings            show current settings
  generate            generate questions in the background
  questions           show the question bank
  share | print       export the question bank as text
  clear               delete all questions
  chat TEXT           ask the tutor (in the chat view plain text is sent directly)
  history             show the conversation
  view NAME           switch to settings, questions or chat
  quit";

fn show(response: &ViewResponse) {
    if let Some(alert) = &response.alert {
        println!("!! {}", alert);
    }
    if let Some(body) = &response.body {
        println!("{}", body);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    config.validate()?;

    let model = Arc::new(GeminiModelService::new(&config)?);
    let session = Arc::new(SessionService::new(model, &config));

    println!("{}", chat_handler::transcript(&session.snapshot().await));
    println!("{}", HELP);

    let mut view = View::Settings;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "view" => match rest.parse::<View>() {
                Ok(next) => view = next,
                Err(e) => println!("!! {}", e),
            },
            "set" => match settings_handler::parse_patch(rest) {
                Ok(patch) => {
                    let state = settings_handler::update_settings(&session, &patch).await;
                    println!("{}", settings_handler::describe(&state));
                }
                Err(e) => println!("!! {}", e),
            },
            "settings" => println!("{}", settings_handler::describe(&session.snapshot().await)),
            "generate" => {
                let session = Arc::clone(&session);
                println!("generating...");
                tokio::spawn(async move {
                    let response = settings_handler::start(&session).await;
                    show(&response);
                    if response.view == View::QuestionBank {
                        println!("questions ready, type `questions` to see them");
                    }
                });
            }
            "questions" => {
                view = View::QuestionBank;
                println!("{}", question_bank_handler::render(&session.snapshot().await));
            }
            "share" => show(&question_bank_handler::share(&session).await),
            "print" => show(&question_bank_handler::print(&session).await),
            "clear" => view = question_bank_handler::clear_all(&session).await.view,
            "history" => println!("{}", chat_handler::transcript(&session.snapshot().await)),
            "chat" => {
                view = View::Chat;
                show(&chat_handler::send(&session, rest).await);
            }
            _ if view == View::Chat => show(&chat_handler::send(&session, line).await),
            other => println!("unknown command '{}', type `help`", other),
        }
    }

    Ok(())
}
