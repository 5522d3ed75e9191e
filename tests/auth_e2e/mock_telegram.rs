//! Mock Telegram Bot API server for delivery tests.
//!
//! Records every `sendMessage` call and answers with a configurable status.

use actix_web::{App, HttpResponse, HttpServer, post, web};
use serde_json::Value;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// Bot token the mock accepts.
pub const MOCK_BOT_TOKEN: &str = "123456:TEST-TOKEN";
/// Chat id the gate is configured to send to.
pub const MOCK_CHAT_ID: &str = "4242";

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub bot_token: String,
    pub chat_id: String,
    pub text: String,
}

pub struct MockTelegramState {
    pub sent: Vec<SentMessage>,
    /// When set, every call is rejected like a blocked bot
    pub reject: bool,
}

#[post("/bot{token}/sendMessage")]
async fn send_message(
    path: web::Path<String>,
    body: web::Json<Value>,
    state: web::Data<Arc<Mutex<MockTelegramState>>>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    let bot_token = path.into_inner();

    if state.reject || bot_token != MOCK_BOT_TOKEN {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user"
        }));
    }

    state.sent.push(SentMessage {
        bot_token,
        chat_id: match &body["chat_id"] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        text: body["text"].as_str().unwrap_or_default().to_string(),
    });

    HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "result": { "message_id": state.sent.len() }
    }))
}

pub struct MockTelegram {
    pub api_url: String,
    pub state: Arc<Mutex<MockTelegramState>>,
}

impl MockTelegram {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockTelegramState {
            sent: Vec::new(),
            reject: false,
        }));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let api_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .service(send_message)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        actix_rt::spawn(server);

        MockTelegram { api_url, state }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn set_reject(&self, reject: bool) {
        self.state.lock().unwrap().reject = reject;
    }
}
