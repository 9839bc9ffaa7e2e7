//! Client for the dashboard backend's JSON endpoints.
//!
//! Every call is a single blocking POST. Transport errors, undecodable bodies
//! and `success: false` replies all surface as `SimError::RequestFailed`;
//! nothing is retried.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, EXIT_INPUT, EXIT_RUNTIME, SimError};
use crate::sim::{InterpretRequest, ReportRequest, SimulationBackend, SimulationRequest, SimulationResult};

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "SDASH_API_URL";
/// Environment variable holding the HTTP timeout in seconds.
pub const TIMEOUT_ENV: &str = "SDASH_TIMEOUT_SECS";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which chat endpoint to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChatRoute {
    /// `POST /chat {message}` → `{reply}`.
    Chat,
    /// `POST /chatbot {text}` → `{success, summary, result}`.
    Chatbot,
}

/// A chat answer, with the simulation the bot ran when it ran one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub result: Option<SimulationResult>,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env(base_url: Option<String>) -> Result<Self, AppError> {
        Self::new(resolve_base_url(base_url), timeout_from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the backend to render a report; returns its download URL.
    pub fn generate_report(&self, req: &ReportRequest) -> Result<String, SimError> {
        let resp: ReportResponse = self.post("/generate_report", req)?;
        ensure_success("/generate_report", resp.success, resp.message)?;
        resp.download_url.ok_or_else(|| failed("/generate_report", "response has no download_url"))
    }

    /// Free-text analysis of a simulated scenario.
    pub fn interpret(&self, req: &InterpretRequest) -> Result<String, SimError> {
        let resp: InterpretResponse = self.post("/interpret", req)?;
        ensure_success("/interpret", resp.success, resp.message)?;
        resp.analysis.ok_or_else(|| failed("/interpret", "response has no analysis"))
    }

    pub fn chat(&self, message: &str, route: ChatRoute) -> Result<ChatReply, SimError> {
        match route {
            ChatRoute::Chat => {
                let resp: ChatResponse = self.post("/chat", &ChatMessage { message })?;
                Ok(ChatReply {
                    text: resp.reply,
                    result: None,
                })
            }
            ChatRoute::Chatbot => {
                let resp: ChatbotResponse = self.post("/chatbot", &ChatbotMessage { text: message })?;
                ensure_success("/chatbot", resp.success, resp.message)?;
                Ok(ChatReply {
                    text: resp.summary.unwrap_or_default(),
                    result: resp.result,
                })
            }
        }
    }

    fn post<B: Serialize + ?Sized, R: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<R, SimError> {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!(%url, "POST");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| failed(endpoint, e))?;

        // Error statuses still carry a JSON body with `success: false` + message.
        let status = resp.status();
        resp.json::<R>().map_err(|e| {
            if status.is_success() {
                failed(endpoint, format!("invalid response: {e}"))
            } else {
                failed(endpoint, format!("status {status}"))
            }
        })
    }
}

impl SimulationBackend for ApiClient {
    fn simulate(&self, req: &SimulationRequest) -> Result<SimulationResult, SimError> {
        let result: SimulationResult = self.post("/simulate", req)?;
        ensure_success("/simulate", result.success, result.message.clone())?;
        Ok(result)
    }
}

/// Base URL from the argument, else `SDASH_API_URL` (`.env` honoured), else localhost.
pub fn resolve_base_url(base_url: Option<String>) -> String {
    dotenvy::dotenv().ok();
    base_url
        .or_else(|| std::env::var(API_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// `SDASH_TIMEOUT_SECS`, else the default.
pub fn timeout_from_env() -> Result<u64, AppError> {
    dotenvy::dotenv().ok();
    match std::env::var(TIMEOUT_ENV) {
        Err(_) => Ok(DEFAULT_TIMEOUT_SECS),
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::new(EXIT_INPUT, format!("Invalid {TIMEOUT_ENV} value '{raw}'."))),
    }
}

fn ensure_success(endpoint: &str, success: bool, message: Option<String>) -> Result<(), SimError> {
    if success {
        Ok(())
    } else {
        Err(failed(endpoint, message.unwrap_or_else(|| "server reported failure".to_string())))
    }
}

fn failed(endpoint: &str, message: impl std::fmt::Display) -> SimError {
    SimError::RequestFailed {
        endpoint: endpoint.to_string(),
        message: message.to_string(),
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ChatbotMessage<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    #[serde(default)]
    success: bool,
    download_url: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InterpretResponse {
    #[serde(default)]
    success: bool,
    analysis: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: String,
}

#[derive(Debug, Deserialize)]
struct ChatbotResponse {
    #[serde(default)]
    success: bool,
    summary: Option<String>,
    result: Option<SimulationResult>,
    message: Option<String>,
}
