use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::APP_USER_AGENT;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub(crate) struct Client {
    http: reqwest::Client,
    model: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Debug, Clone)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize, Debug, Clone)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize, Debug, Clone)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_owned()),
                }],
            }],
        }
    }
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String> {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).join(""))
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(miette!("Gemini returned no text"));
        }

        Ok(text)
    }
}

impl Client {
    pub(crate) fn new(api_key: &str, model: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut value = HeaderValue::from_str(api_key)
            .into_diagnostic()
            .wrap_err("Could not create header value")?;
        value.set_sensitive(true);

        headers.insert("x-goog-api-key", value);

        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .build()
            .into_diagnostic()
            .wrap_err("Could not build reqwest client")?;

        Ok(Self {
            http,
            model: model.to_owned(),
        })
    }

    pub(crate) async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);

        let response = self
            .http
            .post(url)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .into_diagnostic()?
            .error_for_status()
            .into_diagnostic()?;

        let body: GenerateContentResponse = response.json().await.into_diagnostic()?;

        body.into_text()
    }
}
