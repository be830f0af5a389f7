use miette::{Context, IntoDiagnostic};
use reqwest::Method;
use shared::api::ClientTransport;
use thiserror::Error;

use crate::APP_USER_AGENT;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unsupported method: {0}")]
    Method(String),
}

/// Native [`ClientTransport`] for talking to a running itinerary service.
pub struct HttpTransport {
    http: reqwest::Client,
    base: String,
}

impl HttpTransport {
    pub fn new(base: &str) -> miette::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .into_diagnostic()
            .wrap_err("Could not build reqwest client")?;

        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_owned(),
        })
    }
}

impl ClientTransport for HttpTransport {
    type Error = TransportError;

    async fn send_request(
        &self,
        method: &str,
        route: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Result<serde_json::Value, serde_json::Value>, Self::Error> {
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| TransportError::Method(method.to_owned()))?;

        let mut req = self.http.request(method, format!("{}{}", self.base, route));
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await?;
        let success = resp.status().is_success();
        let json = resp.json().await?;

        if success {
            Ok(Ok(json))
        } else {
            Ok(Err(json))
        }
    }
}
