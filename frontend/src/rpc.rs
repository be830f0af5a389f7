use gloo_net::http::{Method, Request};
use shared::api::ClientTransport;

/// Sends requests with the browser's `fetch`.
///
/// `base` is prepended to every route. An empty base keeps requests relative to
/// the page origin.
pub struct Client {
    base: String,
}

impl Client {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_owned(),
        }
    }
}

impl ClientTransport for Client {
    type Error = gloo_net::Error;

    async fn send_request(
        &self,
        method: &str,
        route: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Result<serde_json::Value, serde_json::Value>, Self::Error> {
        let method = match method.to_lowercase().as_str() {
            "get" => Method::GET,
            "post" => Method::POST,
            "put" => Method::PUT,
            "delete" => Method::DELETE,
            other => {
                return Err(gloo_net::Error::GlooError(format!(
                    "unsupported method: {other}"
                )))
            }
        };

        let url = format!("{}{}", self.base, route);
        let req = if let Some(body) = body {
            Request::new(&url).method(method).json(&body)?
        } else {
            Request::new(&url).method(method)
        };

        let resp = req.send().await?;

        let json = resp.json().await?;

        if resp.ok() {
            Ok(Ok(json))
        } else {
            Ok(Err(json))
        }
    }
}
