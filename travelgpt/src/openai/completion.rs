use miette::{miette, IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};

use super::Client;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Message {
    pub content: String,
    role: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct CompletionRequest {
    messages: Vec<Message>,
    model: String,
}

impl CompletionRequest {
    pub(crate) fn gpt_3_5_turbo(prompt: &str) -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![Message {
                content: prompt.to_string(),
                role: "user".to_string(),
            }],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct CompletionChoice {
    pub message: Message,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct CompletionResponse {
    pub(crate) choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    pub(crate) fn first_message(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| miette!("OpenAI completion returned no choices"))
    }
}

impl Client {
    pub(crate) async fn completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse> {
        let response = self
            .0
            .post(COMPLETIONS_URL)
            .json(&request)
            .send()
            .await
            .into_diagnostic()?
            .error_for_status()
            .into_diagnostic()?;

        let response_body = response.json().await.into_diagnostic()?;

        Ok(response_body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_message_is_the_itinerary() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": { "role": "assistant", "content": "Day 1: Alfama" }
            }]
        }))
        .unwrap();

        assert_eq!(response.first_message().unwrap(), "Day 1: Alfama");
    }

    #[test]
    fn empty_choices_are_an_error() {
        let response: CompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();

        assert!(response.first_message().is_err());
    }
}
