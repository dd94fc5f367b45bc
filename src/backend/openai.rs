#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;

use std::time;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, Error, error_message};
use crate::config::constants::{MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::config::user_agent;

const PROVIDER: &str = "OpenAI";

pub struct OpenAI {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Option<time::Duration>,
}

impl Default for OpenAI {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: String::new(),
            timeout: None,
        }
    }
}

impl OpenAI {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Backend for OpenAI {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let completion_req = CompletionRequest {
            model: self.model.clone(),
            messages: vec![MessageRequest {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        let mut req = reqwest::Client::new()
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .header("Content-Type", "application/json")
            .header("User-Agent", user_agent())
            .bearer_auth(&self.api_key);

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req
            .json(&completion_req)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(PROVIDER, e))?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res
                .text()
                .await
                .map_err(|e| Error::from_reqwest(PROVIDER, e))?;
            return Err(Error::Provider {
                provider: PROVIDER,
                status,
                message: error_message(PROVIDER, status, &body),
            });
        }

        let data = res
            .json::<CompletionResponse>()
            .await
            .map_err(|_| Error::InvalidResponse(PROVIDER))?;

        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .ok_or(Error::InvalidResponse(PROVIDER))
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<MessageRequest>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    role: String,
    content: String,
}

#[derive(Default, Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<ChoiceResponse>,
}

#[derive(Default, Debug, Deserialize)]
struct ChoiceResponse {
    message: Option<MessageResponse>,
}

#[derive(Default, Debug, Deserialize)]
struct MessageResponse {
    content: String,
}
