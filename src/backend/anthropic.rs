#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;

use std::time;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, Error, error_message};
use crate::config::constants::MAX_OUTPUT_TOKENS;
use crate::config::user_agent;

const PROVIDER: &str = "Anthropic";
const API_VERSION: &str = "2023-06-01";

pub struct Anthropic {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Option<time::Duration>,
}

impl Default for Anthropic {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            model: String::new(),
            timeout: None,
        }
    }
}

impl Anthropic {
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
impl Backend for Anthropic {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let message_req = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_OUTPUT_TOKENS,
            messages: vec![MessageRequest {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let mut req = reqwest::Client::new()
            .post(format!("{}/v1/messages", self.endpoint))
            .header("Content-Type", "application/json")
            .header("User-Agent", user_agent())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION);

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req
            .json(&message_req)
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
            .json::<MessagesResponse>()
            .await
            .map_err(|_| Error::InvalidResponse(PROVIDER))?;

        data.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or(Error::InvalidResponse(PROVIDER))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: usize,
    messages: Vec<MessageRequest>,
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    role: String,
    content: String,
}

#[derive(Default, Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Default, Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}
