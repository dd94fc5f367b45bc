#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, Error, error_message};
use crate::config::constants::{MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::config::user_agent;

const PROVIDER: &str = "Google";

pub struct Gemini {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Option<time::Duration>,
}

impl Default for Gemini {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: String::new(),
            timeout: None,
        }
    }
}

impl Gemini {
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
impl Backend for Gemini {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        // The model id is part of the URL, so an empty one would produce a
        // confusing 404 instead of a clear error.
        if self.model.is_empty() {
            return Err(Error::MissingModel);
        }

        let generate_req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
            },
        };

        let mut req = reqwest::Client::new()
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.endpoint, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req
            .json(&generate_req)
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
            .json::<GenerateContentResponse>()
            .await
            .map_err(|_| Error::InvalidResponse(PROVIDER))?;

        data.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(Error::InvalidResponse(PROVIDER))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: usize,
    temperature: f32,
}

#[derive(Default, Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Default, Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
