//! LLM API HTTP Client
//!
//! Supports Gemini and OpenAI-compatible APIs (GLM, etc.)

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::{Config, LlmProvider};
use crate::error::{Error, Result};

use super::types::*;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// LLM API client (supports Gemini and OpenAI-compatible APIs)
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider: LlmProvider,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Create a new LLM client
    pub fn new(config: &Config) -> Result<Self> {
        let llm_config = config.llm_config();

        let client = Client::builder()
            .timeout(Duration::from_secs(llm_config.timeout_secs))
            .build()
            .map_err(Error::Http)?;

        // Determine base URL based on provider
        let base_url = match &llm_config.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => match llm_config.provider {
                LlmProvider::Gemini => GEMINI_BASE_URL.to_string(),
                LlmProvider::OpenAi => OPENAI_BASE_URL.to_string(),
            },
        };

        Ok(Self {
            client,
            api_key: llm_config.api_key.clone(),
            model: llm_config.model.clone(),
            base_url,
            provider: llm_config.provider.clone(),
        })
    }

    /// Create with custom base URL (for testing or custom endpoints)
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url;
        Ok(client)
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Send one generation request
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        if !self.has_api_key() {
            return Err(Error::LlmApi("No API key configured".to_string()));
        }

        match self.provider {
            LlmProvider::Gemini => self.send_gemini_request(request).await,
            LlmProvider::OpenAi => self.send_openai_request(request).await,
        }
    }

    /// Send request to the Gemini API
    async fn send_gemini_request(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        debug!("Sending request to Gemini API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&GeminiRequest::from_request(request))
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Gemini API error: {} - {}", status, body);
            return Err(Error::LlmApi(format!("{}: {}", status, body)));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            Error::LlmApi(format!("Failed to parse response: {} - {}", e, body))
        })?;
        let parsed = parsed.into_response();

        info!(
            "Gemini API response: finish_reason={:?}, tokens={}",
            parsed.finish_reason,
            parsed.usage.map(|u| u.output_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }

    /// Send request to OpenAI-compatible API (GLM, etc.)
    async fn send_openai_request(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!("Sending request to OpenAI-compatible API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&ChatCompletionRequest::from_request(&self.model, request))
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("OpenAI API error: {} - {}", status, body);
            return Err(Error::LlmApi(format!("{}: {}", status, body)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            Error::LlmApi(format!("Failed to parse response: {} - {}", e, body))
        })?;
        let parsed = parsed.into_response();

        info!(
            "OpenAI API response: finish_reason={:?}, tokens={}",
            parsed.finish_reason,
            parsed.usage.map(|u| u.output_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }

    /// Create a request builder
    pub fn request_builder(&self) -> GenerateRequestBuilder {
        GenerateRequestBuilder::new()
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the provider type
    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, provider: LlmProvider) -> LlmClient {
        let mut config = Config::default();
        config.llm.provider = provider;
        config.llm.api_key = "test-key".to_string();
        LlmClient::with_base_url(&config, server.uri()).unwrap()
    }

    #[test]
    fn test_default_base_urls() {
        let config = Config::default();
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.base_url, GEMINI_BASE_URL);
        assert_eq!(client.model(), "gemini-2.5-flash");

        let mut config = Config::default();
        config.llm.provider = LlmProvider::OpenAi;
        config.llm.base_url = Some("http://localhost:8080/v1/".to_string());
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/v1");
        assert_eq!(client.provider(), &LlmProvider::OpenAi);
    }

    #[tokio::test]
    async fn test_generate_without_key_fails() {
        let client = LlmClient::new(&Config::default()).unwrap();
        assert!(!client.has_api_key());

        let request = client.request_builder().user("hello").build();
        let err = client.generate(&request).await.unwrap_err();
        assert!(matches!(err, Error::LlmApi(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let mut config = Config::default();
        config.llm.api_key = "secret-key".to_string();
        let client = LlmClient::new(&config).unwrap();
        assert!(!format!("{:?}", client).contains("secret-key"));
    }

    #[tokio::test]
    async fn test_gemini_generate_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "Hi" }, { "text": " there" }] },
                    "finishReason": "STOP"
                }],
                "usageMetadata": { "promptTokenCount": 3, "candidatesTokenCount": 2 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, LlmProvider::Gemini);
        let request = client.request_builder().user("hello").build();
        let response = client.generate(&request).await.unwrap();

        assert_eq!(response.text, "Hi there");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    }

    #[tokio::test]
    async fn test_gemini_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
            .mount(&server)
            .await;

        let client = client_for(&server, LlmProvider::Gemini);
        let request = client.request_builder().user("hello").build();
        let err = client.generate(&request).await.unwrap_err();

        match err {
            Error::LlmApi(message) => assert!(message.contains("backend unavailable")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_openai_chat_completions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "Try the Euclid contest." },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, LlmProvider::OpenAi);
        let request = client.request_builder().user("hello").build();
        let response = client.generate(&request).await.unwrap();

        assert_eq!(response.text, "Try the Euclid contest.");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }
}
