//! Inference API tagger
//!
//! Calls hosted token-classification models over HTTP, using the request
//! and response shape of the Hugging Face Inference API. Sub-word pieces
//! are merged server side with the `simple` aggregation strategy.
//!
//! Author: hephaex@gmail.com

use std::time::Duration;

use async_trait::async_trait;
use cogmap_core::{CogmapError, Result, TaggedToken, TaggerConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::Tagger;

#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Parameters {
    aggregation_strategy: &'static str,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

/// Tagger backed by two hosted token-classification models
pub struct HttpTagger {
    client: Client,
    base_url: String,
    ner_model: String,
    pos_model: String,
    api_token: Option<String>,
}

impl HttpTagger {
    /// Create from config
    pub fn from_config(config: &TaggerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CogmapError::Tagger(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ner_model: config.ner_model.clone(),
            pos_model: config.pos_model.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    async fn classify(&self, model: &str, sentence: &str) -> Result<Vec<TaggedToken>> {
        let request = ClassificationRequest {
            inputs: sentence,
            parameters: Parameters {
                aggregation_strategy: "simple",
            },
        };

        let mut builder = self.client.post(self.model_url(model)).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CogmapError::Tagger(format!("Request to {model} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CogmapError::Tagger(format!("Failed to read {model} response: {e}")))?;

        if !status.is_success() {
            return Err(CogmapError::Tagger(format!(
                "{model} returned {status}: {}",
                api_error_message(&body)
            )));
        }

        parse_tokens(&body)
    }
}

/// Decode a token-classification response body
fn parse_tokens(body: &str) -> Result<Vec<TaggedToken>> {
    serde_json::from_str(body).map_err(|e| {
        CogmapError::Tagger(format!(
            "Unexpected response ({e}): {}",
            api_error_message(body)
        ))
    })
}

/// Pull the `error` field out of an API error body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

#[async_trait]
impl Tagger for HttpTagger {
    async fn tag_entities(&self, sentence: &str) -> Result<Vec<TaggedToken>> {
        self.classify(&self.ner_model, sentence).await
    }

    async fn tag_pos(&self, sentence: &str) -> Result<Vec<TaggedToken>> {
        self.classify(&self.pos_model, sentence).await
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ClassificationRequest {
            inputs: "Alice visited Paris.",
            parameters: Parameters {
                aggregation_strategy: "simple",
            },
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["inputs"], "Alice visited Paris.");
        assert_eq!(json["parameters"]["aggregation_strategy"], "simple");
    }

    #[test]
    fn test_model_url_from_config() {
        let config = TaggerConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        let tagger = HttpTagger::from_config(&config).unwrap();

        assert_eq!(
            tagger.model_url(&tagger.ner_model),
            "http://localhost:8080/models/dslim/bert-base-NER"
        );
    }

    #[test]
    fn test_parse_grouped_entities() {
        let body = r#"[
            {"entity_group":"PER","score":0.9991,"word":"Alice","start":0,"end":5},
            {"entity_group":"LOC","score":0.9987,"word":"Paris","start":14,"end":19}
        ]"#;
        let tokens = parse_tokens(body).unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].word, "Paris");
        assert_eq!(tokens[1].group, "LOC");
        assert_eq!(tokens[1].start, Some(14));
    }

    #[test]
    fn test_parse_empty_result() {
        assert!(parse_tokens("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error":"Model is currently loading","estimated_time":20.0}"#;
        let err = parse_tokens(body).unwrap_err();

        assert!(err.to_string().contains("Model is currently loading"));
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }
}
