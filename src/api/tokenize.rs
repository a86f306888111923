//! Payment tokenization service client.
//!
//! Raw card fields go to the tokenizer, never to the commerce API. The
//! tokenizer answers with an opaque token the API accepts in place of the
//! card number.

use async_trait::async_trait;
use serde::Deserialize;

use super::error::ApiError;
use super::models::CardDraft;

#[async_trait]
pub trait PaymentTokenizer: Send + Sync {
    async fn tokenize(&self, card: &CardDraft) -> Result<String, ApiError>;
}

pub struct HttpTokenizer {
    http: reqwest::Client,
    url: String,
}

impl HttpTokenizer {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct TokenFailure {
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl PaymentTokenizer for HttpTokenizer {
    async fn tokenize(&self, card: &CardDraft) -> Result<String, ApiError> {
        let response = self.http.post(&self.url).json(card).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<TokenFailure>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "payment details could not be verified".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<TokenResponse>().await?.token)
    }
}
