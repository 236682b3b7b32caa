use async_trait::async_trait;
use thiserror::Error;

use crate::normalize::NormalizedImage;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model backend error: {0}")]
    Backend(String),
    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Abstraction over the generative-AI collaborator: prompt plus image
/// payload in, free-form text out. The text should be JSON but is treated
/// as opaque here; parsing happens downstream.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        image: &NormalizedImage,
    ) -> Result<String, ModelError>;
}

// ── Mock model (always available, used for tests) ─────────────────────────────

enum MockReply {
    Text(String),
    Failure(String),
}

/// Returns a preset response, or a preset backend failure.
pub struct MockModel {
    reply: MockReply,
}

impl MockModel {
    pub fn new(response: impl Into<String>) -> Self {
        Self { reply: MockReply::Text(response.into()) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { reply: MockReply::Failure(message.into()) }
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(
        &self,
        _prompt: &str,
        _image: &NormalizedImage,
    ) -> Result<String, ModelError> {
        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Failure(message) => Err(ModelError::Backend(message.clone())),
        }
    }
}

// ── Vertex AI backend (optional, gated behind `vertex` feature) ───────────────

#[cfg(feature = "vertex")]
pub mod vertex_backend {
    use async_trait::async_trait;
    use serde_json::json;

    use super::{GenerativeModel, ModelError};
    use crate::normalize::NormalizedImage;
    use patra_core::OcrConfig;

    /// Calls the region-routed Vertex AI `generateContent` REST endpoint.
    /// Model selection and authentication stay with the caller: the bearer
    /// token is supplied up front and the region comes from the config, so
    /// the regional-compliance check upstream also pins the endpoint.
    pub struct VertexModel {
        client: reqwest::Client,
        project_id: String,
        model_name: String,
        access_token: String,
        config: OcrConfig,
    }

    impl VertexModel {
        pub fn new(
            project_id: impl Into<String>,
            model_name: impl Into<String>,
            access_token: impl Into<String>,
            config: OcrConfig,
        ) -> Self {
            Self {
                client: reqwest::Client::new(),
                project_id: project_id.into(),
                model_name: model_name.into(),
                access_token: access_token.into(),
                config,
            }
        }

        fn endpoint(&self) -> String {
            format!(
                "https://{region}-aiplatform.googleapis.com/v1/projects/{project}/locations/{region}/publishers/google/models/{model}:generateContent",
                region = self.config.region,
                project = self.project_id,
                model = self.model_name,
            )
        }
    }

    #[async_trait]
    impl GenerativeModel for VertexModel {
        async fn generate(
            &self,
            prompt: &str,
            image: &NormalizedImage,
        ) -> Result<String, ModelError> {
            let body = json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": prompt },
                        { "inlineData": { "mimeType": image.mime_type, "data": image.data } },
                    ],
                }],
                "generationConfig": {
                    "temperature": self.config.temperature,
                    "maxOutputTokens": self.config.max_output_tokens,
                    "responseMimeType": self.config.response_mime_type,
                },
            });

            let response = self
                .client
                .post(self.endpoint())
                .bearer_auth(&self.access_token)
                .json(&body)
                .send()
                .await
                .map_err(|e| ModelError::Backend(e.to_string()))?
                .error_for_status()
                .map_err(|e| ModelError::Backend(e.to_string()))?;

            let payload: serde_json::Value =
                response.json().await.map_err(|e| ModelError::Backend(e.to_string()))?;

            payload["candidates"][0]["content"]["parts"][0]["text"]
                .as_str()
                .map(str::to_owned)
                .ok_or(ModelError::EmptyResponse)
        }
    }
}
