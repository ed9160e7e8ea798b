//! Gemini (Google) face swap provider.

use crate::credential::Credential;
use crate::error::{sanitize_error_message, FaceSwapError, Result};
use crate::image::provider::FaceSwapProvider;
use crate::image::types::{GeneratedImage, GenerationMetadata};
use crate::swap::SwapRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default Gemini Developer API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Nano Banana Pro - Gemini 3 Pro Image.
    #[default]
    NanoBananaPro,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NanoBananaPro => "gemini-3-pro-image-preview",
        }
    }
}

/// Builder for GeminiProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiProviderBuilder {
    model: GeminiModel,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Overrides the API base URL (e.g. a proxy or a local mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a total request timeout. No timeout by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the provider.
    pub fn build(self) -> Result<GeminiProvider> {
        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(GeminiProvider {
            client: client.build()?,
            base_url,
            model: self.model,
        })
    }
}

/// Gemini face swap provider.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: GeminiModel,
}

impl GeminiProvider {
    /// Creates a new `GeminiProviderBuilder`.
    pub fn builder() -> GeminiProviderBuilder {
        GeminiProviderBuilder::new()
    }

    /// Returns the configured model.
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    async fn generate_impl(
        &self,
        request: &SwapRequest,
        credential: &Credential,
    ) -> Result<GeneratedImage> {
        let start = Instant::now();

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.model.as_str(),
        );

        let body = GeminiRequest::from_swap_request(request);

        tracing::debug!(
            model = self.model.as_str(),
            aspect_ratio = %request.options.aspect_ratio,
            image_size = %request.options.image_size,
            source_bytes = request.source.size(),
            target_bytes = request.target.size(),
            "sending Gemini face swap request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", credential.expose())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text));
        }

        let text = response.text().await?;
        let gemini_response: GeminiResponse = serde_json::from_str(&text)?;
        let image = gemini_response.into_image()?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(duration_ms, "Gemini face swap complete");

        Ok(GeneratedImage::new(
            image.data,
            GenerationMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
                reported_mime_type: Some(image.mime_type),
            },
        ))
    }
}

fn parse_error(status: u16, text: &str) -> FaceSwapError {
    let message = sanitize_error_message(text);
    tracing::debug!(status, %message, "Gemini returned an error");
    FaceSwapError::Api { status, message }
}

#[async_trait]
impl FaceSwapProvider for GeminiProvider {
    async fn generate(
        &self,
        request: &SwapRequest,
        credential: &Credential,
    ) -> Result<GeneratedImage> {
        self.generate_impl(request, credential).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }

    async fn health_check(&self, credential: &Credential) -> Result<()> {
        let url = format!("{}/models/{}", self.base_url, self.model.as_str());

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", credential.expose())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(parse_error(status.as_u16(), &text))
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<&'static str>,
    image_config: GeminiImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiImageConfig {
    aspect_ratio: &'static str,
    image_size: &'static str,
}

impl GeminiRequest {
    /// Source face, target body, then the prompt text.
    fn from_swap_request(req: &SwapRequest) -> Self {
        let inline = |image: &crate::image::UploadedImage| GeminiRequestPart::InlineData {
            inline_data: GeminiInlineData {
                mime_type: image.mime_type().to_string(),
                data: image.base64_data().to_string(),
            },
        };

        let parts = vec![
            inline(&req.source),
            inline(&req.target),
            GeminiRequestPart::Text { text: req.prompt() },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["TEXT", "IMAGE"],
                image_config: GeminiImageConfig {
                    aspect_ratio: req.options.aspect_ratio.as_str(),
                    image_size: req.options.image_size.as_str(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

impl GeminiResponse {
    /// Picks the image out of the first candidate.
    ///
    /// The first inline data part wins. Without one, the first non-empty text
    /// part becomes a [`FaceSwapError::ModelRefusal`]; with neither, the
    /// result is [`FaceSwapError::EmptyResponse`].
    fn into_image(self) -> Result<InlineData> {
        let block_reason = self
            .prompt_feedback
            .and_then(|f| f.block_reason_message.or(f.block_reason));

        let Some(candidate) = self.candidates.into_iter().next() else {
            tracing::warn!(?block_reason, "Gemini returned no candidates");
            return Err(FaceSwapError::EmptyResponse(block_reason));
        };

        let finish_reason = candidate.finish_reason;
        let mut parts = candidate.content.map(|c| c.parts).unwrap_or_default();

        if let Some(pos) = parts.iter().position(|p| p.inline_data.is_some()) {
            if let Some(inline) = parts.swap_remove(pos).inline_data {
                return Ok(inline);
            }
        }

        if let Some(text) = parts
            .into_iter()
            .find_map(|p| p.text.filter(|t| !t.is_empty()))
        {
            tracing::warn!(?finish_reason, "Gemini returned text instead of an image");
            return Err(FaceSwapError::ModelRefusal(text));
        }

        let reason = block_reason.or(finish_reason.filter(|r| r != "STOP"));
        tracing::warn!(?reason, "Gemini returned neither image nor text");
        Err(FaceSwapError::EmptyResponse(reason))
    }
}
