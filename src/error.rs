//! Error types for face swap generation.

/// Maximum length of a service error message kept in [`FaceSwapError::Api`].
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Lowercase fragments that mark a service fault as a credential problem
/// when no status code is available.
const AUTH_FAILURE_MARKERS: &[&str] = &[
    "permission",
    "permission_denied",
    "403",
    "api key",
    "requested entity was not found",
];

/// Errors that can occur during face swap generation.
#[derive(Debug, thiserror::Error)]
pub enum FaceSwapError {
    /// Neither a session key nor an environment key is available.
    #[error("API key is missing. Please enter your Google Gemini API key in the settings.")]
    MissingCredential,

    /// The model answered with text instead of an image.
    #[error("model returned text instead of image: {0}")]
    ModelRefusal(String),

    /// The model answered with neither image nor text.
    #[error("no image data found in the response; the model may have been blocked by safety filters{}", .0.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
    EmptyResponse(Option<String>),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading an upload or saving the result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FaceSwapError {
    /// Returns true if this error indicates a rejected or unusable credential.
    ///
    /// A status code decides when one is present. Otherwise the message is
    /// matched against known authorization phrases, which is best-effort.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::MissingCredential | Self::ModelRefusal(_) | Self::EmptyResponse(_) => false,
            Self::Api { status: 401 | 403, .. } => true,
            Self::Network(e) => {
                if e.status().is_some_and(|s| matches!(s.as_u16(), 401 | 403)) {
                    return true;
                }
                // The request URL is part of the message; ports and paths must not match.
                let mut text = e.to_string();
                if let Some(url) = e.url() {
                    text = text.replace(url.as_str(), "");
                }
                mentions_auth_failure(&text)
            }
            other => mentions_auth_failure(&other.to_string()),
        }
    }
}

fn mentions_auth_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    AUTH_FAILURE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Result type alias for face swap operations.
pub type Result<T> = std::result::Result<T, FaceSwapError>;

/// Extracts a readable message from a Google API error body.
///
/// Google wraps failures as `{"error": {"code", "message", "status"}}`; the
/// status name (e.g. `PERMISSION_DENIED`) is kept as a prefix. Bodies that do
/// not parse are used as-is. The result is truncated to a bounded length.
pub(crate) fn sanitize_error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct Envelope {
        error: Inner,
    }

    #[derive(serde::Deserialize)]
    struct Inner {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        status: Option<String>,
    }

    let text = match serde_json::from_str::<Envelope>(body) {
        Ok(Envelope { error }) => match (error.status, error.message) {
            (Some(status), Some(message)) => format!("{status}: {message}"),
            (None, Some(message)) => message,
            (Some(status), None) => status,
            (None, None) => body.trim().to_string(),
        },
        Err(_) => body.trim().to_string(),
    };

    if text.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = text.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{truncated}...")
    } else {
        text
    }
}
