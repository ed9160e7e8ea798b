//! In-memory session state: selected images, options, key and the last result.

use crate::credential::Credentials;
use crate::error::{FaceSwapError, Result};
use crate::image::{FaceSwapProvider, GeneratedImage, UploadedImage};
use crate::swap::{GenerationOptions, SwapRequest};

/// Message shown when the service rejects the key.
pub const INVALID_CREDENTIAL_MESSAGE: &str = "Invalid API Key. Please check your key in settings.";

/// A failure as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    /// Text to display.
    pub message: String,
    /// Whether the key configuration should be opened.
    pub reconfigure_credential: bool,
}

impl FailureNotice {
    /// Classifies an error for display.
    pub fn from_error(err: &FaceSwapError) -> Self {
        match err {
            FaceSwapError::MissingCredential => Self {
                message: err.to_string(),
                reconfigure_credential: true,
            },
            e if e.is_auth_failure() => Self {
                message: INVALID_CREDENTIAL_MESSAGE.to_string(),
                reconfigure_credential: true,
            },
            FaceSwapError::Api { message, .. } => Self {
                message: message.clone(),
                reconfigure_credential: false,
            },
            e => Self {
                message: e.to_string(),
                reconfigure_credential: false,
            },
        }
    }
}

impl std::fmt::Display for FailureNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Where the session is in its generate cycle.
#[derive(Debug, Clone, Default)]
pub enum Phase {
    /// Nothing submitted since the last reset.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request produced an image.
    Succeeded(GeneratedImage),
    /// The last request failed.
    Failed(FailureNotice),
}

impl Phase {
    /// Returns true while a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Session state owned by the front end.
#[derive(Debug, Default)]
pub struct Session {
    source: Option<UploadedImage>,
    target: Option<UploadedImage>,
    /// Options for the next request.
    pub options: GenerationOptions,
    /// Keys available to the session.
    pub credentials: Credentials,
    phase: Phase,
}

impl Session {
    /// Creates a session using the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Default::default()
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Returns the source face, if selected.
    pub fn source(&self) -> Option<&UploadedImage> {
        self.source.as_ref()
    }

    /// Returns the target body, if selected.
    pub fn target(&self) -> Option<&UploadedImage> {
        self.target.as_ref()
    }

    /// Returns true when both images are selected.
    pub fn is_ready(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }

    /// Replaces the source face and resets the phase.
    pub fn set_source(&mut self, image: Option<UploadedImage>) {
        self.source = image;
        self.reset();
    }

    /// Replaces the target body and resets the phase.
    pub fn set_target(&mut self, image: Option<UploadedImage>) {
        self.target = image;
        self.reset();
    }

    /// Returns to [`Phase::Idle`]. A pending result arriving later is dropped.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Moves to [`Phase::Pending`] and returns the request to send.
    pub fn begin(&mut self) -> Result<SwapRequest> {
        if self.phase.is_pending() {
            return Err(FaceSwapError::InvalidRequest(
                "a generation request is already in progress".into(),
            ));
        }
        let (Some(source), Some(target)) = (&self.source, &self.target) else {
            return Err(FaceSwapError::InvalidRequest(
                "both a source face and a target body are required".into(),
            ));
        };

        let request = SwapRequest::new(source.clone(), target.clone())
            .with_options(self.options.clone());
        self.phase = Phase::Pending;
        Ok(request)
    }

    /// Records the outcome of the pending request.
    ///
    /// Ignored unless the session is pending.
    pub fn complete(&mut self, result: Result<GeneratedImage>) {
        if !self.phase.is_pending() {
            tracing::debug!("dropping result that arrived after a reset");
            return;
        }
        self.phase = match result {
            Ok(image) => Phase::Succeeded(image),
            Err(err) => {
                tracing::warn!("face swap failed: {err}");
                Phase::Failed(FailureNotice::from_error(&err))
            }
        };
    }

    /// Runs one full generate cycle against `provider`.
    ///
    /// Without a key the session fails immediately and nothing is sent.
    pub async fn submit<P>(&mut self, provider: &P) -> Result<&Phase>
    where
        P: FaceSwapProvider + ?Sized,
    {
        let request = self.begin()?;
        let result = match self.credentials.resolve() {
            Ok(credential) => provider.generate(&request, credential).await,
            Err(err) => Err(err),
        };
        self.complete(result);
        Ok(&self.phase)
    }
}
