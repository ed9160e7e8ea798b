//! Face swap provider trait.

use crate::credential::{Credential, Credentials};
use crate::error::Result;
use crate::image::types::GeneratedImage;
use crate::swap::SwapRequest;
use async_trait::async_trait;

/// A service that performs face swaps.
///
/// One call to [`FaceSwapProvider::generate`] is exactly one outbound
/// request. Implementations never retry.
#[async_trait]
pub trait FaceSwapProvider: Send + Sync {
    /// Sends the request and returns the generated image.
    async fn generate(&self, request: &SwapRequest, credential: &Credential)
        -> Result<GeneratedImage>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;

    /// Checks that the service accepts the given credential.
    async fn health_check(&self, credential: &Credential) -> Result<()>;
}

/// Extension trait resolving the key before any I/O happens.
#[async_trait]
pub trait FaceSwapProviderExt: FaceSwapProvider {
    /// Resolves a key from `credentials`, then generates.
    ///
    /// Fails with [`crate::FaceSwapError::MissingCredential`] without
    /// contacting the service when no key is available.
    async fn generate_with(
        &self,
        request: &SwapRequest,
        credentials: &Credentials,
    ) -> Result<GeneratedImage> {
        let credential = credentials.resolve()?;
        self.generate(request, credential).await
    }
}

impl<T: FaceSwapProvider + ?Sized> FaceSwapProviderExt for T {}
