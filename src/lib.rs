#![warn(missing_docs)]
//! Faceswap - face replacement through Gemini image models.
//!
//! Two uploaded pictures (a source face and a target body) plus a handful of
//! presentation options are compiled into one multimodal `generateContent`
//! request. The response is turned into a PNG data URL or a classified error.
//!
//! # Quick Start
//!
//! ```no_run
//! use faceswap::{
//!     load_pair, Credentials, FaceSwapProviderExt, GeminiProvider, GenerationOptions,
//!     Lighting, SwapRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> faceswap::Result<()> {
//!     let (source, target) = load_pair("face.jpg", "body.jpg").await?;
//!     let request = SwapRequest::new(source, target)
//!         .with_options(GenerationOptions::new().with_lighting(Lighting::Warm));
//!
//!     let provider = GeminiProvider::builder().build()?;
//!     let image = provider.generate_with(&request, &Credentials::from_env()).await?;
//!     image.save(image.download_file_name())?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `gemini-image`: Gemini (Google) provider
//! - `cli`: Command-line interface

mod credential;
mod error;
pub mod image;
pub mod session;
pub mod swap;

// Re-export error types at crate root
pub use error::{FaceSwapError, Result};

pub use credential::{Credential, Credentials, API_KEY_ENV_VARS};

pub use image::{
    load_image, load_pair, AspectRatio, FaceSwapProvider, FaceSwapProviderExt, GeneratedImage,
    GenerationMetadata, ImageFormat, ImageSize, UploadedImage,
};

pub use session::{FailureNotice, Phase, Session};

pub use swap::{compile_prompt, FaceScale, GenerationOptions, Lighting, SkinTone, SwapRequest};

#[cfg(feature = "gemini-image")]
pub use image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::credential::Credentials;
    pub use crate::error::{FaceSwapError, Result};
    pub use crate::image::{FaceSwapProvider, FaceSwapProviderExt, GeneratedImage, UploadedImage};
    pub use crate::swap::{GenerationOptions, SwapRequest};

    #[cfg(feature = "gemini-image")]
    pub use crate::image::providers::GeminiProvider;
}
