//! Image types, ingestion and the face swap provider seam.

mod provider;
pub mod providers;
mod types;
mod upload;

pub use provider::{FaceSwapProvider, FaceSwapProviderExt};
pub use types::{
    AspectRatio, GeneratedImage, GenerationMetadata, ImageFormat, ImageSize, UploadedImage,
    GENERATED_DATA_URL_PREFIX,
};
pub use upload::{load_image, load_pair};
