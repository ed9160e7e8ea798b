//! Face swap options and prompt compilation.

mod options;
mod prompt;

pub use options::{FaceScale, GenerationOptions, Lighting, SkinTone};
pub use prompt::{
    compile_prompt, lighting_clause, scale_clause, tone_clause, ADDITIONAL_INSTRUCTION_LABEL,
};

use crate::image::UploadedImage;

/// One generation attempt: the two images and the options that go with them.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    /// Image supplying the facial identity.
    pub source: UploadedImage,
    /// Image supplying the body, pose and scene.
    pub target: UploadedImage,
    /// Presentation options.
    pub options: GenerationOptions,
}

impl SwapRequest {
    /// Creates a request with default options.
    pub fn new(source: UploadedImage, target: UploadedImage) -> Self {
        Self {
            source,
            target,
            options: GenerationOptions::default(),
        }
    }

    /// Sets the options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the compiled prompt for this request.
    pub fn prompt(&self) -> String {
        compile_prompt(&self.options)
    }
}
