//! Presentation options for a face swap.
//!
//! The three modal choices parse leniently: any value that is not a known
//! mode maps to that family's default instead of failing.

use crate::image::{AspectRatio, ImageSize};
use serde::{Deserialize, Serialize};

/// How the skin tone of the transplanted face is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SkinTone {
    /// Blend into the target body's tone.
    #[default]
    MatchTarget,
    /// Keep the source face's own tone.
    PreserveSource,
    /// Brighter than the target.
    Lighter,
    /// Deeper than the target.
    Darker,
}

impl SkinTone {
    /// All modes, default first.
    pub const ALL: [SkinTone; 4] = [
        Self::MatchTarget,
        Self::PreserveSource,
        Self::Lighter,
        Self::Darker,
    ];

    /// Returns the option value (e.g., "match_target").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MatchTarget => "match_target",
            Self::PreserveSource => "preserve_source",
            Self::Lighter => "lighter",
            Self::Darker => "darker",
        }
    }

    /// Parses an option value; unknown values select [`SkinTone::MatchTarget`].
    pub fn from_value(value: &str) -> Self {
        match value {
            "preserve_source" => Self::PreserveSource,
            "lighter" => Self::Lighter,
            "darker" => Self::Darker,
            _ => Self::MatchTarget,
        }
    }
}

impl From<String> for SkinTone {
    fn from(value: String) -> Self {
        Self::from_value(&value)
    }
}

/// Color temperature and contrast applied to the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Lighting {
    /// Match the target's lighting direction.
    #[default]
    Natural,
    /// Golden, sunset-like temperature.
    Warm,
    /// Bluish, fluorescent or night temperature.
    Cool,
    /// Dramatic, cinematic contrast.
    Contrast,
}

impl Lighting {
    /// All modes, default first.
    pub const ALL: [Lighting; 4] = [Self::Natural, Self::Warm, Self::Cool, Self::Contrast];

    /// Returns the option value (e.g., "warm").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Contrast => "contrast",
        }
    }

    /// Parses an option value; unknown values select [`Lighting::Natural`].
    pub fn from_value(value: &str) -> Self {
        match value {
            "warm" => Self::Warm,
            "cool" => Self::Cool,
            "contrast" | "high_contrast" | "high-contrast" => Self::Contrast,
            _ => Self::Natural,
        }
    }
}

impl From<String> for Lighting {
    fn from(value: String) -> Self {
        Self::from_value(&value)
    }
}

/// Size of the facial features relative to the target head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum FaceScale {
    /// Proportions matched to the target skull.
    #[default]
    Default,
    /// Roughly 90% feature scale.
    Smaller,
    /// Roughly 110% feature scale.
    Larger,
}

impl FaceScale {
    /// All modes, default first.
    pub const ALL: [FaceScale; 3] = [Self::Default, Self::Smaller, Self::Larger];

    /// Returns the option value (e.g., "smaller").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Smaller => "smaller",
            Self::Larger => "larger",
        }
    }

    /// Parses an option value; unknown values select [`FaceScale::Default`].
    pub fn from_value(value: &str) -> Self {
        match value {
            "smaller" => Self::Smaller,
            "larger" => Self::Larger,
            _ => Self::Default,
        }
    }
}

impl From<String> for FaceScale {
    fn from(value: String) -> Self {
        Self::from_value(&value)
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {$(
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

impl_display!(SkinTone, Lighting, FaceScale);

/// Everything the user chose for one generation.
///
/// Every field has a default, so `GenerationOptions::default()` is a valid
/// request on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Output aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Output resolution tier.
    pub image_size: ImageSize,
    /// Skin tone handling.
    pub skin_tone: SkinTone,
    /// Lighting adjustment.
    pub lighting: Lighting,
    /// Facial feature scale.
    pub face_scale: FaceScale,
    /// Free-text instruction appended to the prompt when not blank.
    pub instructions: String,
}

impl GenerationOptions {
    /// Creates options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Sets the output size tier.
    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.image_size = size;
        self
    }

    /// Sets the skin tone mode.
    pub fn with_skin_tone(mut self, tone: SkinTone) -> Self {
        self.skin_tone = tone;
        self
    }

    /// Sets the lighting mode.
    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }

    /// Sets the face scale mode.
    pub fn with_face_scale(mut self, scale: FaceScale) -> Self {
        self.face_scale = scale;
        self
    }

    /// Sets the free-text instruction.
    pub fn with_instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = text.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.aspect_ratio, AspectRatio::Square);
        assert_eq!(opts.image_size, ImageSize::TwoK);
        assert_eq!(opts.skin_tone, SkinTone::MatchTarget);
        assert_eq!(opts.lighting, Lighting::Natural);
        assert_eq!(opts.face_scale, FaceScale::Default);
        assert!(opts.instructions.is_empty());
    }

    #[test]
    fn test_known_values_roundtrip_as_str() {
        for tone in SkinTone::ALL {
            assert_eq!(SkinTone::from_value(tone.as_str()), tone);
        }
        for light in Lighting::ALL {
            assert_eq!(Lighting::from_value(light.as_str()), light);
        }
        for scale in FaceScale::ALL {
            assert_eq!(FaceScale::from_value(scale.as_str()), scale);
        }
    }

    #[test]
    fn test_unknown_values_fall_back() {
        assert_eq!(SkinTone::from_value("sepia"), SkinTone::MatchTarget);
        assert_eq!(Lighting::from_value("neon"), Lighting::Natural);
        assert_eq!(FaceScale::from_value("huge"), FaceScale::Default);
        assert_eq!(Lighting::from_value("high-contrast"), Lighting::Contrast);
    }

    #[test]
    fn test_deserialize_lenient() {
        let json = r#"{
            "aspect_ratio": "9:16",
            "image_size": "4K",
            "skin_tone": "ultraviolet",
            "lighting": "warm",
            "instructions": "remove glasses"
        }"#;
        let opts: GenerationOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.aspect_ratio, AspectRatio::Portrait);
        assert_eq!(opts.image_size, ImageSize::FourK);
        assert_eq!(opts.skin_tone, SkinTone::MatchTarget);
        assert_eq!(opts.lighting, Lighting::Warm);
        assert_eq!(opts.face_scale, FaceScale::Default);
        assert_eq!(opts.instructions, "remove glasses");
    }

    #[test]
    fn test_serialize_uses_option_values() {
        let opts = GenerationOptions::new()
            .with_skin_tone(SkinTone::PreserveSource)
            .with_lighting(Lighting::Contrast);
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["skin_tone"], "preserve_source");
        assert_eq!(json["lighting"], "contrast");
        assert_eq!(json["aspect_ratio"], "1:1");
        assert_eq!(json["image_size"], "2K");
    }
}
