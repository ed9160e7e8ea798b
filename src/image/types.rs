//! Core image types: formats, output settings, uploads and results.

use crate::error::{FaceSwapError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Media type prefix of every generated image data URL.
pub const GENERATED_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
    /// GIF format.
    Gif,
    /// HEIC (HEVC-coded HEIF, the iPhone camera default).
    Heic,
    /// HEIF container with another codec.
    Heif,
    /// AVIF (AV1-coded HEIF).
    Avif,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Gif => "gif",
            Self::Heic => "heic",
            Self::Heif => "heif",
            Self::Avif => "avif",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Heic => "image/heic",
            Self::Heif => "image/heif",
            Self::Avif => "image/avif",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            "heic" => Some(Self::Heic),
            "heif" | "hif" => Some(Self::Heif),
            "avif" => Some(Self::Avif),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF87a / GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        // ISO BMFF: ....ftyp<brand>
        if data.len() >= 12 && &data[4..8] == b"ftyp" {
            return match &data[8..12] {
                b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" => Some(Self::Heic),
                b"mif1" | b"msf1" | b"heif" => Some(Self::Heif),
                b"avif" | b"avis" => Some(Self::Avif),
                _ => None,
            };
        }

        None
    }
}

/// Output aspect ratios accepted by the image model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square aspect ratio.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 3:4 standard portrait aspect ratio.
    #[serde(rename = "3:4")]
    StandardPortrait,
    /// 4:3 standard landscape aspect ratio.
    #[serde(rename = "4:3")]
    Standard,
    /// 9:16 portrait (tall) aspect ratio.
    #[serde(rename = "9:16")]
    Portrait,
    /// 16:9 landscape (widescreen) aspect ratio.
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    /// All ratios, in display order.
    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::StandardPortrait,
        Self::Standard,
        Self::Portrait,
        Self::Landscape,
    ];

    /// Returns the aspect ratio as a string (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::StandardPortrait => "3:4",
            Self::Standard => "4:3",
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = FaceSwapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| FaceSwapError::InvalidRequest(format!("unsupported aspect ratio: {s}")))
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    /// About 1024px on the long edge. Fastest.
    #[serde(rename = "1K")]
    OneK,
    /// About 2048px on the long edge.
    #[default]
    #[serde(rename = "2K")]
    TwoK,
    /// About 4096px on the long edge. Slowest.
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    /// All tiers, smallest first.
    pub const ALL: [ImageSize; 3] = [Self::OneK, Self::TwoK, Self::FourK];

    /// Returns the tier tag sent to the API (e.g., "2K").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        }
    }
}

impl FromStr for ImageSize {
    type Err = FaceSwapError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FaceSwapError::InvalidRequest(format!("unsupported image size: {s}")))
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-supplied picture ready for transmission.
///
/// The base64 payload and MIME type are derived from the same bytes when the
/// value is created and are never changed afterwards. Picking a different
/// file means building a new value.
#[derive(Clone)]
pub struct UploadedImage {
    name: Option<String>,
    data: Vec<u8>,
    base64_data: String,
    mime_type: String,
}

impl UploadedImage {
    /// Creates an upload from raw bytes, detecting the format from content.
    ///
    /// `name` is only used for display and as a format hint when the
    /// content is not recognised.
    pub fn from_bytes(data: Vec<u8>, name: Option<String>) -> Result<Self> {
        if data.is_empty() {
            return Err(FaceSwapError::InvalidRequest("image file is empty".into()));
        }

        let format = ImageFormat::from_magic_bytes(&data)
            .or_else(|| {
                name.as_deref()
                    .and_then(|n| Path::new(n).extension())
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .ok_or_else(|| {
                FaceSwapError::InvalidRequest(format!(
                    "unrecognised image format: {}",
                    name.as_deref().unwrap_or("<unnamed>")
                ))
            })?;

        Ok(Self::encode(data, format.mime_type().to_string(), name))
    }

    /// Creates an upload from raw bytes and a MIME type reported by the caller
    /// (e.g. a browser or an HTTP multipart field).
    ///
    /// Any `image/*` type is accepted as given; the content is not sniffed.
    pub fn from_bytes_with_mime(
        data: Vec<u8>,
        mime_type: &str,
        name: Option<String>,
    ) -> Result<Self> {
        if data.is_empty() {
            return Err(FaceSwapError::InvalidRequest("image file is empty".into()));
        }

        let mime_type = mime_type.trim().to_ascii_lowercase();
        if !mime_type
            .strip_prefix("image/")
            .is_some_and(|subtype| !subtype.is_empty())
        {
            return Err(FaceSwapError::InvalidRequest(format!(
                "not an image MIME type: {mime_type}"
            )));
        }

        Ok(Self::encode(data, mime_type, name))
    }

    fn encode(data: Vec<u8>, mime_type: String, name: Option<String>) -> Self {
        let base64_data = base64::engine::general_purpose::STANDARD.encode(&data);
        Self {
            name,
            data,
            base64_data,
            mime_type,
        }
    }

    /// Returns the original file name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the raw image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the base64 payload (no data URL prefix).
    pub fn base64_data(&self) -> &str {
        &self.base64_data
    }

    /// Returns the MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns a data URL suitable for previewing the upload.
    pub fn preview_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// MIME type the service reported for the image part.
    pub reported_mime_type: Option<String>,
}

/// A generated image, held as the base64 payload returned by the service.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or displayed"]
pub struct GeneratedImage {
    base64_data: String,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a generated image from a base64 payload.
    pub fn new(base64_data: impl Into<String>, metadata: GenerationMetadata) -> Self {
        Self {
            base64_data: base64_data.into(),
            metadata,
        }
    }

    /// Returns the base64 payload exactly as returned by the service.
    pub fn base64_data(&self) -> &str {
        &self.base64_data
    }

    /// Returns the displayable data URL.
    pub fn data_url(&self) -> String {
        format!("{GENERATED_DATA_URL_PREFIX}{}", self.base64_data)
    }

    /// Decodes the payload into raw image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64_data)
            .map_err(|e| FaceSwapError::Decode(e.to_string()))
    }

    /// Saves the decoded image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.bytes()?)?;
        Ok(())
    }

    /// Returns a timestamped download file name, e.g. `gemini-faceswap-1700000000000.png`.
    pub fn download_file_name(&self) -> String {
        download_file_name_at(chrono::Utc::now())
    }
}

pub(crate) fn download_file_name_at(at: chrono::DateTime<chrono::Utc>) -> String {
    format!("gemini-faceswap-{}.png", at.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a\x01\x00"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(b"hello"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
    }

    #[test]
    fn test_aspect_ratio_parse() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.as_str().parse::<AspectRatio>().unwrap(), ratio);
        }
        assert!("21:9".parse::<AspectRatio>().is_err());
        assert_eq!(AspectRatio::default(), AspectRatio::Square);
    }

    #[test]
    fn test_image_size_parse() {
        assert_eq!("4k".parse::<ImageSize>().unwrap(), ImageSize::FourK);
        assert!("8K".parse::<ImageSize>().is_err());
        assert_eq!(ImageSize::default(), ImageSize::TwoK);
    }

    #[test]
    fn test_uploaded_image_derives_payload() {
        let upload = UploadedImage::from_bytes(PNG_MAGIC.to_vec(), Some("face.png".into())).unwrap();
        assert_eq!(upload.mime_type(), "image/png");
        assert_eq!(upload.base64_data(), "iVBORw0KGgoAAAAA");
        assert_eq!(upload.preview_url(), "data:image/png;base64,iVBORw0KGgoAAAAA");
        assert_eq!(upload.size(), 12);
    }

    #[test]
    fn test_uploaded_image_uses_extension_hint() {
        let upload = UploadedImage::from_bytes(vec![1, 2, 3], Some("body.JPG".into())).unwrap();
        assert_eq!(upload.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_format_heif_family_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(b"\0\0\0\x18ftypheic\0\0\0\0"),
            Some(ImageFormat::Heic)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"\0\0\0\x18ftypmif1\0\0\0\0"),
            Some(ImageFormat::Heif)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"\0\0\0\x1cftypavif\0\0\0\0"),
            Some(ImageFormat::Avif)
        );
        // MP4 video shares the container but not the brand.
        assert_eq!(ImageFormat::from_magic_bytes(b"\0\0\0\x18ftypisom\0\0\0\0"), None);
    }

    #[test]
    fn test_format_heif_family_from_extension() {
        assert_eq!(ImageFormat::from_extension("HEIC"), Some(ImageFormat::Heic));
        assert_eq!(ImageFormat::from_extension("heif"), Some(ImageFormat::Heif));
        assert_eq!(ImageFormat::from_extension("avif"), Some(ImageFormat::Avif));
    }

    #[test]
    fn test_uploaded_heic_photo() {
        let data = b"\0\0\0\x18ftypheic\0\0\0\0mif1heic".to_vec();
        let upload = UploadedImage::from_bytes(data, Some("IMG_0001.HEIC".into())).unwrap();
        assert_eq!(upload.mime_type(), "image/heic");

        let upload = UploadedImage::from_bytes(vec![9, 9, 9], Some("photo.avif".into())).unwrap();
        assert_eq!(upload.mime_type(), "image/avif");
    }

    #[test]
    fn test_uploaded_image_with_reported_mime() {
        let upload = UploadedImage::from_bytes_with_mime(
            vec![1, 2, 3],
            " Image/TIFF ",
            Some("scan.tif".into()),
        )
        .unwrap();
        assert_eq!(upload.mime_type(), "image/tiff");
        assert_eq!(upload.base64_data(), "AQID");
        assert_eq!(upload.preview_url(), "data:image/tiff;base64,AQID");
    }

    #[test]
    fn test_uploaded_image_with_reported_mime_rejects_non_images() {
        assert!(UploadedImage::from_bytes_with_mime(vec![1], "application/pdf", None).is_err());
        assert!(UploadedImage::from_bytes_with_mime(vec![1], "image/", None).is_err());
        assert!(UploadedImage::from_bytes_with_mime(Vec::new(), "image/png", None).is_err());
    }

    #[test]
    fn test_uploaded_image_rejects_unknown_and_empty() {
        assert!(UploadedImage::from_bytes(vec![1, 2, 3], Some("notes.txt".into())).is_err());
        assert!(UploadedImage::from_bytes(Vec::new(), None).is_err());
    }

    #[test]
    fn test_generated_image_data_url() {
        let image = GeneratedImage::new("iVBORw0KGgo=", GenerationMetadata::default());
        assert_eq!(image.data_url(), "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(
            image.bytes().unwrap(),
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        );
    }

    #[test]
    fn test_generated_image_bad_payload() {
        let image = GeneratedImage::new("not base64!", GenerationMetadata::default());
        assert!(matches!(image.bytes(), Err(FaceSwapError::Decode(_))));
    }

    #[test]
    fn test_download_file_name() {
        let at = chrono::DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(download_file_name_at(at), "gemini-faceswap-1700000000123.png");
    }
}
