//! Reading image files into [`UploadedImage`] values.

use crate::error::Result;
use crate::image::types::UploadedImage;
use std::path::Path;

/// Reads and encodes one image file.
pub async fn load_image(path: impl AsRef<Path>) -> Result<UploadedImage> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);
    let upload = UploadedImage::from_bytes(data, name)?;
    tracing::debug!(
        path = %path.display(),
        mime_type = upload.mime_type(),
        size = upload.size(),
        "loaded image"
    );
    Ok(upload)
}

/// Loads the source face and target body concurrently.
///
/// Both reads finish before this returns, so nothing downstream can observe
/// a half-loaded pair.
pub async fn load_pair(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
) -> Result<(UploadedImage, UploadedImage)> {
    tokio::try_join!(load_image(source), load_image(target))
}
