/// Design file loader
///
/// Reads the file picked by the user, sniffs its real format from the
/// content (not the extension) and only accepts PNG, JPEG and WEBP.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;
use tokio::task;

use super::ImageData;

/// Extensions offered in the file picker
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported image format (use PNG, JPEG or WEBP)")]
    UnsupportedFormat,

    #[error("task join error: {0}")]
    Join(#[from] task::JoinError),
}

/// A design graphic chosen by the user
///
/// The preview handle is released together with the file when the design
/// is replaced or the session is reset.
#[derive(Debug, Clone)]
pub struct DesignFile {
    /// File name shown in the uploader
    pub name: String,
    /// Encoded bytes sent to the composite call
    pub image: Arc<ImageData>,
    /// Local preview drawn in the placement overlay
    pub preview: iced::widget::image::Handle,
}

impl DesignFile {
    pub fn new(name: impl Into<String>, image: ImageData) -> Self {
        let preview = image.handle();
        Self {
            name: name.into(),
            image: Arc::new(image),
            preview,
        }
    }
}

/// Load a design file without blocking the UI thread
pub async fn load_design_file(path: PathBuf) -> Result<DesignFile, UploadError> {
    task::spawn_blocking(move || load_design_file_blocking(&path)).await?
}

/// Blocking implementation of design loading
fn load_design_file_blocking(path: &Path) -> Result<DesignFile, UploadError> {
    let bytes = std::fs::read(path)?;
    let mime_type = sniff_mime_type(&bytes).ok_or(UploadError::UnsupportedFormat)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    log::info!("Loaded design {} ({} bytes, {})", name, bytes.len(), mime_type);

    Ok(DesignFile::new(name, ImageData::new(bytes, mime_type)))
}

/// MIME type for accepted formats, None for anything else
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use std::io::Cursor;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(4, 4, Rgba([200u8, 30, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn test_sniff_accepted_formats() {
        assert_eq!(sniff_mime_type(&encode(ImageFormat::Png)), Some("image/png"));
        assert_eq!(sniff_mime_type(&encode(ImageFormat::Jpeg)), Some("image/jpeg"));
    }

    #[test]
    fn test_sniff_rejects_other_formats() {
        assert_eq!(sniff_mime_type(&encode(ImageFormat::Bmp)), None);
        assert_eq!(sniff_mime_type(b"definitely not an image"), None);
    }

    #[tokio::test]
    async fn test_load_design_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, encode(ImageFormat::Png)).unwrap();

        let design = load_design_file(path).await.unwrap();
        assert_eq!(design.name, "logo.png");
        assert_eq!(design.image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_load_rejects_mislabeled_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"GIF89a not really").unwrap();

        let result = load_design_file(path).await;
        assert!(matches!(result, Err(UploadError::UnsupportedFormat)));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_design_file(PathBuf::from("/nonexistent/design.png")).await;
        assert!(matches!(result, Err(UploadError::Io(_))));
    }
}
