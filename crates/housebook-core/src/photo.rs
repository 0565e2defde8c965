//! Member photos: picking a file, checking it, and turning it into the
//! inline `data:` URL that gets persisted with the record.

use std::io;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::error::PhotoError;

/// MIME types accepted for member photos
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Largest accepted photo, in bytes (inclusive)
pub const MAX_PHOTO_BYTES: usize = 5_000_000;

/// MIME type used when the extension is not a known image type
const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// A photo chosen for a member submit.
///
/// `bytes` is empty when the file was rejected before reading; `size` still
/// reports the file's length so validation can say why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    size: usize,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len();
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
            size,
        }
    }

    /// Read a photo from disk, inferring its MIME type from the extension.
    ///
    /// The file's type and length are checked from its metadata first. A
    /// photo that cannot pass validation is returned without its contents,
    /// and no more than `MAX_PHOTO_BYTES + 1` bytes are ever read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PhotoError> {
        let path = path.as_ref();
        let io_error = |source: io::Error| PhotoError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = tokio::fs::File::open(path).await.map_err(io_error)?;
        let metadata = file.metadata().await.map_err(io_error)?;
        if !metadata.is_file() {
            return Err(io_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_from_path(path);
        let len = usize::try_from(metadata.len()).unwrap_or(usize::MAX);

        if len > MAX_PHOTO_BYTES || !ACCEPTED_MIME_TYPES.contains(&mime_type) {
            warn!(file = %file_name, mime = mime_type, size = len, "Photo rejected without reading");
            return Ok(Self {
                file_name,
                mime_type: mime_type.to_string(),
                bytes: Vec::new(),
                size: len,
            });
        }

        // The file may have grown since the metadata call
        let mut bytes = Vec::with_capacity(len);
        file.take(MAX_PHOTO_BYTES as u64 + 1)
            .read_to_end(&mut bytes)
            .await
            .map_err(io_error)?;
        debug!(file = %file_name, mime = mime_type, size = bytes.len(), "Read photo");

        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Reason the photo cannot be used, if any
    pub fn problem(&self) -> Option<&'static str> {
        if !ACCEPTED_MIME_TYPES.contains(&self.mime_type.as_str()) || self.size() > MAX_PHOTO_BYTES {
            Some("Only JPG/PNG/WEBP up to 5MB are supported")
        } else {
            None
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Guess an image MIME type from a file extension
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => UNKNOWN_MIME_TYPE,
    }
}

/// MIME type and decoded size of a stored photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrlInfo {
    pub mime_type: String,
    pub size: usize,
}

/// Inspect a `data:<mime>;base64,<payload>` URL without keeping the bytes.
pub fn describe_data_url(url: &str) -> Option<DataUrlInfo> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime_type = meta.strip_suffix(";base64")?;
    let size = STANDARD.decode(payload).ok()?.len();
    Some(DataUrlInfo {
        mime_type: mime_type.to_string(),
        size,
    })
}
