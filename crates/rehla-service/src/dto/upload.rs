//! Uploaded files.

use rehla_core::{RehlaError, RehlaResult};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Content types accepted for answer sheets.
pub const ANSWER_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];

/// Content types accepted for exam sheets and materials.
pub const DOCUMENT_TYPES: &[&str] = &["application/pdf"];

/// Content types accepted for course and profile images.
pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// A file received from a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Detects the content type from the leading bytes, ignoring whatever
    /// the browser claimed.
    #[must_use]
    pub fn sniff_content_type(&self) -> &'static str {
        let head = &self.bytes[..self.bytes.len().min(16)];
        if head.starts_with(b"%PDF-") {
            "application/pdf"
        } else if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
            "image/jpeg"
        } else if head.starts_with(b"\x89PNG\r\n\x1a\n") {
            "image/png"
        } else if head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"WEBP" {
            "image/webp"
        } else {
            "application/octet-stream"
        }
    }

    /// Checks size and sniffed type, returning the content type to store.
    pub fn check(&self, allowed: &[&str]) -> RehlaResult<&'static str> {
        if self.bytes.is_empty() {
            return Err(RehlaError::validation("file is empty"));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(RehlaError::validation("file size must be 10MB or less"));
        }
        let content_type = self.sniff_content_type();
        if !allowed.contains(&content_type) {
            return Err(RehlaError::validation("file type is not allowed"));
        }
        Ok(content_type)
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
