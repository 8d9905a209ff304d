//! Transient in-memory reference to the user-selected student ID image.

use std::path::Path;

/// MIME types the verification service accepts.
pub const ALLOWED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// A file chosen for upload.
///
/// The flow consumes it on submit, so it never outlives one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Display name (file name without directories)
    pub name: String,

    /// Declared MIME type
    pub content_type: String,

    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, content_type_for(path), bytes))
    }

    /// Whether the declared type is JPEG or PNG.
    pub fn has_allowed_type(&self) -> bool {
        ALLOWED_CONTENT_TYPES.contains(&self.content_type.as_str())
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_maps_to_content_type() {
        assert_eq!(content_type_for(Path::new("id.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("id.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("id.png")), "image/png");
        assert_eq!(
            content_type_for(Path::new("id.gif")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("id")), "application/octet-stream");
    }

    #[test]
    fn from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let file = UploadedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "card.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.bytes, b"\x89PNG");
        assert!(file.has_allowed_type());
    }

    #[test]
    fn other_types_are_not_allowed() {
        let file = UploadedFile::new("card.pdf", "application/pdf", vec![]);
        assert!(!file.has_allowed_type());
    }
}
