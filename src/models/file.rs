use bytes::Bytes;
use std::path::Path;

use crate::traits::MultipartPart;

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = guess_mime(&file_name).to_string();
        Ok(Self::new(file_name, content_type, Bytes::from(data)))
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn to_part(&self, name: &str) -> MultipartPart {
        MultipartPart::File {
            name: name.to_string(),
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            data: self.data.clone(),
        }
    }
}

/// MIME type for a file name, by extension.
pub fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("Aula.PDF"), "application/pdf");
        assert_eq!(guess_mime("slides.pptx"), "application/vnd.openxmlformats-officedocument.presentationml.presentation");
        assert_eq!(guess_mime("foto.jpeg"), "image/jpeg");
        assert_eq!(guess_mime("sem-extensao"), "application/octet-stream");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();

        let upload = FileUpload::from_path(file.path()).unwrap();
        assert_eq!(upload.content_type, "application/pdf");
        assert_eq!(upload.size(), 8);
        assert_eq!(upload.to_part("file").name(), "file");
    }
}
