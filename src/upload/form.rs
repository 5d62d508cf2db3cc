//! Upload form state and validation.

use crate::error::ValidationError;
use crate::models::{Area, FileUpload, MaterialDraft, MaterialType};

/// 50 MB.
pub const MAX_FILE_BYTES: u64 = 52_428_800;

pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadForm {
    pub title: String,
    pub material_type: Option<MaterialType>,
    pub area: Option<Area>,
    pub description: String,
    /// Comma-separated
    pub keywords: String,
    pub file: Option<FileUpload>,
    pub accept_terms: bool,
}

impl UploadForm {
    /// Attach a file after checking its size and type. A rejected file
    /// leaves the previous selection in place.
    pub fn select_file(&mut self, file: FileUpload) -> Result<(), ValidationError> {
        check_file(&file)?;
        self.file = Some(file);
        Ok(())
    }

    pub fn remove_file(&mut self) {
        self.file = None;
    }

    /// Check every rule in form order and build the request parts.
    pub fn validate(&self) -> Result<(MaterialDraft, FileUpload), ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        let material_type = self.material_type.ok_or(ValidationError::TypeRequired)?;
        let area = self.area.ok_or(ValidationError::AreaRequired)?;
        let file = self.file.as_ref().ok_or(ValidationError::FileRequired)?;
        if !self.accept_terms {
            return Err(ValidationError::TermsNotAccepted);
        }
        check_file(file)?;

        let draft = MaterialDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            material_type,
            area,
            keywords: split_keywords(&self.keywords),
        };
        Ok((draft, file.clone()))
    }
}

pub fn check_file(file: &FileUpload) -> Result<(), ValidationError> {
    if file.size() > MAX_FILE_BYTES {
        return Err(ValidationError::FileTooLarge);
    }
    if !ALLOWED_MIME_TYPES.contains(&file.content_type.as_str()) {
        return Err(ValidationError::UnsupportedFileType);
    }
    Ok(())
}

/// Split on commas, trimming and dropping empty entries.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Human-readable size, e.g. `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn pdf(len: usize) -> FileUpload {
        FileUpload::new("aula.pdf", "application/pdf", Bytes::from(vec![0u8; len]))
    }

    fn complete_form() -> UploadForm {
        UploadForm {
            title: " Cálculo I ".to_string(),
            material_type: Some(MaterialType::Notes),
            area: Some(Area::Engineering),
            description: "Resumo da P1".to_string(),
            keywords: "limites, derivadas,, integrais ".to_string(),
            file: Some(pdf(10)),
            accept_terms: true,
        }
    }

    #[test]
    fn test_valid_form_builds_draft() {
        let (draft, file) = complete_form().validate().unwrap();
        assert_eq!(draft.title, "Cálculo I");
        assert_eq!(draft.keywords, vec!["limites", "derivadas", "integrais"]);
        assert_eq!(file.file_name, "aula.pdf");

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["type"], "NOTES");
        assert_eq!(json["area"], "ENGINEERING");
    }

    #[test]
    fn test_rules_in_form_order() {
        let form = UploadForm::default();
        assert_eq!(form.validate(), Err(ValidationError::TitleRequired));

        let form = UploadForm {
            file: None,
            ..complete_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, ValidationError::FileRequired);
        assert_eq!(err.to_string(), "Selecione um arquivo para upload.");

        let form = UploadForm {
            area: None,
            file: None,
            ..complete_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::AreaRequired));

        let form = UploadForm {
            accept_terms: false,
            ..complete_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::TermsNotAccepted));
    }

    #[test]
    fn test_select_file_rules() {
        let mut form = UploadForm::default();
        let image = FileUpload::new("foto.png", "image/png", Bytes::from_static(b"x"));
        assert_eq!(form.select_file(image), Err(ValidationError::UnsupportedFileType));
        assert!(form.file.is_none());

        assert_eq!(
            form.select_file(pdf(MAX_FILE_BYTES as usize + 1)),
            Err(ValidationError::FileTooLarge)
        );
        assert!(form.select_file(pdf(MAX_FILE_BYTES as usize)).is_ok());
        assert!(form.file.is_some());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * 1_048_576), "3.0 MB");
    }
}
