//! Client-side validation errors.
//!
//! Raised before any network call and shown inline next to the offending
//! field. The display text is the message the user sees.

use thiserror::Error;

/// A form field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("O título é obrigatório.")]
    TitleRequired,

    #[error("Selecione o tipo de material.")]
    TypeRequired,

    #[error("Selecione a disciplina/área.")]
    AreaRequired,

    #[error("Selecione um arquivo para upload.")]
    FileRequired,

    #[error("Você precisa aceitar os termos e condições.")]
    TermsNotAccepted,

    #[error("O arquivo excede o tamanho máximo de 50MB.")]
    FileTooLarge,

    #[error("Tipo de arquivo não suportado. Por favor, envie um PDF, DOC, DOCX, PPT ou PPTX.")]
    UnsupportedFileType,

    #[error("Informe seu nome.")]
    NameRequired,

    #[error("Informe seu e-mail.")]
    EmailRequired,

    #[error("Informe sua senha.")]
    PasswordRequired,

    #[error("As senhas não coincidem")]
    PasswordMismatch,

    #[error("Informe sua senha atual para alterá-la")]
    CurrentPasswordRequired,

    #[error("A imagem deve ter no máximo 5MB")]
    ImageTooLarge,

    #[error("Por favor, selecione uma imagem válida")]
    InvalidImage,

    #[error("O comentário não pode estar vazio.")]
    EmptyComment,

    #[error("A avaliação deve ser entre 1 e 5 estrelas.")]
    RatingOutOfRange,
}

impl ValidationError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::TitleRequired => "title",
            ValidationError::TypeRequired => "type",
            ValidationError::AreaRequired => "area",
            ValidationError::FileRequired
            | ValidationError::FileTooLarge
            | ValidationError::UnsupportedFileType => "file",
            ValidationError::TermsNotAccepted => "terms",
            ValidationError::NameRequired => "name",
            ValidationError::EmailRequired => "email",
            ValidationError::PasswordRequired => "password",
            ValidationError::PasswordMismatch => "confirmPassword",
            ValidationError::CurrentPasswordRequired => "currentPassword",
            ValidationError::ImageTooLarge | ValidationError::InvalidImage => "image",
            ValidationError::EmptyComment => "comment",
            ValidationError::RatingOutOfRange => "rating",
        }
    }

    pub fn error_code(&self) -> &'static str {
        "E_VALIDATION"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            ValidationError::FileRequired.to_string(),
            "Selecione um arquivo para upload."
        );
        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "As senhas não coincidem"
        );
    }

    #[test]
    fn test_field_mapping() {
        assert_eq!(ValidationError::FileTooLarge.field(), "file");
        assert_eq!(ValidationError::PasswordMismatch.field(), "confirmPassword");
    }
}
