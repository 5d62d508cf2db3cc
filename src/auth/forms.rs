//! Client-side validation of the login and register forms.
//!
//! Validation runs before any network call; the first failing rule wins.

use crate::error::ValidationError;
use crate::models::{FileUpload, LoginCredentials, RegisterData};

/// Largest accepted profile or cover image.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<LoginCredentials, ValidationError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        Ok(LoginCredentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
    pub picture: Option<FileUpload>,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterData, ValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if !self.accept_terms {
            return Err(ValidationError::TermsNotAccepted);
        }
        if let Some(picture) = &self.picture {
            check_image(picture)?;
        }
        Ok(RegisterData {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Profile pictures and cover images must be `image/*` and at most 5 MB.
pub fn check_image(file: &FileUpload) -> Result<(), ValidationError> {
    if !file.content_type.starts_with("image/") {
        return Err(ValidationError::InvalidImage);
    }
    if file.size() > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: " Ana Souza ".to_string(),
            email: "ana@uni.br".to_string(),
            password: "segredo1".to_string(),
            confirm_password: "segredo1".to_string(),
            accept_terms: true,
            picture: None,
        }
    }

    #[test]
    fn test_login_form() {
        assert_eq!(
            LoginForm::new("  ", "x").validate(),
            Err(ValidationError::EmailRequired)
        );
        assert_eq!(
            LoginForm::new("a@b", "").validate(),
            Err(ValidationError::PasswordRequired)
        );
        let creds = LoginForm::new(" a@b ", "pw").validate().unwrap();
        assert_eq!(creds.email, "a@b");
    }

    #[test]
    fn test_register_valid() {
        let data = register_form().validate().unwrap();
        assert_eq!(data.name, "Ana Souza");
    }

    #[test]
    fn test_register_password_mismatch() {
        let form = RegisterForm {
            confirm_password: "outra".to_string(),
            ..register_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, ValidationError::PasswordMismatch);
        assert_eq!(err.to_string(), "As senhas não coincidem");
    }

    #[test]
    fn test_register_requires_terms() {
        let form = RegisterForm {
            accept_terms: false,
            ..register_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::TermsNotAccepted));
    }

    #[test]
    fn test_register_picture_rules() {
        let form = RegisterForm {
            picture: Some(FileUpload::new("cv.pdf", "application/pdf", Bytes::from_static(b"x"))),
            ..register_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::InvalidImage));

        let big = vec![0u8; (MAX_IMAGE_BYTES + 1) as usize];
        let form = RegisterForm {
            picture: Some(FileUpload::new("foto.png", "image/png", Bytes::from(big))),
            ..register_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::ImageTooLarge));
    }
}
