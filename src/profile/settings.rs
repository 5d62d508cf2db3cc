//! Profile settings form.

use crate::auth::check_image;
use crate::error::ValidationError;
use crate::models::{FileUpload, PasswordChange, ProfileUpdate, UserProfile};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    pub name: String,
    pub institution: String,
    pub location: String,
    pub bio: String,
    pub headline: String,
    pub website: String,
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
    /// Comma-separated
    pub interests: String,
    pub picture: Option<FileUpload>,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// What a valid settings form sends.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSubmission {
    pub update: ProfileUpdate,
    pub picture: Option<FileUpload>,
    pub password: Option<PasswordChange>,
}

impl SettingsForm {
    /// Pre-fill from the loaded profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: profile.name.clone(),
            institution: text(&profile.institution),
            location: text(&profile.location),
            bio: text(&profile.bio),
            headline: text(&profile.headline),
            website: text(&profile.website),
            github: text(&profile.github),
            linkedin: text(&profile.linkedin),
            twitter: text(&profile.twitter),
            interests: profile.interests.join(", "),
            ..Default::default()
        }
    }

    /// A password change is only attempted when a new password is typed.
    pub fn validate(&self) -> Result<SettingsSubmission, ValidationError> {
        let password = if self.new_password.is_empty() {
            None
        } else {
            if self.current_password.is_empty() {
                return Err(ValidationError::CurrentPasswordRequired);
            }
            if self.new_password != self.confirm_password {
                return Err(ValidationError::PasswordMismatch);
            }
            Some(PasswordChange {
                current_password: self.current_password.clone(),
                new_password: self.new_password.clone(),
            })
        };

        if let Some(picture) = &self.picture {
            check_image(picture)?;
        }

        let update = ProfileUpdate {
            name: Some(self.name.trim().to_string()),
            institution: Some(self.institution.trim().to_string()),
            location: Some(self.location.trim().to_string()),
            bio: Some(self.bio.trim().to_string()),
            headline: Some(self.headline.trim().to_string()),
            website: Some(self.website.trim().to_string()),
            github: Some(self.github.trim().to_string()),
            linkedin: Some(self.linkedin.trim().to_string()),
            twitter: Some(self.twitter.trim().to_string()),
            interests: Some(split_interests(&self.interests)),
        };

        Ok(SettingsSubmission {
            update,
            picture: self.picture.clone(),
            password,
        })
    }
}

fn split_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_prefill_and_interests() {
        let profile = UserProfile {
            id: "u-1".to_string(),
            name: "Ana".to_string(),
            bio: Some("Pesquisadora".to_string()),
            interests: vec!["IA".to_string(), "Redes".to_string()],
            ..Default::default()
        };
        let mut form = SettingsForm::from_profile(&profile);
        assert_eq!(form.interests, "IA, Redes");

        form.interests = " IA ,, Redes, Compiladores".to_string();
        let sent = form.validate().unwrap();
        assert_eq!(
            sent.update.interests,
            Some(vec!["IA".to_string(), "Redes".to_string(), "Compiladores".to_string()])
        );
        assert_eq!(sent.update.bio.as_deref(), Some("Pesquisadora"));
        assert!(sent.password.is_none());
    }

    #[test]
    fn test_password_rules() {
        let form = SettingsForm {
            new_password: "nova123".to_string(),
            confirm_password: "nova123".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::CurrentPasswordRequired));

        let form = SettingsForm {
            current_password: "velha".to_string(),
            new_password: "nova123".to_string(),
            confirm_password: "nova124".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        let form = SettingsForm {
            confirm_password: "nova123".to_string(),
            ..form
        };
        let change = form.validate().unwrap().password.unwrap();
        assert_eq!(change.current_password, "velha");
    }

    #[test]
    fn test_picture_must_be_an_image() {
        let form = SettingsForm {
            picture: Some(FileUpload::new("cv.pdf", "application/pdf", Bytes::from_static(b"x"))),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::InvalidImage));
    }
}
