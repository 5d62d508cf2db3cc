//! Backend data contracts.
//!
//! Shapes are owned by the backend; decoding is lenient about nulls and
//! missing fields so a partial payload never fails a whole page.

mod auth;
mod comment;
mod file;
mod material;
mod page;
mod user;

pub use auth::{AuthOutcome, LoginCredentials, RegisterData, TokenResponse};
pub use comment::{Comment, NewComment};
pub use file::{guess_mime, FileUpload};
pub use material::{
    Area, DownloadLink, Material, MaterialDraft, MaterialType, RatingSummary, UserRating,
};
pub use page::{Page, PaginationInfo};
pub use user::{PasswordChange, ProfileUpdate, User, UserProfile, UserStats};

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Helper to deserialize an id sent as either a string or an integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Like [`deserialize_id`] but null or missing becomes `None`.
pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_id")] String);

    Option::<Wrapper>::deserialize(deserializer).map(|opt| opt.map(|w| w.0))
}

/// Helper to deserialize null as the type's default value
pub(crate) fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Parse a backend timestamp. Accepts local date-times with or without
/// fractional seconds and RFC 3339 values; anything else becomes `None`.
pub(crate) fn deserialize_lenient_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2024-01-02T03:04:05").is_some());
        assert!(parse_timestamp("2024-01-02T03:04:05.123").is_some());
        assert!(parse_timestamp("2024-01-02T03:04:05Z").is_some());
        assert!(parse_timestamp("2024-01-02T03:04:05-03:00").is_some());
        assert!(parse_timestamp("ontem").is_none());
    }
}
