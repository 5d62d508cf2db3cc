use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_lenient_datetime, deserialize_nullable};

/// A comment on a material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub content: String,
    /// Author display name
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub author: String,
    #[serde(default, deserialize_with = "deserialize_lenient_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub likes: i64,
}

/// Body of `POST /materials/{id}/comments`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewComment {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_from_backend_json() {
        let json = r#"{"id":9,"content":"Ótimo material!","author":"Bruno","createdAt":"2024-03-01T08:00:00","likes":null}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.id, "9");
        assert_eq!(comment.likes, 0);
        assert!(comment.created_at.is_some());
    }
}
