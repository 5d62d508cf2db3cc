use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{deserialize_id, deserialize_lenient_datetime, deserialize_nullable, deserialize_optional_id};

/// Kind of academic material.
///
/// The backend calls a thesis `TCC`; older clients sent `THESIS`. Unknown
/// values decode as [`MaterialType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum MaterialType {
    Article,
    Image,
    Thesis,
    Notes,
    Presentation,
    Exercise,
    #[default]
    Other,
}

impl MaterialType {
    pub const ALL: [MaterialType; 7] = [
        MaterialType::Article,
        MaterialType::Image,
        MaterialType::Thesis,
        MaterialType::Notes,
        MaterialType::Presentation,
        MaterialType::Exercise,
        MaterialType::Other,
    ];

    /// Value used on the wire and in the explore query string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Article => "ARTICLE",
            MaterialType::Image => "IMAGE",
            MaterialType::Thesis => "TCC",
            MaterialType::Notes => "NOTES",
            MaterialType::Presentation => "PRESENTATION",
            MaterialType::Exercise => "EXERCISE",
            MaterialType::Other => "OTHER",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            MaterialType::Article => "Artigo",
            MaterialType::Image => "Imagem",
            MaterialType::Thesis => "TCC",
            MaterialType::Notes => "Anotações",
            MaterialType::Presentation => "Apresentação",
            MaterialType::Exercise => "Exercício",
            MaterialType::Other => "Outro",
        }
    }

    fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(MaterialType::Other)
    }
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ARTICLE" => Ok(MaterialType::Article),
            "IMAGE" => Ok(MaterialType::Image),
            "TCC" | "THESIS" => Ok(MaterialType::Thesis),
            "NOTES" => Ok(MaterialType::Notes),
            "PRESENTATION" => Ok(MaterialType::Presentation),
            "EXERCISE" => Ok(MaterialType::Exercise),
            "OTHER" => Ok(MaterialType::Other),
            other => Err(format!("unknown material type '{}'", other)),
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MaterialType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MaterialType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|v| MaterialType::parse_lenient(&v))
            .unwrap_or_default())
    }
}

/// Knowledge area (discipline) of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Area {
    ComputerScience,
    Engineering,
    Medicine,
    Business,
    Law,
    Psychology,
    Education,
    Arts,
    #[default]
    Other,
}

impl Area {
    pub const ALL: [Area; 9] = [
        Area::ComputerScience,
        Area::Engineering,
        Area::Medicine,
        Area::Business,
        Area::Law,
        Area::Psychology,
        Area::Education,
        Area::Arts,
        Area::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Area::ComputerScience => "COMPUTER_SCIENCE",
            Area::Engineering => "ENGINEERING",
            Area::Medicine => "MEDICINE",
            Area::Business => "BUSINESS",
            Area::Law => "LAW",
            Area::Psychology => "PSYCHOLOGY",
            Area::Education => "EDUCATION",
            Area::Arts => "ARTS",
            Area::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Area::ComputerScience => "Ciência da Computação",
            Area::Engineering => "Engenharia",
            Area::Medicine => "Medicina",
            Area::Business => "Administração",
            Area::Law => "Direito",
            Area::Psychology => "Psicologia",
            Area::Education => "Educação",
            Area::Arts => "Artes",
            Area::Other => "Outra",
        }
    }
}

impl FromStr for Area {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "COMPUTER_SCIENCE" => Ok(Area::ComputerScience),
            "ENGINEERING" => Ok(Area::Engineering),
            "MEDICINE" => Ok(Area::Medicine),
            "BUSINESS" => Ok(Area::Business),
            "LAW" => Ok(Area::Law),
            "PSYCHOLOGY" => Ok(Area::Psychology),
            "EDUCATION" => Ok(Area::Education),
            "ARTS" => Ok(Area::Arts),
            "OTHER" => Ok(Area::Other),
            other => Err(format!("unknown area '{}'", other)),
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Area {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Area {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default())
    }
}

/// The viewer's own rating of a material.
///
/// The backend sends `false` when the viewer has not rated, the star value
/// once they have, and nothing at all when it does not know. Only
/// [`UserRating::NotRated`] allows a new rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRating {
    NotRated,
    Rated(u8),
    #[default]
    Unknown,
}

impl UserRating {
    pub fn can_rate(&self) -> bool {
        matches!(self, UserRating::NotRated)
    }

    pub fn stars(&self) -> Option<u8> {
        match self {
            UserRating::Rated(stars) => Some(*stars),
            _ => None,
        }
    }
}

impl Serialize for UserRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UserRating::NotRated => serializer.serialize_bool(false),
            UserRating::Rated(stars) => serializer.serialize_u8(*stars),
            UserRating::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for UserRating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::Bool(false)) => UserRating::NotRated,
            Some(serde_json::Value::Number(n)) => match n.as_u64() {
                Some(stars) if (1..=5).contains(&stars) => UserRating::Rated(stars as u8),
                _ => UserRating::Unknown,
            },
            _ => UserRating::Unknown,
        })
    }
}

/// An uploaded academic material as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: String,
    #[serde(default, rename = "type")]
    pub material_type: MaterialType,
    #[serde(default)]
    pub area: Area,
    /// Author display name
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub author: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub author_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub total_view: i64,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub total_download: i64,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub like_count: i64,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub comment_count: i64,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub liked: bool,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub saved: bool,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub total_ratings: i64,
    #[serde(default)]
    pub user_rating: UserRating,
    #[serde(default, deserialize_with = "deserialize_lenient_datetime")]
    pub upload_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient_datetime")]
    pub created_at: Option<NaiveDateTime>,
}

/// Aggregate ratings for a material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub total_ratings: i64,
    /// Count of ratings per star value
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub distribution: BTreeMap<u8, u64>,
    /// The viewer's own rating; absent when they have not rated
    #[serde(default)]
    pub user_rating: Option<u8>,
}

/// Presigned download location for a material file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub url: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub file_name: String,
}

/// JSON part of a material upload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterialDraft {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    pub area: Area,
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_type_wire_values() {
        assert_eq!(serde_json::to_string(&MaterialType::Thesis).unwrap(), "\"TCC\"");
        let parsed: MaterialType = serde_json::from_str("\"THESIS\"").unwrap();
        assert_eq!(parsed, MaterialType::Thesis);
        let parsed: MaterialType = serde_json::from_str("\"article\"").unwrap();
        assert_eq!(parsed, MaterialType::Article);
        let parsed: MaterialType = serde_json::from_str("\"PODCAST\"").unwrap();
        assert_eq!(parsed, MaterialType::Other);
    }

    #[test]
    fn test_area_parse() {
        assert_eq!("computer_science".parse::<Area>(), Ok(Area::ComputerScience));
        assert!("ASTROLOGY".parse::<Area>().is_err());
        let parsed: Area = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Area::Other);
    }

    #[test]
    fn test_user_rating_sentinels() {
        let parsed: UserRating = serde_json::from_str("false").unwrap();
        assert_eq!(parsed, UserRating::NotRated);
        assert!(parsed.can_rate());

        let parsed: UserRating = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, UserRating::Rated(4));
        assert!(!parsed.can_rate());

        let parsed: UserRating = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, UserRating::Unknown);
        assert!(!parsed.can_rate());

        assert_eq!(serde_json::to_string(&UserRating::NotRated).unwrap(), "false");
    }

    #[test]
    fn test_material_from_backend_json() {
        let json = r#"{
            "id": 42,
            "title": "Cálculo I - Lista 3",
            "description": null,
            "type": "EXERCISE",
            "area": "ENGINEERING",
            "author": "Ana Souza",
            "authorId": "7f1c",
            "likeCount": 3,
            "liked": true,
            "commentCount": 2,
            "keywords": ["cálculo", "derivadas"],
            "fileName": "lista3.pdf",
            "totalDownload": 10,
            "totalView": 55,
            "fileSize": "1.2 MB",
            "fileType": "application/pdf",
            "uploadDate": "2024-04-02T13:45:10.123456",
            "createdAt": "2024-04-02T13:45:10"
        }"#;
        let material: Material = serde_json::from_str(json).unwrap();
        assert_eq!(material.id, "42");
        assert_eq!(material.description, "");
        assert_eq!(material.material_type, MaterialType::Exercise);
        assert_eq!(material.author_id.as_deref(), Some("7f1c"));
        assert_eq!(material.user_rating, UserRating::Unknown);
        assert!(material.created_at.is_some());
        assert!(material.upload_date.is_some());
        assert_eq!(material.average_rating, 0.0);
    }

    #[test]
    fn test_rating_summary_distribution() {
        let json = r#"{"averageRating":4.5,"totalRatings":2,"distribution":{"4":1,"5":1},"userRating":null}"#;
        let summary: RatingSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.distribution.get(&5), Some(&1));
        assert_eq!(summary.user_rating, None);
    }

    #[test]
    fn test_draft_serializes_type_key() {
        let draft = MaterialDraft {
            title: "Resumo".to_string(),
            description: String::new(),
            material_type: MaterialType::Notes,
            area: Area::Law,
            keywords: vec!["constitucional".to_string()],
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], "NOTES");
        assert_eq!(value["area"], "LAW");
    }
}
