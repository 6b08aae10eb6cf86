use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }
}

impl FromStr for MediaType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "photo" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted photo or video reference.
///
/// `id` and `created_at` are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub created_at: Option<String>,
}

impl MediaItem {
    /// The image shown on a card: the thumbnail when there is one, else the media itself.
    pub fn preview_url(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or(&self.url)
    }
}

/// A validated create request, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedia {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
}

impl NewMedia {
    pub fn new(media_type: MediaType, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            media_type,
            title: title.into(),
            url: url.into(),
            thumbnail_url: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }
}

/// Raw body of `POST /api/media`. Every field is optional here so that a
/// missing field surfaces as a [`ValidationError`] naming it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaRequest {
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl CreateMediaRequest {
    pub fn validate(self) -> Result<NewMedia, ValidationError> {
        let raw_type = self
            .media_type
            .ok_or(ValidationError::Missing { field: "type" })?;
        let media_type = raw_type
            .parse::<MediaType>()
            .map_err(|_| ValidationError::UnknownType(raw_type))?;

        let title = self.title.ok_or(ValidationError::Missing { field: "title" })?;
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        let url = self.url.ok_or(ValidationError::Missing { field: "url" })?;
        let url = check_uri("url", url.trim())?;

        // Forms submit an empty thumbnail field when none was chosen.
        let thumbnail_url = match self.thumbnail_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(check_uri("thumbnailUrl", raw)?),
        };

        Ok(NewMedia {
            media_type,
            title,
            url,
            thumbnail_url,
        })
    }
}

fn check_uri(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Url::parse(raw).map_err(|e| ValidationError::InvalidUri {
        field,
        reason: e.to_string(),
    })?;
    Ok(raw.to_string())
}

/// Body of `POST /api/media/delete-many`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteManyRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("unknown media type '{0}', expected 'photo' or 'video'")]
    UnknownType(String),
    #[error("{field} is not a valid URI: {reason}")]
    InvalidUri { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::Empty { field } | Self::InvalidUri { field, .. } => {
                field
            }
            Self::UnknownType(_) => "type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(media_type: &str, title: &str, url: &str) -> CreateMediaRequest {
        CreateMediaRequest {
            media_type: Some(media_type.to_string()),
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            thumbnail_url: None,
        }
    }

    #[test]
    fn test_validate_minimal_photo() {
        let input = request("photo", "A", "http://x/1.jpg").validate().unwrap();
        assert_eq!(input.media_type, MediaType::Photo);
        assert_eq!(input.title, "A");
        assert_eq!(input.url, "http://x/1.jpg");
        assert_eq!(input.thumbnail_url, None);
    }

    #[test]
    fn test_validate_type_is_case_insensitive() {
        let input = request("VIDEO", "B", "http://x/1.mp4").validate().unwrap();
        assert_eq!(input.media_type, MediaType::Video);
    }

    #[test]
    fn test_validate_missing_title() {
        let mut req = request("photo", "", "http://x/1.jpg");
        req.title = None;
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::Missing { field: "title" }
        );
    }

    #[test]
    fn test_validate_blank_title() {
        let err = request("photo", "   ", "http://x/1.jpg").validate().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "title" });
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn test_validate_unknown_type() {
        let err = request("audio", "A", "http://x/1.mp3").validate().unwrap_err();
        assert_eq!(err, ValidationError::UnknownType("audio".to_string()));
        assert_eq!(err.field(), "type");
    }

    #[test]
    fn test_validate_relative_url_rejected() {
        let err = request("photo", "A", "/photos/1.jpg").validate().unwrap_err();
        assert_eq!(err.field(), "url");
        assert!(matches!(err, ValidationError::InvalidUri { .. }));
    }

    #[test]
    fn test_validate_accepts_object_urls() {
        let input = request("photo", "A", "blob:http://localhost:3000/5f1c2d")
            .validate()
            .unwrap();
        assert_eq!(input.url, "blob:http://localhost:3000/5f1c2d");
    }

    #[test]
    fn test_validate_empty_thumbnail_is_absent() {
        let mut req = request("photo", "A", "http://x/1.jpg");
        req.thumbnail_url = Some(String::new());
        assert_eq!(req.validate().unwrap().thumbnail_url, None);
    }

    #[test]
    fn test_validate_bad_thumbnail() {
        let mut req = request("video", "B", "http://x/1.mp4");
        req.thumbnail_url = Some("not a uri".to_string());
        assert_eq!(req.validate().unwrap_err().field(), "thumbnailUrl");
    }

    #[test]
    fn test_media_item_wire_shape() {
        let item = MediaItem {
            id: 1,
            media_type: MediaType::Photo,
            title: "A".to_string(),
            url: "http://x/1.jpg".to_string(),
            thumbnail_url: None,
            created_at: Some("2024-05-01T10:00:00.000Z".to_string()),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "type": "photo",
                "title": "A",
                "url": "http://x/1.jpg",
                "thumbnailUrl": null,
                "createdAt": "2024-05-01T10:00:00.000Z",
            })
        );

        let decoded: MediaItem = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_preview_url_prefers_thumbnail() {
        let mut item = MediaItem {
            id: 2,
            media_type: MediaType::Video,
            title: "B".to_string(),
            url: "http://x/1.mp4".to_string(),
            thumbnail_url: None,
            created_at: None,
        };
        assert_eq!(item.preview_url(), "http://x/1.mp4");

        item.thumbnail_url = Some("http://x/1.png".to_string());
        assert_eq!(item.preview_url(), "http://x/1.png");
    }
}
