use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Emotion, WeatherCondition};

/// Date format used by the `diaryDate` field.
pub const DIARY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum title length accepted by the editor.
pub const MAX_TITLE_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Diary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub emotion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(rename = "diaryDate")]
    pub diary_date: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl Diary {
    /// Parsed emotion tag, if the server sent a known value.
    pub fn emotion_kind(&self) -> Option<Emotion> {
        Emotion::from_value(&self.emotion)
    }

    pub fn weather_kind(&self) -> Option<WeatherCondition> {
        self.weather.as_deref().map(WeatherCondition::from_value)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.diary_date, DIARY_DATE_FORMAT).ok()
    }

    /// Emoji for list rendering, with a neutral fallback for unknown tags.
    pub fn emotion_emoji(&self) -> &'static str {
        self.emotion_kind().map(|e| e.emoji()).unwrap_or("·")
    }
}

/// Body of `POST /diaries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewDiary {
    pub title: String,
    pub content: String,
    pub emotion: String,
    #[serde(rename = "diaryDate")]
    pub diary_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiaryValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Title must be at most {} characters", MAX_TITLE_LENGTH)]
    TitleTooLong,

    #[error("Content is required")]
    MissingContent,

    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    #[error("Date must be YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),
}

impl NewDiary {
    /// Check the entry before it is sent to the server.
    pub fn validate(&self) -> Result<(), DiaryValidationError> {
        if self.title.trim().is_empty() {
            return Err(DiaryValidationError::MissingTitle);
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(DiaryValidationError::TitleTooLong);
        }
        if self.content.trim().is_empty() {
            return Err(DiaryValidationError::MissingContent);
        }
        if Emotion::from_value(&self.emotion).is_none() {
            return Err(DiaryValidationError::UnknownEmotion(self.emotion.clone()));
        }
        if NaiveDate::parse_from_str(&self.diary_date, DIARY_DATE_FORMAT).is_err() {
            return Err(DiaryValidationError::InvalidDate(self.diary_date.clone()));
        }
        Ok(())
    }
}

/// Body of `PATCH /diaries/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DiaryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(rename = "diaryDate", default, skip_serializing_if = "Option::is_none")]
    pub diary_date: Option<String>,
    /// `Some(None)` is sent as `null` and clears the stored weather
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub weather: Option<Option<String>>,
}

/// Distinguish an explicit `null` from a missing field.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl DiaryUpdate {
    /// Build a patch holding only the fields of `edited` that differ from `original`.
    pub fn between(original: &Diary, edited: &NewDiary) -> Self {
        fn changed(old: &str, new: &str) -> Option<String> {
            (old != new).then(|| new.to_string())
        }

        Self {
            title: changed(&original.title, &edited.title),
            content: changed(&original.content, &edited.content),
            emotion: changed(&original.emotion, &edited.emotion),
            diary_date: changed(&original.diary_date, &edited.diary_date),
            weather: (original.weather != edited.weather).then(|| edited.weather.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.emotion.is_none()
            && self.diary_date.is_none()
            && self.weather.is_none()
    }
}

/// Which server-side listing the diary list shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DiaryFilter {
    #[default]
    All,
    Search(String),
    Emotion(Emotion),
}

impl DiaryFilter {
    pub fn describe(&self) -> String {
        match self {
            DiaryFilter::All => "All entries".to_string(),
            DiaryFilter::Search(keyword) => format!("Search: \"{}\"", keyword),
            DiaryFilter::Emotion(emotion) => format!("Emotion: {}", emotion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_diary() -> Diary {
        Diary {
            id: 3,
            title: "Rainy walk".to_string(),
            content: "Forgot my umbrella.".to_string(),
            emotion: "평온".to_string(),
            weather: Some("Rain".to_string()),
            diary_date: "2024-06-01".to_string(),
            user_id: 7,
            created_at: "2024-06-01T10:00:00.000Z".to_string(),
            updated_at: "2024-06-01T10:00:00.000Z".to_string(),
        }
    }

    fn sample_new() -> NewDiary {
        NewDiary {
            title: "Rainy walk".to_string(),
            content: "Forgot my umbrella.".to_string(),
            emotion: "평온".to_string(),
            diary_date: "2024-06-01".to_string(),
            weather: Some("Rain".to_string()),
        }
    }

    #[test]
    fn test_parse_diary() {
        let json = r#"{"id":1,"title":"t","content":"c","emotion":"행복","diaryDate":"2024-01-02","userId":7,"createdAt":"2024-01-02T00:00:00Z","updatedAt":"2024-01-02T00:00:00Z"}"#;
        let diary: Diary = serde_json::from_str(json).expect("diary should parse");
        assert_eq!(diary.emotion_kind(), Some(Emotion::Happy));
        assert_eq!(diary.weather, None);
        assert_eq!(diary.date(), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_new_diary_serializes_camel_case() {
        let mut entry = sample_new();
        entry.weather = None;
        let value = serde_json::to_value(&entry).expect("entry should serialize");
        assert_eq!(value["diaryDate"], "2024-06-01");
        assert!(value.get("weather").is_none());
    }

    #[test]
    fn test_validate() {
        assert_eq!(sample_new().validate(), Ok(()));

        let mut entry = sample_new();
        entry.title = "   ".to_string();
        assert_eq!(entry.validate(), Err(DiaryValidationError::MissingTitle));

        let mut entry = sample_new();
        entry.emotion = "joy".to_string();
        assert!(matches!(
            entry.validate(),
            Err(DiaryValidationError::UnknownEmotion(_))
        ));

        let mut entry = sample_new();
        entry.diary_date = "06/01/2024".to_string();
        assert!(matches!(
            entry.validate(),
            Err(DiaryValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_update_between_only_changed_fields() {
        let original = sample_diary();
        let mut edited = sample_new();
        assert!(DiaryUpdate::between(&original, &edited).is_empty());

        edited.title = "Sunny walk".to_string();
        edited.weather = Some("Clear sky".to_string());
        let patch = DiaryUpdate::between(&original, &edited);
        assert_eq!(patch.title.as_deref(), Some("Sunny walk"));
        assert_eq!(patch.weather, Some(Some("Clear sky".to_string())));
        assert_eq!(patch.content, None);

        let value = serde_json::to_value(&patch).expect("patch should serialize");
        assert_eq!(value.as_object().map(|o| o.len()), Some(2));
    }

    #[test]
    fn test_update_clearing_weather_sends_null() {
        let original = sample_diary();
        let mut edited = sample_new();
        edited.weather = None;

        let patch = DiaryUpdate::between(&original, &edited);
        assert!(!patch.is_empty());
        assert_eq!(patch.weather, Some(None));

        let value = serde_json::to_value(&patch).expect("patch should serialize");
        assert_eq!(value, serde_json::json!({ "weather": null }));

        let parsed: DiaryUpdate = serde_json::from_value(value).expect("patch should parse");
        assert_eq!(parsed.weather, Some(None));
        let empty: DiaryUpdate = serde_json::from_str("{}").expect("empty patch should parse");
        assert_eq!(empty.weather, None);
    }
}
