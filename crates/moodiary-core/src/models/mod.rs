//! Data models for moodiary entities.
//!
//! - `UserProfile` and the auth response bodies
//! - `Diary`, `NewDiary`, `DiaryUpdate`: entries and their request bodies
//! - `Emotion`, `WeatherCondition`: label catalogs for tags
//! - `WeatherReport`: weather suggestion for a location

pub mod diary;
pub mod emotion;
pub mod user;
pub mod weather;

pub use diary::{
    Diary, DiaryFilter, DiaryUpdate, DiaryValidationError, NewDiary, DIARY_DATE_FORMAT,
    MAX_TITLE_LENGTH,
};
pub use emotion::Emotion;
pub use user::{ProfileResponse, SignInResponse, UserProfile};
pub use weather::{WeatherCondition, WeatherReport};
