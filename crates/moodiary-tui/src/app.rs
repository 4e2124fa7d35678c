//! Application state management for moodiary.
//!
//! This module contains the `App` struct that owns the session, the router
//! and the API client, plus all UI state. Every screen change goes through
//! `App::navigate`, so the auth guard sees every transition.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use moodiary_core::api::{ApiClient, ApiError};
use moodiary_core::auth::{spawn_reconciler, MemoryTokenStore, Session, SessionData, TokenStore};
use moodiary_core::cache::{evict, CacheManager, CacheOwner, Eviction};
use moodiary_core::config::Config;
use moodiary_core::models::{
    Diary, DiaryFilter, DiaryUpdate, Emotion, NewDiary, DIARY_DATE_FORMAT, MAX_TITLE_LENGTH,
};
use moodiary_core::router::{RouteMatch, Router, View, LOGIN_PATH};
use moodiary_core::stats::EmotionStats;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 100;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for an entry body.
const MAX_CONTENT_LENGTH: usize = 5000;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Entries shown on the home screen.
pub const RECENT_ENTRY_COUNT: usize = 5;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// Login and register form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsFocus {
    Email,
    Password,
    Button,
}

impl CredentialsFocus {
    pub fn next(&self) -> Self {
        match self {
            CredentialsFocus::Email => CredentialsFocus::Password,
            CredentialsFocus::Password => CredentialsFocus::Button,
            CredentialsFocus::Button => CredentialsFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            CredentialsFocus::Email => CredentialsFocus::Button,
            CredentialsFocus::Password => CredentialsFocus::Email,
            CredentialsFocus::Button => CredentialsFocus::Password,
        }
    }
}

/// Email/password form shared by the login and register screens
#[derive(Debug, Clone)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
    pub focus: CredentialsFocus,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl CredentialsForm {
    pub fn new(email: String, password: String) -> Self {
        let focus = if email.is_empty() {
            CredentialsFocus::Email
        } else {
            CredentialsFocus::Password
        };
        Self {
            email,
            password,
            focus,
            error: None,
            notice: None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            CredentialsFocus::Email => {
                if can_add_char(&self.email, MAX_EMAIL_LENGTH) && !c.is_whitespace() {
                    self.email.push(c);
                }
            }
            CredentialsFocus::Password => {
                if can_add_char(&self.password, MAX_PASSWORD_LENGTH) {
                    self.password.push(c);
                }
            }
            CredentialsFocus::Button => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            CredentialsFocus::Email => {
                self.email.pop();
            }
            CredentialsFocus::Password => {
                self.password.pop();
            }
            CredentialsFocus::Button => {}
        }
    }

    /// Returns an error message when the form cannot be submitted
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            Some("Email and password required")
        } else {
            None
        }
    }
}

/// Check if a character can be added without exceeding `max` characters
pub fn can_add_char(current: &str, max: usize) -> bool {
    current.chars().count() < max
}

/// Editor fields in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Date,
    Emotion,
    Content,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Emotion,
            FormField::Emotion => FormField::Content,
            FormField::Content => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Content,
            FormField::Date => FormField::Title,
            FormField::Emotion => FormField::Date,
            FormField::Content => FormField::Emotion,
        }
    }
}

/// State of the create/edit screen
#[derive(Debug, Clone)]
pub struct DiaryForm {
    pub title: String,
    pub date: String,
    pub emotion: Emotion,
    pub weather: Option<String>,
    pub content: String,
    pub focus: FormField,
    pub error: Option<String>,
    /// The entry being edited; `None` when creating
    pub original: Option<Diary>,
}

impl DiaryForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            date: today.format(DIARY_DATE_FORMAT).to_string(),
            emotion: Emotion::Calm,
            weather: None,
            content: String::new(),
            focus: FormField::Title,
            error: None,
            original: None,
        }
    }

    pub fn from_diary(diary: &Diary) -> Self {
        Self {
            title: diary.title.clone(),
            date: diary.diary_date.clone(),
            emotion: diary.emotion_kind().unwrap_or(Emotion::Calm),
            weather: diary.weather.clone(),
            content: diary.content.clone(),
            focus: FormField::Title,
            error: None,
            original: Some(diary.clone()),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.original.is_some()
    }

    pub fn to_new_diary(&self) -> NewDiary {
        NewDiary {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            emotion: self.emotion.value().to_string(),
            diary_date: self.date.trim().to_string(),
            weather: self.weather.clone(),
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormField::Title => {
                if can_add_char(&self.title, MAX_TITLE_LENGTH) {
                    self.title.push(c);
                }
            }
            FormField::Date => {
                if (c.is_ascii_digit() || c == '-') && can_add_char(&self.date, 10) {
                    self.date.push(c);
                }
            }
            FormField::Emotion => {}
            FormField::Content => {
                if can_add_char(&self.content, MAX_CONTENT_LENGTH) {
                    self.content.push(c);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Emotion => {}
            FormField::Content => {
                self.content.pop();
            }
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub session: Arc<Session>,
    pub api: ApiClient,
    pub router: Router,
    session_rx: watch::Receiver<SessionData>,
    cache_owner: CacheOwner,
    reconciler: Option<JoinHandle<()>>,

    // Navigation
    pub route: Option<RouteMatch>,
    /// Where to go after a login that a guard redirect forced
    return_to: Option<String>,

    // UI State
    pub state: AppState,
    pub login: CredentialsForm,
    pub register: CredentialsForm,
    pub search_query: String,

    // Data
    pub diaries: Vec<Diary>,
    pub filter: DiaryFilter,
    pub selection: usize,
    pub current: Option<Diary>,
    pub form: DiaryForm,
    pub stats: EmotionStats,
    /// Set when the list was served from the offline cache
    pub cache_note: Option<String>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let store: Arc<dyn TokenStore> = match config.token_store() {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "Token storage unavailable, session will not survive restart");
                Arc::new(MemoryTokenStore::new())
            }
        };

        let api = ApiClient::new(&config.api_base_url)?;
        let session = Arc::new(Session::restore(Arc::new(api.clone()), store));
        let session_rx = session.subscribe();
        let cache_owner = CacheOwner::new(&session_rx.borrow());

        let reconciler = config.reconcile_interval().map(|every| {
            debug!(?every, "Starting background session checks");
            spawn_reconciler(session.clone(), every)
        });

        let login_email = config.last_email.clone().unwrap_or_default();
        let login_password = std::env::var("MOODIARY_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,
            router: Router::diary(),
            session_rx,
            cache_owner,
            reconciler,

            route: None,
            return_to: None,

            state: AppState::Normal,
            login: CredentialsForm::new(login_email, login_password),
            register: CredentialsForm::new(String::new(), String::new()),
            search_query: String::new(),

            diaries: Vec::new(),
            filter: DiaryFilter::All,
            selection: 0,
            current: None,
            form: DiaryForm::blank(Local::now().date_naive()),
            stats: EmotionStats::default(),
            cache_note: None,

            status_message: None,
        })
    }

    /// Resolve a restored token, then open the home screen
    pub async fn start(&mut self) {
        if self.session.has_token() && !self.session.check_auth().await {
            self.login.notice = Some("Your session has expired. Please sign in again.".to_string());
        }
        self.navigate("/").await;
    }

    pub fn view(&self) -> Option<View> {
        self.route.as_ref().map(|r| r.view)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move to `path`, letting the router's guards redirect as needed
    pub async fn navigate(&mut self, path: &str) {
        let snapshot = self.session.snapshot();
        match self.router.navigate(path, &snapshot) {
            Ok(nav) => {
                if nav.route.view == View::Login {
                    if let Some(from) = nav.redirected_from {
                        self.return_to = Some(from);
                    }
                }
                debug!(path = %nav.route.path, "Entering route");
                self.route = Some(nav.route);
                self.state = AppState::Normal;
                self.enter_route().await;
            }
            Err(e) => {
                warn!(error = %e, "Navigation failed");
                self.status_message = Some(e.to_string());
            }
        }
    }

    async fn enter_route(&mut self) {
        let Some(route) = self.route.clone() else {
            return;
        };

        match route.view {
            View::Login => {
                self.login.focus = if self.login.email.is_empty() {
                    CredentialsFocus::Email
                } else {
                    CredentialsFocus::Password
                };
            }
            View::Register => {
                self.register.error = None;
            }
            View::Home | View::Stats => {
                self.filter = DiaryFilter::All;
                self.load_diaries().await;
                self.stats = EmotionStats::from_diaries(&self.diaries);
                self.selection = 0;
            }
            View::DiaryList => {
                self.load_diaries().await;
            }
            View::DiaryDetail => match route.id() {
                Some(id) => self.load_current(id).await,
                None => self.status_message = Some(format!("Invalid entry id in {}", route.path)),
            },
            View::DiaryEdit => match route.id() {
                Some(id) => {
                    self.load_current(id).await;
                    match self.current {
                        Some(ref diary) => self.form = DiaryForm::from_diary(diary),
                        None => self.form = DiaryForm::blank(Local::now().date_naive()),
                    }
                }
                None => self.status_message = Some(format!("Invalid entry id in {}", route.path)),
            },
            View::DiaryCreate => {
                self.form = DiaryForm::blank(Local::now().date_naive());
            }
        }
    }

    /// React to session changes made elsewhere (background checks, expired tokens)
    pub async fn sync_session(&mut self) {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return;
        }
        let data = self.session_rx.borrow_and_update().clone();
        self.track_session(&data);
        let has_token = data.has_token();

        let needs_auth = self
            .route
            .as_ref()
            .map(|r| r.meta.requires_auth)
            .unwrap_or(false);
        if needs_auth && !has_token {
            info!("Session ended, leaving protected screen");
            self.login.notice = Some("Your session has expired. Please sign in again.".to_string());
            let path = self
                .route
                .as_ref()
                .map(|r| r.path.clone())
                .unwrap_or_else(|| "/".to_string());
            self.navigate(&path).await;
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) {
        if let Some(message) = self.login.missing_field() {
            self.login.error = Some(message.to_string());
            return;
        }
        self.login.error = None;
        self.login.notice = None;

        let email = self.login.email.trim().to_string();
        match self.session.try_login(&email, &self.login.password).await {
            Ok(user) => {
                self.login.password.clear();
                if let Err(e) = self.config.remember_email(&email) {
                    warn!(error = %e, "Failed to save config");
                }
                let data = self.session.snapshot();
                self.track_session(&data);
                self.status_message = Some(format!("Welcome back, {}", user.display_name()));

                let next = self.return_to.take().unwrap_or_else(|| "/".to_string());
                self.navigate(&next).await;
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login.error = Some(e.user_message());
            }
        }
    }

    /// Create an account from the register form, then return to login
    pub async fn attempt_register(&mut self) {
        if let Some(message) = self.register.missing_field() {
            self.register.error = Some(message.to_string());
            return;
        }
        self.register.error = None;

        let email = self.register.email.trim().to_string();
        match self.api.register(&email, &self.register.password).await {
            Ok(()) => {
                info!("Account registered");
                self.register = CredentialsForm::new(String::new(), String::new());
                self.login = CredentialsForm::new(email, String::new());
                self.login.notice = Some("Account created. Please sign in.".to_string());
                self.navigate(LOGIN_PATH).await;
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.register.error = Some(e.user_message());
            }
        }
    }

    pub async fn logout(&mut self) {
        self.clear_cache();
        self.session.logout();
        self.diaries.clear();
        self.current = None;
        self.stats = EmotionStats::default();
        self.return_to = None;
        self.status_message = Some("Signed out".to_string());
        self.navigate(LOGIN_PATH).await;
    }

    /// API client carrying the current session token
    fn authed_api(&self) -> Option<ApiClient> {
        self.session.token().map(|token| self.api.with_token(token))
    }

    /// Cache for the signed-in user
    fn cache(&self) -> Option<CacheManager> {
        let user = self.session.user()?;
        let dir = self.config.cache_dir(user.id).ok()?;
        match CacheManager::new(dir) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "Cache unavailable");
                None
            }
        }
    }

    /// Remove the signed-in user's cache; must run before the user is cleared
    fn clear_cache(&self) {
        if let Some(cache) = self.cache() {
            if let Err(e) = cache.clear() {
                warn!(error = %e, "Failed to clear cache on logout");
            }
        }
    }

    /// Remove the cache of a session that ended without `logout`, such as
    /// a background check rejecting the token.
    fn track_session(&mut self, data: &SessionData) {
        let Some(eviction) = self.cache_owner.observe(data) else {
            return;
        };
        let dir = match eviction {
            Eviction::User(id) => self.config.cache_dir(id),
            Eviction::All => self.config.cache_root(),
        };
        match dir.and_then(|dir| evict(&dir)) {
            Ok(()) => debug!(?eviction, "Cache of ended session cleared"),
            Err(e) => warn!(error = %e, "Failed to clear cache of ended session"),
        }
    }

    /// Report a failed request. A rejected token ends the session; the
    /// next `sync_session` moves the user to the login screen.
    fn handle_api_error(&mut self, context: &str, e: ApiError) {
        error!(error = %e, context, "Request failed");
        if matches!(e, ApiError::Unauthorized) {
            self.clear_cache();
            self.session.logout();
            self.status_message = Some("Session expired".to_string());
        } else {
            self.status_message = Some(format!("{}: {}", context, e));
        }
    }

    // =========================================================================
    // Diaries
    // =========================================================================

    /// Fetch the list for the active filter, falling back to the offline cache
    pub async fn load_diaries(&mut self) {
        let Some(api) = self.authed_api() else {
            return;
        };

        let result = match self.filter {
            DiaryFilter::All => api.fetch_diaries().await,
            DiaryFilter::Search(ref keyword) => api.search_diaries(keyword).await,
            DiaryFilter::Emotion(emotion) => api.filter_by_emotion(emotion).await,
        };

        match result {
            Ok(mut diaries) => {
                sort_newest_first(&mut diaries);
                if self.filter == DiaryFilter::All {
                    if let Some(cache) = self.cache() {
                        if let Err(e) = cache.save_diaries(&diaries) {
                            warn!(error = %e, "Failed to cache diaries");
                        }
                    }
                }
                debug!(count = diaries.len(), filter = ?self.filter, "Diaries loaded");
                self.diaries = diaries;
                self.cache_note = None;
                self.clamp_selection();
            }
            Err(ApiError::NetworkError(e)) if self.filter == DiaryFilter::All => {
                warn!(error = %e, "Network unavailable, trying cache");
                match self.cache().and_then(|c| c.load_diaries().ok().flatten()) {
                    Some(cached) => {
                        self.cache_note = Some(format!("offline - cached {}", cached.age_display()));
                        self.diaries = cached.data;
                        self.clamp_selection();
                    }
                    None => {
                        self.status_message =
                            Some("Unable to reach server and nothing is cached".to_string());
                    }
                }
            }
            Err(e) => self.handle_api_error("Loading entries failed", e),
        }
    }

    async fn load_current(&mut self, id: i64) {
        let Some(api) = self.authed_api() else {
            return;
        };
        match api.fetch_diary(id).await {
            Ok(diary) => self.current = Some(diary),
            Err(e) => {
                self.current = self.diaries.iter().find(|d| d.id == id).cloned();
                self.handle_api_error("Loading entry failed", e);
            }
        }
    }

    pub fn selected_diary(&self) -> Option<&Diary> {
        self.diaries.get(self.selection)
    }

    pub fn recent_diaries(&self) -> &[Diary] {
        &self.diaries[..self.diaries.len().min(RECENT_ENTRY_COUNT)]
    }

    /// Number of rows the current screen lets the user select from
    pub fn selectable_len(&self) -> usize {
        match self.view() {
            Some(View::Home) => self.recent_diaries().len(),
            _ => self.diaries.len(),
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.selectable_len();
        if len == 0 {
            self.selection = 0;
            return;
        }
        let next = self.selection as isize + delta;
        self.selection = next.clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        self.selection = self.selection.min(self.diaries.len().saturating_sub(1));
    }

    pub async fn open_selected(&mut self) {
        if let Some(id) = self.selected_diary().map(|d| d.id) {
            self.navigate(&format!("/diaries/{}", id)).await;
        }
    }

    pub async fn apply_filter(&mut self, filter: DiaryFilter) {
        self.filter = filter;
        self.selection = 0;
        self.load_diaries().await;
        self.status_message = Some(self.filter.describe());
    }

    /// Step through emotion filters: all -> each emotion -> all
    pub async fn cycle_emotion_filter(&mut self) {
        let next = match self.filter {
            DiaryFilter::Emotion(e) if e.next() == Emotion::ALL[0] => DiaryFilter::All,
            DiaryFilter::Emotion(e) => DiaryFilter::Emotion(e.next()),
            _ => DiaryFilter::Emotion(Emotion::ALL[0]),
        };
        self.apply_filter(next).await;
    }

    pub async fn submit_search(&mut self) {
        self.state = AppState::Normal;
        let keyword = self.search_query.trim().to_string();
        let filter = if keyword.is_empty() {
            DiaryFilter::All
        } else {
            DiaryFilter::Search(keyword)
        };
        self.apply_filter(filter).await;
    }

    /// Validate and send the editor contents
    pub async fn save_form(&mut self) {
        let entry = self.form.to_new_diary();
        if let Err(e) = entry.validate() {
            self.form.error = Some(e.to_string());
            return;
        }
        self.form.error = None;

        let Some(api) = self.authed_api() else {
            return;
        };

        let result = match self.form.original.clone() {
            Some(original) => {
                let update = DiaryUpdate::between(&original, &entry);
                if update.is_empty() {
                    self.status_message = Some("No changes".to_string());
                    let path = format!("/diaries/{}", original.id);
                    self.navigate(&path).await;
                    return;
                }
                api.update_diary(original.id, &update).await
            }
            None => api.create_diary(&entry).await,
        };

        match result {
            Ok(saved) => {
                info!(id = saved.id, "Entry saved");
                self.status_message = Some(format!("Saved \"{}\"", saved.title));
                self.current = Some(saved.clone());
                self.navigate(&format!("/diaries/{}", saved.id)).await;
            }
            Err(ApiError::Validation(message)) => {
                self.form.error = Some(message);
            }
            Err(e) => self.handle_api_error("Saving entry failed", e),
        }
    }

    /// Leave the editor without saving
    pub async fn cancel_form(&mut self) {
        let back = match self.form.original {
            Some(ref original) => format!("/diaries/{}", original.id),
            None => "/diaries".to_string(),
        };
        self.navigate(&back).await;
    }

    pub async fn delete_current(&mut self) {
        self.state = AppState::Normal;
        let Some(diary) = self.current.clone() else {
            return;
        };
        let Some(api) = self.authed_api() else {
            return;
        };

        match api.delete_diary(diary.id).await {
            Ok(()) => {
                info!(id = diary.id, "Entry deleted");
                self.current = None;
                self.status_message = Some(format!("Deleted \"{}\"", diary.title));
                self.navigate("/diaries").await;
            }
            Err(e) => self.handle_api_error("Deleting entry failed", e),
        }
    }

    /// Ask the server for weather at the configured location
    pub async fn suggest_weather(&mut self) {
        let Some((lat, lon)) = self.config.coordinates() else {
            self.status_message =
                Some("Set latitude and longitude in config.json to fetch weather".to_string());
            return;
        };
        let Some(api) = self.authed_api() else {
            return;
        };

        match api.fetch_weather(lat, lon).await {
            Ok(report) => {
                self.status_message = Some(format!("Weather: {}", report.kind()));
                self.form.weather = Some(report.condition);
            }
            Err(e) => self.handle_api_error("Weather lookup failed", e),
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = self.reconciler.take() {
            handle.abort();
        }
    }
}

fn sort_newest_first(diaries: &mut [Diary]) {
    diaries.sort_by(|a, b| b.diary_date.cmp(&a.diary_date).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diary(id: i64, date: &str) -> Diary {
        Diary {
            id,
            title: format!("Entry {}", id),
            content: "Body".to_string(),
            emotion: "설렘".to_string(),
            weather: None,
            diary_date: date.to_string(),
            user_id: 7,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_credentials_form_limits() {
        let mut form = CredentialsForm::new(String::new(), String::new());
        assert_eq!(form.focus, CredentialsFocus::Email);
        form.push_char(' ');
        assert!(form.email.is_empty());
        for _ in 0..MAX_EMAIL_LENGTH + 5 {
            form.push_char('a');
        }
        assert_eq!(form.email.chars().count(), MAX_EMAIL_LENGTH);
        assert_eq!(form.missing_field(), Some("Email and password required"));

        form.focus = form.focus.next();
        form.push_char('p');
        assert_eq!(form.password, "p");
        assert_eq!(form.missing_field(), None);

        form.focus = CredentialsFocus::Button;
        form.push_char('x');
        form.backspace();
        assert_eq!(form.password, "p");
    }

    #[test]
    fn test_credentials_form_starts_on_password_when_email_known() {
        let form = CredentialsForm::new("u@x.com".to_string(), String::new());
        assert_eq!(form.focus, CredentialsFocus::Password);
        assert_eq!(form.focus.prev(), CredentialsFocus::Email);
    }

    #[test]
    fn test_diary_form_round_trip_without_changes() {
        let original = diary(3, "2024-06-01");
        let form = DiaryForm::from_diary(&original);
        assert!(form.is_editing());
        assert_eq!(form.emotion, Emotion::Excited);

        let entry = form.to_new_diary();
        assert_eq!(entry.validate(), Ok(()));
        assert!(DiaryUpdate::between(&original, &entry).is_empty());
    }

    #[test]
    fn test_diary_form_date_field_accepts_date_chars_only() {
        let mut form = DiaryForm::blank(NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"));
        assert_eq!(form.date, "2024-06-01");
        form.focus = FormField::Date;
        form.push_char('x');
        assert_eq!(form.date, "2024-06-01");
        form.backspace();
        form.push_char('2');
        assert_eq!(form.date, "2024-06-02");
    }

    #[test]
    fn test_diary_form_field_cycle() {
        let mut field = FormField::Title;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Content);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut diaries = vec![diary(1, "2024-01-01"), diary(3, "2024-03-01"), diary(2, "2024-03-01")];
        sort_newest_first(&mut diaries);
        let ids: Vec<i64> = diaries.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
