//! Keyboard input handling for the TUI.
//!
//! Overlays take keys first, then the current route decides. Any key that
//! changes screens goes through `App::navigate`.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use moodiary_core::models::DiaryFilter;
use moodiary_core::router::{View, LOGIN_PATH};

use crate::app::{App, AppState, CredentialsFocus, FormField, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.delete_current().await;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Searching => {
            handle_search_input(app, key).await;
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    match app.view() {
        Some(View::Login) => handle_login_input(app, key).await,
        Some(View::Register) => handle_register_input(app, key).await,
        Some(View::DiaryCreate | View::DiaryEdit) => handle_editor_input(app, key).await,
        _ => handle_browse_input(app, key).await,
    }

    Ok(false)
}

async fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search().await,
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => app.search_query.push(c),
        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            app.navigate("/register").await;
        }
        return;
    }

    let form = &mut app.login;
    match key.code {
        KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
        KeyCode::Enter => match form.focus {
            CredentialsFocus::Email => form.focus = CredentialsFocus::Password,
            CredentialsFocus::Password | CredentialsFocus::Button => app.attempt_login().await,
        },
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}

async fn handle_register_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('l') {
            app.navigate(LOGIN_PATH).await;
        }
        return;
    }

    let form = &mut app.register;
    match key.code {
        KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
        KeyCode::Enter => match form.focus {
            CredentialsFocus::Email => form.focus = CredentialsFocus::Password,
            CredentialsFocus::Password | CredentialsFocus::Button => {
                app.attempt_register().await
            }
        },
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}

async fn handle_editor_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => app.save_form().await,
            KeyCode::Char('w') => app.suggest_weather().await,
            KeyCode::Char('x') => app.form.weather = None,
            _ => {}
        }
        return;
    }

    let form = &mut app.form;
    match key.code {
        KeyCode::Esc => app.cancel_form().await,
        KeyCode::Tab => form.focus = form.focus.next(),
        KeyCode::BackTab => form.focus = form.focus.prev(),
        KeyCode::Left if form.focus == FormField::Emotion => form.emotion = form.emotion.prev(),
        KeyCode::Right if form.focus == FormField::Emotion => form.emotion = form.emotion.next(),
        KeyCode::Enter if form.focus == FormField::Content => form.push_char('\n'),
        KeyCode::Enter => form.focus = form.focus.next(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}

/// Keys for home, list, detail and stats
async fn handle_browse_input(app: &mut App, key: KeyEvent) {
    // Global navigation
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return;
        }
        KeyCode::Char('h') => return app.navigate("/").await,
        KeyCode::Char('l') => return app.navigate("/diaries").await,
        KeyCode::Char('n') => return app.navigate("/diaries/new").await,
        KeyCode::Char('s') => return app.navigate("/stats").await,
        KeyCode::Char('o') => return app.logout().await,
        _ => {}
    }

    match app.view() {
        Some(View::DiaryDetail) => handle_detail_input(app, key).await,
        Some(View::DiaryList) => handle_list_input(app, key).await,
        Some(View::Home) => handle_home_input(app, key).await,
        Some(View::Stats) => {
            if key.code == KeyCode::Char('r') {
                app.navigate("/stats").await;
            }
        }
        _ => {}
    }
}

async fn handle_home_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Enter => app.open_selected().await,
        KeyCode::Char('r') => app.navigate("/").await,
        _ => {}
    }
}

async fn handle_list_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.selection = app.diaries.len().saturating_sub(1),
        KeyCode::Enter => app.open_selected().await,
        KeyCode::Char('/') => {
            app.search_query = match app.filter {
                DiaryFilter::Search(ref keyword) => keyword.clone(),
                _ => String::new(),
            };
            app.state = AppState::Searching;
        }
        KeyCode::Char('e') => app.cycle_emotion_filter().await,
        KeyCode::Char('c') | KeyCode::Esc => {
            if app.filter != DiaryFilter::All {
                app.search_query.clear();
                app.apply_filter(DiaryFilter::All).await;
            }
        }
        KeyCode::Char('r') => app.load_diaries().await,
        _ => {}
    }
}

async fn handle_detail_input(app: &mut App, key: KeyEvent) {
    let Some(id) = app.current.as_ref().map(|d| d.id) else {
        if matches!(key.code, KeyCode::Esc | KeyCode::Backspace) {
            app.navigate("/diaries").await;
        }
        return;
    };

    match key.code {
        KeyCode::Char('e') => app.navigate(&format!("/diaries/{}/edit", id)).await,
        KeyCode::Char('d') => app.state = AppState::ConfirmingDelete,
        KeyCode::Char('r') => app.navigate(&format!("/diaries/{}", id)).await,
        KeyCode::Esc | KeyCode::Backspace => app.navigate("/diaries").await,
        _ => {}
    }
}
