use moodiary_core::auth::SessionStatus;
use moodiary_core::router::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, CredentialsFocus, CredentialsForm};

use super::screens::{diaries, editor, stats};
use super::styles;

const LOGO: [&str; 3] = [
    "  ╔╦╗╔═╗╔═╗╔╦╗╦╔═╗╦═╗╦ ╦",
    "  ║║║║ ║║ ║ ║║║╠═╣╠╦╝╚╦╝",
    "  ╩ ╩╚═╝╚═╝═╩╝╩╩ ╩╩╚═ ╩ ",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  moodiary";
    let account = match app.session.user() {
        Some(user) => format!("{}  [?] Help", user.display_name()),
        None => "[?] Help".to_string(),
    };

    let used = Line::from(title).width() + Line::from(account.as_str()).width() + 4;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(account, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_nav(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();
    let mut spans = vec![Span::raw(" ")];

    if app.session.has_token() {
        let tabs = [
            ("[h]ome", view == Some(View::Home)),
            ("[l]ist", matches!(view, Some(View::DiaryList | View::DiaryDetail))),
            ("[n]ew", matches!(view, Some(View::DiaryCreate | View::DiaryEdit))),
            ("[s]tats", view == Some(View::Stats)),
        ];
        for (i, (label, selected)) in tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
            }
            spans.push(Span::styled(*label, styles::tab_style(*selected)));
        }
        spans.push(Span::styled("   [o] sign out", styles::muted_style()));
    } else {
        spans.push(Span::styled("Sign in", styles::tab_style(view == Some(View::Login))));
        spans.push(Span::styled(" | ", styles::muted_style()));
        spans.push(Span::styled(
            "Create account",
            styles::tab_style(view == Some(View::Register)),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.view() {
        Some(View::Login) => render_credentials(frame, &app.login, "Sign in", "Login", area),
        Some(View::Register) => {
            render_credentials(frame, &app.register, "Create account", "Register", area)
        }
        Some(View::Home) => diaries::render_home(frame, app, area),
        Some(View::DiaryList) => diaries::render_list(frame, app, area),
        Some(View::DiaryDetail) => diaries::render_detail(frame, app, area),
        Some(View::DiaryCreate | View::DiaryEdit) => editor::render(frame, app, area),
        Some(View::Stats) => stats::render(frame, app, area),
        None => {}
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if matches!(app.state, AppState::Searching) {
        format!(" Search: {}▌ ", app.search_query)
    } else if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if let Some(ref note) = app.cache_note {
        format!(" {} ", note)
    } else {
        match app.session.status() {
            SessionStatus::Authenticated => " Signed in ".to_string(),
            SessionStatus::Stale => " Checking session... ".to_string(),
            SessionStatus::Anonymous => " Not signed in ".to_string(),
        }
    };

    let right_text = format!(" {} ", shortcuts(app));
    let left_style = if matches!(app.state, AppState::Searching) {
        styles::search_style()
    } else {
        styles::muted_style()
    };

    let width = area.width as usize;
    let used = Line::from(left_text.as_str()).width() + Line::from(right_text.as_str()).width();
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(width.saturating_sub(used))),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn shortcuts(app: &App) -> &'static str {
    if matches!(app.state, AppState::Searching) {
        return "[Enter] search | [Esc] cancel";
    }
    match app.view() {
        Some(View::Login) => "[Tab] next field | [Ctrl+R] create account | [Esc] quit",
        Some(View::Register) => "[Tab] next field | [Ctrl+L] sign in | [Esc] quit",
        Some(View::DiaryList) => "[/] search | [e]motion filter | [c]lear | [r]eload | [q]uit",
        Some(View::DiaryDetail) => "[e]dit | [d]elete | [Esc] back | [q]uit",
        Some(View::DiaryCreate | View::DiaryEdit) => {
            "[Ctrl+S] save | [Ctrl+W] weather | [Ctrl+X] clear weather | [Esc] cancel"
        }
        _ => "[r]eload | [q]uit",
    }
}

/// Email/password form used for both the login and register routes
fn render_credentials(
    frame: &mut Frame,
    form: &CredentialsForm,
    heading: &str,
    button: &str,
    area: Rect,
) {
    let extra = usize::from(form.error.is_some()) + usize::from(form.notice.is_some());
    let height = 13 + (extra as u16) * 2;
    let dialog = centered_rect_fixed(46, height, area);
    frame.render_widget(Clear, dialog);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(format!("      {}", l), styles::title_style())))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("      {}", heading),
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));

    if let Some(ref notice) = form.notice {
        lines.push(Line::from(Span::styled(format!(" {}", notice), styles::success_style())));
        lines.push(Line::from(""));
    }

    lines.push(field_line(
        "Email:    ",
        &form.email,
        form.focus == CredentialsFocus::Email,
    ));
    let masked = "*".repeat(form.password.chars().count().min(20));
    lines.push(field_line(
        "Password: ",
        &masked,
        form.focus == CredentialsFocus::Password,
    ));

    lines.push(Line::from(""));
    let button_focused = form.focus == CredentialsFocus::Button;
    let (label, style) = if button_focused {
        (format!(" ▶ {} ◀ ", button), styles::selected_style())
    } else {
        (format!("   {}   ", button), styles::list_item_style())
    };
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(label, style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

fn field_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    // Show the tail of long values so the cursor stays visible
    let shown: String = {
        let count = value.chars().count();
        value.chars().skip(count.saturating_sub(20)).collect()
    };
    Line::from(vec![
        Span::raw("   "),
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{:<20}{}", shown, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(54, 26, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let mut help_text: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(format!("          {}", l), styles::title_style())))
        .collect();
    help_text.extend([
        Line::from(Span::styled(
            format!("                 version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("h", "Home"),
        key("l", "Diary list"),
        key("n", "New entry"),
        key("s", "Emotion statistics"),
        key("↑/↓ j/k", "Move selection"),
        key("Enter", "Open entry"),
        key("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        key("/", "Search entries"),
        key("e", "Cycle emotion filter (list) / edit (entry)"),
        key("d", "Delete entry"),
        key("r", "Reload from server"),
        key("o", "Sign out"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("         Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(format!("      {}", l), styles::title_style())))
        .collect();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        confirm_line("quit"),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let title = app
        .current
        .as_ref()
        .map(|d| moodiary_core::utils::truncate_string(&d.title, 30))
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("   Delete this entry?", styles::highlight_style())),
        Line::from(Span::styled(format!("   \"{}\"", title), styles::list_item_style())),
        Line::from(""),
        confirm_line("delete"),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styles::ERROR));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn confirm_line(action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(format!(" to {}, ", action), styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ])
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(46, 10, outer), Rect::new(27, 15, 46, 10));

        // Clamped to a small terminal
        let small = Rect::new(0, 0, 30, 5);
        assert_eq!(centered_rect_fixed(46, 10, small), Rect::new(0, 0, 30, 5));
    }
}
