use moodiary_core::models::{Emotion, WeatherCondition};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FormField};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Date + weather
            Constraint::Length(3), // Emotion picker
            Constraint::Min(5),    // Content
            Constraint::Length(1), // Validation error
        ])
        .split(area);

    let heading = if form.is_editing() { "Edit entry" } else { "New entry" };
    let cursor = |field: FormField| if form.focus == field { "▌" } else { "" };

    frame.render_widget(
        Paragraph::new(format!("{}{}", form.title, cursor(FormField::Title)))
            .block(field_block(format!(" {} - Title ", heading), form.focus == FormField::Title)),
        chunks[0],
    );

    let weather = form
        .weather
        .as_deref()
        .map(|w| WeatherCondition::from_value(w).to_string())
        .unwrap_or_else(|| "none ([Ctrl+W] to fetch)".to_string());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(format!("{}{}", form.date, cursor(FormField::Date))),
            Span::styled("    Weather: ", styles::muted_style()),
            Span::raw(weather),
        ]))
        .block(field_block(" Date (YYYY-MM-DD) ".to_string(), form.focus == FormField::Date)),
        chunks[1],
    );

    let mut emotions = Vec::with_capacity(Emotion::ALL.len() * 2);
    for emotion in Emotion::ALL {
        let style = if emotion == form.emotion {
            styles::selected_style().fg(styles::emotion_color(emotion))
        } else {
            styles::muted_style()
        };
        emotions.push(Span::styled(format!(" {} ", emotion), style));
        emotions.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(emotions)).block(field_block(
            " Mood (←/→) ".to_string(),
            form.focus == FormField::Emotion,
        )),
        chunks[2],
    );

    let mut content: Vec<Line> = form
        .content
        .split('\n')
        .map(|l| Line::from(l.to_string()))
        .collect();
    if form.focus == FormField::Content {
        if let Some(last) = content.last_mut() {
            last.push_span(Span::raw("▌"));
        }
    }
    frame.render_widget(
        Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(field_block(" Content ".to_string(), form.focus == FormField::Content)),
        chunks[3],
    );

    if let Some(ref error) = form.error {
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", error), styles::error_style())),
            chunks[4],
        );
    }
}

fn field_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(if focused {
            styles::title_style()
        } else {
            styles::muted_style()
        })
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused))
}
