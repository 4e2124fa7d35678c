use moodiary_core::models::Diary;
use moodiary_core::utils::{format_date, preview, truncate_string};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Home: greeting, quick numbers, and the most recent entries
pub fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(area);

    let name = app
        .session
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Hello, ", styles::list_item_style()),
            Span::styled(name, styles::title_style()),
        ]),
        Line::from(Span::styled(
            format!("{} entries written", app.stats.total),
            styles::muted_style(),
        )),
    ];
    match app.stats.dominant() {
        Some(emotion) => lines.push(Line::from(vec![
            Span::styled("Most frequent mood: ", styles::muted_style()),
            Span::styled(emotion.to_string(), styles::highlight_style()),
        ])),
        None => lines.push(Line::from(Span::styled(
            "Press [n] to write your first entry",
            styles::highlight_style(),
        ))),
    }

    let summary = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::muted_style()),
    );
    frame.render_widget(summary, chunks[0]);

    render_table(frame, app, app.recent_diaries(), " Recent entries ", chunks[1]);
}

/// Diary list for the active filter
pub fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ({}) ", app.filter.describe(), app.diaries.len());
    render_table(frame, app, &app.diaries, &title, area);
}

fn render_table(frame: &mut Frame, app: &App, diaries: &[Diary], title: &str, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from(""),
        Cell::from("Title"),
        Cell::from("Preview"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = diaries
        .iter()
        .enumerate()
        .map(|(i, diary)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(diary.diary_date.clone()),
                Cell::from(diary.emotion_emoji()),
                Cell::from(truncate_string(&diary.title, 30)),
                Cell::from(Span::styled(preview(&diary.content, 60), styles::muted_style())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Length(3),
        Constraint::Percentage(35),
        Constraint::Fill(1),
    ];

    let block = Block::default()
        .title(title.to_string())
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled("  No entries", styles::muted_style())).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

/// A single entry
pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref diary) = app.current else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::muted_style());
        frame.render_widget(
            Paragraph::new(Span::styled("  Entry not available", styles::muted_style())).block(block),
            area,
        );
        return;
    };

    let placeholder = "-";
    let emotion = diary
        .emotion_kind()
        .map(|e| e.to_string())
        .unwrap_or_else(|| diary.emotion.clone());
    let weather = diary
        .weather_kind()
        .map(|w| format!("{} ({})", w, w.label()))
        .unwrap_or_else(|| placeholder.to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Date:    ", styles::muted_style()),
            Span::raw(format_date(&diary.diary_date)),
        ]),
        Line::from(vec![
            Span::styled("Mood:    ", styles::muted_style()),
            Span::styled(emotion, styles::highlight_style()),
        ]),
        Line::from(vec![
            Span::styled("Weather: ", styles::muted_style()),
            Span::raw(weather),
        ]),
        Line::from(vec![
            Span::styled("Updated: ", styles::muted_style()),
            Span::raw(format_date(&diary.updated_at)),
        ]),
        Line::from(""),
    ];
    lines.extend(diary.content.lines().map(|l| Line::from(l.to_string())));

    let block = Block::default()
        .title(format!(" {} ", diary.title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
