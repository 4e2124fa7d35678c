use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Widest bar, in cells
const BAR_WIDTH: usize = 30;

/// Horizontal bar per emotion, most frequent first
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.stats;
    let max = stats.ranked().first().map(|(_, c)| *c).unwrap_or(0).max(1);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} entries", stats.total),
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    for (emotion, count) in stats.ranked() {
        let filled = count * BAR_WIDTH / max;
        lines.push(Line::from(vec![
            Span::raw(format!(" {:<10}", emotion.to_string())),
            Span::styled(
                "█".repeat(filled),
                Style::default().fg(styles::emotion_color(emotion)),
            ),
            Span::styled(
                "░".repeat(BAR_WIDTH - filled),
                styles::muted_style(),
            ),
            Span::raw(format!(" {:>3} ({:>5.1}%)", count, stats.percent(emotion))),
        ]));
    }

    if stats.untagged > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {} entries with an unrecognised mood", stats.untagged),
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Emotion statistics ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
