use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::components::listing::ListingWidget;
use crate::components::search_bar::SearchBarWidget;

/// Render the application UI.
///
/// Rows: current path, listing viewport, separator rule, search line.
pub fn render(app: &App, frame: &mut Frame) {
    let top_offset = app.base.viewport().top_offset as u16;
    let [header, listing, separator, search] = Layout::vertical([
        Constraint::Length(top_offset),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let path_style = Style::default()
        .bg(Color::LightMagenta)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    let path = Paragraph::new(Line::from(Span::styled(
        app.base.path().display().to_string(),
        path_style,
    )));
    frame.render_widget(path, header);

    frame.render_widget(ListingWidget::new(app.active_view()), listing);

    let rule = "\u{2500}".repeat(separator.width as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(rule, Style::default().fg(Color::LightGreen))),
        separator,
    );

    let prompt = app.prompt();
    let mut bar = SearchBarWidget::new(&app.query);
    if let Some(prompt) = prompt.as_deref() {
        bar = bar.prompt(prompt);
    }
    if let Some((msg, is_error, _)) = &app.status_message {
        bar = bar.status_message(msg, *is_error);
    }
    frame.render_widget(bar, search);
}
