use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Bottom line: a confirmation prompt, a status message, or the query being typed.
pub struct SearchBarWidget<'a> {
    query: &'a str,
    prompt: Option<&'a str>,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> SearchBarWidget<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            prompt: None,
            status_message: None,
            is_error: false,
        }
    }

    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

const HINT: &str = "type to filter  / jump  /n new  /d delete  \u{2190}\u{2192} navigate  esc quit";

impl<'a> Widget for SearchBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let line = if let Some(prompt) = self.prompt {
            Line::from(Span::styled(
                prompt,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
        } else if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default().fg(Color::White).bg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::from(Span::styled(msg, style))
        } else if !self.query.is_empty() {
            Line::from(vec![
                Span::styled(self.query, Style::default().fg(Color::LightGreen)),
                Span::styled(" ", Style::default().bg(Color::LightGreen)),
            ])
        } else {
            Line::from(Span::styled(
                HINT,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ))
        };

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
