use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::fs::listing::Entry;
use crate::view::ViewState;

/// Renders the visible slice of a view with the highlight bar.
pub struct ListingWidget<'a> {
    view: &'a ViewState,
}

impl<'a> ListingWidget<'a> {
    pub fn new(view: &'a ViewState) -> Self {
        Self { view }
    }

    /// Display name: directory-looking names get a trailing slash.
    fn display_name(entry: &Entry) -> String {
        if entry.looks_like_dir() {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        }
    }
}

impl<'a> Widget for ListingWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let text_style = Style::default().fg(Color::LightGreen);
        let highlight_style = Style::default()
            .bg(Color::LightGreen)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD);

        let highlight_row = self.view.highlight_row();
        let visible = self.view.visible().iter().take(area.height as usize);

        for (row, entry) in visible.enumerate() {
            let y = area.y + row as u16;
            if row == highlight_row {
                buf.set_style(Rect::new(area.x, y, area.width, 1), highlight_style);
                let line = Line::from(Span::styled(Self::display_name(entry), highlight_style));
                buf.set_line(area.x, y, &line, area.width);
            } else {
                let line = Line::from(Span::styled(Self::display_name(entry), text_style));
                buf.set_line(area.x, y, &line, area.width);
            }
        }
    }
}
