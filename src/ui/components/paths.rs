//! Path viewer popup

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use super::grid::verdict_color;
use super::layout::{centered_rect_fixed, create_popup_block, render_footer};
use crate::gateway::annotate::PathView;

pub struct PathPopup<'a> {
    view: &'a PathView,
}

impl<'a> PathPopup<'a> {
    pub fn new(view: &'a PathView) -> Self {
        Self { view }
    }
}

impl Widget for PathPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let path = self.view.current();
        let height = path.combination.len() as u16 + 6;
        let popup = centered_rect_fixed(56, height, area);
        Clear.render(popup, buf);

        let title = format!(" Path {} of {} ", self.view.index() + 1, self.view.len());
        let color = verdict_color(path.verdict);
        let block = create_popup_block(&title, color);
        let inner = block.inner(popup);
        block.render(popup, buf);
        render_footer(buf, popup, " [ prev - ] next - c close ");

        let mut lines = vec![Line::from(Span::styled(
            path.verdict.label().to_uppercase(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        for (column, value) in &path.combination {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", column), Style::default().fg(ratatui::style::Color::Cyan)),
                Span::raw(value.as_str()),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from(path.reasoning.as_str()));

        Paragraph::new(lines).wrap(Wrap { trim: true }).render(inner, buf);
    }
}
