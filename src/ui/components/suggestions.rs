//! Suggestion picker popup

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Widget},
};

use super::layout::{centered_rect_fixed, create_popup_block, render_footer};
use crate::app::{AnalysisState, PickerKind};

const POPUP_WIDTH: u16 = 64;

pub struct SuggestionPopup<'a> {
    state: &'a AnalysisState,
}

impl<'a> SuggestionPopup<'a> {
    pub fn new(state: &'a AnalysisState) -> Self {
        Self { state }
    }

    /// Name and detail text per suggestion
    fn entries(&self, kind: PickerKind) -> Vec<(String, String)> {
        match kind {
            PickerKind::Columns => self
                .state
                .columns
                .iter()
                .map(|column| {
                    let detail = if column.suggested_values.is_empty() {
                        column.description.clone()
                    } else {
                        format!("{} [{}]", column.description, column.suggested_values.join(", "))
                    };
                    (column.name.clone(), detail)
                })
                .collect(),
            PickerKind::Values => self
                .state
                .values
                .iter()
                .map(|value| (value.value.clone(), value.rationale.clone()))
                .collect(),
        }
    }
}

impl Widget for SuggestionPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(picker) = &self.state.picker else {
            return;
        };

        let entries = self.entries(picker.kind);
        let height = u16::try_from(entries.len()).unwrap_or(u16::MAX).saturating_add(2);
        let popup = centered_rect_fixed(POPUP_WIDTH, height, area);
        Clear.render(popup, buf);

        let title = match picker.kind {
            PickerKind::Columns => " Suggested columns ".to_string(),
            PickerKind::Values => format!(
                " Suggested values for {} ",
                self.state.value_column.as_deref().unwrap_or_default()
            ),
        };
        let block = create_popup_block(&title, Color::Cyan);
        let inner = block.inner(popup);
        block.render(popup, buf);
        render_footer(buf, popup, " space mark - enter add - a add all - esc close ");

        for (i, (name, detail)) in entries.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.bottom() {
                break;
            }

            let selected = i == picker.cursor;
            let base = if selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let mark = if picker.is_marked(i) { "[x] " } else { "[ ] " };

            let line = Line::from(vec![
                Span::styled(mark, base.fg(Color::Yellow)),
                Span::styled(name.as_str(), base.fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", detail), base.fg(Color::Gray)),
            ]);
            if selected {
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), base);
            }
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
