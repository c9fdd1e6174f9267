//! Help overlay

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Clear, Widget},
};

use super::layout::{centered_rect, create_popup_block, render_footer};

const TWO_COLUMN_MIN_WIDTH: u16 = 70;
const KEY_INDENT: u16 = 2;
const DESC_OFFSET: u16 = 12;

type Section = (&'static str, Vec<(&'static str, &'static str)>);

pub struct HelpScreen;

impl Widget for HelpScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(70, 75, area);
        Clear.render(popup, buf);

        let block = create_popup_block(" Help ", Color::Magenta);
        let inner = block.inner(popup);
        block.render(popup, buf);
        render_footer(buf, popup, " Esc close ");

        let sections = help_sections();
        if inner.width >= TWO_COLUMN_MIN_WIDTH {
            let (left, right) = split_sections_for_columns(&sections);
            let gap = 4u16;
            let col_width = inner.width.saturating_sub(gap) / 2;
            render_lines(&build_help_lines(&left), inner.x, inner, col_width, buf);
            render_lines(&build_help_lines(&right), inner.x + col_width + gap, inner, col_width, buf);
        } else {
            render_lines(&build_help_lines(&sections), inner.x, inner, inner.width, buf);
        }
    }
}

enum HelpLine<'a> {
    Header(&'a str),
    Binding(&'a str, &'a str),
    Empty,
}

fn build_help_lines<'a>(sections: &'a [Section]) -> Vec<HelpLine<'a>> {
    let mut lines = Vec::new();
    for (i, (header, bindings)) in sections.iter().enumerate() {
        lines.push(HelpLine::Header(header));
        for (key, desc) in bindings {
            lines.push(HelpLine::Binding(key, desc));
        }
        if i < sections.len() - 1 {
            lines.push(HelpLine::Empty);
        }
    }
    lines
}

fn render_lines(lines: &[HelpLine], x: u16, inner: Rect, width: u16, buf: &mut Buffer) {
    for (i, line) in lines.iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.bottom() {
            break;
        }
        render_help_line(x, y, width, line, buf);
    }
}

fn render_help_line(x: u16, y: u16, width: u16, line: &HelpLine, buf: &mut Buffer) {
    match line {
        HelpLine::Header(title) => {
            let style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
            buf.set_stringn(x, y, *title, width as usize, style);
        }
        HelpLine::Binding(key, desc) => {
            buf.set_stringn(x + KEY_INDENT, y, *key, width.saturating_sub(KEY_INDENT) as usize, Style::default().fg(Color::Cyan));
            let desc_width = width.saturating_sub(DESC_OFFSET) as usize;
            buf.set_stringn(x + DESC_OFFSET, y, *desc, desc_width, Style::default().fg(Color::Gray));
        }
        HelpLine::Empty => {}
    }
}

fn split_sections_for_columns(sections: &[Section]) -> (Vec<Section>, Vec<Section>) {
    let total_lines: usize = sections.iter().map(|(_, b)| 1 + b.len() + 1).sum();
    let target = total_lines / 2;

    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut current = 0;

    for section in sections {
        if current < target {
            left.push(section.clone());
        } else {
            right.push(section.clone());
        }
        current += 1 + section.1.len() + 1;
    }

    (left, right)
}

fn help_sections() -> Vec<Section> {
    vec![
        ("Navigation", vec![
            ("h / ←", "Column left"),
            ("l / →", "Column right"),
            ("j / ↓", "Row down"),
            ("k / ↑", "Row up"),
            ("0 / $", "First / last column"),
            ("gg", "Problem statement"),
            ("G", "Last row"),
        ]),
        ("Editing", vec![
            ("i", "Edit, caret at start"),
            ("a", "Edit, caret at end"),
            ("Esc", "Finish editing"),
            ("x", "Clear cell"),
            ("u", "Undo"),
            ("Ctrl-r", "Redo"),
        ]),
        ("Structure", vec![
            ("o", "New row below"),
            ("O", "New row above"),
            ("A", "New column after"),
            ("dd", "Delete row"),
            ("dc", "Delete column"),
        ]),
        ("Search", vec![
            ("/", "Search"),
            ("n / N", "Next / previous match"),
            ("Esc", "Clear search"),
        ]),
        ("Analysis", vec![
            ("E", "Evaluate combinations"),
            ("Enter", "Paths of the row"),
            ("] / [", "Next / previous path"),
            ("Tab", "Next verdict"),
            ("S", "Suggest columns"),
            ("V", "Suggest values"),
            ("Space", "Mark suggestion"),
            ("Enter / a", "Add marked / all"),
            ("Esc / c", "Close popup"),
        ]),
        ("Other", vec![
            ("?", "Show this help"),
            ("Ctrl-l", "Clear message"),
            ("q", "Save and quit"),
        ]),
    ]
}
