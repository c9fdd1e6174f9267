//! Grid View Component
//!
//! Problem statement, header row and data rows with selection, search and
//! verdict highlighting.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Widget},
};

use super::layout::truncate;
use crate::editor::{SearchState, Selection};
use crate::gateway::annotate::{self, PathView};
use crate::gateway::{Evaluation, Verdict};
use crate::grid::{CellRef, Grid};
use crate::input::{Mode, TextInput};

const GUTTER: u16 = 5;
const PATHS_WIDTH: u16 = 14;
const MIN_COL_WIDTH: u16 = 10;
const MAX_COL_WIDTH: u16 = 28;
const PROBLEM_LABEL: &str = "Problem ";

const HEADER_Y: u16 = 2;
const SEPARATOR_Y: u16 = 3;
const DATA_Y: u16 = 4;

pub fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Yes => Color::Green,
        Verdict::No => Color::Red,
        Verdict::Promising => Color::Cyan,
    }
}

/// Scroll offsets and cell geometry for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    area: Rect,
    col_width: u16,
    first_col: usize,
    visible_cols: usize,
    first_row: usize,
    visible_rows: usize,
}

impl GridLayout {
    pub fn compute(area: Rect, grid: &Grid, selection: Selection, show_paths: bool) -> Self {
        let paths = if show_paths { PATHS_WIDTH } else { 0 };
        let available = area.width.saturating_sub(GUTTER + paths);
        let columns = u16::try_from(grid.column_count().max(1)).unwrap_or(u16::MAX);
        let col_width = (available / columns).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH);

        let visible_cols = ((available / col_width) as usize).clamp(1, grid.column_count().max(1));
        let first_col = (selection.col + 1).saturating_sub(visible_cols);

        let visible_rows = (area.height.saturating_sub(DATA_Y) as usize).max(1);
        let first_row = if selection.row >= 0 {
            (selection.row as usize + 1).saturating_sub(visible_rows)
        } else {
            0
        };

        Self {
            area,
            col_width,
            first_col,
            visible_cols,
            first_row,
            visible_rows,
        }
    }

    fn column_x(&self, col: usize) -> Option<u16> {
        if col < self.first_col || col >= self.first_col + self.visible_cols {
            return None;
        }
        Some(self.area.x + GUTTER + (col - self.first_col) as u16 * self.col_width)
    }

    fn row_y(&self, row: usize) -> Option<u16> {
        if row < self.first_row || row >= self.first_row + self.visible_rows {
            return None;
        }
        let y = self.area.y + DATA_Y + (row - self.first_row) as u16;
        (y < self.area.bottom()).then_some(y)
    }

    fn paths_x(&self) -> u16 {
        self.area.x + GUTTER + self.visible_cols as u16 * self.col_width
    }

    /// Screen rect of a slot, or `None` when it is scrolled out of view
    pub fn cell_rect(&self, target: CellRef) -> Option<Rect> {
        match target {
            CellRef::Problem => {
                let label = PROBLEM_LABEL.len() as u16;
                Some(Rect::new(
                    self.area.x + label,
                    self.area.y,
                    self.area.width.saturating_sub(label),
                    1,
                ))
            }
            CellRef::Header(col) => {
                let y = self.area.y + HEADER_Y;
                if y >= self.area.bottom() {
                    return None;
                }
                self.column_x(col).map(|x| Rect::new(x, y, self.col_width, 1))
            }
            CellRef::Cell { row, col } => {
                let y = self.row_y(row)?;
                self.column_x(col).map(|x| Rect::new(x, y, self.col_width, 1))
            }
        }
    }

    /// Terminal cursor for the focused input
    pub fn cursor_position(&self, target: CellRef, input: &TextInput) -> Option<Position> {
        let rect = self.cell_rect(target)?;
        let text_width = text_width(rect) as usize;
        let scroll = input_scroll(input, text_width);
        Some(Position::new(rect.x + 1 + (input.cursor() - scroll) as u16, rect.y))
    }
}

fn text_width(rect: Rect) -> u16 {
    rect.width.saturating_sub(2).max(1)
}

fn input_scroll(input: &TextInput, width: usize) -> usize {
    input.cursor().saturating_sub(width.saturating_sub(1))
}

/// Grid widget
pub struct GridView<'a> {
    grid: &'a Grid,
    selection: Selection,
    mode: Mode,
    editing: Option<&'a TextInput>,
    search: Option<&'a SearchState>,
    results: &'a [Evaluation],
    paths: Option<&'a PathView>,
    block: Option<Block<'a>>,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a Grid, selection: Selection, mode: Mode) -> Self {
        Self {
            grid,
            selection,
            mode,
            editing: None,
            search: None,
            results: &[],
            paths: None,
            block: None,
        }
    }

    /// Show `input` in place of the selected slot's text
    pub fn editing(mut self, input: &'a TextInput) -> Self {
        self.editing = Some(input);
        self
    }

    pub fn search(mut self, search: &'a SearchState) -> Self {
        self.search = Some(search);
        self
    }

    pub fn results(mut self, results: &'a [Evaluation]) -> Self {
        self.results = results;
        self
    }

    pub fn paths(mut self, paths: &'a PathView) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn layout(&self, area: Rect) -> GridLayout {
        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));
        GridLayout::compute(inner, self.grid, self.selection, !self.results.is_empty())
    }

    fn selected_style(&self) -> Style {
        let bg = match self.mode {
            Mode::Normal => Color::Blue,
            Mode::Insert => Color::Green,
            Mode::Search => Color::Magenta,
        };
        Style::default().fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD)
    }

    fn slot_style(&self, selection: Selection, base: Style) -> Style {
        let mut style = base;
        if self.search.is_some_and(|s| s.is_match(selection)) {
            style = style.fg(Color::Black).bg(Color::Yellow);
        }
        if self.selection == selection {
            style = self.selected_style();
        }
        style
    }

    fn cell_style(&self, row: usize, col: usize) -> Style {
        let mut base = Style::default().fg(Color::White);

        if let Some(evaluation) = annotate::cell_verdict(self.grid, self.results, row, col) {
            base = base.fg(verdict_color(evaluation.verdict));
        }
        if let Some(view) = self.paths {
            if view.highlights(self.grid, row, col) {
                base = base
                    .fg(Color::Black)
                    .bg(verdict_color(view.current().verdict))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
        }

        self.slot_style(Selection::new(row as isize, col), base)
    }

    fn render_text(&self, rect: Rect, target: CellRef, text: &str, style: Style, buf: &mut Buffer) {
        buf.set_style(rect, style);
        let width = text_width(rect) as usize;

        let shown = match self.editing {
            Some(input) if self.selection.target() == target => {
                let scroll = input_scroll(input, width);
                input.as_str().chars().skip(scroll).take(width).collect()
            }
            _ => truncate(text, width),
        };
        buf.set_string(rect.x + 1, rect.y, shown, style);
    }

    fn render_problem(&self, layout: &GridLayout, buf: &mut Buffer) {
        let area = layout.area;
        buf.set_string(
            area.x,
            area.y,
            PROBLEM_LABEL,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        );

        let Some(rect) = layout.cell_rect(CellRef::Problem) else {
            return;
        };
        let style = self.slot_style(Selection::new(-2, 0), Style::default().fg(Color::White));
        let problem = self.grid.problem();
        if problem.is_empty() && self.editing.is_none() {
            buf.set_style(rect, style);
            let hint_style = style.fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
            buf.set_string(rect.x + 1, rect.y, "What are you trying to solve?", hint_style);
        } else {
            self.render_text(rect, CellRef::Problem, problem, style, buf);
        }
    }

    fn render_header(&self, layout: &GridLayout, buf: &mut Buffer) {
        for (col, name) in self.grid.columns().iter().enumerate() {
            let Some(rect) = layout.cell_rect(CellRef::Header(col)) else {
                continue;
            };
            let base = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            let style = self.slot_style(Selection::new(-1, col), base);
            self.render_text(rect, CellRef::Header(col), name, style, buf);
        }

        let area = layout.area;
        let y = area.y + HEADER_Y;
        let marker = Style::default().fg(Color::DarkGray);
        if layout.first_col > 0 && y < area.bottom() {
            buf.set_string(area.x + GUTTER - 2, y, "‹", marker);
        }
        if layout.first_col + layout.visible_cols < self.grid.column_count() && y < area.bottom() {
            buf.set_string(layout.paths_x(), y, "›", marker);
        }

        let y = area.y + SEPARATOR_Y;
        if y < area.bottom() {
            let width = layout.paths_x().saturating_sub(area.x) as usize;
            buf.set_string(area.x, y, "─".repeat(width), marker);
        }
    }

    fn render_rows(&self, layout: &GridLayout, buf: &mut Buffer) {
        let show_paths = !self.results.is_empty();

        for (row, cells) in self.grid.rows().iter().enumerate() {
            let Some(y) = layout.row_y(row) else {
                continue;
            };

            let number = format!("{:>3} ", row + 1);
            buf.set_string(layout.area.x, y, number, Style::default().fg(Color::DarkGray));

            for (col, value) in cells.iter().enumerate() {
                if let Some(rect) = layout.cell_rect(CellRef::Cell { row, col }) {
                    let style = self.cell_style(row, col);
                    self.render_text(rect, CellRef::Cell { row, col }, value, style, buf);
                }
            }

            if show_paths {
                self.render_row_summary(layout.paths_x() + 1, y, row, buf);
            }
        }
    }

    fn render_row_summary(&self, x: u16, y: u16, row: usize, buf: &mut Buffer) {
        let summary = annotate::row_summary(self.grid, self.results, row);
        if summary.total() == 0 {
            return;
        }

        let mut x = x;
        for (symbol, verdict) in [("✓", Verdict::Yes), ("★", Verdict::Promising), ("✗", Verdict::No)] {
            let text = format!("{}{} ", symbol, summary.get(verdict));
            buf.set_string(x, y, &text, Style::default().fg(verdict_color(verdict)));
            x += text.chars().count() as u16;
        }
    }
}

impl Widget for GridView<'_> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout(area);
        if let Some(block) = self.block.take() {
            block.render(area, buf);
        }
        if layout.area.is_empty() {
            return;
        }

        self.render_problem(&layout, buf);
        self.render_header(&layout, buf);
        self.render_rows(&layout, buf);
    }
}
