//! Renderer
//!
//! Main rendering logic for the application.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
    Frame,
};

use super::components::{GridView, HelpBar, HelpScreen, MessageType, PathPopup, StatusLine, SuggestionPopup};
use crate::app::AnalysisState;
use crate::editor::Editor;
use crate::input::{Mode, TextInput};
use crate::store::SaveStatus;

pub struct UiState<'a> {
    pub editor: &'a Editor,
    pub cell_input: &'a TextInput,
    pub message: Option<(&'a str, MessageType)>,
    pub save_status: SaveStatus,
    pub analysis: &'a AnalysisState,
}

pub struct Renderer;

impl Renderer {
    pub fn render(frame: &mut Frame, state: &UiState) {
        let size = frame.area();
        let chunks = create_main_layout(size);

        render_grid(frame, chunks[0], state);
        render_status_line(frame, chunks[1], state);
        frame.render_widget(HelpBar::for_mode(state.editor.mode()), chunks[2]);
        render_overlays(frame, size, state);
    }
}

fn create_main_layout(size: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(size)
}

fn create_grid_block(mode: Mode) -> Block<'static> {
    let color = match mode {
        Mode::Insert => Color::Green,
        _ => Color::Magenta,
    };
    Block::default()
        .title(" Zwicky Box ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn render_grid(frame: &mut Frame, area: Rect, state: &UiState) {
    let editor = state.editor;
    let mut view = GridView::new(editor.grid(), editor.selection(), editor.mode())
        .search(editor.search())
        .results(state.analysis.results())
        .block(create_grid_block(editor.mode()));

    if let Some(paths) = &state.analysis.paths {
        view = view.paths(paths);
    }

    let focus = editor.focus().filter(|_| editor.mode() == Mode::Insert);
    if focus.is_some() {
        view = view.editing(state.cell_input);
    }

    let cursor = focus.and_then(|f| view.layout(area).cursor_position(f.target, state.cell_input));
    frame.render_widget(view, area);

    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &UiState) {
    let editor = state.editor;
    let selection = editor.selection();
    let mode = editor.mode();

    let position = match selection.row {
        -2 => "problem".to_string(),
        -1 => format!("header C{}", selection.col + 1),
        row => format!("R{} C{}", row + 1, selection.col + 1),
    };

    let mut status = StatusLine::new(mode)
        .save_status(state.save_status)
        .position(position);

    if mode == Mode::Search {
        status = status.prompt(editor.query_input().as_str());
    } else if let Some((msg, msg_type)) = state.message {
        status = status.message(msg, msg_type);
    }
    if let Some(pending) = editor.pending() {
        status = status.pending(pending.key);
    }
    if let Some((current, total)) = editor.search().position() {
        status = status.match_position(current, total);
    }

    frame.render_widget(status, area);

    if mode == Mode::Search && !area.is_empty() {
        let x = area.x + StatusLine::prompt_offset(mode) + editor.query_input().cursor() as u16;
        frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
    }
}

fn render_overlays(frame: &mut Frame, area: Rect, state: &UiState) {
    if area.is_empty() {
        return;
    }
    if state.editor.help_open() {
        frame.render_widget(HelpScreen, area);
        return;
    }
    if let Some(paths) = &state.analysis.paths {
        frame.render_widget(PathPopup::new(paths), area);
    } else if state.analysis.picker.is_some() {
        frame.render_widget(SuggestionPopup::new(state.analysis), area);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::grid::Grid;

    fn draw(editor: &Editor, input: &TextInput) -> Terminal<TestBackend> {
        draw_sized(editor, input, 80, 20)
    }

    fn draw_sized(editor: &Editor, input: &TextInput, width: u16, height: u16) -> Terminal<TestBackend> {
        let analysis = AnalysisState::default();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let state = UiState {
                    editor,
                    cell_input: input,
                    message: Some(("hello", MessageType::Info)),
                    save_status: SaveStatus::Idle,
                    analysis: &analysis,
                };
                Renderer::render(frame, &state);
            })
            .unwrap();
        terminal
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_normal_mode() {
        let editor = Editor::new(Grid::new());
        let terminal = draw(&editor, &TextInput::new());
        let text = screen(&terminal);

        assert!(text.contains("Zwicky Box"));
        assert!(text.contains("Parameter 1"));
        assert!(text.contains("NORMAL"));
        assert!(text.contains("hello"));
        assert!(text.contains("problem"));
    }

    #[test]
    fn test_renders_search_prompt_and_help() {
        let now = Instant::now();
        let mut editor = Editor::new(Grid::new());
        for c in "?/param".chars() {
            editor.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
        }

        let text = screen(&draw(&editor, &TextInput::new()));
        assert!(text.contains("/param"));
        assert!(text.contains("[1/2]"));
        assert!(text.contains("Help"));
    }

    #[test]
    fn test_short_terminal_does_not_panic() {
        let now = Instant::now();
        let mut editor = Editor::new(Grid::new());
        for height in [1, 2] {
            draw_sized(&editor, &TextInput::new(), 80, height);
        }

        // Search prompt and help overlay on a single row
        for c in "?/x".chars() {
            editor.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
        }
        for height in [1, 2] {
            draw_sized(&editor, &TextInput::new(), 80, height);
        }
    }
}
