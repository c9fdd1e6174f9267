//! Modal Command Interpreter
//!
//! Owns the selection, the current mode, the pending two-key prefix, search
//! state and undo/redo history. Every keystroke enters through
//! [`Editor::handle_key`]; the presentation layer reads state back and acts
//! on the returned [`Effect`]s.

pub mod history;
pub mod search;

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::grid::{CellRef, Grid, Snapshot, HEADER_ROW, PROBLEM_ROW};
use crate::input::keymap::{self, Command, TextAction};
use crate::input::{Caret, Mode, TextInput};

pub use history::History;
pub use search::SearchState;

/// Window for the second key of `gg`, `dd` and `dc`
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_secs(1);

/// Selected slot. `row` is -2 for the problem, -1 for the header row,
/// otherwise a data row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub row: isize,
    pub col: usize,
}

impl Selection {
    pub const fn new(row: isize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_problem(&self) -> bool {
        self.row == PROBLEM_ROW
    }

    /// Grid slot behind this selection
    pub fn target(&self) -> CellRef {
        match self.row {
            PROBLEM_ROW => CellRef::Problem,
            HEADER_ROW => CellRef::Header(self.col),
            row => CellRef::Cell {
                row: row.max(0) as usize,
                col: self.col,
            },
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(PROBLEM_ROW, 0)
    }
}

/// First key of a two-key sequence and its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPrefix {
    pub key: char,
    pub expires_at: Instant,
}

/// Ask the presentation layer to put the caret into an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub target: CellRef,
    pub caret: Caret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Focus(FocusRequest),
    Blur,
}

/// Result of one keystroke
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The key belongs to the interpreter; nothing else may act on it
    pub consumed: bool,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn consumed() -> Self {
        Self {
            consumed: true,
            effects: Vec::new(),
        }
    }

    fn ignored() -> Self {
        Self::default()
    }
}

pub struct Editor {
    grid: Grid,
    selection: Selection,
    mode: Mode,
    history: History,
    search: SearchState,
    query: TextInput,
    pending: Option<PendingPrefix>,
    help_open: bool,
    focus: Option<FocusRequest>,
    insert_origin: Option<Snapshot>,
    sequence_timeout: Duration,
    revision: u64,
}

impl Editor {
    pub fn new(mut grid: Grid) -> Self {
        grid.normalize();
        Self {
            grid,
            selection: Selection::default(),
            mode: Mode::Normal,
            history: History::default(),
            search: SearchState::new(),
            query: TextInput::new(),
            pending: None,
            help_open: false,
            focus: None,
            insert_origin: None,
            sequence_timeout: DEFAULT_SEQUENCE_TIMEOUT,
            revision: 0,
        }
    }

    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.history = History::new(limit);
        self
    }

    pub fn with_sequence_timeout(mut self, timeout: Duration) -> Self {
        self.sequence_timeout = timeout;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Search prompt contents while in search mode
    pub fn query_input(&self) -> &TextInput {
        &self.query
    }

    pub fn pending(&self) -> Option<PendingPrefix> {
        self.pending
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn focus(&self) -> Option<FocusRequest> {
        self.focus
    }

    /// Bumped on every change to grid contents
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move the selection, clamped to the grid
    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
        self.clamp_selection();
    }

    /// Drop an expired two-key prefix. Returns true if one was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(p) if now >= p.expires_at => {
                tracing::debug!(prefix = %p.key, "key sequence expired");
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Single entry point for keystrokes
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Outcome {
        if key.kind != KeyEventKind::Press {
            return Outcome::ignored();
        }

        self.tick(now);

        if self.help_open && key.code == KeyCode::Esc {
            self.help_open = false;
            return Outcome::consumed();
        }

        match self.mode {
            Mode::Normal => self.handle_normal(key, now),
            Mode::Insert => self.handle_insert(key),
            Mode::Search => self.handle_search(key),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent, now: Instant) -> Outcome {
        let pending = self.pending.take().map(|p| p.key);
        let (command, next) = keymap::normal_mode_command(key, pending);
        self.pending = next.map(|key| PendingPrefix {
            key,
            expires_at: now + self.sequence_timeout,
        });

        let consumed = command != Command::None
            || next.is_some()
            || keymap::is_reserved(key)
            || key.code == KeyCode::Esc;

        Outcome {
            consumed,
            effects: self.execute(command),
        }
    }

    fn handle_insert(&mut self, key: KeyEvent) -> Outcome {
        if key.code != KeyCode::Esc {
            return Outcome::ignored();
        }
        self.leave_insert();
        Outcome {
            consumed: true,
            effects: vec![Effect::Blur],
        }
    }

    fn handle_search(&mut self, key: KeyEvent) -> Outcome {
        let edited = match keymap::text_input_action(key) {
            TextAction::Cancel => {
                self.mode = Mode::Normal;
                self.search.clear();
                self.query.clear();
                false
            }
            TextAction::Submit => {
                self.mode = Mode::Normal;
                false
            }
            TextAction::InsertChar(c) => {
                self.query.insert_char(c);
                true
            }
            TextAction::DeleteChar => self.query.delete_char(),
            TextAction::DeleteCharForward => self.query.delete_char_forward(),
            TextAction::ClearLine => {
                self.query.clear();
                true
            }
            TextAction::CursorLeft => {
                self.query.cursor_left();
                false
            }
            TextAction::CursorRight => {
                self.query.cursor_right();
                false
            }
            TextAction::CursorHome => {
                self.query.cursor_home();
                false
            }
            TextAction::CursorEnd => {
                self.query.cursor_end();
                false
            }
            TextAction::None => false,
        };

        if edited {
            self.run_search();
        }
        Outcome::consumed()
    }

    fn run_search(&mut self) {
        if let Some(first) = self.search.update(self.query.as_str(), &self.grid) {
            self.selection = first;
        }
    }

    /// Run a normal-mode command
    pub fn execute(&mut self, command: Command) -> Vec<Effect> {
        if command != Command::None {
            tracing::debug!(?command, row = self.selection.row, col = self.selection.col, "command");
        }

        let last_row = self.grid.row_count() as isize - 1;
        let last_col = self.grid.column_count() - 1;
        let sel = self.selection;

        match command {
            Command::MoveLeft => {
                self.selection.col = if sel.is_problem() { 0 } else { sel.col.saturating_sub(1) };
            }
            Command::MoveRight => {
                self.selection.col = if sel.is_problem() { 0 } else { (sel.col + 1).min(last_col) };
            }
            Command::MoveDown => self.selection.row = (sel.row + 1).min(last_row),
            Command::MoveUp => self.selection.row = (sel.row - 1).max(PROBLEM_ROW),
            Command::FirstColumn => self.selection.col = 0,
            Command::LastColumn => {
                self.selection.col = if sel.is_problem() { 0 } else { last_col };
            }
            Command::FirstRow => self.selection.row = PROBLEM_ROW,
            Command::LastRow => self.selection.row = last_row,

            Command::Insert => return self.enter_insert(Caret::Start),
            Command::Append => return self.enter_insert(Caret::End),
            Command::StartSearch => {
                self.mode = Mode::Search;
                self.search.clear();
                self.query.clear();
            }
            Command::ShowHelp => self.help_open = true,

            Command::NextMatch => {
                if let Some(found) = self.search.next() {
                    self.select(found);
                }
            }
            Command::PrevMatch => {
                if let Some(found) = self.search.prev() {
                    self.select(found);
                }
            }

            Command::OpenRowBelow => {
                let at = (sel.row + 1).max(0) as usize;
                if self.apply(|grid| grid.insert_row(at)) {
                    self.selection.row = at as isize;
                }
            }
            Command::OpenRowAbove => {
                if sel.row >= 0 {
                    self.apply(|grid| grid.insert_row(sel.row as usize));
                }
            }
            Command::DeleteRow => {
                if sel.row >= 0 {
                    self.apply(|grid| grid.delete_row(sel.row as usize));
                }
            }
            Command::DeleteColumn => {
                self.apply(|grid| grid.delete_column(sel.col));
            }
            Command::AddColumn => {
                let at = sel.col + 1;
                let name = self.grid.next_column_name();
                if self.apply(|grid| grid.insert_column(at, name)) {
                    self.selection.col = at;
                }
            }

            Command::ClearCell => {
                let target = sel.target();
                self.apply(|grid| grid.clear(target));
            }
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),

            Command::None => {}
        }

        Vec::new()
    }

    /// Apply a grid mutation as one undoable step.
    ///
    /// `f` returns false when its precondition fails; nothing is recorded
    /// then. Used by commands and by suggestion merging.
    pub fn apply(&mut self, f: impl FnOnce(&mut Grid) -> bool) -> bool {
        let before = self.grid.snapshot();
        if !f(&mut self.grid) {
            return false;
        }
        self.history.record(before);
        self.revision += 1;
        self.clamp_selection();
        true
    }

    pub fn undo(&mut self) {
        let Some(previous) = self.history.undo(self.grid.snapshot()) else {
            return;
        };
        self.grid.restore(previous);
        self.revision += 1;
        self.clamp_selection();
    }

    pub fn redo(&mut self) {
        let Some(next) = self.history.redo(self.grid.snapshot()) else {
            return;
        };
        self.grid.restore(next);
        self.revision += 1;
        self.clamp_selection();
    }

    fn enter_insert(&mut self, caret: Caret) -> Vec<Effect> {
        let request = FocusRequest {
            target: self.selection.target(),
            caret,
        };
        self.mode = Mode::Insert;
        self.insert_origin = Some(self.grid.snapshot());
        self.focus = Some(request);
        vec![Effect::Focus(request)]
    }

    /// Every insert session ends in one undo point holding the grid as it
    /// was when the session started.
    fn leave_insert(&mut self) {
        let origin = self
            .insert_origin
            .take()
            .unwrap_or_else(|| self.grid.snapshot());
        self.history.record(origin);
        self.mode = Mode::Normal;
        self.focus = None;
    }

    /// Write the focused input's text through to the grid.
    ///
    /// Only valid in insert mode; the edit is not an undo point by itself.
    pub fn edit_focused(&mut self, value: &str) -> bool {
        if self.mode != Mode::Insert {
            return false;
        }
        let Some(focus) = self.focus else {
            return false;
        };
        if self.grid.text(focus.target) == Some(value) {
            return false;
        }
        if !self.grid.set_text(focus.target, value) {
            return false;
        }
        self.revision += 1;
        true
    }

    fn clamp_selection(&mut self) {
        let last_row = self.grid.row_count() as isize - 1;
        let last_col = self.grid.column_count() - 1;
        self.selection.row = self.selection.row.clamp(PROBLEM_ROW, last_row);
        self.selection.col = self.selection.col.min(last_col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn press(editor: &mut Editor, keys: &str, at: Instant) {
        for c in keys.chars() {
            editor.handle_key(key(KeyCode::Char(c)), at);
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn grid(columns: &[&str], rows: &[&[&str]]) -> Grid {
        Grid::from_parts("", strings(columns), rows.iter().map(|r| strings(r)).collect())
    }

    fn three_rows() -> Grid {
        grid(&["A", "B"], &[&["a0", "b0"], &["a1", "b1"], &["a2", "b2"]])
    }

    #[test]
    fn test_initial_state() {
        let editor = Editor::new(Grid::new());
        assert_eq!(editor.mode(), Mode::Normal);
        assert_eq!(editor.selection(), Selection::new(-2, 0));
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_hjkl_clamping() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());

        press(&mut editor, "kkk", now);
        assert_eq!(editor.selection().row, -2);

        press(&mut editor, "l", now);
        assert_eq!(editor.selection().col, 0);

        press(&mut editor, "jjjjjjj", now);
        assert_eq!(editor.selection().row, 2);

        press(&mut editor, "llll", now);
        assert_eq!(editor.selection().col, 1);
        press(&mut editor, "hhh", now);
        assert_eq!(editor.selection().col, 0);
    }

    #[test]
    fn test_dollar_and_zero() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());

        press(&mut editor, "$", now);
        assert_eq!(editor.selection().col, 0);

        press(&mut editor, "j$", now);
        assert_eq!(editor.selection(), Selection::new(-1, 1));
        press(&mut editor, "0", now);
        assert_eq!(editor.selection().col, 0);
    }

    #[test]
    fn test_gg_and_g_navigation() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(2, 1));

        press(&mut editor, "g", now);
        press(&mut editor, "g", now + Duration::from_millis(300));
        assert_eq!(editor.selection().row, -2);

        press(&mut editor, "G", now + Duration::from_millis(400));
        assert_eq!(editor.selection().row, 2);
    }

    #[test]
    fn test_gg_after_window_does_nothing() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(2, 0));

        press(&mut editor, "g", now);
        press(&mut editor, "g", now + Duration::from_millis(1500));
        assert_eq!(editor.selection().row, 2);
        assert!(editor.pending().is_some());
    }

    #[test]
    fn test_tick_expires_pending() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        press(&mut editor, "d", now);
        assert!(!editor.tick(now + Duration::from_millis(999)));
        assert!(editor.tick(now + Duration::from_secs(1)));
        assert_eq!(editor.pending(), None);
    }

    #[test]
    fn test_compound_delete_row() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(1, 0));

        press(&mut editor, "dd", now);

        assert_eq!(editor.grid().row_count(), 2);
        assert_eq!(editor.grid().cell(1, 0), Some("a2"));
        assert_eq!(editor.selection().row, 1);
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_delete_last_row_clamps_selection() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(2, 0));

        press(&mut editor, "dd", now);
        assert_eq!(editor.selection().row, 1);
    }

    #[test]
    fn test_delete_row_refused_on_virtual_row_and_floor() {
        let now = Instant::now();
        let mut editor = Editor::new(grid(&["A"], &[&["x"]]));
        editor.select(Selection::new(0, 0));
        press(&mut editor, "dd", now);
        assert_eq!(editor.grid().row_count(), 1);

        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(-1, 0));
        press(&mut editor, "dd", now);
        assert_eq!(editor.grid().row_count(), 3);
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_delete_column_guard() {
        let now = Instant::now();
        let original = grid(&["Only"], &[&["x"], &["y"]]);
        let mut editor = Editor::new(original.clone());
        editor.select(Selection::new(0, 0));

        press(&mut editor, "dc", now);

        assert_eq!(editor.grid(), &original);
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_delete_column_clamps_selection() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(0, 1));

        press(&mut editor, "dc", now);
        assert_eq!(editor.grid().columns(), &strings(&["A"])[..]);
        assert!(editor.grid().is_shape_valid());
        assert_eq!(editor.selection().col, 0);
    }

    #[test]
    fn test_pending_prefix_aborted_by_other_key() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(0, 0));

        press(&mut editor, "dj", now);
        assert_eq!(editor.grid().row_count(), 3);
        assert_eq!(editor.selection().row, 1);
        assert_eq!(editor.pending(), None);

        // `d` then `g` starts a new `g` prefix instead of leaking `d`
        press(&mut editor, "dg", now);
        assert_eq!(editor.pending().map(|p| p.key), Some('g'));
        press(&mut editor, "d", now);
        assert_eq!(editor.grid().row_count(), 3);
    }

    #[test]
    fn test_column_insert_after_selection() {
        let now = Instant::now();
        let mut editor = Editor::new(grid(&["A", "B"], &[&["a", "b"], &["c", "d"]]));
        editor.select(Selection::new(0, 0));

        press(&mut editor, "A", now);

        assert_eq!(editor.grid().columns(), &strings(&["A", "Parameter 3", "B"])[..]);
        assert_eq!(editor.grid().rows()[0], strings(&["a", "", "b"]));
        assert_eq!(editor.grid().rows()[1], strings(&["c", "", "d"]));
        assert_eq!(editor.selection().col, 1);
    }

    #[test]
    fn test_open_row_below_and_above() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(0, 0));

        press(&mut editor, "o", now);
        assert_eq!(editor.grid().row_count(), 4);
        assert_eq!(editor.grid().cell(1, 0), Some(""));
        assert_eq!(editor.selection().row, 1);

        editor.select(Selection::new(2, 0));
        press(&mut editor, "O", now);
        assert_eq!(editor.grid().row_count(), 5);
        assert_eq!(editor.grid().cell(2, 0), Some(""));
        assert_eq!(editor.grid().cell(3, 0), Some("a1"));
        assert_eq!(editor.selection().row, 2);
    }

    #[test]
    fn test_open_row_from_virtual_rows() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());

        press(&mut editor, "O", now);
        assert_eq!(editor.grid().row_count(), 3);

        press(&mut editor, "o", now);
        assert_eq!(editor.grid().row_count(), 4);
        assert_eq!(editor.grid().cell(0, 0), Some(""));
        assert_eq!(editor.selection().row, 0);
    }

    #[test]
    fn test_clear_targets() {
        let now = Instant::now();
        let mut base = three_rows();
        base.set_text(CellRef::Problem, "problem");
        let mut editor = Editor::new(base);

        press(&mut editor, "x", now);
        assert_eq!(editor.grid().problem(), "");

        press(&mut editor, "jlx", now);
        assert_eq!(editor.grid().columns()[1], "");

        press(&mut editor, "jx", now);
        assert_eq!(editor.grid().cell(0, 1), Some(""));
        assert_eq!(editor.history().undo_len(), 3);
    }

    #[test]
    fn test_undo_redo_duality() {
        let now = Instant::now();
        let scripts = ["o", "O", "A", "x", "dd", "dc"];

        for script in scripts {
            let mut editor = Editor::new(three_rows());
            editor.select(Selection::new(1, 1));
            let before = editor.grid().snapshot();

            press(&mut editor, script, now);
            let after = editor.grid().snapshot();
            assert_ne!(before, after, "{script} should change the grid");

            press(&mut editor, "u", now);
            assert_eq!(editor.grid().snapshot(), before, "undo of {script}");

            editor.handle_key(key_ctrl('r'), now);
            assert_eq!(editor.grid().snapshot(), after, "redo of {script}");

            press(&mut editor, "u", now);
            assert_eq!(editor.grid().snapshot(), before, "undo of redo of {script}");
        }
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        let before = editor.grid().clone();
        press(&mut editor, "u", now);
        editor.handle_key(key_ctrl('r'), now);
        assert_eq!(editor.grid(), &before);
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn test_undo_stack_bound() {
        let now = Instant::now();
        let mut editor = Editor::new(Grid::new());
        editor.select(Selection::new(0, 0));

        for _ in 0..60 {
            press(&mut editor, "o", now);
        }

        assert_eq!(editor.grid().row_count(), 62);
        assert_eq!(editor.history().undo_len(), 50);
        // Pre-state of the 11th mutation
        assert_eq!(editor.history().oldest().map(|s| s.rows().len()), Some(12));
    }

    #[test]
    fn test_new_command_after_undo_clears_redo() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(0, 0));

        press(&mut editor, "oo", now);
        press(&mut editor, "u", now);
        assert!(editor.history().can_redo());

        press(&mut editor, "A", now);
        assert!(!editor.history().can_redo());
    }

    #[test]
    fn test_undo_clamps_selection_but_does_not_restore_it() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(2, 0));

        press(&mut editor, "o", now);
        assert_eq!(editor.selection().row, 3);

        press(&mut editor, "u", now);
        assert_eq!(editor.grid().row_count(), 3);
        assert_eq!(editor.selection().row, 2);
    }

    #[test]
    fn test_insert_mode_focus_and_commit() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(0, 1));

        let outcome = editor.handle_key(key(KeyCode::Char('a')), now);
        assert_eq!(editor.mode(), Mode::Insert);
        assert_eq!(
            outcome.effects,
            vec![Effect::Focus(FocusRequest {
                target: CellRef::Cell { row: 0, col: 1 },
                caret: Caret::End,
            })]
        );

        // Typed text is not interpreted as commands
        let typed = editor.handle_key(key(KeyCode::Char('d')), now);
        assert!(!typed.consumed);
        assert_eq!(editor.pending(), None);

        assert!(editor.edit_focused("b0 edited"));
        assert!(!editor.history().can_undo());

        let outcome = editor.handle_key(key(KeyCode::Esc), now);
        assert_eq!(outcome.effects, vec![Effect::Blur]);
        assert_eq!(editor.mode(), Mode::Normal);
        assert_eq!(editor.history().undo_len(), 1);

        press(&mut editor, "u", now);
        assert_eq!(editor.grid().cell(0, 1), Some("b0"));
    }

    #[test]
    fn test_every_insert_exit_is_an_undo_point() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());

        let outcome = editor.handle_key(key(KeyCode::Char('i')), now);
        assert_eq!(
            outcome.effects,
            vec![Effect::Focus(FocusRequest {
                target: CellRef::Problem,
                caret: Caret::Start,
            })]
        );
        editor.handle_key(key(KeyCode::Esc), now);
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_edit_focused_requires_insert_mode() {
        let mut editor = Editor::new(three_rows());
        assert!(!editor.edit_focused("nope"));
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn test_search_mode() {
        let now = Instant::now();
        let base = Grid::from_parts(
            "find me",
            strings(&["A", "B"]),
            vec![strings(&["x", "find"]), strings(&["y", "z"])],
        );
        let mut editor = Editor::new(base);
        editor.select(Selection::new(1, 0));

        press(&mut editor, "/", now);
        assert_eq!(editor.mode(), Mode::Search);

        // Command keys are query text here
        press(&mut editor, "find", now);
        assert_eq!(editor.grid().row_count(), 2);
        assert_eq!(editor.search().matches(), &[Selection::new(-2, 0), Selection::new(0, 1)]);
        assert_eq!(editor.selection(), Selection::new(-2, 0));

        editor.handle_key(key(KeyCode::Enter), now);
        assert_eq!(editor.mode(), Mode::Normal);

        press(&mut editor, "n", now);
        assert_eq!(editor.selection(), Selection::new(0, 1));
        press(&mut editor, "n", now);
        assert_eq!(editor.selection(), Selection::new(-2, 0));
        press(&mut editor, "N", now);
        assert_eq!(editor.selection(), Selection::new(0, 1));
    }

    #[test]
    fn test_search_escape_clears() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(2, 1));

        press(&mut editor, "/a1", now);
        assert_eq!(editor.selection(), Selection::new(1, 0));

        editor.handle_key(key(KeyCode::Esc), now);
        assert_eq!(editor.mode(), Mode::Normal);
        assert!(editor.search().matches().is_empty());
        assert_eq!(editor.search().query(), "");

        press(&mut editor, "n", now);
        assert_eq!(editor.selection(), Selection::new(1, 0));
    }

    #[test]
    fn test_search_backspace_to_empty_keeps_selection() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        press(&mut editor, "/b2", now);
        assert_eq!(editor.selection(), Selection::new(2, 1));

        // "b" now matches the header first
        editor.handle_key(key(KeyCode::Backspace), now);
        assert_eq!(editor.selection(), Selection::new(-1, 1));

        editor.handle_key(key(KeyCode::Backspace), now);
        assert_eq!(editor.search().query(), "");
        assert!(editor.search().matches().is_empty());
        assert_eq!(editor.selection(), Selection::new(-1, 1));
    }

    #[test]
    fn test_help_overlay_escape() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        press(&mut editor, "?", now);
        assert!(editor.help_open());

        // Other keys keep working while help is shown
        press(&mut editor, "j", now);
        assert_eq!(editor.selection().row, -1);

        let outcome = editor.handle_key(key(KeyCode::Esc), now);
        assert!(outcome.consumed);
        assert!(!editor.help_open());
    }

    #[test]
    fn test_help_escape_does_not_leave_insert() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        press(&mut editor, "?i", now);
        assert_eq!(editor.mode(), Mode::Insert);

        editor.handle_key(key(KeyCode::Esc), now);
        assert!(!editor.help_open());
        assert_eq!(editor.mode(), Mode::Insert);

        editor.handle_key(key(KeyCode::Esc), now);
        assert_eq!(editor.mode(), Mode::Normal);
    }

    #[test]
    fn test_reserved_keys_are_consumed() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        assert!(editor.handle_key(key(KeyCode::Char('y')), now).consumed);
        assert!(editor.handle_key(key(KeyCode::Char('j')), now).consumed);
        assert!(!editor.handle_key(key(KeyCode::Char('q')), now).consumed);
    }

    #[test]
    fn test_row_column_sync_over_sequence() {
        let now = Instant::now();
        let mut editor = Editor::new(three_rows());
        editor.select(Selection::new(0, 0));

        for script in ["A", "A", "dc", "l", "A", "dc", "dc", "dc", "dc", "A"] {
            press(&mut editor, script, now);
            assert!(editor.grid().is_shape_valid());
        }
        assert!(editor.grid().column_count() >= 1);
    }

    #[test]
    fn test_apply_records_single_undo_point() {
        let mut editor = Editor::new(three_rows());
        assert!(editor.apply(|grid| {
            grid.append_column("X");
            grid.append_column("Y");
            true
        }));
        assert_eq!(editor.history().undo_len(), 1);
        assert!(!editor.apply(|_| false));
        assert_eq!(editor.history().undo_len(), 1);
    }
}
