use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::keymap::{text_input_action, TextAction};
use crate::input::Mode;

use super::App;

impl App {
    /// Route a key through the editor first. Returns true to exit.
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return self.quit(now);
        }

        if self.editor.mode() == Mode::Normal && !self.editor.help_open() && self.analysis.has_overlay() {
            self.handle_overlay_key(key, now);
            self.sync_autosave(now);
            return false;
        }

        let outcome = self.editor.handle_key(key, now);
        self.apply_effects(&outcome.effects);

        if !outcome.consumed {
            match self.editor.mode() {
                Mode::Insert => self.edit_cell(key, now),
                Mode::Normal => {
                    if self.handle_app_key(key, now) {
                        return true;
                    }
                }
                Mode::Search => {}
            }
        }

        self.sync_autosave(now);
        false
    }

    /// Keys the editor leaves alone in normal mode
    fn handle_app_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => return self.quit(now),
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => self.clear_message(),
            (KeyCode::Char('E'), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.analyze(now);
            }
            (KeyCode::Char('S'), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.suggest_columns(now);
            }
            (KeyCode::Char('V'), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.suggest_values(now);
            }
            (KeyCode::Enter, _) => {
                self.open_row_paths(now);
            }
            _ => {}
        }
        false
    }

    /// Keys for the path viewer or the suggestion picker, whichever is open
    fn handle_overlay_key(&mut self, key: KeyEvent, now: Instant) {
        if self.analysis.picker.is_some() {
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => self.analysis.picker_down(),
                KeyCode::Char('k') | KeyCode::Up => self.analysis.picker_up(),
                KeyCode::Char(' ') => self.analysis.picker_toggle(),
                KeyCode::Enter => {
                    self.accept_picked(false, now);
                }
                KeyCode::Char('a') => {
                    self.accept_picked(true, now);
                }
                KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => self.analysis.close_picker(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(']') | KeyCode::Char('l') | KeyCode::Right => self.analysis.next_path(),
            KeyCode::Char('[') | KeyCode::Char('h') | KeyCode::Left => self.analysis.prev_path(),
            KeyCode::Tab => {
                self.cycle_path_verdict();
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('q') => self.analysis.close_paths(),
            _ => {}
        }
    }

    /// Line editing inside the focused cell, written through to the grid
    fn edit_cell(&mut self, key: KeyEvent, now: Instant) {
        let changed = match text_input_action(key) {
            TextAction::InsertChar(c) => {
                self.cell_input.insert_char(c);
                true
            }
            TextAction::DeleteChar => self.cell_input.delete_char(),
            TextAction::DeleteCharForward => self.cell_input.delete_char_forward(),
            TextAction::ClearLine => {
                self.cell_input.clear();
                true
            }
            TextAction::CursorLeft => {
                self.cell_input.cursor_left();
                false
            }
            TextAction::CursorRight => {
                self.cell_input.cursor_right();
                false
            }
            TextAction::CursorHome => {
                self.cell_input.cursor_home();
                false
            }
            TextAction::CursorEnd => {
                self.cell_input.cursor_end();
                false
            }
            TextAction::Submit | TextAction::Cancel => {
                // Enter commits like Escape
                let outcome = self.editor.handle_key(KeyEvent::from(KeyCode::Esc), now);
                self.apply_effects(&outcome.effects);
                false
            }
            TextAction::None => false,
        };

        if changed {
            self.editor.edit_focused(self.cell_input.as_str());
        }
    }
}
