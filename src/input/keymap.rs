//! Keymap
//!
//! Vim-style key bindings mapped to grid commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Commands interpreted in normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Navigation
    MoveLeft,
    MoveRight,
    MoveDown,
    MoveUp,
    FirstColumn,
    LastColumn,
    FirstRow,
    LastRow,

    // Mode changes
    Insert,
    Append,
    StartSearch,
    ShowHelp,

    // Search navigation
    NextMatch,
    PrevMatch,

    // Structure
    OpenRowBelow,
    OpenRowAbove,
    DeleteRow,
    DeleteColumn,
    AddColumn,

    // Editing
    ClearCell,
    Undo,
    Redo,

    // No action
    None,
}

/// Keys the presentation layer must never act on while in normal mode
const RESERVED: &[char] = &[
    'h', 'j', 'k', 'l', '0', '$', 'g', 'G', 'i', 'a', '/', 'o', 'O', 'd', 'x', 'u', 'y', 'p',
    'P', 'n', 'N', 'A', 'C', '?',
];

pub fn is_reserved(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => RESERVED.contains(&c),
        _ => false,
    }
}

/// Map key event to command in normal mode.
///
/// `pending` is the first key of an unfinished two-key sequence. The
/// returned option is the new pending key. A key that does not complete the
/// sequence drops it and is interpreted on its own.
pub fn normal_mode_command(key: KeyEvent, pending: Option<char>) -> (Command, Option<char>) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('r') => (Command::Redo, None),
            _ => (Command::None, None),
        };
    }

    match (key.code, pending) {
        // Two-key sequences
        (KeyCode::Char('g'), Some('g')) => (Command::FirstRow, None),
        (KeyCode::Char('g'), _) => (Command::None, Some('g')),
        (KeyCode::Char('d'), Some('d')) => (Command::DeleteRow, None),
        (KeyCode::Char('c'), Some('d')) => (Command::DeleteColumn, None),
        (KeyCode::Char('d'), _) => (Command::None, Some('d')),

        // Navigation
        (KeyCode::Char('h') | KeyCode::Left, _) => (Command::MoveLeft, None),
        (KeyCode::Char('l') | KeyCode::Right, _) => (Command::MoveRight, None),
        (KeyCode::Char('j') | KeyCode::Down, _) => (Command::MoveDown, None),
        (KeyCode::Char('k') | KeyCode::Up, _) => (Command::MoveUp, None),
        (KeyCode::Char('0') | KeyCode::Home, _) => (Command::FirstColumn, None),
        (KeyCode::Char('$') | KeyCode::End, _) => (Command::LastColumn, None),
        (KeyCode::Char('G'), _) => (Command::LastRow, None),

        // Mode changes
        (KeyCode::Char('i'), _) => (Command::Insert, None),
        (KeyCode::Char('a'), _) => (Command::Append, None),
        (KeyCode::Char('/'), _) => (Command::StartSearch, None),
        (KeyCode::Char('?'), _) => (Command::ShowHelp, None),

        // Search navigation
        (KeyCode::Char('n'), _) => (Command::NextMatch, None),
        (KeyCode::Char('N'), _) => (Command::PrevMatch, None),

        // Structure
        (KeyCode::Char('o'), _) => (Command::OpenRowBelow, None),
        (KeyCode::Char('O'), _) => (Command::OpenRowAbove, None),
        (KeyCode::Char('A'), _) => (Command::AddColumn, None),

        // Editing
        (KeyCode::Char('x'), _) => (Command::ClearCell, None),
        (KeyCode::Char('u'), _) => (Command::Undo, None),

        _ => (Command::None, None),
    }
}

/// Line-editing actions shared by the insert and search modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAction {
    InsertChar(char),
    DeleteChar,
    DeleteCharForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ClearLine,
    Submit,
    Cancel,
    None,
}

/// Map key event to action in text input modes
pub fn text_input_action(key: KeyEvent) -> TextAction {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => TextAction::Cancel,
        (KeyCode::Enter, _) => TextAction::Submit,
        (KeyCode::Backspace, _) => TextAction::DeleteChar,
        (KeyCode::Delete, _) => TextAction::DeleteCharForward,
        (KeyCode::Left, _) => TextAction::CursorLeft,
        (KeyCode::Right, _) => TextAction::CursorRight,
        (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => TextAction::CursorHome,
        (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => TextAction::CursorEnd,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => TextAction::ClearLine,
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => TextAction::InsertChar(c),
        _ => TextAction::None,
    }
}
