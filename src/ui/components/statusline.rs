//! Status Line Component
//!
//! Displays mode indicator, search prompt, messages and save state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::input::Mode;
use crate::store::SaveStatus;

/// Message type for status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::White,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Status line widget
pub struct StatusLine<'a> {
    mode: Mode,
    prompt: Option<&'a str>,
    message: Option<(&'a str, MessageType)>,
    pending: Option<char>,
    match_position: Option<(usize, usize)>,
    save_status: SaveStatus,
    position: Option<String>,
}

impl<'a> StatusLine<'a> {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            prompt: None,
            message: None,
            pending: None,
            match_position: None,
            save_status: SaveStatus::Idle,
            position: None,
        }
    }

    /// Search query being typed
    pub fn prompt(mut self, query: &'a str) -> Self {
        self.prompt = Some(query);
        self
    }

    pub fn message(mut self, msg: &'a str, msg_type: MessageType) -> Self {
        self.message = Some((msg, msg_type));
        self
    }

    pub fn pending(mut self, key: char) -> Self {
        self.pending = Some(key);
        self
    }

    pub fn match_position(mut self, current: usize, total: usize) -> Self {
        self.match_position = Some((current, total));
        self
    }

    pub fn save_status(mut self, status: SaveStatus) -> Self {
        self.save_status = status;
        self
    }

    pub fn position(mut self, position: String) -> Self {
        self.position = Some(position);
        self
    }

    /// Column where prompt text starts, for placing the terminal cursor
    pub fn prompt_offset(mode: Mode) -> u16 {
        mode.indicator().len() as u16 + 2 + 1 + 1
    }

    fn mode_style(&self) -> Style {
        let bg = match self.mode {
            Mode::Normal => Color::Blue,
            Mode::Insert => Color::Green,
            Mode::Search => Color::Magenta,
        };
        Style::default().fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD)
    }

    fn save_color(&self) -> Color {
        match self.save_status {
            SaveStatus::Saved => Color::Green,
            SaveStatus::Error => Color::Red,
            SaveStatus::Pending | SaveStatus::Saving => Color::Yellow,
            SaveStatus::Idle => Color::Gray,
        }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, Style::default().bg(Color::DarkGray));

        let mut x = area.x;

        let mode_text = format!(" {} ", self.mode.indicator());
        buf.set_string(x, area.y, &mode_text, self.mode_style());
        x += mode_text.len() as u16 + 1;

        let base = Style::default().bg(Color::DarkGray);
        if let Some(query) = self.prompt {
            buf.set_string(x, area.y, format!("/{}", query), base.fg(Color::White));
        } else if let Some((msg, msg_type)) = self.message {
            buf.set_string(x, area.y, msg, base.fg(msg_type.color()));
        }

        let mut right: Vec<Span> = Vec::new();
        if let Some(key) = self.pending {
            right.push(Span::styled(format!("{} ", key), base.fg(Color::Yellow)));
        }
        if let Some((current, total)) = self.match_position {
            right.push(Span::styled(format!("[{}/{}] ", current, total), base.fg(Color::Magenta)));
        }
        let label = self.save_status.label();
        if !label.is_empty() {
            right.push(Span::styled(format!("{} ", label), base.fg(self.save_color())));
        }
        if let Some(position) = self.position {
            right.push(Span::styled(position, base.fg(Color::Gray)));
        }

        let line = Line::from(right);
        let width = line.width() as u16;
        let right_x = area.x + area.width.saturating_sub(width + 1);
        buf.set_line(right_x, area.y, &line, width);
    }
}

/// Help bar widget
pub struct HelpBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
}

impl<'a> HelpBar<'a> {
    pub fn new(hints: Vec<(&'a str, &'a str)>) -> Self {
        Self { hints }
    }

    pub fn for_mode(mode: Mode) -> Self {
        let hints = match mode {
            Mode::Normal => vec![
                ("hjkl", "move"),
                ("i/a", "edit"),
                ("o/O", "row"),
                ("A", "column"),
                ("dd/dc", "delete"),
                ("u/C-r", "undo/redo"),
                ("/", "search"),
                ("E", "analyze"),
                ("?", "help"),
                ("q", "quit"),
            ],
            Mode::Insert => vec![
                ("Esc", "done"),
                ("Enter", "done"),
                ("C-u", "clear"),
            ],
            Mode::Search => vec![
                ("Esc", "cancel"),
                ("Enter", "keep matches"),
            ],
        };
        Self::new(hints)
    }
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
        }
        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
