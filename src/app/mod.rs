//! Application State
//!
//! Ties the editor to persistence, the gateways and the UI.

mod actions;
mod analysis;
mod config;
mod input;

use std::rc::Rc;
use std::time::Instant;

use ratatui::Frame;

use crate::editor::Editor;
use crate::gateway::Gateway;
use crate::grid::Grid;
use crate::input::TextInput;
use crate::store::{Autosave, GridStore};
use crate::ui::components::MessageType;
use crate::ui::renderer::{Renderer, UiState};

pub use analysis::{AnalysisState, Picker, PickerKind};
pub use config::{AppConfig, ConfigError};

pub struct App {
    pub config: AppConfig,
    pub editor: Editor,
    /// Line editor behind the focused cell while in insert mode
    pub cell_input: TextInput,
    pub autosave: Autosave,
    pub analysis: AnalysisState,
    pub message: Option<(String, MessageType, Instant)>,
    pub should_quit: bool,
    store: Box<dyn GridStore>,
    gateway: Option<Rc<dyn Gateway>>,
    seen_revision: u64,
}

impl App {
    /// Load the latest box from `store` and start editing it
    pub fn new(config: AppConfig, store: Box<dyn GridStore>, now: Instant) -> Self {
        let mut load_error = None;
        let (grid, box_id) = match store.load() {
            Ok(Some(saved)) => (saved.grid, Some(saved.id)),
            Ok(None) => (Grid::new(), None),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load box, starting empty");
                load_error = Some(format!("Could not load box: {}", e));
                (Grid::new(), None)
            }
        };

        let editor = Editor::new(grid)
            .with_undo_limit(config.undo_limit)
            .with_sequence_timeout(config.sequence_timeout());
        let autosave = Autosave::new(config.autosave_delay(), box_id, now);

        let mut app = Self {
            config,
            seen_revision: editor.revision(),
            editor,
            cell_input: TextInput::new(),
            autosave,
            analysis: AnalysisState::default(),
            message: None,
            should_quit: false,
            store,
            gateway: None,
        };

        if let Some(msg) = load_error {
            app.set_message(&msg, MessageType::Error, now);
        }
        app
    }

    pub fn grid(&self) -> &Grid {
        self.editor.grid()
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let state = UiState {
            editor: &self.editor,
            cell_input: &self.cell_input,
            message: self.message.as_ref().map(|(m, t, _)| (m.as_str(), *t)),
            save_status: self.autosave.status(),
            analysis: &self.analysis,
        };

        Renderer::render(frame, &state);
    }

    fn check_message_expiry(&mut self, now: Instant) {
        let timeout = self.config.message_timeout();
        let expired = self
            .message
            .as_ref()
            .is_some_and(|(_, _, time)| now.duration_since(*time) > timeout);

        if expired {
            self.message = None;
        }
    }

    pub fn set_message(&mut self, msg: &str, msg_type: MessageType, now: Instant) {
        self.message = Some((msg.to_string(), msg_type, now));
    }
}
