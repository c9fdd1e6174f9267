use std::time::Instant;

use crate::editor::Effect;
use crate::ui::components::MessageType;

use super::App;

impl App {
    /// Periodic work between key events
    pub fn tick(&mut self, now: Instant) {
        self.editor.tick(now);
        self.sync_autosave(now);
        self.autosave.poll(now, self.store.as_mut(), self.editor.grid());
        self.check_message_expiry(now);
    }

    /// Restart the autosave debounce if the grid changed since last seen
    pub(super) fn sync_autosave(&mut self, now: Instant) {
        let revision = self.editor.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.autosave.mark_dirty(now);
        }
    }

    pub(super) fn apply_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Focus(request) => {
                    let text = self.editor.grid().text(request.target).unwrap_or_default();
                    self.cell_input.load(text, request.caret);
                }
                Effect::Blur => self.cell_input.clear(),
            }
        }
    }

    /// Save pending changes and stop. Returns true for the event loop.
    pub fn quit(&mut self, now: Instant) -> bool {
        self.sync_autosave(now);
        if self.autosave.is_dirty() {
            if let Err(e) = self.autosave.flush(now, self.store.as_mut(), self.editor.grid()) {
                tracing::warn!(error = %e, "final save failed");
            }
        }
        tracing::info!(box_id = ?self.autosave.box_id(), "quitting");
        self.should_quit = true;
        true
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub(super) fn report_error(&mut self, context: &str, error: &dyn std::error::Error, now: Instant) {
        tracing::warn!(error = %error, "{}", context);
        self.set_message(&format!("{}: {}", context, error), MessageType::Error, now);
    }
}
