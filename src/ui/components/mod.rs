//! UI Components
//!
//! Widgets for the grid editor.

pub mod grid;
pub mod help;
pub mod layout;
pub mod paths;
pub mod statusline;
pub mod suggestions;

// Re-exports
pub use grid::{GridLayout, GridView};
pub use help::HelpScreen;
pub use paths::PathPopup;
pub use statusline::{HelpBar, MessageType, StatusLine};
pub use suggestions::SuggestionPopup;
