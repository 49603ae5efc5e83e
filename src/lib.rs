//! Core of the AI assistant shell: persisted preferences plus the menu and
//! navigation logic a window host drives.

pub mod logging;
pub mod menu;
pub mod paths;
pub mod preferences;
pub mod providers;
pub mod shell;
pub mod themes;

pub use preferences::{PersistenceError, PreferenceChange, PreferenceRecord, PreferencesStore};
pub use shell::{Shell, ShellEffect, ShellError};
