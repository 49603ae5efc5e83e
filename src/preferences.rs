//! Persistent user preferences.
//!
//! The store owns one JSON file inside the user data directory and an
//! in-memory copy of it. Every change goes through [`PreferencesStore::update`],
//! which writes the whole record atomically before the cached copy moves.

use log::{info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_THEME: &str = "default.css";
pub const DEFAULT_PROVIDER: &str = "ChatGPT";

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

/// The persisted configuration.
///
/// `streamer` and `assistant` are the key names older shells wrote; they are
/// read as aliases and always written back under the current names. Keys the
/// record does not know about are kept in `extra` and survive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default, alias = "streamer")]
    pub streamer_mode: bool,
    #[serde(default = "default_provider", alias = "assistant")]
    pub selected_provider: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PreferenceRecord {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            streamer_mode: false,
            selected_provider: default_provider(),
            extra: Map::new(),
        }
    }
}

impl PreferenceRecord {
    /// Field-by-field overlay: fields set in `change` win, the rest are kept.
    pub fn overlay(&self, change: &PreferenceChange) -> Self {
        Self {
            theme: change.theme.clone().unwrap_or_else(|| self.theme.clone()),
            streamer_mode: change.streamer_mode.unwrap_or(self.streamer_mode),
            selected_provider: change
                .selected_provider
                .clone()
                .unwrap_or_else(|| self.selected_provider.clone()),
            extra: self.extra.clone(),
        }
    }
}

/// A partial [`PreferenceRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streamer_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_provider: Option<String>,
}

impl PreferenceChange {
    pub fn theme(name: impl Into<String>) -> Self {
        Self {
            theme: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn streamer_mode(enabled: bool) -> Self {
        Self {
            streamer_mode: Some(enabled),
            ..Self::default()
        }
    }

    pub fn selected_provider(label: impl Into<String>) -> Self {
        Self {
            selected_provider: Some(label.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to create preferences file {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read preferences file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write preferences file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed preferences file {}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
}

impl PersistenceError {
    pub fn path(&self) -> &Path {
        match self {
            PersistenceError::Create { path, .. }
            | PersistenceError::Read { path, .. }
            | PersistenceError::Write { path, .. }
            | PersistenceError::Malformed { path, .. } => path,
        }
    }
}

pub struct PreferencesStore {
    path: PathBuf,
    current: Mutex<PreferenceRecord>,
}

impl PreferencesStore {
    /// Loads the record at `path`, writing the defaults there first when no
    /// file exists. An existing file is never rewritten here, even when it
    /// turns out to be malformed.
    pub fn initialize(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();

        if !path.exists() {
            let create_error = |source| PersistenceError::Create {
                path: path.clone(),
                source,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(create_error)?;
            }
            write_record(&path, &PreferenceRecord::default()).map_err(create_error)?;
            info!("[prefs] created {} with defaults", path.display());
        }

        let record = read_record(&path)?;
        info!(
            "[prefs] loaded {} (provider={}, theme={}, streamer={})",
            path.display(),
            record.selected_provider,
            record.theme,
            record.streamer_mode
        );

        Ok(Self {
            path,
            current: Mutex::new(record),
        })
    }

    /// In-memory defaults for when [`initialize`](Self::initialize) failed.
    /// Nothing is written until the first successful [`update`](Self::update).
    pub fn fallback(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        warn!(
            "[prefs] using in-memory defaults; {} is not in sync",
            path.display()
        );
        Self {
            path,
            current: Mutex::new(PreferenceRecord::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> PreferenceRecord {
        self.current.lock().clone()
    }

    /// Overlays `change` onto the cached record and persists the result.
    ///
    /// The lock is held from reading the cache until the new record is
    /// committed, so concurrent callers are serialized and the file always
    /// holds the record of the last update to complete. On failure the
    /// cached record is left as it was.
    pub fn update(&self, change: &PreferenceChange) -> Result<PreferenceRecord, PersistenceError> {
        let mut current = self.current.lock();
        let next = current.overlay(change);

        write_record(&self.path, &next).map_err(|source| {
            warn!("[prefs] update not applied: {}", source);
            PersistenceError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        *current = next.clone();
        info!("[prefs] saved {}", self.path.display());
        Ok(next)
    }
}

const LEGACY_KEYS: &[(&str, &str)] = &[("streamer", "streamerMode"), ("assistant", "selectedProvider")];

/// Strict JSON first, then JSON5 for hand-edited files with comments or
/// trailing commas. The strict parser's message is the one reported.
/// A legacy key is dropped when its current name is also present.
pub(crate) fn parse_record(raw: &str) -> Result<PreferenceRecord, String> {
    let mut value: Value = serde_json::from_str(raw)
        .or_else(|strict| json5::from_str(raw).map_err(|_| strict.to_string()))?;

    if let Some(map) = value.as_object_mut() {
        for (legacy, current) in LEGACY_KEYS {
            if map.contains_key(*current) {
                map.remove(*legacy);
            }
        }
    }

    serde_json::from_value(value).map_err(|err| err.to_string())
}

fn read_record(path: &Path) -> Result<PreferenceRecord, PersistenceError> {
    let raw = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_record(&raw).map_err(|message| PersistenceError::Malformed {
        path: path.to_path_buf(),
        message,
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "preferences".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
}

// Temp file plus rename, so readers see either the old or the new record.
fn write_record(path: &Path, record: &PreferenceRecord) -> io::Result<()> {
    let mut json = serde_json::to_string_pretty(record)?;
    json.push('\n');

    let temp_path = temp_path_for(path);
    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(json.as_bytes())?;
        file.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path).map_err(|err| {
        let _ = fs::remove_file(&temp_path);
        err
    })
}
