use std::env;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "ai-assistant-shell";
pub const APP_DATA_DIR_ENV: &str = "AI_ASSISTANT_SHELL_DATA_DIR";
pub const PREFERENCES_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = "app.log";

/// User data directory: the env override when set, else the platform config dir.
pub fn data_dir() -> PathBuf {
    data_dir_from(env::var(APP_DATA_DIR_ENV).ok().as_deref(), dirs::config_dir())
}

fn data_dir_from(override_dir: Option<&str>, config_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir.trim());
        }
    }
    config_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn preferences_file(data_dir: &Path) -> PathBuf {
    data_dir.join(PREFERENCES_FILE_NAME)
}

pub fn log_file(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_when_not_blank() {
        let dir = data_dir_from(Some(" /tmp/shell-data "), Some(PathBuf::from("/home/u/.config")));
        assert_eq!(dir, PathBuf::from("/tmp/shell-data"));
    }

    #[test]
    fn blank_override_falls_back_to_config_dir() {
        let dir = data_dir_from(Some("   "), Some(PathBuf::from("/home/u/.config")));
        assert_eq!(dir, PathBuf::from("/home/u/.config").join(APP_DIR_NAME));
    }

    #[test]
    fn missing_config_dir_uses_working_directory() {
        assert_eq!(data_dir_from(None, None), PathBuf::from(".").join(APP_DIR_NAME));
    }

    #[test]
    fn files_live_inside_data_dir() {
        let dir = PathBuf::from("/data");
        assert_eq!(preferences_file(&dir), dir.join("config.json"));
        assert_eq!(log_file(&dir), dir.join("app.log"));
    }
}
