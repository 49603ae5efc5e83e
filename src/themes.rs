use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

static THEME_FILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+\.css$").expect("valid regex"));

/// Whether `name` is a bare stylesheet file name the library will look up.
pub fn is_valid_theme_name(name: &str) -> bool {
    THEME_FILE_PATTERN.is_match(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub name: String,
    pub css: String,
}

/// Stylesheets stored as `<name>.css` files in one directory.
#[derive(Debug, Clone)]
pub struct ThemeLibrary {
    dir: PathBuf,
}

impl ThemeLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `Ok(None)` for names that are not plain `.css` file names and for
    /// themes that are not installed.
    pub fn load(&self, name: &str) -> Result<Option<Stylesheet>> {
        if !is_valid_theme_name(name) {
            return Ok(None);
        }

        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(css) => Ok(Some(Stylesheet {
                name: name.to_string(),
                css,
            })),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read theme {}", path.display()))
            }
        }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to list themes in {}", self.dir.display()))
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| is_valid_theme_name(name))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_text(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write text fixture");
        path
    }

    #[test]
    fn theme_names_must_be_plain_css_files() {
        assert!(is_valid_theme_name("default.css"));
        assert!(is_valid_theme_name("solarized-dark_v2.css"));
        assert!(!is_valid_theme_name("dark.txt"));
        assert!(!is_valid_theme_name("../secrets.css"));
        assert!(!is_valid_theme_name("sub/dark.css"));
        assert!(!is_valid_theme_name("<script>.css"));
        assert!(!is_valid_theme_name(""));
    }

    #[test]
    fn load_reads_installed_stylesheet() {
        let dir = tempdir().unwrap();
        write_text(dir.path(), "dark.css", "body { background: #000; }");
        let library = ThemeLibrary::new(dir.path());

        let sheet = library.load("dark.css").unwrap().expect("theme installed");

        assert_eq!(sheet.name, "dark.css");
        assert_eq!(sheet.css, "body { background: #000; }");
    }

    #[test]
    fn load_reports_missing_and_invalid_as_none() {
        let dir = tempdir().unwrap();
        write_text(dir.path(), "notes.txt", "hello");
        let library = ThemeLibrary::new(dir.path());

        assert!(library.load("absent.css").unwrap().is_none());
        assert!(library.load("notes.txt").unwrap().is_none());
    }

    #[test]
    fn list_returns_sorted_css_files_only() {
        let dir = tempdir().unwrap();
        write_text(dir.path(), "b.css", "");
        write_text(dir.path(), "a.css", "");
        write_text(dir.path(), "config.json", "{}");
        write_text(dir.path(), "nested/c.css", "");
        let library = ThemeLibrary::new(dir.path());

        assert_eq!(library.list().unwrap(), ["a.css", "b.css"]);
    }

    #[test]
    fn list_of_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let library = ThemeLibrary::new(dir.path().join("missing"));
        assert!(library.list().unwrap().is_empty());
    }
}
