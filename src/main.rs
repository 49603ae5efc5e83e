use ai_assistant_shell::menu::MenuAction;
use ai_assistant_shell::providers::ProviderRegistry;
use ai_assistant_shell::themes::ThemeLibrary;
use ai_assistant_shell::{logging, paths, PreferencesStore, Shell, ShellEffect};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "ai-assistant-shell",
    version,
    about = "Headless driver for the AI assistant shell: preferences, menu and navigation"
)]
struct Cli {
    /// User data directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the saved preferences and the startup URL
    Status,
    /// Print the application menu
    Menu,
    /// List installed stylesheets
    Themes,
    /// Switch to another assistant
    Assistant {
        label: String,
        /// Do not remember the choice
        #[arg(long)]
        no_save: bool,
        /// Keep the current cookies
        #[arg(long)]
        keep_cookies: bool,
    },
    /// Select a stylesheet from the data directory
    Theme {
        name: String,
        /// Reload the page when the stylesheet is missing
        #[arg(long)]
        reload: bool,
    },
    /// Toggle streamer mode
    Streamer,
    /// Dispatch a menu item id as if it was clicked
    Click { id: String },
    /// Run the page-loaded hook
    PageLoaded,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    preferences_file: PathBuf,
    preferences: ai_assistant_shell::PreferenceRecord,
    startup_url: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_effects(effects: &[ShellEffect]) -> Result<()> {
    for effect in effects {
        println!("{}", serde_json::to_string(effect)?);
    }
    Ok(())
}

fn open_store(data_dir: &std::path::Path) -> PreferencesStore {
    let path = paths::preferences_file(data_dir);
    match PreferencesStore::initialize(&path) {
        Ok(store) => store,
        Err(err) => {
            log::error!("[prefs] {:#}", anyhow::Error::new(err));
            PreferencesStore::fallback(path)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(paths::data_dir);

    let log_file = fs::create_dir_all(&data_dir)
        .ok()
        .map(|_| paths::log_file(&data_dir));
    logging::init(log_file.as_deref());
    log::info!("[app] started with data dir {}", data_dir.display());

    let store = Arc::new(open_store(&data_dir));
    let shell = Shell::new(
        Arc::clone(&store),
        ProviderRegistry::built_in(),
        ThemeLibrary::new(&data_dir),
    );

    match cli.command {
        Command::Status => print_json(&Status {
            preferences_file: store.path().to_path_buf(),
            preferences: shell.preferences(),
            startup_url: shell.startup_url().to_string(),
        }),
        Command::Menu => print_json(&shell.menu()),
        Command::Themes => {
            for name in shell.themes().list()? {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Assistant {
            label,
            no_save,
            keep_cookies,
        } => {
            let effects = shell
                .change_assistant(&label, !no_save, !keep_cookies)
                .with_context(|| format!("Failed to switch to {}", label))?;
            print_effects(&effects)
        }
        Command::Theme { name, reload } => {
            let effects = shell
                .change_theme(&name, reload)
                .with_context(|| format!("Failed to apply theme {}", name))?;
            print_effects(&effects)
        }
        Command::Streamer => print_effects(&shell.handle_menu_action(&MenuAction::ToggleStreamerMode)?),
        Command::Click { id } => print_effects(&shell.handle_menu_click(&id)?),
        Command::PageLoaded => print_effects(&shell.on_page_load()),
    }
}
