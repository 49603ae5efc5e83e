//! Window-independent shell behaviour.
//!
//! Each operation persists what it has to through the injected store and
//! returns the [`ShellEffect`]s a window host should carry out, in order.

use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::menu::{build_menu, Menu, MenuAction};
use crate::preferences::{PersistenceError, PreferenceChange, PreferenceRecord, PreferencesStore};
use crate::providers::ProviderRegistry;
use crate::themes::{Stylesheet, ThemeLibrary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum ShellEffect {
    ClearCookies,
    Navigate { url: Url },
    InsertCss { theme: String, css: String },
    Reload,
    SetMenu { menu: Menu },
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("unknown assistant provider: {0}")]
    UnknownProvider(String),
    #[error("unknown menu item: {0}")]
    UnknownMenuItem(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct Shell {
    store: Arc<PreferencesStore>,
    providers: ProviderRegistry,
    themes: ThemeLibrary,
}

impl Shell {
    pub fn new(store: Arc<PreferencesStore>, providers: ProviderRegistry, themes: ThemeLibrary) -> Self {
        Self {
            store,
            providers,
            themes,
        }
    }

    pub fn preferences(&self) -> PreferenceRecord {
        self.store.get()
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn themes(&self) -> &ThemeLibrary {
        &self.themes
    }

    pub fn menu(&self) -> Menu {
        build_menu(&self.store.get(), &self.providers)
    }

    /// Endpoint of the saved provider, or of the first provider when the
    /// saved label is not registered.
    pub fn startup_url(&self) -> Url {
        let selected = self.store.get().selected_provider;
        let provider = self.providers.resolve(&selected);
        if provider.label != selected {
            warn!(
                "[shell] unknown provider {:?} in preferences, starting with {}",
                selected, provider.label
            );
        }
        provider.url.clone()
    }

    /// Navigates to `label`'s endpoint. A failed save is logged and the
    /// navigation still goes ahead; the menu then keeps the old selection.
    pub fn change_assistant(
        &self,
        label: &str,
        save: bool,
        clear_cookies: bool,
    ) -> Result<Vec<ShellEffect>, ShellError> {
        let provider = self
            .providers
            .find(label)
            .ok_or_else(|| ShellError::UnknownProvider(label.to_string()))?;

        let mut effects = Vec::new();
        if clear_cookies {
            effects.push(ShellEffect::ClearCookies);
        }
        effects.push(ShellEffect::Navigate {
            url: provider.url.clone(),
        });

        if save {
            match self
                .store
                .update(&PreferenceChange::selected_provider(provider.label.clone()))
            {
                Ok(_) => info!("[shell] assistant set to {}", provider.label),
                Err(err) => error!(
                    "[shell] failed to save assistant {}: {:#}",
                    provider.label,
                    anyhow::Error::new(err)
                ),
            }
            effects.push(self.set_menu());
        }

        Ok(effects)
    }

    /// Saves `name` as the theme, then injects it if installed. A missing
    /// stylesheet, or a name the library will not look up, is logged and,
    /// when `reload` is set, answered with a reload so the page drops any
    /// previously injected CSS.
    pub fn change_theme(&self, name: &str, reload: bool) -> Result<Vec<ShellEffect>, ShellError> {
        self.store.update(&PreferenceChange::theme(name))?;
        info!("[shell] theme set to {}", name);

        Ok(match self.load_theme(name) {
            Some(sheet) => vec![insert_css(sheet)],
            None if reload => vec![ShellEffect::Reload],
            None => Vec::new(),
        })
    }

    pub fn toggle_streamer_mode(&self) -> Result<Vec<ShellEffect>, ShellError> {
        let enabled = !self.store.get().streamer_mode;
        self.store.update(&PreferenceChange::streamer_mode(enabled))?;
        info!("[shell] streamer mode {}", if enabled { "on" } else { "off" });
        Ok(vec![self.set_menu()])
    }

    pub fn handle_menu_action(&self, action: &MenuAction) -> Result<Vec<ShellEffect>, ShellError> {
        match action {
            MenuAction::SelectAssistant(label) => self.change_assistant(label, true, true),
            MenuAction::ToggleStreamerMode => self.toggle_streamer_mode(),
        }
    }

    pub fn handle_menu_click(&self, id: &str) -> Result<Vec<ShellEffect>, ShellError> {
        info!("[menu] click id={}", id);
        let action =
            MenuAction::from_id(id).ok_or_else(|| ShellError::UnknownMenuItem(id.to_string()))?;
        self.handle_menu_action(&action)
    }

    /// Hook for a finished page load: fresh menu, then the saved theme.
    pub fn on_page_load(&self) -> Vec<ShellEffect> {
        let mut effects = vec![self.set_menu()];
        let theme = self.store.get().theme;
        if let Some(sheet) = self.load_theme(&theme) {
            effects.push(insert_css(sheet));
        }
        effects
    }

    fn set_menu(&self) -> ShellEffect {
        ShellEffect::SetMenu { menu: self.menu() }
    }

    fn load_theme(&self, name: &str) -> Option<Stylesheet> {
        match self.themes.load(name) {
            Ok(Some(sheet)) => Some(sheet),
            Ok(None) => {
                error!("[shell] stylesheet {} not found in {}", name, self.themes.dir().display());
                None
            }
            Err(err) => {
                error!("[shell] {:#}", err);
                None
            }
        }
    }
}

fn insert_css(sheet: Stylesheet) -> ShellEffect {
    ShellEffect::InsertCss {
        theme: sheet.name,
        css: sheet.css,
    }
}
