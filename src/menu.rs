//! Application menu as plain data, rebuilt from the preferences whenever they
//! change. A window host turns it into native menu items and feeds clicked
//! ids back through [`MenuAction::from_id`].

use serde::Serialize;

use crate::preferences::PreferenceRecord;
use crate::providers::ProviderRegistry;

pub const ASSISTANT_SUBMENU_LABEL: &str = "Assistant AI";
pub const OPTIONS_SUBMENU_LABEL: &str = "Options";

const MENU_ITEM_ASSISTANT_PREFIX: &str = "assistant:";
pub const MENU_ITEM_STREAMER_MODE_ID: &str = "option:streamer-mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    Radio,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub kind: MenuItemKind,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submenu {
    pub label: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub submenus: Vec<Submenu>,
}

impl Menu {
    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.submenus
            .iter()
            .flat_map(|submenu| submenu.items.iter())
            .find(|item| item.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    SelectAssistant(String),
    ToggleStreamerMode,
}

impl MenuAction {
    pub fn from_id(id: &str) -> Option<Self> {
        if id == MENU_ITEM_STREAMER_MODE_ID {
            return Some(MenuAction::ToggleStreamerMode);
        }
        id.strip_prefix(MENU_ITEM_ASSISTANT_PREFIX)
            .filter(|label| !label.is_empty())
            .map(|label| MenuAction::SelectAssistant(label.to_string()))
    }

    pub fn id(&self) -> String {
        match self {
            MenuAction::SelectAssistant(label) => format!("{MENU_ITEM_ASSISTANT_PREFIX}{label}"),
            MenuAction::ToggleStreamerMode => MENU_ITEM_STREAMER_MODE_ID.to_string(),
        }
    }
}

pub fn build_menu(record: &PreferenceRecord, providers: &ProviderRegistry) -> Menu {
    let assistants = providers
        .iter()
        .map(|provider| MenuItem {
            id: MenuAction::SelectAssistant(provider.label.clone()).id(),
            label: provider.label.clone(),
            kind: MenuItemKind::Radio,
            checked: record.selected_provider == provider.label,
        })
        .collect();

    let options = vec![MenuItem {
        id: MENU_ITEM_STREAMER_MODE_ID.to_string(),
        label: "Streamer Mode".to_string(),
        kind: MenuItemKind::Checkbox,
        checked: record.streamer_mode,
    }];

    Menu {
        submenus: vec![
            Submenu {
                label: ASSISTANT_SUBMENU_LABEL.to_string(),
                items: assistants,
            },
            Submenu {
                label: OPTIONS_SUBMENU_LABEL.to_string(),
                items: options,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(provider: &str, streamer: bool) -> PreferenceRecord {
        PreferenceRecord {
            selected_provider: provider.to_string(),
            streamer_mode: streamer,
            ..PreferenceRecord::default()
        }
    }

    #[test]
    fn selected_provider_is_the_only_checked_radio() {
        let menu = build_menu(&record("Copilot", false), &ProviderRegistry::built_in());

        let assistants = &menu.submenus[0];
        assert_eq!(assistants.label, ASSISTANT_SUBMENU_LABEL);
        let checked: Vec<_> = assistants
            .items
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.label.as_str())
            .collect();
        assert_eq!(checked, ["Copilot"]);
        assert!(assistants.items.iter().all(|item| item.kind == MenuItemKind::Radio));
    }

    #[test]
    fn unknown_provider_leaves_every_radio_unchecked() {
        let menu = build_menu(&record("Bard", false), &ProviderRegistry::built_in());
        assert!(menu.submenus[0].items.iter().all(|item| !item.checked));
    }

    #[test]
    fn streamer_checkbox_follows_record() {
        let registry = ProviderRegistry::built_in();

        let on = build_menu(&record("ChatGPT", true), &registry);
        let off = build_menu(&record("ChatGPT", false), &registry);

        assert!(on.item(MENU_ITEM_STREAMER_MODE_ID).unwrap().checked);
        assert!(!off.item(MENU_ITEM_STREAMER_MODE_ID).unwrap().checked);
        assert_eq!(on.submenus[1].label, OPTIONS_SUBMENU_LABEL);
    }

    #[test]
    fn ids_parse_back_into_actions() {
        assert_eq!(
            MenuAction::from_id("assistant:MistralAI"),
            Some(MenuAction::SelectAssistant("MistralAI".to_string()))
        );
        assert_eq!(
            MenuAction::from_id(MENU_ITEM_STREAMER_MODE_ID),
            Some(MenuAction::ToggleStreamerMode)
        );
        assert_eq!(MenuAction::from_id("assistant:"), None);
        assert_eq!(MenuAction::from_id("menu_about"), None);

        let menu = build_menu(&PreferenceRecord::default(), &ProviderRegistry::built_in());
        for item in menu.submenus.iter().flat_map(|s| s.items.iter()) {
            let action = MenuAction::from_id(&item.id).expect("every item id parses");
            assert_eq!(action.id(), item.id);
        }
    }
}
