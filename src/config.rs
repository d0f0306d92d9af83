use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Overrides `store_path` when set
pub const STORE_ENV_VAR: &str = "PORTFOLIO_EXPLORER_STORE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store_path: PathBuf,
    pub colors: ColorConfig,
    pub layout: LayoutConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub active_border: Color,
    pub inactive_border: Color,
    pub selected_item: Color,
    pub current_folder: Color,
    pub folder: Color,
    pub link: Color,
    pub disabled: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Side tree width in percent of the body
    pub side_tree_width: u16,
    pub path_prefix: String,
    pub breadcrumb_separator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: char,
    pub back: char,
    pub forward: char,
    pub toggle_expand: char,
    pub toggle_view: char,
    pub reload: char,
    pub new_folder: char,
    pub new_file: char,
    pub rename: char,
    pub move_item: char,
    pub delete: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("portfolio.json"),
            colors: ColorConfig::default(),
            layout: LayoutConfig::default(),
            keybindings: KeybindingConfig::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            active_border: Color::Yellow,
            inactive_border: Color::DarkGray,
            selected_item: Color::White,
            current_folder: Color::Cyan,
            folder: Color::Blue,
            link: Color::LightBlue,
            disabled: Color::DarkGray,
            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            side_tree_width: 35,
            path_prefix: "C:\\".to_string(),
            breadcrumb_separator: " > ".to_string(),
        }
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: 'q',
            back: '[',
            forward: ']',
            toggle_expand: ' ',
            toggle_view: 'a',
            reload: 'r',
            new_folder: 'n',
            new_file: 'f',
            rename: 'e',
            move_item: 'm',
            delete: 'd',
        }
    }
}

impl Config {
    /// Load from a JSON file (missing sections fall back to defaults), then
    /// apply the store path environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                let config: Config = serde_json::from_str(&content)?;
                log::info!("Config loaded from {:?}", path);
                config
            }
            None => Self::default(),
        };

        if let Ok(store) = std::env::var(STORE_ENV_VAR) {
            if !store.is_empty() {
                config.store_path = PathBuf::from(store);
            }
        }

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
