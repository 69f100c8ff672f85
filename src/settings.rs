use crate::CONFY_APP_NAME;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub show_grid: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { show_grid: true }
    }
}

impl DisplaySettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "display").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "display", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSettings {
    pub background_color: [f32; 3],
    pub grid_major_color: [f32; 3],
    pub grid_minor_color: [f32; 3],
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            background_color: [0.02, 0.02, 0.03],
            grid_major_color: [0.16, 0.16, 0.2],
            grid_minor_color: [0.08, 0.08, 0.1],
        }
    }
}

impl ColorSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "colors").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "colors", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    pub show_browser_panel: bool,
    pub show_colors: bool,
    pub show_controls_help: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_browser_panel: true,
            show_colors: false,
            show_controls_help: false,
        }
    }
}

impl UiSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "ui").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "ui", self);
    }
}

// Aggregate struct for convenience
pub struct Settings {
    pub display: DisplaySettings,
    pub colors: ColorSettings,
    pub ui: UiSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            display: DisplaySettings::load(),
            colors: ColorSettings::load(),
            ui: UiSettings::load(),
        }
    }
}
