use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use crate::pdf::{DEFAULT_CACHE_SIZE, DEFAULT_MAX_WIDTH, DEFAULT_WIDTH_FRACTION, WidthPolicy};
use crate::viewer::ViewerConfig;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "folio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Fraction of the terminal width a page may use
    #[serde(default = "default_width_fraction")]
    pub width_fraction: f32,

    /// Cap on the page width in columns; `null` means uncapped
    #[serde(default = "default_max_width")]
    pub max_width: Option<f32>,

    /// Raster pixels per terminal column
    #[serde(default = "default_pixel_density")]
    pub pixel_density: u16,

    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_width_fraction() -> f32 {
    DEFAULT_WIDTH_FRACTION
}

fn default_max_width() -> Option<f32> {
    Some(DEFAULT_MAX_WIDTH)
}

fn default_pixel_density() -> u16 {
    1
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            width_fraction: default_width_fraction(),
            max_width: default_max_width(),
            pixel_density: default_pixel_density(),
            cache_size: default_cache_size(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn width_policy(&self) -> WidthPolicy {
        let fraction = if self.width_fraction > 0.0 && self.width_fraction <= 1.0 {
            self.width_fraction
        } else {
            warn!(
                "Ignoring width_fraction {}, using {DEFAULT_WIDTH_FRACTION}",
                self.width_fraction
            );
            DEFAULT_WIDTH_FRACTION
        };
        WidthPolicy::from_parts(fraction, self.max_width)
    }

    #[must_use]
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            policy: self.width_policy(),
            cache_size: self.cache_size.max(1),
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

pub fn load_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };

    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

pub fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = match serde_yaml::to_string(settings) {
        Ok(body) => format!("{SETTINGS_HEADER}{body}"),
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const SETTINGS_HEADER: &str = r#"# ============================================================================
# folio settings
# ============================================================================
# width_fraction: share of the terminal width a page may use (0.0 - 1.0]
# max_width:      cap on the page width in columns, or null for no cap
# pixel_density:  raster pixels per column; raise for sharper downsampling
# cache_size:     rendered pages kept in memory

"#;

// Public API for accessing settings

#[must_use]
pub fn get_settings() -> Settings {
    SETTINGS
        .read()
        .map(|s| s.clone())
        .unwrap_or_else(|_| Settings::default())
}
