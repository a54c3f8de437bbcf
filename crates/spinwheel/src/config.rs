use crate::layout::{PaletteMode, SlotMode};
use crate::render::StyleKind;
use crate::spin::Easing;
use crate::wheel::LayoutPolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::PathBuf;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const ENV_PREFIX: &str = "FOODWHEEL";
const STATIC_SNAPSHOT: &str = "foodwheel/foods.json";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelSettings {
    pub max_slots: usize,
    pub slot_mode: SlotMode,
    pub palette: PaletteMode,
    pub label_max_chars: usize,
    pub style: StyleKind,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            max_slots: 8,
            slot_mode: SlotMode::Fit,
            palette: PaletteMode::TwoTone,
            label_max_chars: 18,
            style: StyleKind::Classic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpinSettings {
    pub base_full_turns: u32,
    pub duration_ms: u64,
    pub easing: Easing,
    pub pointer_angle: f64,
    pub layout_policy: LayoutPolicy,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            base_full_turns: 8,
            duration_ms: 4000,
            easing: Easing::CubicOut,
            pointer_angle: 0.0,
            layout_policy: LayoutPolicy::Snapshot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataSettings {
    pub api_url: Option<String>,
    pub static_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            static_path: None,
            timeout_secs: 10,
        }
    }
}

impl DataSettings {
    /// The static snapshot to read: the configured path, then the XDG data
    /// dirs, then `data/foods.json` under the working directory.
    pub fn static_snapshot_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.static_path {
            return Some(path.clone());
        }

        xdg::BaseDirectories::new()
            .find_data_file(STATIC_SNAPSHOT)
            .or_else(|| {
                let local = PathBuf::from("data/foods.json");
                local.exists().then_some(local)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UiSettings {
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    pub wheel: WheelSettings,
    pub spin: SpinSettings,
    pub data: DataSettings,
    pub ui: UiSettings,
}

impl Settings {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.wheel.max_slots == 0 {
            return Err(ConfigError::Invalid("wheel.max_slots must be at least 1".into()));
        }
        if self.wheel.label_max_chars < 2 {
            return Err(ConfigError::Invalid(
                "wheel.label_max_chars must be at least 2".into(),
            ));
        }
        if !(5..=8).contains(&self.spin.base_full_turns) {
            return Err(ConfigError::Invalid(format!(
                "spin.base_full_turns must be within 5..=8, got {}",
                self.spin.base_full_turns
            )));
        }
        if self.spin.duration_ms == 0 {
            return Err(ConfigError::Invalid("spin.duration_ms must be positive".into()));
        }
        if !self.spin.pointer_angle.is_finite() {
            return Err(ConfigError::Invalid("spin.pointer_angle must be finite".into()));
        }
        Ok(self)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "foodwheel", "foodwheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Settings, ConfigError> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()
}

pub fn load_config() -> Result<Settings, ConfigError> {
    let config_path = get_config_path()?;

    build(
        config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(environment()),
    )
}

/// Parses settings from TOML text, without touching the file system or the
/// process environment.
pub fn parse_config(toml: &str) -> Result<Settings, ConfigError> {
    build(
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
    )
}

pub fn load_or_default() -> Settings {
    match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Falling back to default settings: {}", e);
            Settings::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
