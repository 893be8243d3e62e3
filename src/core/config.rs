//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.clinav/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::de::IntoDeserializer;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crossterm::style::Color;

use crate::FailurePolicy;
use crate::core::menu::MenuStyle;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ClinavConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub statistics: Option<bool>,
    pub failure_policy: Option<FailurePolicy>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StyleConfig {
    pub title_colour: Option<String>,
    pub decoration_colour: Option<String>,
    pub prompt_colour: Option<String>,
    pub decoration: Option<String>,
    pub prompt: Option<String>,
}

/// Values given on the command line (None = flag not given).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub statistics: Option<bool>,
    pub failure_policy: Option<FailurePolicy>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;
pub const DEFAULT_LOG_FILE: &str = "clinav.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub statistics: bool,
    pub failure_policy: FailurePolicy,
    pub style: MenuStyle,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with_env(&ClinavConfig::default(), &CliOverrides::default(), |_| None)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.clinav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".clinav").join("config.toml"))
}

/// Load config from `~/.clinav/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ClinavConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ClinavConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(ClinavConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<ClinavConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ClinavConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ClinavConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# clinav configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# statistics = false                # Report status and duration after each command (CLINAV_STATISTICS)
# failure_policy = "propagate"      # "propagate" ends the session on a failed command, "report" keeps going
# log_level = "info"                # "off", "error", "warn", "info", "debug", "trace" (CLINAV_LOG_LEVEL)
# log_file = "clinav.log"

# [style]
# title_colour = "green"            # crossterm colour names: "dark_grey", "cyan", "ansi_(208)", "rgb_(255,0,0)"
# decoration_colour = "yellow"
# prompt_colour = "white"
# decoration = "-==< "
# prompt = "> "
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ClinavConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env<E>(config: &ClinavConfig, cli: &CliOverrides, env: E) -> ResolvedConfig
where
    E: Fn(&str) -> Option<String>,
{
    // Statistics: CLI → env → config → off
    let statistics = cli
        .statistics
        .or_else(|| env("CLINAV_STATISTICS").and_then(|v| parse_flag(&v)))
        .or(config.general.statistics)
        .unwrap_or(false);

    // Failure policy: CLI → config → default
    let failure_policy = cli
        .failure_policy
        .or(config.general.failure_policy)
        .unwrap_or_default();

    // Log level: env → config → default
    let log_level = env("CLINAV_LOG_LEVEL")
        .or_else(|| config.general.log_level.clone())
        .and_then(|level| match level.parse::<LevelFilter>() {
            Ok(filter) => Some(filter),
            Err(_) => {
                warn!("Unknown log level '{}', using {}", level, DEFAULT_LOG_LEVEL);
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    // Log file: CLI → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    ResolvedConfig {
        statistics,
        failure_policy,
        style: resolve_style(&config.style),
        log_level,
        log_file,
    }
}

/// Starts from the built-in menu style and applies every valid override.
fn resolve_style(style: &StyleConfig) -> MenuStyle {
    let defaults = MenuStyle::default();
    MenuStyle {
        title_colour: parse_colour(style.title_colour.as_deref(), defaults.title_colour),
        decoration_colour: parse_colour(
            style.decoration_colour.as_deref(),
            defaults.decoration_colour,
        ),
        prompt_colour: parse_colour(style.prompt_colour.as_deref(), defaults.prompt_colour),
        decoration: style.decoration.clone().unwrap_or(defaults.decoration),
        prompt: style.prompt.clone().unwrap_or(defaults.prompt),
    }
}

fn parse_colour(name: Option<&str>, fallback: Color) -> Color {
    let Some(name) = name else {
        return fallback;
    };
    // crossterm's serde form: named colours plus "ansi_(n)" and "rgb_(r,g,b)"
    let de: StrDeserializer<'_, ValueError> = name.into_deserializer();
    match Color::deserialize(de) {
        Ok(colour) => colour,
        Err(e) => {
            warn!("Unknown colour '{}' ({}), using {:?}", name, e, fallback);
            fallback
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring unrecognised boolean '{}'", other);
            None
        }
    }
}
