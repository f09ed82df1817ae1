//! Configuration for Glaze
//!
//! This module provides the configuration system with:
//! - XDG-compliant config file location
//! - CLI argument overrides
//! - Environment variable support
//! - Config precedence: CLI > env > file > defaults
//! - Validation with the offending field in the error

use clap::Parser;
use glaze_input::RunnerTiming;
use glaze_protocol::Rgb;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI arguments for Glaze
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "glaze")]
#[command(author = "Glaze Contributors")]
#[command(version)]
#[command(
    about = "Pixel front-end for a remote editor: redraw batches on stdin, input on stdout",
    long_about = None
)]
pub struct CliArgs {
    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to a TrueType font
    #[arg(long, value_name = "FONT")]
    pub font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long, value_name = "SIZE")]
    pub font_size: Option<f32>,

    /// Initial grid columns
    #[arg(long, value_name = "COLS")]
    pub columns: Option<u16>,

    /// Initial grid rows
    #[arg(long, value_name = "ROWS")]
    pub rows: Option<u16>,

    /// Command script table, one row per line
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    /// TrueType font file (None = probe well-known monospace fonts)
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Font size in pixels
    #[serde(default = "default_font_size")]
    pub size: f32,
}

fn default_font_size() -> f32 {
    16.0
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: default_font_size(),
        }
    }
}

/// Default colours, restored when the editor resets them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Foreground color (hex)
    #[serde(default = "default_foreground")]
    pub foreground: String,
    /// Background color (hex)
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_foreground() -> String {
    "#ffffff".to_string()
}
fn default_background() -> String {
    // Dark slate gray
    "#2f4f4f".to_string()
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            foreground: default_foreground(),
            background: default_background(),
        }
    }
}

/// Script runner delays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Wait between highlighting a row and sending it (ms)
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Wait after sending a row before the next one (ms)
    #[serde(default = "default_completion_delay")]
    pub completion_delay_ms: u64,
}

fn default_settle_delay() -> u64 {
    500
}
fn default_completion_delay() -> u64 {
    1500
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            completion_delay_ms: default_completion_delay(),
        }
    }
}

/// Keybindings configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindingsConfig {
    /// Start running the loaded script table
    #[serde(default = "default_run_script_key")]
    pub run_script: String,
}

fn default_run_script_key() -> String {
    "ctrl+shift+r".to_string()
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            run_script: default_run_script_key(),
        }
    }
}

/// A parsed key combination such as `ctrl+shift+r`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Lowercase key character
    pub key: char,
}

impl KeyBinding {
    pub fn parse(text: &str) -> Option<Self> {
        let mut binding = KeyBinding {
            ctrl: false,
            shift: false,
            alt: false,
            key: '\0',
        };
        let mut key = None;
        for part in text.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => binding.ctrl = true,
                "shift" => binding.shift = true,
                "alt" => binding.alt = true,
                other => {
                    let mut chars = other.chars();
                    let (Some(c), None) = (chars.next(), chars.next()) else {
                        return None;
                    };
                    if key.replace(c).is_some() {
                        return None;
                    }
                }
            }
        }
        binding.key = key?;
        Some(binding)
    }

    pub fn matches(&self, key: char, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key == key.to_ascii_lowercase()
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Font configuration
    #[serde(default)]
    pub font: FontConfig,

    /// Grid dimensions (columns, rows)
    #[serde(default = "default_dimensions")]
    pub dimensions: (u16, u16),

    /// Default colours
    #[serde(default)]
    pub colors: ColorConfig,

    /// Cursor blink
    #[serde(default = "default_true")]
    pub cursor_blink: bool,

    /// Script runner delays
    #[serde(default)]
    pub script: ScriptConfig,

    /// Keybindings
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

fn default_dimensions() -> (u16, u16) {
    (80, 24)
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            dimensions: default_dimensions(),
            colors: ColorConfig::default(),
            cursor_blink: true,
            script: ScriptConfig::default(),
            keybindings: KeybindingsConfig::default(),
        }
    }
}

/// Configuration error
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
    pub field: Option<String>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Config error in '{}': {}", field, self.message)
        } else {
            write!(f, "Config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

/// Upper bound for either script delay
const MAX_DELAY_MS: u64 = 60_000;

impl Config {
    /// Load configuration with full precedence:
    /// CLI args > environment variables > config file > defaults
    pub fn load_with_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        let config_path = args.config.clone().or_else(Self::default_config_path);
        if let Some(path) = &config_path {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(file_config) => config = file_config,
                    Err(e) => {
                        log::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        config.apply_env_vars();
        config.apply_cli_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("Failed to read config file: {}", e),
            field: None,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError {
            message: format!("Failed to parse config file: {}", e),
            field: None,
        })
    }

    /// Apply environment variables to config
    fn apply_env_vars(&mut self) {
        if let Ok(val) = env::var("GLAZE_FONT") {
            self.font.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var("GLAZE_FONT_SIZE") {
            if let Ok(size) = val.parse() {
                self.font.size = size;
            }
        }
        if let Ok(val) = env::var("GLAZE_COLUMNS") {
            if let Ok(cols) = val.parse() {
                self.dimensions.0 = cols;
            }
        }
        if let Ok(val) = env::var("GLAZE_ROWS") {
            if let Ok(rows) = val.parse() {
                self.dimensions.1 = rows;
            }
        }
    }

    /// Apply CLI arguments to config
    fn apply_cli_args(&mut self, args: &CliArgs) {
        if let Some(font) = &args.font {
            self.font.path = Some(font.clone());
        }
        if let Some(size) = args.font_size {
            self.font.size = size;
        }
        if let Some(cols) = args.columns {
            self.dimensions.0 = cols;
        }
        if let Some(rows) = args.rows {
            self.dimensions.1 = rows;
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if !(4.0..=200.0).contains(&self.font.size) {
            return Err(ConfigError {
                message: "Font size must be between 4.0 and 200.0".to_string(),
                field: Some("font.size".to_string()),
            });
        }

        if self.dimensions.0 < 10 {
            return Err(ConfigError {
                message: "Columns must be at least 10".to_string(),
                field: Some("dimensions".to_string()),
            });
        }
        if self.dimensions.1 < 3 {
            return Err(ConfigError {
                message: "Rows must be at least 3".to_string(),
                field: Some("dimensions".to_string()),
            });
        }

        validate_color(&self.colors.foreground, "colors.foreground")?;
        validate_color(&self.colors.background, "colors.background")?;

        for (delay, field) in [
            (self.script.settle_delay_ms, "script.settle_delay_ms"),
            (self.script.completion_delay_ms, "script.completion_delay_ms"),
        ] {
            if delay > MAX_DELAY_MS {
                return Err(ConfigError {
                    message: format!("Delay must be at most {} ms", MAX_DELAY_MS),
                    field: Some(field.to_string()),
                });
            }
        }

        if KeyBinding::parse(&self.keybindings.run_script).is_none() {
            return Err(ConfigError {
                message: format!(
                    "Invalid key binding '{}'. Expected e.g. ctrl+shift+r",
                    self.keybindings.run_script
                ),
                field: Some("keybindings.run_script".to_string()),
            });
        }

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("glaze").join("config.toml"))
    }

    pub fn foreground(&self) -> Rgb {
        Rgb::parse_hex(&self.colors.foreground).unwrap_or(Rgb::WHITE)
    }

    pub fn background(&self) -> Rgb {
        Rgb::parse_hex(&self.colors.background).unwrap_or(Rgb::new(0x2f, 0x4f, 0x4f))
    }

    pub fn runner_timing(&self) -> RunnerTiming {
        RunnerTiming {
            settle: Duration::from_millis(self.script.settle_delay_ms),
            completion: Duration::from_millis(self.script.completion_delay_ms),
        }
    }

    pub fn run_script_binding(&self) -> Option<KeyBinding> {
        KeyBinding::parse(&self.keybindings.run_script)
    }
}

/// Validate a hex color string
fn validate_color(color: &str, field: &str) -> Result<(), ConfigError> {
    if Rgb::parse_hex(color).is_none() {
        return Err(ConfigError {
            message: format!("Invalid hex color '{}'. Expected format: #RRGGBB", color),
            field: Some(field.to_string()),
        });
    }
    Ok(())
}
