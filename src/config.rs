//! Behavior configuration.
//!
//! Timing constants, thresholds, and user-facing messages for the behavior
//! modules. Values come from an optional `behaviors.toml` placed next to the
//! scenario files; stock defaults fill in everything the file leaves out.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [navigation]
//! breakpoint = 1024          # Viewport width at which the menu force-closes
//! resize_debounce_ms = 200
//! focus_delay_ms = 100       # Delay before focusing the first link on open
//!
//! [scrolling]
//! header_fallback_height = 80
//! spy_offset = 100
//! spy_throttle_ms = 100
//! scroll_top_threshold = 300
//! scroll_top_throttle_ms = 200
//!
//! [forms]
//! submit_latency_ms = 1000
//! redirect_delay_ms = 1500
//! redirect_target = "/thank_you.html"
//! min_message_length = 10
//!
//! [forms.messages]
//! required = "Šis lauks ir obligāts"
//! # ...
//!
//! [toasts]
//! lifetime_ms = 5000
//!
//! [counters]
//! duration_ms = 2000
//! frame_ms = 16
//! threshold = 0.5
//! ```
//!
//! Files are sparse. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE: &str = "behaviors.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorConfig {
    pub navigation: NavigationConfig,
    pub scrolling: ScrollingConfig,
    pub forms: FormsConfig,
    pub toasts: ToastConfig,
    pub counters: CounterConfig,
}

impl BehaviorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.counters.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Validation(
                "counters.threshold must be in (0, 1]".into(),
            ));
        }
        if self.counters.frame_ms == 0 || self.counters.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "counters.frame_ms and counters.duration_ms must be non-zero".into(),
            ));
        }
        if self.forms.redirect_target.trim().is_empty() {
            return Err(ConfigError::Validation(
                "forms.redirect_target must not be empty".into(),
            ));
        }
        if self.forms.min_message_length == 0 {
            return Err(ConfigError::Validation(
                "forms.min_message_length must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Viewport width (px) at or above which an open menu is closed.
    pub breakpoint: u32,
    pub resize_debounce_ms: u64,
    pub focus_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            breakpoint: 1024,
            resize_debounce_ms: 200,
            focus_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollingConfig {
    /// Header height used for anchor scrolling when no `.l-header` exists.
    pub header_fallback_height: f64,
    /// Added to the scroll offset before picking the scroll-spy section.
    pub spy_offset: f64,
    pub spy_throttle_ms: u64,
    /// Scroll offset above which the scroll-to-top button is visible.
    pub scroll_top_threshold: f64,
    pub scroll_top_throttle_ms: u64,
}

impl Default for ScrollingConfig {
    fn default() -> Self {
        Self {
            header_fallback_height: 80.0,
            spy_offset: 100.0,
            spy_throttle_ms: 100,
            scroll_top_threshold: 300.0,
            scroll_top_throttle_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormsConfig {
    /// Latency of the simulated submitter.
    pub submit_latency_ms: u64,
    /// Delay between the success toast and the redirect.
    pub redirect_delay_ms: u64,
    pub redirect_target: String,
    /// Minimum trimmed length of a non-empty `<textarea>` value.
    pub min_message_length: usize,
    pub messages: MessageConfig,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            submit_latency_ms: 1000,
            redirect_delay_ms: 1500,
            redirect_target: "/thank_you.html".to_string(),
            min_message_length: 10,
            messages: MessageConfig::default(),
        }
    }
}

/// User-facing form messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageConfig {
    pub required: String,
    pub invalid_email: String,
    pub invalid_phone: String,
    pub too_short: String,
    pub must_agree: String,
    pub form_invalid: String,
    pub submitted: String,
    pub submitting: String,
    pub submit_failed: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            required: "Šis lauks ir obligāts".to_string(),
            invalid_email: "Lūdzu, ievadiet derīgu e-pasta adresi".to_string(),
            invalid_phone: "Lūdzu, ievadiet derīgu tālruņa numuru".to_string(),
            too_short: "Ziņojumam jābūt vismaz 10 rakstzīmēm".to_string(),
            must_agree: "Jums jāpiekrīt, lai turpinātu".to_string(),
            form_invalid: "Lūdzu, aizpildiet visus obligātos laukus pareizi".to_string(),
            submitted: "Paldies! Jūsu pieprasījums ir nosūtīts veiksmīgi.".to_string(),
            submitting: "Nosūta...".to_string(),
            submit_failed: "Neizdevās nosūtīt pieprasījumu. Lūdzu, mēģiniet vēlreiz.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToastConfig {
    pub lifetime_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { lifetime_ms: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Nominal length of one count-up animation.
    pub duration_ms: u64,
    pub frame_ms: u64,
    /// Visible ratio at which a counter starts.
    pub threshold: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            frame_ms: 16,
            threshold: 0.5,
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BehaviorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `behaviors.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BehaviorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BehaviorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `behaviors.toml` in the given directory, falling back to
/// stock defaults for every missing key.
pub fn load_config(dir: &Path) -> Result<BehaviorConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Load config for a scenario directory, cascading from `root` down to `dir`.
///
/// Each `behaviors.toml` on the way overrides its parent, so a sub-directory
/// only needs to state what differs. When `dir` is not under `root`, only
/// `dir` itself is consulted.
pub fn load_cascaded_config(root: &Path, dir: &Path) -> Result<BehaviorConfig, ConfigError> {
    let Ok(relative) = dir.strip_prefix(root) else {
        return load_config(dir);
    };
    let mut merged = stock_defaults_value();
    let mut current = root.to_path_buf();
    if let Some(overlay) = load_raw_config(&current)? {
        merged = merge_toml(merged, overlay);
    }
    for component in relative.components() {
        current.push(component);
        if let Some(overlay) = load_raw_config(&current)? {
            merged = merge_toml(merged, overlay);
        }
    }
    resolve_config(merged, None)
}

/// Returns a fully-commented stock `behaviors.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Page Behaviors Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as `behaviors.toml` in the scenario directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Navigation menu
# ---------------------------------------------------------------------------
[navigation]
# An open menu closes when the viewport grows to at least this width (px).
breakpoint = 1024
# Resize events are debounced by this many milliseconds.
resize_debounce_ms = 200
# Delay before the first menu link receives focus after opening.
focus_delay_ms = 100

# ---------------------------------------------------------------------------
# Scrolling
# ---------------------------------------------------------------------------
[scrolling]
# Header height subtracted from anchor targets when the page has no .l-header.
header_fallback_height = 80
# Scroll-spy looks this far below the current scroll offset.
spy_offset = 100
spy_throttle_ms = 100
# The scroll-to-top button is shown past this offset.
scroll_top_threshold = 300
scroll_top_throttle_ms = 200

# ---------------------------------------------------------------------------
# Forms
# ---------------------------------------------------------------------------
[forms]
# Simulated submission latency.
submit_latency_ms = 1000
# Delay between the success notice and the redirect.
redirect_delay_ms = 1500
redirect_target = "/thank_you.html"
# Minimum length of a textarea message.
min_message_length = 10

[forms.messages]
required = "Šis lauks ir obligāts"
invalid_email = "Lūdzu, ievadiet derīgu e-pasta adresi"
invalid_phone = "Lūdzu, ievadiet derīgu tālruņa numuru"
too_short = "Ziņojumam jābūt vismaz 10 rakstzīmēm"
must_agree = "Jums jāpiekrīt, lai turpinātu"
form_invalid = "Lūdzu, aizpildiet visus obligātos laukus pareizi"
submitted = "Paldies! Jūsu pieprasījums ir nosūtīts veiksmīgi."
submitting = "Nosūta..."
submit_failed = "Neizdevās nosūtīt pieprasījumu. Lūdzu, mēģiniet vēlreiz."

# ---------------------------------------------------------------------------
# Toast notifications
# ---------------------------------------------------------------------------
[toasts]
lifetime_ms = 5000

# ---------------------------------------------------------------------------
# Count-up counters
# ---------------------------------------------------------------------------
[counters]
duration_ms = 2000
frame_ms = 16
# Fraction of the counter that must be visible before it starts.
threshold = 0.5
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_documented_values() {
        let config = BehaviorConfig::default();
        assert_eq!(config.navigation.breakpoint, 1024);
        assert_eq!(config.scrolling.spy_offset, 100.0);
        assert_eq!(config.forms.redirect_target, "/thank_you.html");
        assert_eq!(config.toasts.lifetime_ms, 5000);
        assert_eq!(config.counters.threshold, 0.5);
    }

    #[test]
    fn stock_toml_parses_to_defaults() {
        let parsed: BehaviorConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, BehaviorConfig::default());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, BehaviorConfig::default());
    }

    #[test]
    fn load_config_reads_sparse_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[forms]
submit_latency_ms = 250

[forms.messages]
required = "Required"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.forms.submit_latency_ms, 250);
        assert_eq!(config.forms.messages.required, "Required");
        // Unspecified values keep their defaults
        assert_eq!(config.forms.redirect_delay_ms, 1500);
        assert_eq!(
            config.forms.messages.invalid_email,
            MessageConfig::default().invalid_email
        );
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "not valid [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[navigation]\nbreakpiont = 900\n",
        )
        .unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[toasts]\nlifetime_ms = 5000\nextra = 1\n").unwrap();
        let overlay: toml::Value = toml::from_str("[toasts]\nlifetime_ms = 10\n").unwrap();
        let merged = merge_toml(base, overlay);
        let toasts = merged.get("toasts").unwrap();
        assert_eq!(toasts.get("lifetime_ms").unwrap().as_integer(), Some(10));
        assert_eq!(toasts.get("extra").unwrap().as_integer(), Some(1));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[a]\nb = 1\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2\n").unwrap();
        assert_eq!(
            merge_toml(base, overlay).get("a").unwrap().as_integer(),
            Some(2)
        );
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(BehaviorConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_threshold_range() {
        let mut config = BehaviorConfig::default();
        config.counters.threshold = 0.0;
        assert!(config.validate().is_err());
        config.counters.threshold = 1.0;
        assert!(config.validate().is_ok());
        config.counters.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_frame_rejected() {
        let mut config = BehaviorConfig::default();
        config.counters.frame_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn cascaded_config_child_overrides_root() {
        let tmp = TempDir::new().unwrap();
        let child = tmp.path().join("forms");
        fs::create_dir_all(&child).unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[toasts]\nlifetime_ms = 3000\n[forms]\nredirect_target = \"/paldies.html\"\n",
        )
        .unwrap();
        fs::write(child.join(CONFIG_FILE), "[toasts]\nlifetime_ms = 1000\n").unwrap();

        let config = load_cascaded_config(tmp.path(), &child).unwrap();
        assert_eq!(config.toasts.lifetime_ms, 1000);
        assert_eq!(config.forms.redirect_target, "/paldies.html");
        assert_eq!(config.forms.submit_latency_ms, 1000);

        let root_only = load_cascaded_config(tmp.path(), tmp.path()).unwrap();
        assert_eq!(root_only.toasts.lifetime_ms, 3000);
    }

    #[test]
    fn cascaded_config_outside_root_reads_dir_only() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE), "[toasts]\nlifetime_ms = 3000\n").unwrap();
        let config = load_cascaded_config(root.path(), elsewhere.path()).unwrap();
        assert_eq!(config, BehaviorConfig::default());
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[forms]\nredirect_target = \"\"\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
