//! Application configuration persistence
//!
//! `AppConfig` itself lives in telop-types; this module adds platform
//! defaults and confy-backed load/save.

use telop_types::AppConfig;

fn default_log_directory() -> String {
    dirs::document_dir()
        .map(|p| p.join("CombatLogs"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_default()
}

fn default_telop_directory() -> String {
    dirs::config_dir()
        .map(|p| p.join("telop").join("telops"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_default()
}

/// Extension trait for AppConfig persistence
pub trait AppConfigExt {
    fn load() -> Self;
    fn load_with_defaults() -> Self;
    fn save(self);
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        confy::load("telop", "config").unwrap_or_else(|_| Self::load_with_defaults())
    }

    /// Load with platform-specific defaults (used when no config file exists)
    fn load_with_defaults() -> Self {
        let mut config = AppConfig::with_log_directory(default_log_directory());
        config.telop_directory = default_telop_directory();
        config
    }

    fn save(self) {
        if let Err(e) = confy::store("telop", "config", self) {
            tracing::error!(error = %e, "failed to save configuration");
        }
    }
}
