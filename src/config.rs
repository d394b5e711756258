//! Worker configuration, passed from JavaScript to `start_worker`.
//!
//! ```js
//! wasm_bindgen.start_worker({ log: true });
//! wasm_bindgen.start_worker({ logLevel: "debug" });
//! ```

use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerConfig {
    /// Verbose logging. Off by default: only warnings and errors reach
    /// the console.
    pub log: bool,
    /// Explicit level name ("off", "error", "warn", "info", "debug",
    /// "trace"). Overrides `log` when it parses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl WorkerConfig {
    pub fn level_filter(&self) -> LevelFilter {
        if let Some(level) = self.log_level.as_deref().and_then(|l| l.parse::<LevelFilter>().ok()) {
            return level;
        }
        if self.log { LevelFilter::Info } else { LevelFilter::Warn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_by_default() {
        assert_eq!(WorkerConfig::default().level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn log_flag_enables_info() {
        let cfg = WorkerConfig { log: true, log_level: None };
        assert_eq!(cfg.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn explicit_level_wins() {
        let cfg: WorkerConfig = serde_json::from_str(r#"{ "log": false, "logLevel": "debug" }"#).unwrap();
        assert_eq!(cfg.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn unknown_level_ignored() {
        let cfg = WorkerConfig {
            log: true,
            log_level: Some("chatty".to_string()),
        };
        assert_eq!(cfg.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn missing_fields_default() {
        let cfg: WorkerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, WorkerConfig::default());
    }
}
