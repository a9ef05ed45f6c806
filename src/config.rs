//! Runtime configuration from the environment

use std::path::PathBuf;

pub const DEFAULT_INITIAL_WINDOW: &str = "MAIN";
pub const DEFAULT_CELL_NR: &str = "258840000000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LottusConfig {
    /// JSON menu file; the built-in demo menu is used when unset
    pub menu_path: Option<PathBuf>,
    pub initial_window: String,
    /// Cell number the console driver sends requests from
    pub cell_nr: String,
    /// End sessions when a `MESSAGE` window is shown
    pub finish_on_message: bool,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Default for LottusConfig {
    fn default() -> Self {
        Self {
            menu_path: None,
            initial_window: DEFAULT_INITIAL_WINDOW.to_string(),
            cell_nr: DEFAULT_CELL_NR.to_string(),
            finish_on_message: true,
            log_json: false,
        }
    }
}

impl LottusConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            menu_path: var("LOTTUS_MENU_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            initial_window: var("LOTTUS_INITIAL_WINDOW")
                .filter(|w| !w.is_empty())
                .unwrap_or(defaults.initial_window),
            cell_nr: var("LOTTUS_CELL_NR")
                .filter(|c| !c.is_empty())
                .unwrap_or(defaults.cell_nr),
            finish_on_message: var("LOTTUS_FINISH_ON_MESSAGE")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.finish_on_message),
            log_json: var("LOTTUS_LOG_JSON")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.log_json),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> LottusConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        LottusConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]), LottusConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("LOTTUS_MENU_PATH", "/etc/lottus/menu.json"),
            ("LOTTUS_INITIAL_WINDOW", "HOME"),
            ("LOTTUS_CELL_NR", "25884"),
            ("LOTTUS_FINISH_ON_MESSAGE", "off"),
            ("LOTTUS_LOG_JSON", "TRUE"),
        ]);
        assert_eq!(cfg.menu_path, Some(PathBuf::from("/etc/lottus/menu.json")));
        assert_eq!(cfg.initial_window, "HOME");
        assert_eq!(cfg.cell_nr, "25884");
        assert!(!cfg.finish_on_message);
        assert!(cfg.log_json);
    }

    #[test]
    fn ignores_empty_and_garbage() {
        let cfg = config(&[
            ("LOTTUS_MENU_PATH", ""),
            ("LOTTUS_INITIAL_WINDOW", ""),
            ("LOTTUS_FINISH_ON_MESSAGE", "maybe"),
        ]);
        assert_eq!(cfg, LottusConfig::default());
    }
}
