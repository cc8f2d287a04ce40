//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::key::DEFAULT_ESC_TIMEOUT;

#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// ESC look-ahead grace window (`ZMENU_ESC_TIMEOUT_MS`).
    pub esc_timeout: Duration,
    /// Plain output with no control sequences (`ZMENU_NO_ANSI=1` or `NO_COLOR`).
    pub no_ansi: bool,
    /// Append every terminal write to this file (`ZMENU_WRITE_LOG`).
    pub write_log: Option<String>,
    /// Directory for tracing logs (`ZMENU_LOG_DIR`).
    pub log_dir: Option<PathBuf>,
    /// Wait for Enter after a menu action returns (`ZMENU_PAUSE_AFTER_ACTION=0` disables).
    pub pause_after_action: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            esc_timeout: DEFAULT_ESC_TIMEOUT,
            no_ansi: false,
            write_log: None,
            log_dir: None,
            pause_after_action: true,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            esc_timeout: env_millis("ZMENU_ESC_TIMEOUT_MS").unwrap_or(defaults.esc_timeout),
            no_ansi: env_flag("ZMENU_NO_ANSI") || env_string_opt("NO_COLOR").is_some(),
            write_log: env_string_opt("ZMENU_WRITE_LOG"),
            log_dir: env_string_opt("ZMENU_LOG_DIR").map(PathBuf::from),
            pause_after_action: env_string_opt("ZMENU_PAUSE_AFTER_ACTION")
                .map_or(defaults.pause_after_action, |value| value != "0"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_millis(key: &str) -> Option<Duration> {
    let raw = env_string_opt(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric millisecond setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EnvConfig;
    use std::env;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    const KEYS: [&str; 6] = [
        "ZMENU_ESC_TIMEOUT_MS",
        "ZMENU_NO_ANSI",
        "NO_COLOR",
        "ZMENU_WRITE_LOG",
        "ZMENU_LOG_DIR",
        "ZMENU_PAUSE_AFTER_ACTION",
    ];

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    fn clear_all() -> Vec<EnvGuard> {
        KEYS.iter().map(|key| set_env_guard(key, None)).collect()
    }

    #[test]
    fn env_defaults() {
        let _lock = env_lock();
        let _guards = clear_all();

        let config = EnvConfig::from_env();
        assert_eq!(config.esc_timeout, Duration::from_millis(10));
        assert!(!config.no_ansi);
        assert!(config.write_log.is_none());
        assert!(config.log_dir.is_none());
        assert!(config.pause_after_action);
    }

    #[test]
    fn env_values_override_defaults() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g1 = set_env_guard("ZMENU_ESC_TIMEOUT_MS", Some("25"));
        let _g2 = set_env_guard("ZMENU_NO_ANSI", Some("1"));
        let _g3 = set_env_guard("ZMENU_WRITE_LOG", Some("/tmp/zmenu.log"));
        let _g4 = set_env_guard("ZMENU_LOG_DIR", Some("/tmp/zmenu-logs"));
        let _g5 = set_env_guard("ZMENU_PAUSE_AFTER_ACTION", Some("0"));

        let config = EnvConfig::from_env();
        assert_eq!(config.esc_timeout, Duration::from_millis(25));
        assert!(config.no_ansi);
        assert_eq!(config.write_log.as_deref(), Some("/tmp/zmenu.log"));
        assert_eq!(
            config.log_dir.as_deref(),
            Some(std::path::Path::new("/tmp/zmenu-logs"))
        );
        assert!(!config.pause_after_action);
    }

    #[test]
    fn no_color_convention_disables_ansi() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g = set_env_guard("NO_COLOR", Some("yes"));
        assert!(EnvConfig::from_env().no_ansi);
    }

    #[test]
    fn malformed_timeout_falls_back_to_default() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g = set_env_guard("ZMENU_ESC_TIMEOUT_MS", Some("soon"));
        assert_eq!(EnvConfig::from_env().esc_timeout, Duration::from_millis(10));
    }
}
