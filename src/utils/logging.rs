//! Structured Logging with Sensitive Data Redaction
//!
//! Log lines go to stderr as `[timestamp] LEVEL [module] message | k=v ...`.
//! Field values are redacted by key:
//! - viewing keys and API keys are fully hidden
//! - wallet addresses show only a prefix and suffix

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag to enable/disable debug logging
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Environment variable that turns on debug output
pub const DEBUG_ENV: &str = "BRIDGE_DEBUG";

pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

/// Enable debug logging when `BRIDGE_DEBUG` is set to `1` or `true`
pub fn init_from_env() {
    if let Ok(value) = std::env::var(DEBUG_ENV) {
        if value == "1" || value.eq_ignore_ascii_case("true") {
            enable_debug();
        }
    }
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Structured log entry
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the log entry (auto-redacts sensitive data)
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let value_str = value.to_string();
        let redacted = redact_if_sensitive(key, &value_str);
        self.fields.push((key, redacted));
        self
    }

    /// Render without timestamp
    pub fn render(&self) -> String {
        let fields_str = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        if fields_str.is_empty() {
            format!("{} [{}] {}", self.level, self.module, self.message)
        } else {
            format!("{} [{}] {} | {}", self.level, self.module, self.message, fields_str)
        }
    }

    pub fn log(self) {
        if self.level == LogLevel::Debug && !is_debug_enabled() {
            return;
        }

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        eprintln!("[{}] {}", timestamp, self.render());
    }
}

fn redact_if_sensitive(key: &str, value: &str) -> String {
    let key_lower = key.to_lowercase();

    let fully_redacted_keys = ["viewing_key", "api_key", "apikey", "secret", "password", "auth"];
    if fully_redacted_keys.iter().any(|k| key_lower.contains(k)) {
        return redact_value(value);
    }

    // Token contracts are public; wallet addresses are not
    let address_keys = ["address", "user", "owner", "sender", "recipient"];
    if address_keys.iter().any(|k| key_lower.contains(k)) && !key_lower.contains("token") {
        return redact_address(value);
    }

    value.to_string()
}

fn redact_value(value: &str) -> String {
    if value.is_empty() {
        return "[EMPTY]".to_string();
    }

    let len = value.len();
    if len <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED:{}chars]", len)
    }
}

/// Show the first and last characters of an address (`0x` and bech32 aware)
fn redact_address(address: &str) -> String {
    let trimmed = address.trim();

    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }

    if trimmed.len() <= 10 || !trimmed.is_ascii() {
        return redact_value(trimmed);
    }

    let prefix_len = if trimmed.starts_with("0x") {
        8
    } else {
        // keep the bech32 hrp plus a few data chars (terra1abc..., secret1xyz...)
        trimmed.find('1').map(|i| i + 5).unwrap_or(6)
    };
    let suffix_len = 4;

    if trimmed.len() <= prefix_len + suffix_len + 3 {
        return redact_value(trimmed);
    }

    format!("{}...{}", &trimmed[..prefix_len], &trimmed[trimmed.len() - suffix_len..])
}

#[macro_export]
macro_rules! log_debug {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Debug,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Debug,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_info {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Info,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Info,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_warn {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Warn,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Warn,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_error {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Error,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Error,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_value() {
        assert_eq!(redact_value(""), "[EMPTY]");
        assert_eq!(redact_value("abc"), "[REDACTED]");
        assert_eq!(redact_value("api_key_zzz_12345"), "[REDACTED:17chars]");
    }

    #[test]
    fn test_redact_evm_address() {
        let redacted = redact_address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        assert_eq!(redacted, "0xd8dA6B...6045");
    }

    #[test]
    fn test_redact_bech32_address() {
        let redacted = redact_address("terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v");
        assert_eq!(redacted, "terra1x46r...k38v");
    }

    #[test]
    fn test_redact_if_sensitive() {
        assert!(redact_if_sensitive("viewing_key", "api_key_abcdef").contains("REDACTED"));
        assert!(redact_if_sensitive("address", "terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v").contains("..."));
        // token contracts stay readable
        assert_eq!(
            redact_if_sensitive("token_address", "0xa47c8bf37f92aBed4A126BDA807A7b7498661acD"),
            "0xa47c8bf37f92aBed4A126BDA807A7b7498661acD"
        );
        assert_eq!(redact_if_sensitive("chain", "terra"), "terra");
    }

    #[test]
    fn test_render_entry() {
        let entry = LogEntry::new(LogLevel::Info, "aggregator", "Fetched balances")
            .field("chain", "bsc")
            .field("count", 3);
        assert_eq!(entry.render(), "INFO [aggregator] Fetched balances | chain=bsc count=3");
    }

    #[test]
    fn test_render_error_entry() {
        let err = crate::error::BridgeError::network_error("LCD unreachable");
        let entry = LogEntry::new(LogLevel::Error, "aggregator", "Asset list refresh failed")
            .field("from", "terra")
            .field("error", &err);
        assert_eq!(
            entry.render(),
            "ERROR [aggregator] Asset list refresh failed | from=terra error=[NetworkError] LCD unreachable"
        );
    }
}
