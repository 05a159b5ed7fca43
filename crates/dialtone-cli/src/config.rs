//! Environment-driven configuration.
//!
//! 外側のサーフェスのみ: ストアのアドレス、キュー名、並列度、ワーカー数。
//! 欠けている値や壊れた値は既定値にフォールバックします（起動を止めない）。

use dialtone_core::worker::default_concurrency;

/// Process configuration, overridable by environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Shared-store host (`DIALTONE_STORE_HOST`, default `localhost`).
    pub store_host: String,

    /// Shared-store port (`DIALTONE_STORE_PORT`, default `6379`).
    pub store_port: u16,

    /// Delivery queue name (`DIALTONE_QUEUE`, default `tasks`).
    pub queue: String,

    /// Per-task resolution bound (`DIALTONE_CONCURRENCY`, default:
    /// available processing units, minimum 2).
    pub concurrency: usize,

    /// Worker loops to run (`DIALTONE_WORKERS`, default 1).
    pub workers: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an injectable lookup (tests pass a map instead of the
    /// process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            store_host: lookup("DIALTONE_STORE_HOST").unwrap_or_else(|| "localhost".to_string()),
            store_port: parse_or(&lookup, "DIALTONE_STORE_PORT", 6379),
            queue: lookup("DIALTONE_QUEUE").unwrap_or_else(|| "tasks".to_string()),
            concurrency: parse_or(&lookup, "DIALTONE_CONCURRENCY", default_concurrency()).max(1),
            workers: parse_or(&lookup, "DIALTONE_WORKERS", 1).max(1),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.store_host, "localhost");
        assert_eq!(config.store_port, 6379);
        assert_eq!(config.queue, "tasks");
        assert!(config.concurrency >= 2);
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config_from(&[
            ("DIALTONE_STORE_HOST", "store.internal"),
            ("DIALTONE_STORE_PORT", "6380"),
            ("DIALTONE_QUEUE", "checks"),
            ("DIALTONE_CONCURRENCY", "8"),
            ("DIALTONE_WORKERS", "3"),
        ]);
        assert_eq!(config.store_host, "store.internal");
        assert_eq!(config.store_port, 6380);
        assert_eq!(config.queue, "checks");
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn broken_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("DIALTONE_STORE_PORT", "not-a-port"),
            ("DIALTONE_WORKERS", "-2"),
        ]);
        assert_eq!(config.store_port, 6379);
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn zero_workers_is_bumped_to_one() {
        let config = config_from(&[("DIALTONE_WORKERS", "0"), ("DIALTONE_CONCURRENCY", "0")]);
        assert_eq!(config.workers, 1);
        assert_eq!(config.concurrency, 1);
    }
}
