//! PhoneResolver port - 番号解決ライブラリの抽象化
//!
//! 番号 → 「国: キャリア」の解決は外部ライブラリの仕事で、ここでは純関数
//! として扱います。CPU-bound かつ blocking な前提なので、ワーカーは
//! `spawn_blocking` 経由で呼びます（async trait にはしない）。
//!
//! # 実装
//! - **PrefixResolver**（`impls::prefix_resolver`）: 開発・テスト用
//! - 本番用のライブラリアダプタはこの trait の向こう側

use thiserror::Error;

/// Failure of a single resolution call.
///
/// Recorded per number as an `"Error: ..."` value in the result map;
/// never aborts the surrounding task.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The input is not a parsable phone number.
    #[error("invalid phone number: {0}")]
    Invalid(String),

    /// The library failed for a reason other than the input's shape.
    #[error("resolution failed: {0}")]
    Failed(String),
}

/// Resolves one phone number to a `"{country}: {carrier}"` string.
///
/// The carrier part may be empty (`"United States: "`); the separator is
/// always present. Inputs arrive already normalized (leading `+`).
pub trait PhoneResolver: Send + Sync {
    fn resolve(&self, number: &str) -> Result<String, ResolveError>;
}

impl<F> PhoneResolver for F
where
    F: Fn(&str) -> Result<String, ResolveError> + Send + Sync,
{
    fn resolve(&self, number: &str) -> Result<String, ResolveError> {
        self(number)
    }
}

/// Prefix the number with `+` if the caller omitted it.
///
/// The only normalization the worker performs; everything else is the
/// resolver's business.
pub fn normalize(number: &str) -> String {
    if number.starts_with('+') {
        number.to_string()
    } else {
        format!("+{number}")
    }
}
