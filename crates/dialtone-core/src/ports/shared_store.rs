//! SharedStore port - 共有キー／バリュー・ハッシュ・キューストア
//!
//! タスク状態の正本と配送キューを兼ねる外部ストア（本番では Redis 系）への
//! インターフェースです。ここでは「コアが要求する能力」だけを定義し、
//! 具体的なプロダクトの API は再実装しません。
//!
//! # 実装
//! - **InMemoryStore**（`impls::memory_store`）: 開発・テスト用
//! - 本番用のストアアダプタは別クレートに配置します（この trait が継ぎ目）

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Store operation failure.
///
/// Never retried inside the core: intake turns it into a failed request,
/// the worker lets it end the current loop iteration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store is unreachable (connection refused, timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A command was rejected or failed mid-flight.
    #[error("store operation failed: {0}")]
    OperationFailed(String),
}

/// One command inside a batched submission ([`SharedStore::pipeline`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// `SET key value`
    Set { key: String, value: String },
    /// `HSET key field value`
    HSet {
        key: String,
        field: String,
        value: String,
    },
    /// `LPUSH queue value`
    LPush { queue: String, value: String },
    /// `DEL key`
    Del { key: String },
}

/// Shared store capability contract.
///
/// # 設計原則
/// - `hscan` はカーソルベース（巨大なハッシュを 1 レスポンスで返さない）
/// - `brpop` は blocking（`timeout: None` で無期限待ち）。pop-and-remove なので
///   1 つの値は必ず 1 人の consumer にだけ配送される
/// - `pipeline` は 1 round trip で複数コマンドを送る。このクライアントから見て
///   バッチ途中の部分適用は観測されない
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// `GET key` — None if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// `SET key value`
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// `HSET key field value`
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// `HGETALL key` — full mapping (empty if the key is absent).
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// `HSCAN key cursor` — one page of (field, value) pairs plus the next
    /// cursor. Iteration starts at cursor 0 and is finished when the
    /// returned cursor is 0 again.
    async fn hscan(
        &self,
        key: &str,
        cursor: u64,
    ) -> Result<(u64, Vec<(String, String)>), StoreError>;

    /// `LPUSH queue value`
    async fn lpush(&self, queue: &str, value: &str) -> Result<(), StoreError>;

    /// `BRPOP queue timeout` — blocks until a value is available. `None`
    /// timeout blocks indefinitely; an elapsed timeout yields `Ok(None)`.
    async fn brpop(
        &self,
        queue: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<String>, StoreError>;

    /// `DEL key`
    async fn del(&self, key: &str) -> Result<(), StoreError>;

    /// Submit several commands as one round trip.
    async fn pipeline(&self, commands: Vec<StoreCommand>) -> Result<(), StoreError>;
}
