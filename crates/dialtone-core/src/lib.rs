//! dialtone-core
//!
//! Core building blocks for the Dialtone phone-batch checker.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, status, errors, task）
//! - **ports**: 抽象化レイヤー（SharedStore, PhoneResolver, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryStore, PrefixResolver — 開発・テスト用）
//! - **task_store**: タスクの作成・状態遷移・削除（SharedStore の上）
//! - **intake**: バッチ受付と結果取得（取得時に削除）
//! - **worker**: ワーカーループ（blocking dequeue → 並列解決 → 一括書き戻し）
//!
//! フロー: intake がタスクを作成してキューへ → worker が pop して番号を
//! 並列解決、結果を書き戻して processed に → intake が結果を返して削除。

pub mod domain;
pub mod impls;
pub mod intake;
pub mod ports;
pub mod task_store;
pub mod worker;

pub use self::domain::{PLACEHOLDER, TaskError, TaskId, TaskStatus};
pub use self::intake::{FetchOutcome, Intake};
pub use self::task_store::TaskStore;
pub use self::worker::{Worker, WorkerGroup};
