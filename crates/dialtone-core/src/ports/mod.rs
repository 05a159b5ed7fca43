//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（共有ストア、番号解決ライブラリ）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - 共有ストアが唯一の共有可変リソース（タスク状態と配送キュー）
//! - キューには task_id の素の文字列のみを流す（状態・結果はストアのハッシュに）
//! - 番号解決は blocking な純関数として扱う（ワーカーが spawn_blocking で呼ぶ）

pub mod clock;
pub mod id_generator;
pub mod resolver;
pub mod shared_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::resolver::{PhoneResolver, ResolveError, normalize};
pub use self::shared_store::{SharedStore, StoreCommand, StoreError};
