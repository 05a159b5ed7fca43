//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryStore**: 開発用の共有ストア（単一プロセス内）
//! - **PrefixResolver**: 国番号テーブルによる簡易リゾルバ
//!
//! # 本番用実装
//! 本番用の実装は別クレートに配置します（SharedStore / PhoneResolver が継ぎ目）:
//! - Redis 系ストアのアダプタ
//! - 番号メタデータライブラリのアダプタ

pub mod memory_store;
pub mod prefix_resolver;

// 主要な型を再エクスポート
pub use self::memory_store::InMemoryStore;
pub use self::prefix_resolver::PrefixResolver;
