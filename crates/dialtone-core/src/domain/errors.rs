//! Errors - コンポーネントレベルのエラー型
//!
//! 番号単位の失敗はここには現れません（結果マップに `"Error: ..."` として
//! 吸収されます）。ここにあるのはタスク／ストアレベルの失敗で、どこでも
//! 自動リトライされず、そのまま呼び出し側へ伝播します。

use crate::domain::{TaskId, TaskStatus};
use crate::ports::shared_store::StoreError;
use thiserror::Error;

/// Task-level error (intake and worker surface).
#[derive(Debug, Error)]
pub enum TaskError {
    /// The shared store failed; not retried, propagated as-is.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A status update was requested for a task with no status record.
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),

    /// A status update would violate accepted -> processing -> processed.
    #[error("invalid status transition for task {id}: {from} -> {to}")]
    InvalidTransition {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    /// The store returned a value we cannot interpret (bad status string,
    /// unparsable task id on the queue).
    #[error("corrupt store value: {0}")]
    Corrupt(String),
}
