//! Intake - バッチ受付と結果取得
//!
//! トランスポート層（HTTP ルーティングやシリアライズ）はこの外側。ここは
//! 「番号リスト → task id」と「task id → 状態 or 結果」の 2 操作だけを持つ。
//!
//! 結果は一度しか読めません: `Processed` を読んだ呼び出しが同じ論理操作の
//! 中でタスクを削除するので、2 回目の取得は `NotFound` になります。

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{ResultMap, TaskError, TaskId, TaskStatus};
use crate::ports::IdGenerator;
use crate::task_store::TaskStore;

/// Outcome of a result lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Still in flight; poll again. Carries the observed status.
    Pending(TaskStatus),

    /// Done. The task was deleted as part of this read.
    Ready(ResultMap),

    /// Unknown id — never existed, or already fetched and deleted.
    NotFound,
}

/// Accepts phone batches and serves result lookups.
pub struct Intake {
    tasks: TaskStore,
    ids: Arc<dyn IdGenerator>,
}

impl Intake {
    pub fn new(tasks: TaskStore, ids: Arc<dyn IdGenerator>) -> Self {
        Self { tasks, ids }
    }

    /// Create a task for the batch and enqueue it; returns the fresh id.
    ///
    /// Empty batches are not rejected: they create a task with an empty
    /// phone map that the worker moves straight to `processed`.
    pub async fn submit(&self, phones: &[String]) -> Result<TaskId, TaskError> {
        let id = self.ids.generate_task_id();
        self.tasks.create_task(id, phones).await?;
        Ok(id)
    }

    /// Look up a task by id.
    ///
    /// `Processed` tasks are read in full and deleted in the same call.
    /// The read-then-delete is not atomic against a racing duplicate
    /// fetch; exactly one of the racers returns the mapping, the other
    /// observes `NotFound` (or the mapping too, if it reads before the
    /// delete lands — either way no third read ever succeeds).
    pub async fn fetch_result(&self, id: TaskId) -> Result<FetchOutcome, TaskError> {
        match self.tasks.read_status(id).await? {
            None => Ok(FetchOutcome::NotFound),
            Some(status) if status.is_pending() => Ok(FetchOutcome::Pending(status)),
            Some(_) => {
                let results = self.tasks.read_results(id).await?;
                self.tasks.delete_task(id).await?;
                Ok(FetchOutcome::Ready(results))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryStore;
    use crate::ports::{SystemClock, UlidGenerator};
    use ulid::Ulid;

    fn intake() -> Intake {
        let store = Arc::new(InMemoryStore::new());
        let tasks = TaskStore::new(store, "tasks");
        Intake::new(tasks, Arc::new(UlidGenerator::new(SystemClock)))
    }

    fn intake_with_tasks() -> (Intake, TaskStore) {
        let store = Arc::new(InMemoryStore::new());
        let tasks = TaskStore::new(store, "tasks");
        (
            Intake::new(tasks.clone(), Arc::new(UlidGenerator::new(SystemClock))),
            tasks,
        )
    }

    #[tokio::test]
    async fn submit_returns_distinct_ids() {
        let intake = intake();
        let a = intake.submit(&["15555550100".to_string()]).await.unwrap();
        let b = intake.submit(&["15555550100".to_string()]).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn fresh_task_is_pending_accepted() {
        let intake = intake();
        let id = intake.submit(&["15555550100".to_string()]).await.unwrap();

        assert_eq!(
            intake.fetch_result(id).await.unwrap(),
            FetchOutcome::Pending(TaskStatus::Accepted)
        );
        // Polling does not consume a pending task.
        assert_eq!(
            intake.fetch_result(id).await.unwrap(),
            FetchOutcome::Pending(TaskStatus::Accepted)
        );
    }

    #[tokio::test]
    async fn processing_task_reports_processing() {
        let (intake, tasks) = intake_with_tasks();
        let id = intake.submit(&["15555550100".to_string()]).await.unwrap();
        tasks.set_status(id, TaskStatus::Processing).await.unwrap();

        assert_eq!(
            intake.fetch_result(id).await.unwrap(),
            FetchOutcome::Pending(TaskStatus::Processing)
        );
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let intake = intake();
        let id = TaskId::from_ulid(Ulid::new());
        assert_eq!(intake.fetch_result(id).await.unwrap(), FetchOutcome::NotFound);
    }

    #[tokio::test]
    async fn processed_task_is_returned_once_then_gone() {
        let (intake, tasks) = intake_with_tasks();
        let id = intake.submit(&["15555550100".to_string()]).await.unwrap();

        // Drive the task to processed by hand (the worker's job).
        tasks.set_status(id, TaskStatus::Processing).await.unwrap();
        let mut results = ResultMap::new();
        results.insert("15555550100".to_string(), "United States: ".to_string());
        tasks.write_results(id, &results).await.unwrap();
        tasks.set_status(id, TaskStatus::Processed).await.unwrap();

        assert_eq!(
            intake.fetch_result(id).await.unwrap(),
            FetchOutcome::Ready(results)
        );
        // Deleted in the same logical operation: second fetch finds nothing.
        assert_eq!(intake.fetch_result(id).await.unwrap(), FetchOutcome::NotFound);
    }
}
