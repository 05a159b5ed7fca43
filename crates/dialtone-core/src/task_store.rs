//! TaskStore - タスクの作成・状態遷移・削除
//!
//! SharedStore の上でキースキームとキュー名を所有するコンポーネント。
//!
//! # キースキーム
//! - `task:{id}:status` — 状態文字列（accepted / processing / processed）
//! - `task:{id}:phones` — 番号 → 結果のハッシュ
//! - キュー（既定名 `tasks`）には素の task id 文字列のみ
//!
//! # 設計原則
//! - 1 タスク分の書き込みは 1 pipeline（部分的な可視状態を作らない）
//! - 状態遷移はこの境界で検証する（呼び出し側の文字列操作を信用しない）
//! - ストア障害はリトライせず TaskError としてそのまま伝播

use std::sync::Arc;

use crate::domain::{PLACEHOLDER, ResultMap, TaskError, TaskId, TaskStatus};
use crate::ports::{SharedStore, StoreCommand};

/// Task creation, status transitions and deletion over the shared store.
#[derive(Clone)]
pub struct TaskStore {
    store: Arc<dyn SharedStore>,
    queue: String,
}

impl TaskStore {
    pub fn new(store: Arc<dyn SharedStore>, queue: impl Into<String>) -> Self {
        Self {
            store,
            queue: queue.into(),
        }
    }

    fn status_key(id: TaskId) -> String {
        format!("task:{id}:status")
    }

    fn phones_key(id: TaskId) -> String {
        format!("task:{id}:phones")
    }

    /// Create a task: status `accepted`, one placeholder per phone, id on
    /// the queue — all as a single batched round trip.
    ///
    /// The enqueue is part of the same batch as the phone map, so a worker
    /// can never pop an id whose map is still incomplete. Phone syntax is
    /// not validated here; malformed numbers surface later as per-number
    /// errors.
    pub async fn create_task(&self, id: TaskId, phones: &[String]) -> Result<(), TaskError> {
        let mut commands = Vec::with_capacity(phones.len() + 2);
        commands.push(StoreCommand::Set {
            key: Self::status_key(id),
            value: TaskStatus::Accepted.as_str().to_string(),
        });
        for phone in phones {
            commands.push(StoreCommand::HSet {
                key: Self::phones_key(id),
                field: phone.clone(),
                value: PLACEHOLDER.to_string(),
            });
        }
        commands.push(StoreCommand::LPush {
            queue: self.queue.clone(),
            value: id.to_string(),
        });

        self.store.pipeline(commands).await?;
        Ok(())
    }

    /// Current status, or `None` for "never existed / already fetched".
    pub async fn read_status(&self, id: TaskId) -> Result<Option<TaskStatus>, TaskError> {
        match self.store.get(&Self::status_key(id)).await? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<TaskStatus>()
                .map(Some)
                .map_err(|e| TaskError::Corrupt(e.to_string())),
        }
    }

    /// Advance the status, enforcing `accepted -> processing -> processed`.
    pub async fn set_status(&self, id: TaskId, next: TaskStatus) -> Result<(), TaskError> {
        let current = self
            .read_status(id)
            .await?
            .ok_or(TaskError::UnknownTask(id))?;
        if !current.can_advance_to(next) {
            return Err(TaskError::InvalidTransition {
                id,
                from: current,
                to: next,
            });
        }
        self.store
            .set(&Self::status_key(id), next.as_str())
            .await?;
        Ok(())
    }

    /// Full phone map via the incremental cursor scan.
    ///
    /// Scales to large batches without one oversized response; the worker
    /// only wants the keys, the values here are still placeholders.
    pub async fn read_all_phones(&self, id: TaskId) -> Result<ResultMap, TaskError> {
        let key = Self::phones_key(id);
        let mut phones = ResultMap::new();
        let mut cursor = 0;
        loop {
            let (next, page) = self.store.hscan(&key, cursor).await?;
            phones.extend(page);
            if next == 0 {
                return Ok(phones);
            }
            cursor = next;
        }
    }

    /// Full phone map in one response (intake's single-shot result read).
    pub async fn read_results(&self, id: TaskId) -> Result<ResultMap, TaskError> {
        Ok(self.store.hgetall(&Self::phones_key(id)).await?)
    }

    /// Write all resolved values back in one batched round trip.
    pub async fn write_results(&self, id: TaskId, results: &ResultMap) -> Result<(), TaskError> {
        let key = Self::phones_key(id);
        let commands = results
            .iter()
            .map(|(phone, value)| StoreCommand::HSet {
                key: key.clone(),
                field: phone.clone(),
                value: value.clone(),
            })
            .collect();
        self.store.pipeline(commands).await?;
        Ok(())
    }

    /// Remove status and phone map in one batched round trip.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), TaskError> {
        self.store
            .pipeline(vec![
                StoreCommand::Del {
                    key: Self::phones_key(id),
                },
                StoreCommand::Del {
                    key: Self::status_key(id),
                },
            ])
            .await?;
        Ok(())
    }

    /// Blocking dequeue of the next task id (`None` timeout blocks
    /// indefinitely; an elapsed timeout yields `Ok(None)`).
    pub async fn dequeue(
        &self,
        timeout: Option<std::time::Duration>,
    ) -> Result<Option<TaskId>, TaskError> {
        match self.store.brpop(&self.queue, timeout).await? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<TaskId>()
                .map(Some)
                .map_err(|e| TaskError::Corrupt(format!("bad task id on queue {raw:?}: {e}"))),
        }
    }
}
