//! Worker - ワーカーループ
//!
//! 1 ワーカー = 1 つの無限ループ:
//!
//! 1. キューを blocking dequeue（無期限）
//! 2. 状態 -> processing
//! 3. カーソルスキャンで番号キーを収集
//! 4. 番号ごとに並列解決（Semaphore で上限 N、リゾルバは blocking なので
//!    `spawn_blocking` に逃がす）
//! 5. 成功も番号単位の失敗もまとめて 1 pipeline で書き戻し
//! 6. 状態 -> processed
//!
//! 番号単位の失敗は `"Error: ..."` として結果に吸収されます。ストア障害は
//! 吸収しません: その iteration を打ち切り、タスクは processing のまま残り
//! ます（requeue もロールバックもしない、既知のギャップ）。
//!
//! 複数ワーカーの並走は安全: キューの pop-and-remove により 1 つの id は
//! ちょうど 1 つのワーカーにだけ配送されます。

use std::sync::Arc;

use tokio::sync::{Semaphore, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::domain::{ResultMap, TaskError, TaskId, TaskStatus};
use crate::ports::{PhoneResolver, normalize};
use crate::task_store::TaskStore;

/// Lower bound on the per-task resolution concurrency.
pub const MIN_CONCURRENCY: usize = 2;

/// Default concurrency: available processing units, at least
/// [`MIN_CONCURRENCY`].
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_CONCURRENCY)
        .max(MIN_CONCURRENCY)
}

/// One dequeue-resolve-write-back loop.
pub struct Worker {
    tasks: TaskStore,
    resolver: Arc<dyn PhoneResolver>,
    semaphore: Arc<Semaphore>,
}

impl Worker {
    /// `concurrency` bounds simultaneous resolutions per task; excess
    /// numbers queue behind the bound instead of being rejected.
    pub fn new(tasks: TaskStore, resolver: Arc<dyn PhoneResolver>, concurrency: usize) -> Self {
        Self {
            tasks,
            resolver,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Run until shutdown is requested or a store operation fails.
    ///
    /// A store failure is not caught here: the loop ends and the error
    /// surfaces to whoever spawned the worker. The task being processed
    /// at that moment stays `processing` indefinitely.
    pub async fn run(&self, shutdown_rx: &mut watch::Receiver<bool>) -> Result<(), TaskError> {
        loop {
            if *shutdown_rx.borrow() {
                return Ok(());
            }

            // The dequeue blocks indefinitely, so race it against shutdown.
            let id = tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        // Sender gone: stop taking new work.
                        return Ok(());
                    }
                    continue;
                }
                popped = self.tasks.dequeue(None) => match popped? {
                    Some(id) => id,
                    // Empty response means "no work yet", not an error.
                    None => continue,
                },
            };

            debug!(task = %id, "dequeued");
            self.process_task(id).await?;
        }
    }

    async fn process_task(&self, id: TaskId) -> Result<(), TaskError> {
        let started = Instant::now();
        self.tasks.set_status(id, TaskStatus::Processing).await?;

        // Only the keys matter here; the values are still placeholders.
        let phones: Vec<String> = self.tasks.read_all_phones(id).await?.into_keys().collect();

        let results = self.resolve_batch(&phones).await;
        if !results.is_empty() {
            self.tasks.write_results(id, &results).await?;
        }

        self.tasks.set_status(id, TaskStatus::Processed).await?;
        info!(
            task = %id,
            phones = phones.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "task processed"
        );
        Ok(())
    }

    /// Resolve every number concurrently under the semaphore bound.
    ///
    /// Every phone produces exactly one entry: the resolution string, or
    /// `"Error: ..."` for per-number failures (including a panicking
    /// resolver). Nothing is dropped and nothing aborts the batch.
    async fn resolve_batch(&self, phones: &[String]) -> ResultMap {
        let mut handles: Vec<(String, JoinHandle<String>)> = Vec::with_capacity(phones.len());

        for phone in phones {
            let phone = phone.clone();
            let resolver = Arc::clone(&self.resolver);
            let semaphore = Arc::clone(&self.semaphore);

            let handle = tokio::spawn({
                let phone = phone.clone();
                async move {
                    // The semaphore is never closed, so an Err only means the
                    // permit is skipped; holding the Ok keeps it until the
                    // blocking call returns.
                    let _permit = semaphore.acquire_owned().await;

                    let normalized = normalize(&phone);
                    let resolved = tokio::task::spawn_blocking(move || {
                        resolver
                            .resolve(&normalized)
                            .unwrap_or_else(|e| format!("Error: {e}"))
                    })
                    .await;

                    // JoinError here means the resolver panicked; still a
                    // per-number outcome, not a worker failure.
                    resolved.unwrap_or_else(|e| format!("Error: {e}"))
                }
            });
            handles.push((phone, handle));
        }

        let mut results = ResultMap::new();
        for (phone, handle) in handles {
            let value = handle
                .await
                .unwrap_or_else(|e| format!("Error: {e}"));
            results.insert(phone, value);
        }
        results
    }
}

/// Worker group handle.
/// - `request_shutdown()` でワーカー全体が止まる（実行中のタスクは完走）
/// - `shutdown_and_join()` で全ワーカーの終了を待てる
pub struct WorkerGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl WorkerGroup {
    /// Spawn `n` workers sharing the store and resolver.
    pub fn spawn(
        n: usize,
        tasks: TaskStore,
        resolver: Arc<dyn PhoneResolver>,
        concurrency: usize,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut joins = Vec::with_capacity(n);
        for worker_id in 0..n {
            let worker = Worker::new(tasks.clone(), Arc::clone(&resolver), concurrency);
            let mut rx = shutdown_rx.clone();

            let join = tokio::spawn(async move {
                if let Err(e) = worker.run(&mut rx).await {
                    // Store failure mid-iteration: not retried, not requeued.
                    // The current task stays `processing`; this worker exits.
                    error!(worker_id, error = %e, "worker stopped on store failure");
                }
            });
            joins.push(join);
        }

        Self { shutdown_tx, joins }
    }

    /// Request shutdown for all workers.
    /// In-flight tasks run to completion; only new dequeues stop.
    pub fn request_shutdown(&self) {
        // ignore send error: receivers may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for all workers.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for j in self.joins {
            let _ = j.await;
        }
    }
}
