//! Local demo run: intake + worker group over the in-memory store.
//!
//! Submits one mixed batch (US number, UK number, junk), polls until the
//! result is ready, prints it as JSON, and shows that a second fetch
//! finds nothing. The production deployment swaps the in-memory store
//! for a real one behind the `SharedStore` seam.

mod config;

use std::sync::Arc;

use tokio::time::{Duration, sleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dialtone_core::impls::{InMemoryStore, PrefixResolver};
use dialtone_core::ports::{SystemClock, UlidGenerator};
use dialtone_core::{FetchOutcome, Intake, TaskStore, WorkerGroup};

use crate::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!(
        store = %format!("{}:{}", config.store_host, config.store_port),
        queue = %config.queue,
        workers = config.workers,
        concurrency = config.concurrency,
        "starting (demo runs on the in-memory store)"
    );

    // (A) ストア・task store・intake を用意
    let store = Arc::new(InMemoryStore::new());
    let tasks = TaskStore::new(store, config.queue.clone());
    let intake = Intake::new(tasks.clone(), Arc::new(UlidGenerator::new(SystemClock)));

    // (B) ワーカーを起動
    let group = WorkerGroup::spawn(
        config.workers,
        tasks,
        Arc::new(PrefixResolver::new()),
        config.concurrency,
    );

    // (C) バッチ投入（正常な番号 2 件 + 壊れた入力 1 件）
    let batch = vec![
        "15555550100".to_string(),
        "+442071838750".to_string(),
        "not-a-number".to_string(),
    ];
    let id = intake.submit(&batch).await.expect("submit failed");
    println!("submitted task: {id}");

    // (D) 完了をポーリングで待つ
    loop {
        match intake.fetch_result(id).await.expect("fetch failed") {
            FetchOutcome::Pending(status) => {
                println!("task {id}: {status}");
                sleep(Duration::from_millis(50)).await;
            }
            FetchOutcome::Ready(results) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&results).expect("results are serializable")
                );
                break;
            }
            FetchOutcome::NotFound => {
                println!("task {id}: not found");
                break;
            }
        }
    }

    // (E) 結果は一度きり: 2 回目の取得は not found
    match intake.fetch_result(id).await.expect("fetch failed") {
        FetchOutcome::NotFound => println!("second fetch: not found (result was consumed)"),
        other => println!("second fetch: unexpected {other:?}"),
    }

    group.shutdown_and_join().await;
}
