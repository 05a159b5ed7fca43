//! In-memory shared-store implementation.
//!
//! Single-process stand-in for the external store: plain maps behind one
//! tokio `Mutex`, a `Notify` to wake blocked `brpop` callers, and an
//! offset-based `hscan` cursor. Pipelines apply under a single lock
//! acquisition, so no other caller observes a half-applied batch.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use crate::ports::{SharedStore, StoreCommand, StoreError};

/// Fields returned per `hscan` page.
const HSCAN_PAGE: usize = 64;

/// In-memory store state.
#[derive(Default)]
struct StoreState {
    /// Plain string keys (task statuses live here).
    kv: HashMap<String, String>,

    /// Hash keys (phone maps). BTreeMap so hscan pages are stable.
    hashes: HashMap<String, BTreeMap<String, String>>,

    /// List keys (the delivery queue). LPUSH front, BRPOP back: FIFO.
    lists: HashMap<String, VecDeque<String>>,
}

impl StoreState {
    fn apply(&mut self, command: StoreCommand) -> bool {
        match command {
            StoreCommand::Set { key, value } => {
                self.kv.insert(key, value);
                false
            }
            StoreCommand::HSet { key, field, value } => {
                self.hashes.entry(key).or_default().insert(field, value);
                false
            }
            StoreCommand::LPush { queue, value } => {
                self.lists.entry(queue).or_default().push_front(value);
                true
            }
            StoreCommand::Del { key } => {
                self.kv.remove(&key);
                self.hashes.remove(&key);
                self.lists.remove(&key);
                false
            }
        }
    }
}

/// In-memory [`SharedStore`] for development and tests.
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    notify: Arc<Notify>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            notify: Arc::new(Notify::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SharedStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.kv.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .hashes
            .get(key)
            .map(|hash| hash.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn hscan(
        &self,
        key: &str,
        cursor: u64,
    ) -> Result<(u64, Vec<(String, String)>), StoreError> {
        let state = self.state.lock().await;
        let Some(hash) = state.hashes.get(key) else {
            return Ok((0, Vec::new()));
        };

        // Cursor is an offset into the sorted field order; 0 both starts
        // and terminates the scan, exactly like the real command.
        let offset = cursor as usize;
        let page: Vec<(String, String)> = hash
            .iter()
            .skip(offset)
            .take(HSCAN_PAGE)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let next = offset + page.len();
        let next_cursor = if next < hash.len() { next as u64 } else { 0 };
        Ok((next_cursor, page))
    }

    async fn lpush(&self, queue: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut state = self.state.lock().await;
            state
                .lists
                .entry(queue.to_string())
                .or_default()
                .push_front(value.to_string());
        }
        self.notify.notify_one();
        Ok(())
    }

    async fn brpop(
        &self,
        queue: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<String>, StoreError> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(list) = state.lists.get_mut(queue)
                    && let Some(value) = list.pop_back()
                {
                    return Ok(Some(value));
                }
            }

            // Queue empty: wait for a push or the deadline. Notify stores a
            // permit, so a push racing in between the check and the await is
            // not lost; a spurious wakeup just loops and re-checks.
            match deadline {
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        return Ok(None);
                    }
                    tokio::select! {
                        _ = self.notify.notified() => {}
                        _ = tokio::time::sleep_until(deadline) => return Ok(None),
                    }
                }
                None => self.notify.notified().await,
            }
        }
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.apply(StoreCommand::Del {
            key: key.to_string(),
        });
        Ok(())
    }

    async fn pipeline(&self, commands: Vec<StoreCommand>) -> Result<(), StoreError> {
        let pushed = {
            let mut state = self.state.lock().await;
            let mut pushed = 0usize;
            for command in commands {
                if state.apply(command) {
                    pushed += 1;
                }
            }
            pushed
        };

        for _ in 0..pushed {
            self.notify.notify_one();
        }
        Ok(())
    }
}
