use {
    crate::*,
    com::{ClassificationResult, Classifier, ComError},
    image::SubmissionPayload,
    std::{
        fmt,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
    },
    tokio::sync::Mutex,
};

/// Default cap on the bytes held by the queue.
pub const DEFAULT_CAPACITY: u64 = 64 * 1024 * 1024;

/// Why a queued item is still queued after a drain.
#[derive(Debug)]
pub enum DrainFailure {
    Classifier(ComError),
    Store(StoreError),
}

impl fmt::Display for DrainFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrainFailure::Classifier(err) => write!(f, "{err}"),
            DrainFailure::Store(err) => write!(f, "{err}"),
        }
    }
}

/// Outcome of one pass over the queue.
#[derive(Debug, Default)]
pub struct DrainReport {
    pub delivered: Vec<(String, ClassificationResult)>,
    pub undelivered: Vec<(String, DrainFailure)>,
}

impl DrainReport {
    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty() && self.undelivered.is_empty()
    }
}

/// Payloads waiting for connectivity, persisted in a `Store`.
///
/// An item is removed only after its resubmission succeeds. Writes are
/// serialized among themselves, and so are drains, but an enqueue can run
/// while a drain is in progress.
pub struct OfflineQueue<S> {
    store: Arc<S>,
    capacity: u64,
    sequence: AtomicU64,
    write_lock: Mutex<()>,
    drain_lock: Mutex<()>,
}

impl<S: Store> OfflineQueue<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            capacity: DEFAULT_CAPACITY,
            sequence: AtomicU64::new(0),
            write_lock: Mutex::new(()),
            drain_lock: Mutex::new(()),
        }
    }

    /// Set the byte cap.
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store)).await?
    }

    /// Persist `payload` under a fresh key and return the key.
    pub async fn enqueue(&self, payload: SubmissionPayload) -> Result<String, StoreError> {
        let _write = self.write_lock.lock().await;

        let created_at = base::unix_millis();
        let capacity = self.capacity;
        let mut sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let mut key = format!("pending-{created_at}-{sequence}");
        while self.blocking({
            let key = key.clone();
            move |store| store.contains(&key)
        })
        .await?
        {
            sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
            key = format!("pending-{created_at}-{sequence}");
        }

        let item = PendingItem {
            key: key.clone(),
            payload,
            created_at,
        };
        let record = item.to_record()?;
        let requested = record.len() as u64;

        self.blocking({
            let key = key.clone();
            move |store| {
                let used = store.used_bytes()?;
                if used.saturating_add(requested) > capacity {
                    return Err(StoreError::StorageExhausted {
                        used,
                        requested,
                        capacity,
                    });
                }
                store.put(&key, &record)
            }
        })
        .await?;

        log::info!("queued {key} ({requested} bytes)");
        Ok(key)
    }

    /// Keys of all queued items, sorted.
    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.blocking(|store| store.keys()).await
    }

    /// All readable queued items, oldest first. Unreadable records are
    /// skipped with a warning; they stay in the store.
    pub async fn list(&self) -> Result<Vec<PendingItem>, StoreError> {
        let mut items = self
            .blocking(|store| {
                let mut items = Vec::new();
                for key in store.keys()? {
                    let Some(record) = store.get(&key)? else {
                        continue;
                    };
                    match PendingItem::from_record(&key, &record) {
                        Ok(item) => items.push(item),
                        Err(err) => log::warn!("skipping {key}: {err}"),
                    }
                }
                Ok(items)
            })
            .await?;
        items.sort_by(|a, b| (a.created_at, &a.key).cmp(&(b.created_at, &b.key)));
        Ok(items)
    }

    /// The item under `key`, if it is still queued.
    pub async fn get(&self, key: &str) -> Result<Option<PendingItem>, StoreError> {
        let key = key.to_string();
        self.blocking(move |store| match store.get(&key)? {
            Some(record) => PendingItem::from_record(&key, &record).map(Some),
            None => Ok(None),
        })
        .await
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.keys().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }

    pub async fn used_bytes(&self) -> Result<u64, StoreError> {
        self.blocking(|store| store.used_bytes()).await
    }

    /// Resubmit every queued item once.
    ///
    /// Items that succeed are deleted; everything else stays queued for the
    /// next drain. A failing item never stops the pass. Only listing the
    /// store can fail the whole drain.
    pub async fn drain_on_reconnect<C: Classifier>(
        &self,
        classifier: &C,
    ) -> Result<DrainReport, StoreError> {
        let _drain = self.drain_lock.lock().await;

        let keys = self.keys().await?;
        let mut report = DrainReport::default();
        if keys.is_empty() {
            return Ok(report);
        }
        log::info!("draining {} queued submissions", keys.len());

        for key in keys {
            let item = match self.get(&key).await {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(err) => {
                    log::warn!("cannot read {key}: {err}");
                    report.undelivered.push((key, DrainFailure::Store(err)));
                    continue;
                }
            };

            let result = match classifier.classify(&item.payload).await {
                Ok(result) => result,
                Err(err) => {
                    log::warn!("resubmitting {key} failed: {err}");
                    report.undelivered.push((key, DrainFailure::Classifier(err)));
                    continue;
                }
            };

            let delete_key = key.clone();
            match self.blocking(move |store| store.delete(&delete_key)).await {
                Ok(_) => {
                    log::info!("delivered {key}: {}", result.top().label);
                    report.delivered.push((key, result));
                }
                Err(err) => {
                    log::error!("delivered {key} but could not remove it: {err}");
                    report.undelivered.push((key, DrainFailure::Store(err)));
                }
            }
        }

        log::info!(
            "drain finished: {} delivered, {} still queued",
            report.delivered.len(),
            report.undelivered.len()
        );
        Ok(report)
    }
}
