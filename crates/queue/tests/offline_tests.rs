use com::{ClassificationResult, Classifier, ComError};
use image::{JPEG_CONTENT_TYPE, SubmissionPayload};
use queue::{DrainFailure, FileStore, MemoryStore, OfflineQueue, Store, StoreError};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

/// Classifier whose answer depends on the first payload byte:
/// `b'x'` times out, `b'p'` is a protocol error, anything else succeeds.
#[derive(Default)]
struct Scripted {
    calls: Mutex<HashMap<Vec<u8>, usize>>,
    delay: Duration,
}

impl Scripted {
    fn calls_for(&self, data: &[u8]) -> usize {
        self.calls.lock().unwrap().get(data).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl Classifier for Scripted {
    async fn classify(&self, payload: &SubmissionPayload) -> Result<ClassificationResult, ComError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(payload.data().to_vec())
            .or_default() += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match payload.data().first().copied() {
            Some(b'x') => Err(ComError::Timeout(Duration::from_secs(10))),
            Some(b'p') => Err(ComError::Protocol("unrecognized response shape".to_string())),
            _ => Ok(ClassificationResult::label("Mild (1)", 0.75).unwrap()),
        }
    }
}

fn payload(data: &[u8]) -> SubmissionPayload {
    SubmissionPayload::new(data.to_vec(), JPEG_CONTENT_TYPE)
}

#[tokio::test]
async fn test_enqueue_assigns_unique_keys() {
    let queue = OfflineQueue::new(MemoryStore::new());

    let a = queue.enqueue(payload(b"one")).await.unwrap();
    let b = queue.enqueue(payload(b"two")).await.unwrap();

    assert_ne!(a, b);
    assert!(a.starts_with("pending-"));
    assert_eq!(queue.len().await.unwrap(), 2);

    let item = queue.get(&a).await.unwrap().unwrap();
    assert_eq!(item.payload, payload(b"one"));
    assert!(item.created_at > 0);
}

#[tokio::test]
async fn test_drain_removes_only_successes() {
    let queue = OfflineQueue::new(MemoryStore::new());
    let ok_a = queue.enqueue(payload(b"a")).await.unwrap();
    let timeout = queue.enqueue(payload(b"x")).await.unwrap();
    let ok_b = queue.enqueue(payload(b"b")).await.unwrap();
    let protocol = queue.enqueue(payload(b"p")).await.unwrap();
    let classifier = Scripted::default();

    let report = queue.drain_on_reconnect(&classifier).await.unwrap();

    let mut delivered: Vec<&str> = report.delivered.iter().map(|(k, _)| k.as_str()).collect();
    delivered.sort();
    let mut expected = vec![ok_a.as_str(), ok_b.as_str()];
    expected.sort();
    assert_eq!(delivered, expected);
    assert_eq!(report.undelivered.len(), 2);
    assert!(report.undelivered.iter().any(|(k, f)| k == &timeout
        && matches!(f, DrainFailure::Classifier(ComError::Timeout(_)))));
    assert!(report.undelivered.iter().any(|(k, f)| k == &protocol
        && matches!(f, DrainFailure::Classifier(ComError::Protocol(_)))));

    assert_eq!(queue.keys().await.unwrap().len(), 2);
    assert!(queue.get(&timeout).await.unwrap().is_some());
    assert!(queue.get(&protocol).await.unwrap().is_some());
    assert!(queue.get(&ok_a).await.unwrap().is_none());
}

#[tokio::test]
async fn test_item_stays_until_success() {
    let queue = OfflineQueue::new(MemoryStore::new());
    let key = queue.enqueue(payload(b"x-ray")).await.unwrap();
    let classifier = Scripted::default();

    for _ in 0..3 {
        let report = queue.drain_on_reconnect(&classifier).await.unwrap();
        assert!(report.delivered.is_empty());
        assert_eq!(queue.get(&key).await.unwrap().unwrap().payload, payload(b"x-ray"));
    }
    assert_eq!(classifier.calls_for(b"x-ray"), 3);
}

#[tokio::test]
async fn test_empty_drain() {
    let queue = OfflineQueue::new(MemoryStore::new());
    let classifier = Scripted::default();

    let report = queue.drain_on_reconnect(&classifier).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(classifier.total_calls(), 0);
}

#[tokio::test]
async fn test_capacity_is_enforced() {
    let queue = OfflineQueue::new(MemoryStore::new()).with_capacity(200);

    queue.enqueue(payload(&[7u8; 64])).await.unwrap();
    let err = queue.enqueue(payload(&[7u8; 150])).await.unwrap_err();

    assert!(matches!(err, StoreError::StorageExhausted { capacity: 200, .. }));
    assert_eq!(queue.len().await.unwrap(), 1);
    assert!(queue.used_bytes().await.unwrap() <= 200);
}

#[tokio::test]
async fn test_file_queue_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let key = {
        let queue = OfflineQueue::new(FileStore::open(dir.path()).unwrap());
        queue.enqueue(payload(b"persisted")).await.unwrap()
    };

    let queue = OfflineQueue::new(FileStore::open(dir.path()).unwrap());
    let items = queue.list().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key, key);

    let report = queue.drain_on_reconnect(&Scripted::default()).await.unwrap();
    assert_eq!(report.delivered.len(), 1);
    assert!(queue.is_empty().await.unwrap());
    assert!(!dir.path().join(format!("{key}.item")).exists());
}

#[tokio::test]
async fn test_corrupt_record_is_kept_and_others_drain() {
    let store = MemoryStore::new();
    store.put("pending-1-0", b"garbage without header").unwrap();
    let queue = OfflineQueue::new(store);
    let good = queue.enqueue(payload(b"good")).await.unwrap();

    let report = queue.drain_on_reconnect(&Scripted::default()).await.unwrap();

    assert_eq!(report.delivered.len(), 1);
    assert_eq!(report.delivered[0].0, good);
    assert!(matches!(
        report.undelivered.as_slice(),
        [(key, DrainFailure::Store(StoreError::Corrupt { .. }))] if key == "pending-1-0"
    ));
    assert!(queue.store().contains("pending-1-0").unwrap());
    assert_eq!(queue.list().await.unwrap().len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_drains_deliver_once() {
    let queue = Arc::new(OfflineQueue::new(MemoryStore::new()));
    for i in 0..5u8 {
        queue.enqueue(payload(&[b'a' + i])).await.unwrap();
    }
    let classifier = Arc::new(Scripted {
        delay: Duration::from_millis(10),
        ..Default::default()
    });

    let first = tokio::spawn({
        let (queue, classifier) = (queue.clone(), classifier.clone());
        async move { queue.drain_on_reconnect(&classifier).await.unwrap() }
    });
    let second = tokio::spawn({
        let (queue, classifier) = (queue.clone(), classifier.clone());
        async move { queue.drain_on_reconnect(&classifier).await.unwrap() }
    });
    let (first, second) = (first.await.unwrap(), second.await.unwrap());

    assert_eq!(first.delivered.len() + second.delivered.len(), 5);
    assert_eq!(classifier.total_calls(), 5);
    assert!(queue.is_empty().await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_enqueue_during_drain() {
    let queue = Arc::new(OfflineQueue::new(MemoryStore::new()));
    queue.enqueue(payload(b"early")).await.unwrap();
    let classifier = Arc::new(Scripted {
        delay: Duration::from_millis(300),
        ..Default::default()
    });

    let drain = tokio::spawn({
        let (queue, classifier) = (queue.clone(), classifier.clone());
        async move { queue.drain_on_reconnect(&classifier).await.unwrap() }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let late = queue.enqueue(payload(b"late")).await.unwrap();

    let report = drain.await.unwrap();
    assert_eq!(report.delivered.len(), 1);
    assert!(queue.get(&late).await.unwrap().is_some());
    assert_eq!(queue.len().await.unwrap(), 1);
}
