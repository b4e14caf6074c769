use {
    com::{Classifier, Connectivity, ConnectivitySignal},
    queue::{DrainReport, OfflineQueue, Store, StoreError},
    std::sync::Arc,
    tokio::{sync::mpsc, task::JoinHandle},
};

// capacity of the drain report channel
const CHANNEL_CAPACITY: usize = 4;

/// Drain the queue every time `signal` goes from offline to online.
///
/// Each drain pass sends one item on the returned receiver: its report,
/// or the store error that stopped the pass before any item was tried.
/// The task ends when every handle to the signal is gone.
pub fn spawn_reconnect_handler<C, T>(
    signal: &ConnectivitySignal,
    queue: Arc<OfflineQueue<T>>,
    classifier: Arc<C>,
) -> (JoinHandle<()>, mpsc::Receiver<Result<DrainReport, StoreError>>)
where
    C: Classifier + 'static,
    T: Store,
{
    let mut connectivity = signal.subscribe();
    let (sender, receiver) = mpsc::channel::<Result<DrainReport, StoreError>>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        while connectivity.changed().await.is_ok() {
            // the signal only notifies on a real change, so seeing online
            // here means it was offline at some point since the last look
            if *connectivity.borrow_and_update() != Connectivity::Online {
                continue;
            }

            log::info!("connection restored, draining offline queue");
            let drained = queue.drain_on_reconnect(&classifier).await;
            if let Err(err) = &drained {
                log::error!("offline queue could not be drained: {err}");
            }
            if sender.send(drained).await.is_err() {
                log::debug!("nobody listening for drain reports");
            }
        }
        log::debug!("connectivity signal closed, reconnect handler exiting");
    });

    (handle, receiver)
}
