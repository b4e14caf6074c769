use {
    std::{fmt, sync::Arc, time::Duration},
    tokio::{net::TcpStream, sync::watch, task::JoinHandle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Online => write!(f, "online"),
            Connectivity::Offline => write!(f, "offline"),
        }
    }
}

/// Shared online/offline state.
///
/// Anything may report a change with `set`; subscribers see every
/// transition that changed the value.
#[derive(Clone)]
pub struct ConnectivitySignal {
    sender: Arc<watch::Sender<Connectivity>>,
}

impl ConnectivitySignal {
    pub fn new(initial: Connectivity) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Record the current state. Returns true if it changed.
    pub fn set(&self, state: Connectivity) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            log::info!("connectivity is now {}", state);
        }
        changed
    }

    pub fn current(&self) -> Connectivity {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.sender.subscribe()
    }
}

/// Check whether the classifier host accepts TCP connections.
pub async fn probe(endpoint: &reqwest::Url, timeout: Duration) -> Connectivity {
    let Some(host) = endpoint.host_str() else {
        return Connectivity::Offline;
    };
    let Some(port) = endpoint.port_or_known_default() else {
        return Connectivity::Offline;
    };
    // IPv6 literals come back bracketed from host_str
    let host = host.trim_start_matches('[').trim_end_matches(']');
    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => Connectivity::Online,
        Ok(Err(e)) => {
            log::debug!("probe {host}:{port} failed: {e}");
            Connectivity::Offline
        }
        Err(_) => {
            log::debug!("probe {host}:{port} timed out");
            Connectivity::Offline
        }
    }
}

/// Probe `endpoint` every `interval` and feed the answers into `signal`.
///
/// The task runs until aborted.
pub fn spawn_probe(
    signal: ConnectivitySignal,
    endpoint: reqwest::Url,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            signal.set(probe(&endpoint, interval).await);
        }
    })
}
