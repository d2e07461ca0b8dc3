use shared::telemetry::Stopwatch;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

type TickSender = Arc<Mutex<Option<watch::Sender<u64>>>>;

/// Repeating clock for the running session.
///
/// Publishes elapsed whole seconds once per period. Owned by the session
/// controller; stopping or dropping it guarantees no further ticks.
pub struct SessionTimer {
    sender: TickSender,
    receiver: watch::Receiver<u64>,
    handle: Option<JoinHandle<()>>,
}

impl SessionTimer {
    /// Must be called from within a tokio runtime.
    pub fn start(stopwatch: Stopwatch, period: Duration) -> Self {
        let (tx, rx) = watch::channel(stopwatch.elapsed_secs());
        let sender: TickSender = Arc::new(Mutex::new(Some(tx)));
        let task_sender = Arc::clone(&sender);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let guard = match task_sender.lock() {
                    Ok(guard) => guard,
                    Err(_) => break,
                };
                match guard.as_ref() {
                    Some(tx) => {
                        tx.send_replace(stopwatch.elapsed_secs());
                    }
                    None => break,
                }
            }
        });

        Self {
            sender,
            receiver: rx,
            handle: Some(handle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.receiver.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn stop(&mut self) {
        // Dropping the sender under the lock means a tick in flight either
        // finished before this point or sees `None` and exits.
        if let Ok(mut guard) = self.sender.lock() {
            guard.take();
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("session timer stopped");
        }
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
