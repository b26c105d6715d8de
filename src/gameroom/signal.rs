use std::sync::Arc;
use tokio::sync::watch;

/// One-way stop flag shared by every task in a game.
/// Cheap to poll at loop heads, and awaitable so any blocking wait
/// can be raced against it.
#[derive(Debug, Clone)]
pub struct Switch(Arc<watch::Sender<bool>>);

impl Default for Switch {
    fn default() -> Self {
        Self(Arc::new(watch::Sender::new(false)))
    }
}

impl Switch {
    /// Turns the switch on. Idempotent.
    pub fn flip(&self) {
        self.0.send_if_modified(|on| !std::mem::replace(on, true));
    }
    pub fn is_on(&self) -> bool {
        *self.0.borrow()
    }
    /// Resolves once the switch is on.
    pub async fn wait(&self) {
        let mut rx = self.0.subscribe();
        let _ = rx.wait_for(|on| *on).await;
    }
}

/// Broadcast fired once per completed dealing phase.
/// Waiters are released by the first firing and never block again.
#[derive(Debug, Clone)]
pub struct Beacon(Arc<watch::Sender<usize>>);

impl Default for Beacon {
    fn default() -> Self {
        Self(Arc::new(watch::Sender::new(0)))
    }
}

impl Beacon {
    pub fn fire(&self) {
        self.0.send_modify(|n| *n += 1);
    }
    /// Times fired so far.
    pub fn count(&self) -> usize {
        *self.0.borrow()
    }
    /// Resolves once the beacon has fired at least once.
    pub async fn wait(&self) {
        let mut rx = self.0.subscribe();
        let _ = rx.wait_for(|n| *n > 0).await;
    }
}
