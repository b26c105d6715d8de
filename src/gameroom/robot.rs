use super::*;
use crate::Slot;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// How an autonomous player chooses its next slot.
pub trait Strategy: Send + 'static {
    fn pick(&mut self, slots: usize) -> Slot;
}

/// Presses uniformly random slots.
#[derive(Debug, Clone)]
pub struct Fish(SmallRng);

impl Fish {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl Default for Fish {
    fn default() -> Self {
        Self(SmallRng::from_rng(&mut rand::rng()))
    }
}

impl Strategy for Fish {
    fn pick(&mut self, slots: usize) -> Slot {
        self.0.random_range(0..slots.max(1))
    }
}

/// Companion task that feeds a robot player's keypad.
/// Submits one intent, then waits until the player has dealt with it.
pub struct Robot {
    keypad: Keypad,
    strategy: Box<dyn Strategy>,
    resume: Arc<Notify>,
    stop: Switch,
}

impl Robot {
    pub fn new(keypad: Keypad, strategy: Box<dyn Strategy>, resume: Arc<Notify>, stop: Switch) -> Self {
        Self {
            keypad,
            strategy,
            resume,
            stop,
        }
    }
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
    async fn run(mut self) {
        let id = self.keypad.player();
        log::debug!("[robot P{}] starting", id);
        while !self.stop.is_on() {
            let slot = self.strategy.pick(self.keypad.slots());
            self.keypad.press(slot);
            tokio::select! {
                biased;
                _ = self.stop.wait() => break,
                _ = self.resume.notified() => {}
            }
        }
        log::debug!("[robot P{}] terminated", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn fish_stays_in_range() {
        let mut fish = Fish::seeded(5);
        assert!((0..1000).map(|_| fish.pick(12)).all(|s| s < 12));
    }
    #[test]
    fn seeded_fish_agree() {
        let mut a = Fish::seeded(1);
        let mut b = Fish::seeded(1);
        for _ in 0..100 {
            assert_eq!(a.pick(12), b.pick(12));
        }
    }
    #[tokio::test]
    async fn robot_waits_for_resume() {
        let (keypad, mut intents) = Keypad::new(0, 12);
        let resume = Arc::new(Notify::new());
        let stop = Switch::default();
        let robot = Robot::new(keypad, Box::new(Fish::seeded(0)), resume.clone(), stop.clone());
        let handle = robot.spawn();
        assert!(intents.recv().await.is_some());
        tokio::task::yield_now().await;
        assert!(intents.try_recv().is_err());
        resume.notify_one();
        assert!(intents.recv().await.is_some());
        stop.flip();
        handle.await.unwrap();
    }
}
