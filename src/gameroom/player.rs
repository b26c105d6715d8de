use super::*;
use crate::Position;
use crate::QUEUE;
use crate::Slot;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::channel;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Entry point for a player's intents.
/// Slots outside the board are refused here, and a full queue drops the press.
#[derive(Debug, Clone)]
pub struct Keypad {
    player: Position,
    slots: usize,
    tx: Sender<Slot>,
}

impl Keypad {
    pub fn new(player: Position, slots: usize) -> (Self, Receiver<Slot>) {
        let (tx, rx) = channel(QUEUE);
        (Self { player, slots, tx }, rx)
    }
    /// Queues `slot`. False if it was out of range or dropped.
    pub fn press(&self, slot: Slot) -> bool {
        if slot >= self.slots {
            log::warn!("[keypad P{}] slot {} is off the board", self.player, slot);
            return false;
        }
        match self.tx.try_send(slot) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::debug!("[keypad P{}] queue full, dropped slot {}", self.player, slot);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
    pub fn player(&self) -> Position {
        self.player
    }
    pub fn slots(&self) -> usize {
        self.slots
    }
}

/// Human players are driven from outside through their [`Keypad`].
/// Robots get a companion task that presses for them.
pub enum Role {
    Human,
    Robot(Box<dyn Strategy>),
}

impl std::fmt::Debug for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "Human"),
            Self::Robot(_) => write!(f, "Robot"),
        }
    }
}

/// One player's task.
///
/// - waits for the first deal (or stop)
/// - sits out any freeze, then discards what was pressed meanwhile
/// - applies each queued slot as a token toggle
/// - on a third token, claims and waits for the verdict
/// - wakes its robot companion after every intent it has dealt with
#[derive(Debug)]
pub struct Agent {
    id: Position,
    name: String,
    role: Role,
    keypad: Keypad,
    intents: Receiver<Slot>,
    resume: Arc<Notify>,
    dealer: Arc<Dealer>,
}

impl Agent {
    pub fn new(id: Position, role: Role, dealer: Arc<Dealer>) -> Self {
        let (keypad, intents) = Keypad::new(id, dealer.config().slots());
        Self {
            id,
            name: dealer.config().name(id),
            role,
            keypad,
            intents,
            resume: Arc::new(Notify::new()),
            dealer,
        }
    }
    pub fn keypad(&self) -> Keypad {
        self.keypad.clone()
    }
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

impl Agent {
    async fn run(mut self) {
        let stop = self.dealer.stop().clone();
        log::info!("[agent P{}] {} seated as {:?}", self.id, self.name, self.role);
        tokio::select! {
            biased;
            _ = stop.wait() => {}
            _ = self.dealer.ready().wait() => {}
        }
        let companion = self.companion();
        while !stop.is_on() {
            self.thaw().await;
            let slot = tokio::select! {
                biased;
                _ = stop.wait() => break,
                slot = self.intents.recv() => match slot {
                    Some(slot) => slot,
                    None => break,
                },
            };
            self.act(slot).await;
            self.resume.notify_one();
        }
        if let Some(handle) = companion {
            if let Err(e) = handle.await {
                log::warn!("[agent P{}] companion failed: {}", self.id, e);
            }
        }
        log::info!("[agent P{}] terminated", self.id);
    }

    async fn act(&mut self, slot: Slot) {
        if self.dealer.mark(self.id, slot).await {
            log::debug!("[agent P{}] claiming", self.id);
            let verdict = self.dealer.claim(self.id).await;
            log::debug!("[agent P{}] verdict {:?}", self.id, verdict);
        }
    }

    /// Sleeps until any freeze lifts, then drops intents queued during it.
    async fn thaw(&mut self) {
        let Some(thaw) = self.dealer.seat(self.id).and_then(Seat::frozen_until) else {
            return;
        };
        log::debug!("[agent P{}] frozen", self.id);
        tokio::select! {
            biased;
            _ = self.dealer.stop().wait() => return,
            _ = tokio::time::sleep_until(thaw) => {}
        }
        while let Ok(slot) = self.intents.try_recv() {
            log::trace!("[agent P{}] discarded slot {} pressed while frozen", self.id, slot);
        }
        self.resume.notify_one();
    }

    /// Hands a robot's strategy to its companion task.
    fn companion(&mut self) -> Option<JoinHandle<()>> {
        match std::mem::replace(&mut self.role, Role::Human) {
            Role::Human => None,
            Role::Robot(strategy) => Some(
                Robot::new(
                    self.keypad(),
                    strategy,
                    self.resume.clone(),
                    self.dealer.stop().clone(),
                )
                .spawn(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::*;
    use std::time::Duration;

    fn dealer(players: usize) -> Arc<Dealer> {
        let config = Config {
            rows: 2,
            columns: 3,
            humans: players,
            robots: 0,
            table_delay_ms: 0,
            seed: Some(1),
            ..Config::default()
        };
        Arc::new(Dealer::new(config, Arc::new(Classic::default()), Arc::new(Silent)))
    }

    #[test]
    fn keypad_refuses_off_board_slots() {
        let (keypad, mut rx) = Keypad::new(0, 6);
        assert!(!keypad.press(6));
        assert!(keypad.press(5));
        assert_eq!(rx.try_recv().ok(), Some(5));
    }
    #[test]
    fn keypad_drops_when_full() {
        let (keypad, _rx) = Keypad::new(0, 6);
        assert!((0..QUEUE).all(|s| keypad.press(s)));
        assert!(!keypad.press(0));
    }
    #[tokio::test(start_paused = true)]
    async fn agent_blocks_until_ready() {
        let dealer = dealer(1);
        let agent = Agent::new(0, Role::Human, dealer.clone());
        let keypad = agent.keypad();
        let handle = agent.spawn();
        keypad.press(0);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(dealer.table().read().await.board.tokens(0).is_empty());
        dealer.open().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(dealer.table().read().await.board.tokens(0), vec![0]);
        dealer.terminate();
        handle.await.unwrap();
    }
    #[tokio::test(start_paused = true)]
    async fn agent_exits_on_stop_before_any_deal() {
        let dealer = dealer(1);
        let handle = Agent::new(0, Role::Human, dealer.clone()).spawn();
        tokio::time::sleep(Duration::from_millis(10)).await;
        dealer.terminate();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
    #[tokio::test(start_paused = true)]
    async fn frozen_agent_discards_queued_presses() {
        let dealer = dealer(1);
        let agent = Agent::new(0, Role::Human, dealer.clone());
        let keypad = agent.keypad();
        dealer.open().await;
        dealer.seat(0).unwrap().freeze(Duration::from_secs(3));
        let handle = agent.spawn();
        tokio::time::sleep(Duration::from_secs(1)).await;
        keypad.press(1);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(dealer.table().read().await.board.tokens(0).is_empty());
        keypad.press(2);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(dealer.table().read().await.board.tokens(0), vec![2]);
        dealer.terminate();
        handle.await.unwrap();
    }
    #[tokio::test(start_paused = true)]
    async fn robot_agent_stops_with_companion() {
        let dealer = dealer(1);
        let handle = Agent::new(0, Role::Robot(Box::new(Fish::seeded(2))), dealer.clone()).spawn();
        dealer.open().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        dealer.terminate();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
