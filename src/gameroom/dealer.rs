use super::*;
use crate::Position;
use crate::Score;
use crate::Slot;
use crate::TOKENS;
use crate::board::*;
use crate::cards::*;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Outcome of one adjudication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Valid triple. Carries the player's new score.
    Point(Score),
    /// Invalid triple. The player sits out the penalty freeze.
    Penalty,
    /// The player's tokens were cleared before the claim was heard.
    Void,
}

/// Owns the round lifecycle and adjudicates claims.
///
/// The dealer loop runs Dealing, Counting down and Reshuffling until the
/// stop switch flips or no legal triple is left among the cards in play.
/// Claims arrive from player tasks and are heard one at a time through
/// the gate; adjudication holds the table's write lock, so no token
/// toggles while matched cards are removed and replaced.
pub struct Dealer {
    config: Config,
    table: Table,
    seats: Vec<Seat>,
    gate: Mutex<()>,
    rules: Arc<dyn Evaluator>,
    sink: Arc<dyn Sink>,
    ready: Beacon,
    stop: Switch,
    wake: Notify,
    exhausted: AtomicBool,
}

impl Dealer {
    pub fn new(config: Config, rules: Arc<dyn Evaluator>, sink: Arc<dyn Sink>) -> Self {
        let board = Board::new(
            config.slots(),
            config.deck_size(),
            config.players(),
            sink.clone(),
        );
        let deck = Deck::new(config.deck_size(), config.seed);
        Self {
            table: Table::new(Layout::new(board, deck)),
            seats: (0..config.players()).map(|_| Seat::default()).collect(),
            gate: Mutex::new(()),
            ready: Beacon::default(),
            stop: Switch::default(),
            wake: Notify::new(),
            exhausted: AtomicBool::new(false),
            config,
            rules,
            sink,
        }
    }

    /// Drives rounds until the game ends, then joins every player task
    /// and announces the winners.
    pub async fn run(self: Arc<Self>, players: Vec<JoinHandle<()>>) -> Vec<Position> {
        log::info!("[dealer] starting with {} players", self.seats.len());
        let mut timer = Timer::new(self.config.timer());
        while !self.should_finish().await {
            self.open().await;
            if self.is_over() {
                break;
            }
            self.countdown(&mut timer).await;
            timer.clear();
            self.sink.emit(Event::Countdown {
                remaining: timer.remaining(),
                warn: false,
            });
            if self.is_over() {
                break;
            }
            self.reshuffle().await;
        }
        self.terminate();
        for (i, handle) in players.into_iter().enumerate() {
            if let Err(e) = handle.await {
                log::warn!("[dealer] player P{} task failed: {}", i, e);
            }
        }
        let winners = self.winners();
        log::info!("[dealer] game over, winners {:?} with scores {:?}", winners, self.scores());
        self.sink.emit(Event::Winners(winners.clone()));
        winners
    }

    /// Requests cooperative shutdown of every task in the game.
    pub fn terminate(&self) {
        if !self.stop.is_on() {
            log::info!("[dealer] terminating");
        }
        self.stop.flip();
    }
}

impl Dealer {
    /// Dealing phase: shuffle, fill every vacancy, and release players.
    pub async fn open(&self) {
        let mut layout = self.table.write().await;
        layout.deck.shuffle();
        self.deal(&mut layout).await;
        if self.config.hints {
            self.hint(&layout);
        }
        drop(layout);
        self.ready.fire();
        log::debug!("[dealer] deal {} ready", self.ready.count());
    }

    /// Reshuffling phase: every card goes back to the deck, every token is cleared.
    pub async fn reshuffle(&self) {
        let mut layout = self.table.write().await;
        log::info!("[dealer] reshuffling {} cards", layout.board.occupied());
        self.sweep(&mut layout).await;
    }

    /// True when the stop switch is on or no legal triple is left in play.
    pub async fn should_finish(&self) -> bool {
        if self.is_over() {
            return true;
        }
        let layout = self.table.read().await;
        if self.rules.exists(&layout.pool()) {
            false
        } else {
            log::info!("[dealer] no legal triple left in play");
            self.exhausted.store(true, Ordering::SeqCst);
            true
        }
    }

    /// Fills vacancies. While the board holds no legal triple, reshuffles and
    /// tries again, as long as the pool still holds one.
    async fn deal(&self, layout: &mut Layout) {
        loop {
            self.fill(layout).await;
            if self.rules.exists(&layout.board.cards()) || self.stop.is_on() {
                return;
            }
            if !self.rules.exists(&layout.pool()) {
                log::info!("[dealer] no legal triple left in play");
                self.exhausted.store(true, Ordering::SeqCst);
                self.wake.notify_one();
                return;
            }
            log::info!("[dealer] board holds no legal triple, redealing");
            self.sweep(layout).await;
            layout.deck.shuffle();
        }
    }

    async fn fill(&self, layout: &mut Layout) {
        for slot in layout.board.vacancies() {
            let Some(card) = layout.deck.draw() else {
                log::debug!("[dealer] deck empty, slot {} stays vacant", slot);
                break;
            };
            self.pace().await;
            if !layout.board.place(card, slot) {
                layout.deck.push(card);
            }
        }
    }

    async fn sweep(&self, layout: &mut Layout) {
        self.sink.emit(Event::RemoveAllTokens);
        for slot in 0..layout.board.size() {
            if layout.board.card(slot).is_none() {
                continue;
            }
            self.pace().await;
            if let Some(card) = layout.board.remove(slot) {
                layout.deck.push(card);
            }
        }
    }

    async fn countdown(&self, timer: &mut Timer) {
        timer.start();
        log::info!("[dealer] round started, {:?} on the clock", timer.round());
        loop {
            self.sink.emit(Event::Countdown {
                remaining: timer.remaining(),
                warn: timer.warns(),
            });
            if timer.expired() || self.is_over() {
                break;
            }
            tokio::select! {
                biased;
                _ = self.stop.wait() => {}
                _ = self.wake.notified() => {}
                _ = tokio::time::sleep(timer.slice()) => {}
            }
        }
        log::info!("[dealer] round over");
    }

    async fn pace(&self) {
        let delay = self.config.table_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn hint(&self, layout: &Layout) {
        let hints = layout.board.hints(self.rules.as_ref());
        log::info!("[dealer] {} legal triples on board: {:?}", hints.len(), hints);
    }
}

impl Dealer {
    /// Hears `player`'s claim. One claim at a time; the triple is re-read
    /// from the player's ledger once the gate is passed.
    pub async fn claim(&self, player: Position) -> Verdict {
        let _gate = self.gate.lock().await;
        let mut layout = self.table.write().await;
        let Ok(triple) = <[Card; TOKENS]>::try_from(layout.board.cards_for(player)) else {
            log::debug!("[dealer] P{} claim went stale", player);
            return Verdict::Void;
        };
        if self.rules.test(&triple) {
            let verdict = self.reward(player, &mut layout, triple).await;
            if self.exhausted.load(Ordering::SeqCst) {
                self.wake.notify_one();
            }
            verdict
        } else {
            log::info!("[dealer] P{} claimed an invalid triple", player);
            self.freeze(player, self.config.penalty_freeze());
            Verdict::Penalty
        }
    }

    async fn reward(&self, player: Position, layout: &mut Layout, triple: [Card; TOKENS]) -> Verdict {
        let score = self.seats.get(player).map(Seat::point).unwrap_or_default();
        log::info!("[dealer] P{} scores, now {}", player, score);
        self.sink.emit(Event::Score { player, score });
        self.freeze(player, self.config.point_freeze());
        for card in triple {
            let Some(slot) = layout.board.slot(card) else {
                continue;
            };
            self.pace().await;
            if let Some(card) = layout.board.remove(slot) {
                layout.retired.push(card);
            }
        }
        self.fill(layout).await;
        if !self.rules.exists(&layout.board.cards()) && !self.stop.is_on() {
            log::info!("[dealer] board holds no legal triple after the match, reshuffling");
            self.sweep(layout).await;
            layout.deck.shuffle();
            self.deal(layout).await;
            self.ready.fire();
        }
        Verdict::Point(score)
    }

    /// Records the freeze on the seat and reports it until it lifts.
    fn freeze(&self, player: Position, duration: Duration) {
        let Some(seat) = self.seats.get(player) else {
            return;
        };
        let thaw = seat.freeze(duration);
        let sink = self.sink.clone();
        let stop = self.stop.clone();
        tokio::spawn(async move {
            loop {
                let remaining = thaw.saturating_duration_since(Instant::now());
                sink.emit(Event::Freeze { player, remaining });
                if remaining.is_zero() {
                    break;
                }
                tokio::select! {
                    biased;
                    _ = stop.wait() => {
                        sink.emit(Event::Freeze { player, remaining: Duration::ZERO });
                        break;
                    }
                    _ = tokio::time::sleep(remaining.min(crate::FREEZE_TICK)) => {}
                }
            }
        });
    }
}

impl Dealer {
    /// Toggles a token for `player`; true iff it raised a claim.
    pub async fn mark(&self, player: Position, slot: Slot) -> bool {
        self.table.mark(player, slot).await
    }
    /// Max-score players. Everybody ties at zero if nobody scored.
    pub fn winners(&self) -> Vec<Position> {
        let scores = self.scores();
        let best = scores.iter().copied().max().unwrap_or_default();
        scores
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == best)
            .map(|(i, _)| i)
            .collect()
    }
    pub fn scores(&self) -> Vec<Score> {
        self.seats.iter().map(Seat::score).collect()
    }
    pub fn seat(&self, player: Position) -> Option<&Seat> {
        self.seats.get(player)
    }
    pub fn table(&self) -> &Table {
        &self.table
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn ready(&self) -> &Beacon {
        &self.ready
    }
    pub fn stop(&self) -> &Switch {
        &self.stop
    }
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::SeqCst)
    }
    fn is_over(&self) -> bool {
        self.stop.is_on() || self.is_exhausted()
    }
}

impl std::fmt::Debug for Dealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dealer")
            .field("scores", &self.scores())
            .field("stopped", &self.stop.is_on())
            .field("exhausted", &self.is_exhausted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts or rejects every triple, and counts how often it was asked.
    struct Scripted {
        valid: bool,
        asked: std::sync::atomic::AtomicUsize,
    }
    impl Scripted {
        fn new(valid: bool) -> Arc<Self> {
            Arc::new(Self {
                valid,
                asked: Default::default(),
            })
        }
    }
    impl Evaluator for Scripted {
        fn test(&self, _: &[Card; TOKENS]) -> bool {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.valid
        }
        fn exists(&self, pool: &[Card]) -> bool {
            pool.len() >= TOKENS
        }
    }

    fn config(players: usize) -> Config {
        Config {
            rows: 2,
            columns: 3,
            humans: players,
            robots: 0,
            table_delay_ms: 0,
            seed: Some(3),
            ..Config::default()
        }
    }
    fn dealer(players: usize, rules: Arc<dyn Evaluator>) -> Dealer {
        Dealer::new(config(players), rules, Arc::new(Silent))
    }
    async fn mark_all(dealer: &Dealer, player: Position, slots: &[Slot]) -> bool {
        let mut claimed = false;
        for slot in slots {
            claimed = dealer.mark(player, *slot).await;
        }
        claimed
    }

    #[tokio::test(start_paused = true)]
    async fn open_fills_board_and_fires_ready() {
        let dealer = dealer(1, Arc::new(Classic::default()));
        dealer.open().await;
        let layout = dealer.table().read().await;
        assert_eq!(layout.board.occupied(), 6);
        assert_eq!(layout.deck.len(), 75);
        assert!(layout.is_balanced());
        assert!(Classic::default().exists(&layout.board.cards()));
        assert_eq!(dealer.ready().count(), 1);
    }
    #[tokio::test(start_paused = true)]
    async fn valid_claim_scores_and_replaces() {
        let dealer = dealer(2, Scripted::new(true));
        dealer.open().await;
        let before = dealer.table().read().await.board.cards();
        dealer.mark(1, 0).await;
        assert!(mark_all(&dealer, 0, &[1, 2, 5]).await);
        assert_eq!(dealer.claim(0).await, Verdict::Point(1));
        let layout = dealer.table().read().await;
        assert_eq!(layout.board.occupied(), 6);
        for slot in [1, 2, 5] {
            assert_ne!(layout.board.card(slot), Some(before[slot]));
        }
        assert_eq!(layout.retired.len(), 3);
        assert!(layout.is_balanced());
        assert!(layout.board.tokens(0).is_empty());
        assert_eq!(layout.board.tokens(1), vec![0]);
        assert!(dealer.seat(0).unwrap().frozen_until().is_some());
    }
    #[tokio::test(start_paused = true)]
    async fn invalid_claim_freezes_without_touching_board() {
        let dealer = dealer(1, Scripted::new(false));
        dealer.open().await;
        let before = dealer.table().read().await.board.cards();
        mark_all(&dealer, 0, &[0, 3, 4]).await;
        let now = Instant::now();
        assert_eq!(dealer.claim(0).await, Verdict::Penalty);
        assert_eq!(
            dealer.seat(0).unwrap().frozen_until(),
            Some(now + dealer.config().penalty_freeze())
        );
        let layout = dealer.table().read().await;
        assert_eq!(layout.board.cards(), before);
        assert_eq!(layout.board.tokens(0), vec![0, 3, 4]);
        assert_eq!(dealer.scores(), vec![0]);
    }
    #[tokio::test(start_paused = true)]
    async fn stale_claim_is_void() {
        let rules = Scripted::new(true);
        let dealer = dealer(1, rules.clone());
        dealer.open().await;
        mark_all(&dealer, 0, &[0, 1, 2]).await;
        dealer.reshuffle().await;
        assert_eq!(dealer.claim(0).await, Verdict::Void);
        assert_eq!(rules.asked.load(Ordering::SeqCst), 0);
        assert_eq!(dealer.scores(), vec![0]);
    }
    #[tokio::test(start_paused = true)]
    async fn reshuffle_returns_everything() {
        let dealer = dealer(2, Arc::new(Classic::default()));
        dealer.open().await;
        mark_all(&dealer, 0, &[0, 1]).await;
        mark_all(&dealer, 1, &[4]).await;
        dealer.reshuffle().await;
        let layout = dealer.table().read().await;
        assert_eq!(layout.board.occupied(), 0);
        assert_eq!(layout.deck.len(), 81);
        assert!(layout.board.tokens(0).is_empty());
        assert!(layout.board.tokens(1).is_empty());
    }
    #[tokio::test(start_paused = true)]
    async fn pacing_delays_every_placement() {
        let dealer = Dealer::new(
            Config {
                table_delay_ms: 100,
                ..config(1)
            },
            Arc::new(Classic::default()),
            Arc::new(Silent),
        );
        let start = Instant::now();
        dealer.open().await;
        assert!(start.elapsed() >= Duration::from_millis(600));
    }
    #[tokio::test(start_paused = true)]
    async fn setless_pool_exhausts_game() {
        struct Never;
        impl Evaluator for Never {
            fn test(&self, _: &[Card; TOKENS]) -> bool {
                false
            }
        }
        let dealer = dealer(1, Arc::new(Never));
        assert!(dealer.should_finish().await);
        assert!(dealer.is_exhausted());
    }
    #[tokio::test(start_paused = true)]
    async fn unsolvable_board_is_redealt() {
        // only triples containing card 0 are legal
        struct Zero;
        impl Evaluator for Zero {
            fn test(&self, cards: &[Card; TOKENS]) -> bool {
                cards.contains(&Card::from(0))
            }
        }
        let dealer = dealer(1, Arc::new(Zero));
        dealer.open().await;
        let layout = dealer.table().read().await;
        assert!(layout.board.slot(Card::from(0)).is_some());
        assert!(layout.is_balanced());
    }
    #[test]
    fn winners_share_the_top_score() {
        let dealer = dealer(3, Arc::new(Classic::default()));
        assert_eq!(dealer.winners(), vec![0, 1, 2]);
        dealer.seat(2).unwrap().point();
        assert_eq!(dealer.winners(), vec![2]);
        dealer.seat(0).unwrap().point();
        assert_eq!(dealer.winners(), vec![0, 2]);
    }
    #[tokio::test(start_paused = true)]
    async fn run_ends_when_switch_flips() {
        let dealer = Arc::new(dealer(1, Arc::new(Classic::default())));
        let stop = dealer.stop().clone();
        let game = tokio::spawn(dealer.clone().run(Vec::new()));
        tokio::time::sleep(Duration::from_secs(90)).await;
        stop.flip();
        let winners = game.await.unwrap();
        assert_eq!(winners, vec![0]);
        assert!(dealer.ready().count() >= 2);
    }
}
