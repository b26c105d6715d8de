use crate::Position;
use crate::Slot;
use crate::board::*;
use crate::cards::*;
use tokio::sync::RwLock;
use tokio::sync::RwLockReadGuard;
use tokio::sync::RwLockWriteGuard;

/// Everything the dealer moves cards between.
/// Every card of the universe is in exactly one of: the deck, a slot on
/// the board, or the retired pile of matched triples.
#[derive(Debug)]
pub struct Layout {
    pub board: Board,
    pub deck: Deck,
    pub retired: Vec<Card>,
}

impl Layout {
    pub fn new(board: Board, deck: Deck) -> Self {
        Self {
            board,
            deck,
            retired: Vec::new(),
        }
    }
    /// Cards still in play: on the board or waiting in the deck.
    pub fn pool(&self) -> Vec<Card> {
        let mut pool = self.board.cards();
        pool.extend(self.deck.cards());
        pool
    }
    /// Card conservation across deck, board and retired pile.
    pub fn is_balanced(&self) -> bool {
        self.deck.len() + self.board.occupied() + self.retired.len() == self.deck.universe()
    }
}

/// Shared access to the layout.
///
/// Players toggle tokens under the read lock, so they only contend on
/// their own ledgers. The dealer deals, reshuffles and adjudicates under the
/// write lock, so no toggle interleaves with a removal cascade and no
/// reader ever sees a half-finished reshuffle.
#[derive(Debug)]
pub struct Table {
    layout: RwLock<Layout>,
}

impl Table {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout: RwLock::new(layout),
        }
    }
    pub async fn read(&self) -> RwLockReadGuard<'_, Layout> {
        self.layout.read().await
    }
    pub async fn write(&self) -> RwLockWriteGuard<'_, Layout> {
        self.layout.write().await
    }
    /// Toggles a token for `player`.
    /// True iff this toggle placed the player's last token, i.e. raised a claim.
    /// A fourth toggle on a full ledger is ignored and does not claim again.
    pub async fn mark(&self, player: Position, slot: Slot) -> bool {
        let layout = self.read().await;
        let toggle = layout.board.toggle(player, slot);
        log::debug!("[table] P{} toggled slot {}: {:?}", player, slot, toggle);
        toggle == Toggle::Placed && layout.board.is_complete(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameroom::Silent;
    use std::sync::Arc;

    fn table(slots: usize, players: usize) -> Table {
        let board = Board::new(slots, 81, players, Arc::new(Silent));
        Table::new(Layout::new(board, Deck::new(81, Some(0))))
    }
    async fn deal(table: &Table) {
        let mut layout = table.write().await;
        for slot in layout.board.vacancies() {
            let card = layout.deck.draw().unwrap();
            layout.board.place(card, slot);
        }
    }

    #[tokio::test]
    async fn dealing_keeps_cards_balanced() {
        let table = table(4, 1);
        assert!(table.read().await.is_balanced());
        deal(&table).await;
        let layout = table.read().await;
        assert_eq!(layout.board.occupied(), 4);
        assert_eq!(layout.deck.len(), 77);
        assert!(layout.is_balanced());
        assert_eq!(layout.pool().len(), 81);
    }
    #[tokio::test]
    async fn third_placement_raises_claim() {
        let table = table(6, 1);
        deal(&table).await;
        assert!(!table.mark(0, 1).await);
        assert!(!table.mark(0, 2).await);
        assert!(table.mark(0, 5).await);
        // rejected fourth token
        assert!(!table.mark(0, 3).await);
        // removal, then the third token again
        assert!(!table.mark(0, 5).await);
        assert!(table.mark(0, 5).await);
    }
    #[tokio::test]
    async fn players_mark_concurrently_without_interference() {
        let table = Arc::new(table(12, 4));
        deal(&table).await;
        let tasks = (0..4)
            .map(|p| {
                let table = table.clone();
                tokio::spawn(async move {
                    for slot in [p, p + 4, p + 8] {
                        table.mark(p, slot).await;
                    }
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.unwrap();
        }
        let layout = table.read().await;
        for p in 0..4 {
            assert_eq!(layout.board.tokens(p), vec![p, p + 4, p + 8]);
        }
    }
}
