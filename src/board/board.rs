use super::ledger::Ledger;
use crate::Position;
use crate::Slot;
use crate::TOKENS;
use crate::cards::*;
use crate::gameroom::Event;
use crate::gameroom::Sink;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// Outcome of a token toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Placed,
    Removed,
    /// Empty slot, unknown player, or a fourth token before adjudication.
    Ignored,
}

/// Cards laid out in slots, plus every player's tokens on them.
///
/// Maintains `slots[s] == Some(c)` iff `cards[c] == Some(s)`, and never
/// leaves a token on an empty slot: removing a card clears every token
/// that referenced it. All mutations are reported to the [`Sink`].
///
/// Structural mutations (`place`, `remove`) need `&mut self`. Token toggles
/// only need `&self`: each ledger sits behind its own lock, so players
/// holding shared access never contend with one another.
pub struct Board {
    slots: Vec<Option<Card>>,
    cards: Vec<Option<Slot>>,
    ledgers: Vec<Mutex<Ledger>>,
    sink: Arc<dyn Sink>,
}

impl Board {
    pub fn new(slots: usize, universe: usize, players: usize, sink: Arc<dyn Sink>) -> Self {
        Self {
            slots: vec![None; slots],
            cards: vec![None; universe],
            ledgers: (0..players).map(|_| Mutex::default()).collect(),
            sink,
        }
    }

    /// Puts `card` into the empty `slot`. Occupied slots, unknown slots and
    /// cards already on the board are refused.
    pub fn place(&mut self, card: Card, slot: Slot) -> bool {
        match (self.slots.get(slot), self.cards.get(usize::from(card))) {
            (Some(None), Some(None)) => {
                self.slots[slot] = Some(card);
                self.cards[usize::from(card)] = Some(slot);
                log::debug!("[board] placed {} in slot {}", card, slot);
                self.sink.emit(Event::PlaceCard { card, slot });
                true
            }
            _ => {
                log::warn!("[board] refused to place {} in slot {}", card, slot);
                false
            }
        }
    }

    /// Takes the card out of `slot`, clearing every token on it first.
    pub fn remove(&mut self, slot: Slot) -> Option<Card> {
        let Some(card) = self.slots.get_mut(slot).and_then(Option::take) else {
            log::warn!("[board] nothing to remove from slot {}", slot);
            return None;
        };
        self.cards[usize::from(card)] = None;
        for (player, ledger) in self.ledgers.iter_mut().enumerate() {
            let ledger = ledger.get_mut().unwrap_or_else(PoisonError::into_inner);
            if ledger.remove(slot) {
                self.sink.emit(Event::RemoveToken { player, slot });
            }
        }
        log::debug!("[board] removed {} from slot {}", card, slot);
        self.sink.emit(Event::RemoveCard { slot });
        Some(card)
    }

    /// Marks `slot` for `player`, or unmarks it if already marked.
    /// A full ledger accepts removals only.
    pub fn toggle(&self, player: Position, slot: Slot) -> Toggle {
        if self.card(slot).is_none() {
            return Toggle::Ignored;
        }
        let Some(mut ledger) = self.ledger(player) else {
            log::warn!("[board] toggle from unknown player P{}", player);
            return Toggle::Ignored;
        };
        if ledger.remove(slot) {
            self.sink.emit(Event::RemoveToken { player, slot });
            Toggle::Removed
        } else if ledger.insert(slot) {
            self.sink.emit(Event::PlaceToken { player, slot });
            Toggle::Placed
        } else {
            Toggle::Ignored
        }
    }

    pub fn is_complete(&self, player: Position) -> bool {
        self.ledger(player).is_some_and(|l| l.is_full())
    }

    /// Cards under the player's tokens, in token order.
    pub fn cards_for(&self, player: Position) -> Vec<Card> {
        self.tokens(player)
            .into_iter()
            .filter_map(|slot| self.card(slot))
            .collect()
    }

    pub fn tokens(&self, player: Position) -> Vec<Slot> {
        self.ledger(player)
            .map(|l| l.slots().to_vec())
            .unwrap_or_default()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn card(&self, slot: Slot) -> Option<Card> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn slot(&self, card: Card) -> Option<Slot> {
        self.cards.get(usize::from(card)).copied().flatten()
    }

    /// Cards on the board, in slot order.
    pub fn cards(&self) -> Vec<Card> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn vacancies(&self) -> Vec<Slot> {
        (0..self.slots.len())
            .filter(|s| self.slots[*s].is_none())
            .collect()
    }

    /// Every legal triple currently on the board, as sorted slots.
    pub fn hints(&self, rules: &dyn Evaluator) -> Vec<[Slot; TOKENS]> {
        rules
            .find(&self.cards(), usize::MAX)
            .into_iter()
            .filter_map(|set| {
                let mut slots = [self.slot(set[0])?, self.slot(set[1])?, self.slot(set[2])?];
                slots.sort();
                Some(slots)
            })
            .collect()
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn players(&self) -> usize {
        self.ledgers.len()
    }

    fn ledger(&self, player: Position) -> Option<MutexGuard<'_, Ledger>> {
        self.ledgers
            .get(player)
            .map(|l| l.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("slots", &self.slots)
            .field(
                "tokens",
                &(0..self.players()).map(|p| self.tokens(p)).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
