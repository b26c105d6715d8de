use crate::Slot;
use crate::TOKENS;

/// One player's tokens, in placement order.
/// Never holds a duplicate slot, never holds more than [`TOKENS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger(Vec<Slot>);

impl Ledger {
    pub fn contains(&self, slot: Slot) -> bool {
        self.0.contains(&slot)
    }
    /// Appends a token. Refused when full or already present.
    pub fn insert(&mut self, slot: Slot) -> bool {
        if self.is_full() || self.contains(slot) {
            false
        } else {
            self.0.push(slot);
            true
        }
    }
    /// Drops a token, keeping the order of the rest.
    pub fn remove(&mut self, slot: Slot) -> bool {
        match self.0.iter().position(|s| *s == slot) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }
    pub fn is_full(&self) -> bool {
        self.0.len() == TOKENS
    }
    pub fn slots(&self) -> &[Slot] {
        &self.0
    }
}
