use super::card::Card;
use crate::TOKENS;

/// Decides which triples of cards form a set.
///
/// The dealer treats this as an opaque rule: it only ever asks whether a
/// submitted triple is valid and whether a pool of cards still contains one.
pub trait Evaluator: Send + Sync {
    /// Whether these three cards form a valid set.
    fn test(&self, cards: &[Card; TOKENS]) -> bool;
    /// Up to `limit` valid triples drawn from `pool`.
    fn find(&self, pool: &[Card], limit: usize) -> Vec<[Card; TOKENS]> {
        let mut sets = Vec::new();
        for i in 0..pool.len() {
            for j in i + 1..pool.len() {
                for k in j + 1..pool.len() {
                    if sets.len() >= limit {
                        return sets;
                    }
                    let triple = [pool[i], pool[j], pool[k]];
                    if self.test(&triple) {
                        sets.push(triple);
                    }
                }
            }
        }
        sets
    }
    /// Whether `pool` contains at least one valid triple.
    fn exists(&self, pool: &[Card]) -> bool {
        !self.find(pool, 1).is_empty()
    }
}

/// The classic rule: in every feature the three cards are
/// either all the same or all different.
#[derive(Debug, Clone, Copy)]
pub struct Classic {
    size: usize,
    count: usize,
}

impl Classic {
    pub fn new(size: usize, count: usize) -> Self {
        Self { size, count }
    }
}

impl Default for Classic {
    fn default() -> Self {
        Self::new(3, 4)
    }
}

impl Evaluator for Classic {
    fn test(&self, cards: &[Card; TOKENS]) -> bool {
        let [a, b, c] = *cards;
        if a == b || b == c || a == c {
            return false;
        }
        a.features(self.size, self.count)
            .zip(b.features(self.size, self.count))
            .zip(c.features(self.size, self.count))
            .all(|((x, y), z)| (x == y && y == z) || (x != y && y != z && x != z))
    }
}
