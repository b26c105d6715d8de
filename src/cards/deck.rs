use super::card::Card;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

/// Cards not currently on the board.
/// Dealt from the front, replenished at the back, shuffled before every dealing phase.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: VecDeque<Card>,
    universe: usize,
    rng: SmallRng,
}

impl Deck {
    /// The full universe `0..size` in order. Seeded decks shuffle reproducibly.
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        Self {
            cards: (0..size).map(Card::from).collect(),
            universe: size,
            rng: seed
                .map(SmallRng::seed_from_u64)
                .unwrap_or_else(|| SmallRng::from_rng(&mut rand::rng())),
        }
    }
    pub fn shuffle(&mut self) {
        self.cards.make_contiguous().shuffle(&mut self.rng);
    }
    /// remove the front card, if any
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }
    /// return a card to the back of the deck
    pub fn push(&mut self, card: Card) {
        self.cards.push_back(card);
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    /// Size of the card universe this deck was cut from.
    pub fn universe(&self) -> usize {
        self.universe
    }
    pub fn cards(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }
}
