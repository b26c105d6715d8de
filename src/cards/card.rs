use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Opaque card identity, `0..deck_size`.
/// Feature values are the digits of the id in base `feature_size`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Card(u32);

impl Card {
    /// Feature values of this card, least significant feature first.
    pub fn features(self, size: usize, count: usize) -> impl Iterator<Item = usize> {
        let size = size.max(1);
        (0..count).scan(usize::from(self), move |id, _| {
            let digit = *id % size;
            *id /= size;
            Some(digit)
        })
    }
}

/// usize isomorphism
/// cards index the card->slot mapping directly
impl From<Card> for usize {
    fn from(c: Card) -> usize {
        c.0 as usize
    }
}
impl From<usize> for Card {
    fn from(n: usize) -> Self {
        Self(n as u32)
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn usize_isomorphism() {
        assert_eq!(usize::from(Card::from(42)), 42);
    }
    #[test]
    fn features_are_base_digits() {
        // 2*1 + 1*3 + 0*9 + 2*27
        let card = Card::from(59);
        assert_eq!(card.features(3, 4).collect::<Vec<_>>(), vec![2, 1, 0, 2]);
    }
    #[test]
    fn display() {
        assert_eq!(Card::from(7).to_string(), "#7");
    }
}
