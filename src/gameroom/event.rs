use crate::Position;
use crate::Score;
use crate::Slot;
use crate::cards::Card;
use std::time::Duration;

/// Notifications pushed to the presentation sink.
/// Fire-and-forget: nothing in the engine waits on their delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    PlaceCard { card: Card, slot: Slot },
    RemoveCard { slot: Slot },
    PlaceToken { player: Position, slot: Slot },
    RemoveToken { player: Position, slot: Slot },
    /// Every token visual is cleared ahead of a reshuffle.
    RemoveAllTokens,
    /// Time left in the round; `warn` once inside the warning window.
    Countdown { remaining: Duration, warn: bool },
    Score { player: Position, score: Score },
    /// Time left in a player's freeze; zero when it lifts.
    Freeze { player: Position, remaining: Duration },
    Winners(Vec<Position>),
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::PlaceCard { card, slot } => write!(f, "slot {}: {}", slot, card),
            Event::RemoveCard { slot } => write!(f, "slot {}: empty", slot),
            Event::PlaceToken { player, slot } => write!(f, "P{}: token on {}", player, slot),
            Event::RemoveToken { player, slot } => write!(f, "P{}: token off {}", player, slot),
            Event::RemoveAllTokens => write!(f, "tokens cleared"),
            Event::Countdown { remaining, warn } => write!(
                f,
                "{}{:.1}s left",
                if *warn { "!! " } else { "" },
                remaining.as_secs_f32()
            ),
            Event::Score { player, score } => write!(f, "P{}: {} points", player, score),
            Event::Freeze { player, remaining } if remaining.is_zero() => {
                write!(f, "P{}: thawed", player)
            }
            Event::Freeze { player, remaining } => {
                write!(f, "P{}: frozen {:.1}s", player, remaining.as_secs_f32())
            }
            Event::Winners(winners) => {
                let s = winners
                    .iter()
                    .map(|p| format!("P{}", p))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Winners: {}", s)
            }
        }
    }
}
