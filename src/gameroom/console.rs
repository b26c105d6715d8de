use super::*;
use colored::Colorize;
use std::sync::Mutex;
use std::sync::PoisonError;

/// Prints events to the terminal for people playing at the keyboard.
/// Countdown ticks are thinned to one line per whole second.
#[derive(Debug, Default)]
pub struct Console {
    second: Mutex<Option<u64>>,
}

impl Console {
    fn tick(&self, remaining: std::time::Duration) -> bool {
        let second = remaining.as_secs();
        let mut last = self.second.lock().unwrap_or_else(PoisonError::into_inner);
        last.replace(second) != Some(second)
    }
}

impl Sink for Console {
    fn emit(&self, event: Event) {
        let line = match &event {
            Event::Countdown { remaining, warn } => {
                if !self.tick(*remaining) {
                    return;
                }
                if *warn {
                    format!("{}", event).red().bold()
                } else {
                    format!("{}", event).dimmed()
                }
            }
            Event::PlaceCard { .. } | Event::RemoveCard { .. } => format!("{}", event).cyan(),
            Event::PlaceToken { .. } | Event::RemoveToken { .. } => format!("{}", event).normal(),
            Event::RemoveAllTokens => format!("{}", event).yellow(),
            Event::Score { .. } => format!("{}", event).green().bold(),
            Event::Freeze { .. } => format!("{}", event).blue(),
            Event::Winners(_) => format!("{}", event).magenta().bold(),
        };
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    #[test]
    fn countdown_prints_once_per_second() {
        let console = Console::default();
        assert!(console.tick(Duration::from_millis(4990)));
        assert!(!console.tick(Duration::from_millis(4500)));
        assert!(console.tick(Duration::from_millis(3990)));
        assert!(console.tick(Duration::from_secs(60)));
    }
}
