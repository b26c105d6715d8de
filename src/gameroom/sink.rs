use super::event::Event;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// Output channel for everything a display would render.
/// Implementations must not block: the board calls this while locked.
pub trait Sink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Sink for Silent {
    fn emit(&self, _: Event) {}
}

/// Writes every event to the log, for headless games.
/// Countdown ticks go to trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Sink for Logger {
    fn emit(&self, event: Event) {
        match event {
            Event::Countdown { .. } => log::trace!("[sink] {}", event),
            Event::Winners(_) => log::info!("[sink] {}", event),
            _ => log::debug!("[sink] {}", event),
        }
    }
}

/// Forwards events over an unbounded channel to whoever renders them.
#[derive(Debug, Clone)]
pub struct Relay(UnboundedSender<Event>);

impl Relay {
    pub fn new() -> (Self, UnboundedReceiver<Event>) {
        let (tx, rx) = unbounded_channel();
        (Self(tx), rx)
    }
}

impl Sink for Relay {
    fn emit(&self, event: Event) {
        if let Err(e) = self.0.send(event) {
            log::trace!("[sink] relay closed, dropped {}", e.0);
        }
    }
}
