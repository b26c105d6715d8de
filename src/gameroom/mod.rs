mod config;
#[cfg(feature = "cli")]
mod console;
mod dealer;
mod event;
mod game;
mod player;
mod robot;
mod seat;
mod signal;
mod sink;
mod table;
mod timer;

pub use config::*;
#[cfg(feature = "cli")]
pub use console::*;
pub use dealer::*;
pub use event::*;
pub use game::*;
pub use player::*;
pub use robot::*;
pub use seat::*;
pub use signal::*;
pub use sink::*;
pub use table::*;
pub use timer::*;
