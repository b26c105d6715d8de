pub mod board;
pub use board::*;

pub mod ledger;
pub use ledger::*;
