//! Real-time multi-agent Set dealer.
//!
//! One dealer task owns the round lifecycle of a shared board while any
//! number of player tasks race to claim valid triples on it.
//!
//! ## Modules
//!
//! - [`cards`]: card identities, the deck, and the [`cards::Evaluator`] seam
//! - [`board`]: slot/card mappings and per-player token ledgers
//! - [`gameroom`]: dealer, players, signals, presentation sinks, config
pub mod board;
pub mod cards;
pub mod gameroom;

pub use board::*;
pub use cards::*;
pub use gameroom::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Board position, `0..rows * columns`.
pub type Slot = usize;
/// Player index, `0..humans + robots`.
pub type Position = usize;
/// Points awarded for valid claims.
pub type Score = u32;

// ============================================================================
// PROTOCOL PARAMETERS
// ============================================================================
/// Tokens a player may hold at once; holding this many completes a claim.
pub const TOKENS: usize = 3;
/// Capacity of each player's pending intent queue. Intents beyond it are dropped.
pub const QUEUE: usize = 3;
/// Longest countdown sleep outside the warning window.
pub const TICK: std::time::Duration = std::time::Duration::from_millis(1000);
/// Countdown sleep inside the warning window.
pub const FINE_TICK: std::time::Duration = std::time::Duration::from_millis(10);
/// Interval between freeze reports to the presentation sink.
pub const FREEZE_TICK: std::time::Duration = std::time::Duration::from_millis(1000);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::create_dir_all("logs").context("create logs directory")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("time moves slow")?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).context("create log file")?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")
}

/// Register Ctrl+C handler that stops the game cooperatively.
/// A second Ctrl+C exits immediately.
#[cfg(feature = "cli")]
pub fn kys(switch: Switch) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, stopping game");
            switch.flip();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("violent interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}

/// Stop the game after a wall-clock budget, for unattended runs.
#[cfg(feature = "cli")]
pub fn brb(switch: Switch, budget: std::time::Duration) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(budget) => {
                log::info!("time budget of {:?} spent, stopping game", budget);
                switch.flip();
            }
            _ = switch.wait() => {}
        }
    });
}
