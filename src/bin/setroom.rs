//! Terminal Set Room
//!
//! Runs one game in the terminal. Human players type `<player> <slot>`
//! lines on stdin; robots play by themselves. With `--quiet`, or when
//! stdout is not a terminal, events go to the log file only.

use anyhow::Context;
use clap::Parser;
use setroom::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; flags below override it
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    #[arg(long)]
    humans: Option<usize>,
    #[arg(long)]
    robots: Option<usize>,
    /// round length in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// pause after each card placed or removed, in milliseconds
    #[arg(long)]
    delay: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
    /// log every legal triple after each deal
    #[arg(long)]
    hints: bool,
    /// stop the game after this many seconds
    #[arg(long)]
    duration: Option<u64>,
    /// write game events to the log file instead of the terminal
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.humans = self.humans.unwrap_or(config.humans);
        config.robots = self.robots.unwrap_or(config.robots);
        config.turn_timeout_ms = self
            .timeout
            .map(|s| s * 1000)
            .unwrap_or(config.turn_timeout_ms);
        config.table_delay_ms = self.delay.unwrap_or(config.table_delay_ms);
        config.seed = self.seed.or(config.seed);
        config.hints |= self.hints;
        config.validate()?;
        Ok(config)
    }
    /// The colored console, unless quiet or not attached to a terminal.
    fn sink(&self) -> Arc<dyn Sink> {
        use std::io::IsTerminal;
        if self.quiet || !std::io::stdout().is_terminal() {
            Arc::new(Logger)
        } else {
            Arc::new(Console::default())
        }
    }
}

/// Forwards `<player> <slot>` lines to the matching keypad until stdin closes.
/// Runs on its own thread so a pending read never holds up runtime shutdown.
fn keyboard(keypads: Vec<Keypad>) {
    use std::io::BufRead;
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line.inspect_err(|e| log::warn!("[keyboard] stdin failed: {}", e)) else {
            break;
        };
        let mut words = line.split_whitespace().map(str::parse::<usize>);
        match (words.next(), words.next()) {
            (Some(Ok(player)), Some(Ok(slot))) => match keypads.get(player) {
                Some(keypad) => {
                    keypad.press(slot);
                }
                None => log::warn!("[keyboard] no human player P{}", player),
            },
            _ => log::warn!("[keyboard] expected `<player> <slot>`, got {:?}", line),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log()?;
    let args = Args::parse();
    let config = args.config()?;
    let humans = config.humans;
    let game = Game::classic(config, args.sink()).context("set up game")?;
    let switch = game.switch();
    kys(switch.clone());
    if let Some(secs) = args.duration {
        brb(switch.clone(), Duration::from_secs(secs));
    }
    let keypads: Vec<Keypad> = (0..humans).filter_map(|p| game.keypad(p)).collect();
    std::thread::spawn(move || keyboard(keypads));
    let winners = game.run().await;
    log::info!("winners: {:?}", winners);
    Ok(())
}
