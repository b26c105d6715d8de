use super::*;
use crate::Position;
use crate::cards::*;
use std::sync::Arc;

/// A configured game, ready to run.
///
/// Human players are fed through [`Game::keypad`]; robots press for
/// themselves. [`Game::run`] spawns the dealer and every player and
/// resolves to the winners once the game is over.
#[derive(Debug)]
pub struct Game {
    dealer: Arc<Dealer>,
    agents: Vec<Agent>,
}

impl Game {
    pub fn new(
        config: Config,
        rules: Arc<dyn Evaluator>,
        sink: Arc<dyn Sink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let dealer = Arc::new(Dealer::new(config, rules, sink));
        let agents = (0..dealer.config().players())
            .map(|p| Agent::new(p, Self::role(dealer.config(), p), dealer.clone()))
            .collect();
        Ok(Self { dealer, agents })
    }

    /// Classic rules over the configured features.
    pub fn classic(config: Config, sink: Arc<dyn Sink>) -> Result<Self, ConfigError> {
        let rules = Classic::new(config.feature_size, config.feature_count);
        Self::new(config, Arc::new(rules), sink)
    }

    pub fn keypad(&self, player: Position) -> Option<Keypad> {
        self.agents.get(player).map(Agent::keypad)
    }
    /// Flipping this switch ends the game cooperatively.
    pub fn switch(&self) -> Switch {
        self.dealer.stop().clone()
    }
    pub fn dealer(&self) -> &Arc<Dealer> {
        &self.dealer
    }

    pub async fn run(self) -> Vec<Position> {
        let players = self.agents.into_iter().map(Agent::spawn).collect();
        match tokio::spawn(self.dealer.run(players)).await {
            Ok(winners) => winners,
            Err(e) => {
                log::error!("[game] dealer task failed: {}", e);
                Vec::new()
            }
        }
    }

    fn role(config: &Config, player: Position) -> Role {
        if config.is_human(player) {
            Role::Human
        } else {
            let fish = match config.seed {
                Some(seed) => Fish::seeded(seed.wrapping_add(player as u64)),
                None => Fish::default(),
            };
            Role::Robot(Box::new(fish))
        }
    }
}
