use diamonds_core::{AgentState, BoardSnapshot, Move, RandomSource, SeededRng};
use serde::Serialize;

use super::GridBot;

pub(super) const WANDERER_ID: &str = "wanderer";
pub(super) const WANDERER_DESCRIPTION: &str =
    "Target-free baseline that walks the grid and turns clockwise at random.";

const WANDER_SALT: u32 = 0x1F0E_57A3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WandererConfig {
    /// Chance of a clockwise turn after each step, as `numerator / denominator`.
    pub turn_numerator: u32,
    pub turn_denominator: u32,
}

impl Default for WandererConfig {
    fn default() -> Self {
        Self {
            turn_numerator: 2,
            turn_denominator: 5,
        }
    }
}

/// Keeps its heading until the edge of the grid or a random turn.
pub struct Wanderer {
    cfg: WandererConfig,
    rng: SeededRng,
    heading: usize,
}

impl Wanderer {
    pub fn new(cfg: WandererConfig) -> Self {
        Self {
            cfg,
            rng: SeededRng::new(WANDER_SALT),
            heading: 0,
        }
    }
}

impl GridBot for Wanderer {
    fn id(&self) -> &str {
        WANDERER_ID
    }

    fn description(&self) -> &str {
        WANDERER_DESCRIPTION
    }

    fn reset(&mut self, seed: u32) {
        self.rng = SeededRng::new(seed ^ WANDER_SALT);
        self.heading = 0;
    }

    fn next_move(&mut self, board: &BoardSnapshot, me: &AgentState, _rivals: &[AgentState]) -> Move {
        let open = (0..Move::CARDINALS.len())
            .map(|turn| (self.heading + turn) % Move::CARDINALS.len())
            .find(|idx| board.contains(me.position.offset(Move::CARDINALS[*idx])));
        let Some(idx) = open else {
            return Move::CARDINALS[self.heading];
        };

        self.heading = idx;
        let mv = Move::CARDINALS[idx];
        if self
            .rng
            .chance(self.cfg.turn_numerator, self.cfg.turn_denominator.max(1))
        {
            self.heading = (self.heading + 1) % Move::CARDINALS.len();
        }
        mv
    }
}
