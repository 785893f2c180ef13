use diamonds_core::{AgentState, BoardSnapshot, Move, SeededRng};

use super::{BotTelemetry, GridBot};
use crate::config::EngineConfig;
use crate::engine::{DecisionReason, Engine, EngineState};

const FALLBACK_SALT: u32 = 0x6D49_A2F1;

/// The decision engine wrapped as a roster bot. Owns the cross-tick state and
/// the random source for fallback walks.
pub struct DiamondHunter {
    id: String,
    description: String,
    engine: Engine,
    state: EngineState,
    rng: SeededRng,
    telemetry: BotTelemetry,
}

impl DiamondHunter {
    pub fn new(id: impl Into<String>, description: impl Into<String>, cfg: EngineConfig) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            engine: Engine::new(cfg),
            state: EngineState::default(),
            rng: SeededRng::new(FALLBACK_SALT),
            telemetry: BotTelemetry::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }
}

impl GridBot for DiamondHunter {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn reset(&mut self, seed: u32) {
        self.state = EngineState::default();
        self.rng = SeededRng::new(seed ^ FALLBACK_SALT);
        self.telemetry = BotTelemetry::default();
    }

    fn next_move(&mut self, board: &BoardSnapshot, me: &AgentState, rivals: &[AgentState]) -> Move {
        let decision = self
            .engine
            .decide(board, me, rivals, self.state, &mut self.rng);
        self.state = decision.state;

        match decision.reason {
            DecisionReason::Tackle => self.telemetry.tackles_attempted += 1,
            DecisionReason::Evade => self.telemetry.evasions += 1,
            DecisionReason::Fallback => self.telemetry.fallback_moves += 1,
            DecisionReason::ReturnToBase | DecisionReason::Pursuit => {}
        }
        if decision.deflected {
            self.telemetry.deflections += 1;
        }

        decision.mv
    }

    fn telemetry(&self) -> BotTelemetry {
        self.telemetry
    }
}
