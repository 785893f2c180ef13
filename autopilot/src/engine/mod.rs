//! Per-tick decision engine: one board snapshot in, one move out.
//!
//! The engine itself holds only its configuration. Everything that must
//! survive between ticks travels in [`EngineState`], which the caller passes
//! in and stores back from the returned [`Decision`].

pub mod catalogue;
pub mod resolver;
pub mod selector;
pub mod threat;

use diamonds_core::{AgentState, BoardSnapshot, Move, Position, RandomSource};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use catalogue::Catalogue;
use selector::Mode;
use threat::Threat;

/// Cross-tick flags of one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    /// Sticky until the agent stands on its base.
    pub committed_to_base: bool,
    pub avoiding_portal: bool,
    pub tackled_last_tick: bool,
}

/// Where the agent is headed this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    Diamond { position: Position, value: u32 },
    RedButton { position: Position },
    Teleport { position: Position },
    Base { position: Position },
}

impl Objective {
    pub fn position(&self) -> Position {
        match *self {
            Self::Diamond { position, .. }
            | Self::RedButton { position }
            | Self::Teleport { position }
            | Self::Base { position } => position,
        }
    }

    /// True when the objective is to ride the teleport standing at `cell`.
    pub fn is_teleport_at(&self, cell: Position) -> bool {
        matches!(*self, Self::Teleport { position } if position == cell)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Diamond { .. } => "diamond",
            Self::RedButton { .. } => "red_button",
            Self::Teleport { .. } => "teleport",
            Self::Base { .. } => "base",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    ReturnToBase,
    Pursuit,
    Evade,
    Tackle,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub mv: Move,
    pub state: EngineState,
    pub objective: Option<Objective>,
    pub reason: DecisionReason,
    /// The step toward the objective was turned aside to miss a teleport.
    pub deflected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Engine {
    cfg: EngineConfig,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Picks this tick's move. Never fails: malformed snapshots are logged and
    /// worked around, and the result always keeps the agent on the grid when
    /// the grid has any cell to stand on.
    pub fn decide(
        &self,
        board: &BoardSnapshot,
        me: &AgentState,
        rivals: &[AgentState],
        state: EngineState,
        rng: &mut dyn RandomSource,
    ) -> Decision {
        for issue in board.issues(me) {
            tracing::warn!(agent = me.id, %issue, "degrading around malformed snapshot");
        }

        let mut next = state;
        if me.is_at_base() {
            next.committed_to_base = false;
        }

        let catalogue = Catalogue::build(board, me, rivals, &self.cfg);
        let critical = selector::is_time_critical(me, &self.cfg);
        let mut selection = selector::select(&catalogue, me, next.committed_to_base, &self.cfg);
        let mut reason = match selection.mode {
            Mode::ReturnToBase => DecisionReason::ReturnToBase,
            Mode::Pursuit => DecisionReason::Pursuit,
        };

        if !critical {
            match threat::assess(board, &catalogue, me, next.tackled_last_tick, &self.cfg) {
                Threat::Tackle { rival, mv } => {
                    next.tackled_last_tick = true;
                    next.committed_to_base = selection.committed;
                    tracing::debug!(
                        agent = me.id,
                        rival.x = rival.x,
                        rival.y = rival.y,
                        dx = mv.dx,
                        dy = mv.dy,
                        "tackle"
                    );
                    return Decision {
                        mv,
                        state: next,
                        objective: selection.objective,
                        reason: DecisionReason::Tackle,
                        deflected: false,
                    };
                }
                Threat::Evade { rival } => {
                    next.tackled_last_tick = false;
                    if selection.mode == Mode::Pursuit {
                        if let Some(evasive) = selector::evade(&catalogue, me, rival, &self.cfg) {
                            selection = evasive;
                            reason = DecisionReason::Evade;
                        }
                    }
                }
                Threat::Clear => next.tackled_last_tick = false,
            }
        }
        next.committed_to_base = selection.committed;

        let resolution = resolver::resolve(
            board,
            me.position,
            selection.objective.as_ref(),
            catalogue.teleports.as_ref(),
            next.avoiding_portal,
            rng,
        );
        next.avoiding_portal = resolution.avoiding_portal;
        if resolution.fallback {
            reason = DecisionReason::Fallback;
        }

        tracing::debug!(
            agent = me.id,
            objective = selection.objective.as_ref().map_or("none", Objective::kind),
            cost = selection.cost,
            dx = resolution.mv.dx,
            dy = resolution.mv.dy,
            ?reason,
            committed = next.committed_to_base,
            avoiding = next.avoiding_portal,
            "decided"
        );

        Decision {
            mv: resolution.mv,
            state: next,
            objective: selection.objective,
            reason,
            deflected: resolution.deflected,
        }
    }
}
