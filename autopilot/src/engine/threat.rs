//! Reaction to the nearest rival.

use diamonds_core::geometry::{distance, is_aligned, step_direction};
use diamonds_core::{AgentState, BoardSnapshot, Move, Position};

use super::catalogue::Catalogue;
use crate::config::EngineConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Threat {
    Clear,
    /// Step straight at the rival this tick.
    Tackle { rival: Position, mv: Move },
    /// Re-select without the rival's quadrant.
    Evade { rival: Position },
}

/// Nearest rival, first listed on ties.
pub fn nearest_rival(cat: &Catalogue, from: Position) -> Option<Position> {
    cat.rivals
        .iter()
        .copied()
        .min_by_key(|rival| distance(from, *rival))
}

pub fn assess(
    board: &BoardSnapshot,
    cat: &Catalogue,
    me: &AgentState,
    tackled_last_tick: bool,
    cfg: &EngineConfig,
) -> Threat {
    let Some(rival) = nearest_rival(cat, me.position) else {
        return Threat::Clear;
    };
    let gap = distance(me.position, rival);

    if gap == cfg.tackle_distance {
        // A rival on the same row or column is just passing by.
        if !tackled_last_tick
            && !is_aligned(me.position, rival)
            && board.contains(rival)
            && board.contains(me.position)
        {
            return Threat::Tackle {
                rival,
                mv: step_direction(me.position, rival),
            };
        }
        return Threat::Clear;
    }
    if gap == cfg.evade_distance {
        return Threat::Evade { rival };
    }
    Threat::Clear
}
