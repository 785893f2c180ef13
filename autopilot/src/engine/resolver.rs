//! Turns the chosen objective into one legal step.
//!
//! The straight step toward the objective is turned aside when it would land
//! on a teleport the agent does not mean to ride. While `avoiding_portal` is
//! set the agent also refuses horizontal steps that would line it up with a
//! teleport it is about to walk past, so a diagonal approach does not bounce
//! back onto the same teleport on the next tick. Nothing leaves the grid.

use diamonds_core::geometry::{is_touching, step_direction};
use diamonds_core::{BoardSnapshot, Move, Position, RandomSource, TeleportPair};

use super::Objective;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub mv: Move,
    pub avoiding_portal: bool,
    pub deflected: bool,
    /// No usable direction toward an objective; the move is a random walk.
    pub fallback: bool,
}

pub fn resolve(
    board: &BoardSnapshot,
    from: Position,
    objective: Option<&Objective>,
    pair: Option<&TeleportPair>,
    avoiding: bool,
    rng: &mut dyn RandomSource,
) -> Resolution {
    let unwanted = |cell: Position| {
        pair.is_some_and(|pair| pair.contains(cell))
            && !objective.is_some_and(|objective| objective.is_teleport_at(cell))
    };

    let target = objective.map(Objective::position);
    let raw = target.map_or(Move::STAY, |target| step_direction(from, target));
    let Some(target) = target.filter(|_| !raw.is_stay()) else {
        let mv = random_walk(board, from, &unwanted, rng);
        return Resolution {
            mv,
            avoiding_portal: avoiding && touches(from.offset(mv), pair, &unwanted),
            deflected: false,
            fallback: true,
        };
    };

    let mut mv = raw;
    let mut turned = false;
    if unwanted(from.offset(raw)) {
        mv = sidestep(board, from, raw);
        turned = true;
    } else if avoiding && raw.dy == 0 {
        if let Some(pair) = pair {
            let next = from.offset(raw);
            let lines_up = [pair.near, pair.far]
                .into_iter()
                .any(|teleport| unwanted(teleport) && enters_lane(teleport, next, target));
            if lines_up {
                mv = Move::new(0, (target.y - from.y).signum());
                turned = true;
            }
        }
    }

    let guarded = guard(board, from, mv, &unwanted);
    let deflected = turned || guarded != raw;
    let landing = from.offset(guarded);
    let avoiding_portal =
        (turned && guarded.dy == 0) || (avoiding && touches(landing, pair, &unwanted));

    if deflected {
        tracing::trace!(
            raw.dx = raw.dx,
            raw.dy = raw.dy,
            dx = guarded.dx,
            dy = guarded.dy,
            avoiding_portal,
            "step deflected"
        );
    }

    Resolution {
        mv: guarded,
        avoiding_portal,
        deflected,
        fallback: false,
    }
}

/// Quarter turn by swapping axes, reversed when it would leave the grid.
fn sidestep(board: &BoardSnapshot, from: Position, raw: Move) -> Move {
    let turned = raw.swapped();
    if board.contains(from.offset(turned)) {
        turned
    } else {
        turned.negated()
    }
}

/// Stepping to `next` puts `teleport` directly between the agent and the
/// target's row.
fn enters_lane(teleport: Position, next: Position, target: Position) -> bool {
    let toward = (target.y - next.y).signum();
    teleport.x == next.x && toward != 0 && teleport.y - next.y == toward
}

fn touches(
    cell: Position,
    pair: Option<&TeleportPair>,
    unwanted: &impl Fn(Position) -> bool,
) -> bool {
    pair.is_some_and(|pair| {
        [pair.near, pair.far]
            .into_iter()
            .any(|teleport| unwanted(teleport) && is_touching(cell, teleport))
    })
}

/// First of `mv`, its reverse and the two turns that stays on the grid and
/// off unwanted teleports.
fn guard(
    board: &BoardSnapshot,
    from: Position,
    mv: Move,
    unwanted: &impl Fn(Position) -> bool,
) -> Move {
    let candidates = [mv, mv.negated(), mv.swapped(), mv.swapped().negated()];
    if let Some(safe) = candidates.into_iter().find(|candidate| {
        let next = from.offset(*candidate);
        board.contains(next) && !unwanted(next)
    }) {
        return safe;
    }
    candidates
        .into_iter()
        .find(|candidate| board.contains(from.offset(*candidate)))
        .unwrap_or_else(|| toward_grid(board, from))
}

fn random_walk(
    board: &BoardSnapshot,
    from: Position,
    unwanted: &impl Fn(Position) -> bool,
    rng: &mut dyn RandomSource,
) -> Move {
    let on_grid: Vec<Move> = Move::CARDINALS
        .into_iter()
        .filter(|mv| board.contains(from.offset(*mv)))
        .collect();
    let safe: Vec<Move> = on_grid
        .iter()
        .copied()
        .filter(|mv| !unwanted(from.offset(*mv)))
        .collect();
    let options = if safe.is_empty() { on_grid } else { safe };
    if options.is_empty() {
        return toward_grid(board, from);
    }
    options[rng.pick(options.len())]
}

/// Only reachable from an off-grid position or an empty board.
fn toward_grid(board: &BoardSnapshot, from: Position) -> Move {
    let inside = Position::new(
        from.x.clamp(0, (board.width - 1).max(0)),
        from.y.clamp(0, (board.height - 1).max(0)),
    );
    let mv = step_direction(from, inside);
    if mv.is_stay() {
        Move::CARDINALS[0]
    } else {
        mv
    }
}
