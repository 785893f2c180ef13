//! The linked teleport pair. Which end is "near" depends on where the
//! agent stands, so a pair is resolved afresh for every reference position.

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::geometry::distance;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportPair {
    pub near: Position,
    pub far: Position,
}

impl TeleportPair {
    /// `None` unless there are exactly two teleports. Equidistant ends are
    /// ordered by position so the labeling ignores input order.
    pub fn resolve(teleports: &[Position], from: Position) -> Option<Self> {
        let [a, b] = teleports else {
            return None;
        };
        let (a, b) = (*a, *b);
        if (distance(from, a), a) <= (distance(from, b), b) {
            Some(Self { near: a, far: b })
        } else {
            Some(Self { near: b, far: a })
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.near == pos || self.far == pos
    }

    /// Walk to the near end, come out at the far end, walk on to `to`.
    pub fn via_distance(&self, from: Position, to: Position) -> i32 {
        distance(from, self.near) + distance(self.far, to)
    }

    pub fn is_shorter(&self, from: Position, to: Position) -> bool {
        self.via_distance(from, to) < distance(from, to)
    }

    /// Cheapest walk from `from` to `to` when the pair may be ridden in
    /// either direction.
    pub fn best_distance(&self, from: Position, to: Position) -> i32 {
        let direct = distance(from, to);
        let forward = self.via_distance(from, to);
        let backward = distance(from, self.far) + distance(self.near, to);
        direct.min(forward).min(backward)
    }
}

/// Direct distance, or the cheapest portal-assisted one when a pair exists.
pub fn shortest_distance(pair: Option<&TeleportPair>, from: Position, to: Position) -> i32 {
    match pair {
        Some(pair) => pair.best_distance(from, to),
        None => distance(from, to),
    }
}
