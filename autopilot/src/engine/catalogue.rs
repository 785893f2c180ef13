//! Sorts one snapshot's entities into the things the selector and the threat
//! monitor care about.

use diamonds_core::constants::DIAMOND_POINTS_SMALL;
use diamonds_core::{AgentState, BoardSnapshot, EntityKind, Position, TeleportPair};

use crate::config::EngineConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiamondTarget {
    pub position: Position,
    pub value: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalogue {
    /// Diamonds the agent is willing to chase this tick.
    pub diamonds: Vec<DiamondTarget>,
    pub red_button: Option<Position>,
    /// `None` unless the board shows exactly two teleports.
    pub teleports: Option<TeleportPair>,
    pub rivals: Vec<Position>,
}

impl Catalogue {
    pub fn build(
        board: &BoardSnapshot,
        me: &AgentState,
        rivals: &[AgentState],
        cfg: &EngineConfig,
    ) -> Self {
        let near_capacity = me.diamonds >= cfg.high_value_cutoff;
        let mut out = Self {
            teleports: TeleportPair::resolve(&board.teleports(), me.position),
            ..Self::default()
        };

        for entity in &board.entities {
            match entity.kind {
                EntityKind::Diamond { value } => {
                    if value == 0 || (near_capacity && value > DIAMOND_POINTS_SMALL) {
                        continue;
                    }
                    out.diamonds.push(DiamondTarget {
                        position: entity.position,
                        value,
                    });
                }
                EntityKind::RedButton => {
                    if out.red_button.is_none() {
                        out.red_button = Some(entity.position);
                    }
                }
                EntityKind::Rival { id } => {
                    if id != me.id && entity.position != me.position {
                        push_unique(&mut out.rivals, entity.position);
                    }
                }
                EntityKind::Teleport | EntityKind::SelfAgent => {}
            }
        }

        for rival in rivals.iter().filter(|rival| rival.id != me.id) {
            push_unique(&mut out.rivals, rival.position);
        }

        out
    }
}

fn push_unique(cells: &mut Vec<Position>, cell: Position) {
    if !cells.contains(&cell) {
        cells.push(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diamonds_core::Entity;

    fn me(diamonds: u32) -> AgentState {
        AgentState {
            id: 1,
            position: Position::new(2, 2),
            base: Some(Position::new(0, 0)),
            inventory_size: 5,
            diamonds,
            milliseconds_left: 60_000,
        }
    }

    fn board() -> BoardSnapshot {
        BoardSnapshot::new(
            15,
            15,
            vec![
                Entity::diamond(4, 4, 1),
                Entity::diamond(6, 6, 2),
                Entity::teleport(1, 9),
                Entity::teleport(9, 1),
                Entity::red_button(7, 7),
                Entity::rival(10, 10, 2),
                Entity::new(Position::new(2, 2), EntityKind::SelfAgent),
            ],
        )
    }

    #[test]
    fn sorts_every_entity_kind() {
        let cat = Catalogue::build(&board(), &me(0), &[], &EngineConfig::default());
        assert_eq!(cat.diamonds.len(), 2);
        assert_eq!(cat.red_button, Some(Position::new(7, 7)));
        assert!(cat.teleports.is_some());
        assert_eq!(cat.rivals, vec![Position::new(10, 10)]);
    }

    #[test]
    fn drops_large_diamonds_near_capacity() {
        let cat = Catalogue::build(&board(), &me(4), &[], &EngineConfig::default());
        assert_eq!(
            cat.diamonds,
            vec![DiamondTarget {
                position: Position::new(4, 4),
                value: 1
            }]
        );
    }

    #[test]
    fn merges_rival_states_without_duplicates_or_self() {
        let same_cell = AgentState {
            id: 2,
            position: Position::new(10, 10),
            ..me(0)
        };
        let elsewhere = AgentState {
            id: 3,
            position: Position::new(0, 14),
            ..me(0)
        };
        let myself = me(0);
        let cat = Catalogue::build(
            &board(),
            &me(0),
            &[same_cell, elsewhere, myself],
            &EngineConfig::default(),
        );
        assert_eq!(
            cat.rivals,
            vec![Position::new(10, 10), Position::new(0, 14)]
        );
    }

    #[test]
    fn odd_teleport_counts_disable_the_pair() {
        let mut snapshot = board();
        snapshot.entities.push(Entity::teleport(12, 12));
        let cat = Catalogue::build(&snapshot, &me(0), &[], &EngineConfig::default());
        assert!(cat.teleports.is_none());
    }
}
