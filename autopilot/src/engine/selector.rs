//! Target selection.
//!
//! Two modes, re-evaluated every tick. Return-to-base wins whenever the agent
//! is already committed to it, its inventory is full, or the clock no longer
//! covers the walk home at `ms_per_step_budget` per step. Otherwise every
//! eligible diamond is priced by distance, discounted by `step_penalty` per
//! point of value over the incumbent, and the red button may steal the
//! objective when it is cheaper by at least `red_button_margin` steps.

use diamonds_core::geometry::{distance, same_quadrant};
use diamonds_core::portal::shortest_distance;
use diamonds_core::{AgentState, Position, TeleportPair};

use super::catalogue::{Catalogue, DiamondTarget};
use super::Objective;
use crate::config::EngineConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    ReturnToBase,
    Pursuit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub objective: Option<Objective>,
    /// New value of the sticky return-to-base flag.
    pub committed: bool,
    pub mode: Mode,
    /// Cost of the winning diamond, when one was priced.
    pub cost: Option<i32>,
}

/// The remaining clock no longer pays for a detour.
pub fn is_time_critical(me: &AgentState, cfg: &EngineConfig) -> bool {
    let Some(base) = me.base else {
        return false;
    };
    let steps = distance(me.position, base);
    steps > 0 && me.milliseconds_left <= cfg.ms_per_step_budget.saturating_mul(steps as u64)
}

pub fn select(
    cat: &Catalogue,
    me: &AgentState,
    committed: bool,
    cfg: &EngineConfig,
) -> Selection {
    if committed || me.is_inventory_full() || is_time_critical(me, cfg) {
        return return_to_base(cat, me, cfg);
    }
    pursue(cat, me, &cat.diamonds, cat.red_button, cfg)
}

/// Pursuit again, minus everything in the rival's quadrant. `None` when the
/// rival's quadrant holds every eligible diamond, in which case the caller
/// keeps its unfiltered selection.
pub fn evade(
    cat: &Catalogue,
    me: &AgentState,
    rival: Position,
    cfg: &EngineConfig,
) -> Option<Selection> {
    let pivot = me.position;
    let diamonds: Vec<DiamondTarget> = cat
        .diamonds
        .iter()
        .copied()
        .filter(|d| !same_quadrant(pivot, rival, d.position))
        .collect();
    let button = cat
        .red_button
        .filter(|button| !same_quadrant(pivot, rival, *button));
    tracing::trace!(
        dropped = cat.diamonds.len() - diamonds.len(),
        button_kept = button.is_some(),
        "evading rival quadrant"
    );
    if diamonds.is_empty() {
        return None;
    }
    Some(pursue(cat, me, &diamonds, button, cfg))
}

fn return_to_base(cat: &Catalogue, me: &AgentState, cfg: &EngineConfig) -> Selection {
    let Some(base) = me.base else {
        return Selection {
            objective: None,
            committed: false,
            mode: Mode::ReturnToBase,
            cost: None,
        };
    };

    let mut objective = Objective::Base { position: base };
    if let Some(pair) = cat.teleports {
        let critical = is_time_critical(me, cfg);
        if !pair.contains(me.position)
            && (!critical || distance(me.position, pair.near) == 1)
            && pair.is_shorter(me.position, base)
        {
            objective = Objective::Teleport {
                position: pair.near,
            };
        }
    }

    Selection {
        objective: Some(objective),
        committed: true,
        mode: Mode::ReturnToBase,
        cost: None,
    }
}

#[derive(Clone, Copy, Debug)]
struct Pick {
    diamond: DiamondTarget,
    cost: i32,
    /// Entry teleport when the pick is reached through the pair.
    via: Option<Position>,
}

fn pursue(
    cat: &Catalogue,
    me: &AgentState,
    diamonds: &[DiamondTarget],
    button: Option<Position>,
    cfg: &EngineConfig,
) -> Selection {
    let from = me.position;
    let pair = cat.teleports.as_ref();
    let inside_portal = pair.is_some_and(|pair| pair.contains(from));

    let mut best: Option<Pick> = None;
    for diamond in diamonds {
        let cost = distance(from, diamond.position) + return_leg(me, pair, diamond.position);
        consider(
            &mut best,
            Pick {
                diamond: *diamond,
                cost,
                via: None,
            },
            cfg.step_penalty,
        );
    }
    if let Some(pair) = pair.filter(|_| !inside_portal) {
        for diamond in diamonds {
            let cost =
                pair.via_distance(from, diamond.position) + return_leg(me, Some(pair), diamond.position);
            consider(
                &mut best,
                Pick {
                    diamond: *diamond,
                    cost,
                    via: Some(pair.near),
                },
                cfg.step_penalty,
            );
        }
    }

    let Some(best) = best else {
        return match me.base {
            Some(base) => Selection {
                objective: Some(Objective::Base { position: base }),
                committed: true,
                mode: Mode::ReturnToBase,
                cost: None,
            },
            None => Selection {
                objective: None,
                committed: false,
                mode: Mode::ReturnToBase,
                cost: None,
            },
        };
    };

    let mut objective = match best.via {
        Some(near) => Objective::Teleport { position: near },
        None => Objective::Diamond {
            position: best.diamond.position,
            value: best.diamond.value,
        },
    };

    if let Some(button) = button {
        let mut cost = distance(from, button);
        if let Some(pair) = pair.filter(|_| !inside_portal) {
            cost = cost.min(pair.via_distance(from, button));
        }
        cost += return_leg(me, pair, button);
        tracing::trace!(cost, best = best.cost, "red button priced");

        if cost + cfg.red_button_margin <= best.cost {
            objective = match pair {
                Some(pair) if !inside_portal && pair.is_shorter(from, button) => {
                    Objective::Teleport {
                        position: pair.near,
                    }
                }
                _ => Objective::RedButton { position: button },
            };
        }
    }

    Selection {
        objective: Some(objective),
        committed: false,
        mode: Mode::Pursuit,
        cost: Some(best.cost),
    }
}

/// Keeps the raw cost of the winner; the value discount only decides the
/// comparison against the incumbent.
fn consider(best: &mut Option<Pick>, candidate: Pick, step_penalty: i32) {
    let incumbent_value = best.map_or(0, |pick| pick.diamond.value as i32);
    let adjusted =
        candidate.cost - (candidate.diamond.value as i32 - incumbent_value) * step_penalty;
    tracing::trace!(
        x = candidate.diamond.position.x,
        y = candidate.diamond.position.y,
        value = candidate.diamond.value,
        cost = candidate.cost,
        adjusted,
        via_portal = candidate.via.is_some(),
        "diamond priced"
    );
    if best.map_or(true, |pick| adjusted < pick.cost) {
        *best = Some(candidate);
    }
}

/// Walk home from `target`, charged only when picking it up fills the
/// inventory.
fn return_leg(me: &AgentState, pair: Option<&TeleportPair>, target: Position) -> i32 {
    match me.base {
        Some(base) if me.is_one_short_of_full() => shortest_distance(pair, target, base),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diamonds_core::{BoardSnapshot, Entity};

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn agent(at: Position, base: Position, diamonds: u32) -> AgentState {
        AgentState {
            id: 1,
            position: at,
            base: Some(base),
            inventory_size: 5,
            diamonds,
            milliseconds_left: 60_000,
        }
    }

    fn catalogue(me: &AgentState, entities: Vec<Entity>) -> Catalogue {
        let board = BoardSnapshot::new(15, 15, entities);
        Catalogue::build(&board, me, &[], &EngineConfig::default())
    }

    #[test]
    fn larger_diamond_wins_within_the_step_penalty() {
        let me = agent(p(7, 7), p(0, 0), 0);
        for entities in [
            vec![Entity::diamond(10, 7, 1), Entity::diamond(7, 11, 2)],
            vec![Entity::diamond(7, 11, 2), Entity::diamond(10, 7, 1)],
        ] {
            let cat = catalogue(&me, entities);
            let sel = select(&cat, &me, false, &EngineConfig::default());
            assert_eq!(
                sel.objective,
                Some(Objective::Diamond {
                    position: p(7, 11),
                    value: 2
                })
            );
            assert_eq!(sel.cost, Some(4));
            assert_eq!(sel.mode, Mode::Pursuit);
        }
    }

    #[test]
    fn last_slot_prices_in_the_trip_home() {
        // (4,0) is closer but leaves a long walk home; (0,5) is on the way.
        let me = agent(p(0, 0), p(0, 9), 4);
        let cat = catalogue(&me, vec![Entity::diamond(4, 0, 1), Entity::diamond(0, 5, 1)]);
        let sel = select(&cat, &me, false, &EngineConfig::default());
        assert_eq!(
            sel.objective,
            Some(Objective::Diamond {
                position: p(0, 5),
                value: 1
            })
        );
        assert_eq!(sel.cost, Some(5 + 4));
    }

    #[test]
    fn far_diamond_is_reached_through_the_near_teleport() {
        let me = agent(p(1, 1), p(0, 0), 0);
        let cat = catalogue(
            &me,
            vec![
                Entity::teleport(2, 1),
                Entity::teleport(13, 13),
                Entity::diamond(13, 12, 1),
            ],
        );
        let sel = select(&cat, &me, false, &EngineConfig::default());
        assert_eq!(sel.objective, Some(Objective::Teleport { position: p(2, 1) }));
        assert_eq!(sel.cost, Some(2));
    }

    #[test]
    fn no_portal_routing_while_standing_on_a_teleport() {
        let me = agent(p(2, 1), p(0, 0), 0);
        let cat = catalogue(
            &me,
            vec![
                Entity::teleport(2, 1),
                Entity::teleport(13, 13),
                Entity::diamond(13, 12, 1),
            ],
        );
        let sel = select(&cat, &me, false, &EngineConfig::default());
        assert_eq!(
            sel.objective,
            Some(Objective::Diamond {
                position: p(13, 12),
                value: 1
            })
        );
    }

    #[test]
    fn red_button_needs_a_decisive_saving() {
        let me = agent(p(0, 0), p(0, 0), 0);

        let cat = catalogue(&me, vec![Entity::diamond(10, 10, 1), Entity::red_button(2, 2)]);
        let sel = select(&cat, &me, false, &EngineConfig::default());
        assert_eq!(sel.objective, Some(Objective::RedButton { position: p(2, 2) }));

        let cat = catalogue(&me, vec![Entity::diamond(5, 0, 1), Entity::red_button(0, 2)]);
        let sel = select(&cat, &me, false, &EngineConfig::default());
        assert_eq!(
            sel.objective,
            Some(Objective::Diamond {
                position: p(5, 0),
                value: 1
            })
        );
    }

    #[test]
    fn red_button_across_the_board_goes_through_the_teleport() {
        let me = agent(p(0, 1), p(0, 0), 0);
        let cat = catalogue(
            &me,
            vec![
                Entity::teleport(1, 1),
                Entity::teleport(13, 13),
                Entity::red_button(14, 13),
                Entity::diamond(14, 14, 1),
                Entity::diamond(0, 14, 1),
            ],
        );
        // Best diamond: (14,14) via the pair, cost 1 + 2 = 3. The button via
        // the pair costs 1 + 1 = 2, not decisive.
        let sel = select(&cat, &me, false, &EngineConfig::default());
        assert_eq!(sel.cost, Some(3));
        assert_eq!(sel.objective, Some(Objective::Teleport { position: p(1, 1) }));

        let cat = catalogue(
            &me,
            vec![
                Entity::teleport(1, 1),
                Entity::teleport(13, 13),
                Entity::red_button(14, 13),
                Entity::diamond(0, 9, 1),
            ],
        );
        // The diamond is 8 steps away on foot; the button is 2 through the pair.
        let sel = select(&cat, &me, false, &EngineConfig::default());
        assert_eq!(sel.cost, Some(8));
        assert_eq!(sel.objective, Some(Objective::Teleport { position: p(1, 1) }));
    }

    #[test]
    fn nothing_to_chase_sends_the_agent_home() {
        let me = agent(p(4, 4), p(0, 0), 1);
        let cat = catalogue(&me, vec![Entity::red_button(5, 5)]);
        let sel = select(&cat, &me, false, &EngineConfig::default());
        assert_eq!(sel.objective, Some(Objective::Base { position: p(0, 0) }));
        assert!(sel.committed);
        assert_eq!(sel.mode, Mode::ReturnToBase);
    }

    #[test]
    fn short_clock_forces_the_trip_home() {
        let mut me = agent(p(10, 0), p(0, 0), 1);
        let cfg = EngineConfig::default();
        me.milliseconds_left = 13_000;
        assert!(is_time_critical(&me, &cfg));
        me.milliseconds_left = 13_001;
        assert!(!is_time_critical(&me, &cfg));

        me.milliseconds_left = 13_000;
        let cat = catalogue(&me, vec![Entity::diamond(11, 0, 2)]);
        let sel = select(&cat, &me, false, &cfg);
        assert_eq!(sel.objective, Some(Objective::Base { position: p(0, 0) }));
        assert!(sel.committed);

        let at_base = agent(p(0, 0), p(0, 0), 1);
        assert!(!is_time_critical(
            &AgentState {
                milliseconds_left: 0,
                ..at_base
            },
            &cfg
        ));
    }

    #[test]
    fn homeward_trip_rides_the_teleport_unless_the_clock_is_short() {
        let cfg = EngineConfig::default();
        let entities = vec![Entity::teleport(10, 12), Entity::teleport(1, 1)];

        let me = agent(p(12, 12), p(0, 0), 5);
        let cat = catalogue(&me, entities.clone());
        let sel = select(&cat, &me, false, &cfg);
        assert_eq!(sel.objective, Some(Objective::Teleport { position: p(10, 12) }));

        let rushed = AgentState {
            milliseconds_left: 10_000,
            ..me
        };
        let cat = catalogue(&rushed, entities.clone());
        let sel = select(&cat, &rushed, false, &cfg);
        assert_eq!(sel.objective, Some(Objective::Base { position: p(0, 0) }));

        // One step from the entrance the ride is still taken.
        let adjacent = AgentState {
            position: p(11, 12),
            ..rushed
        };
        let cat = catalogue(&adjacent, entities);
        let sel = select(&cat, &adjacent, false, &cfg);
        assert_eq!(sel.objective, Some(Objective::Teleport { position: p(10, 12) }));
    }

    #[test]
    fn evasion_skips_the_rival_quadrant() {
        let me = agent(p(5, 5), p(0, 0), 0);
        let cat = catalogue(
            &me,
            vec![
                Entity::diamond(6, 7, 1),
                Entity::diamond(3, 4, 1),
                Entity::red_button(7, 7),
            ],
        );
        let cfg = EngineConfig::default();

        let plain = select(&cat, &me, false, &cfg);
        assert_eq!(
            plain.objective,
            Some(Objective::Diamond {
                position: p(6, 7),
                value: 1
            })
        );

        let evading = evade(&cat, &me, p(7, 6), &cfg).expect("a diamond outside the quadrant");
        assert_eq!(
            evading.objective,
            Some(Objective::Diamond {
                position: p(3, 4),
                value: 1
            })
        );
        assert_eq!(evading.mode, Mode::Pursuit);
    }

    #[test]
    fn evasion_with_nothing_outside_the_quadrant_yields_no_selection() {
        let me = agent(p(5, 5), p(0, 0), 0);
        let cat = catalogue(&me, vec![Entity::diamond(8, 8, 1), Entity::red_button(1, 1)]);
        assert_eq!(evade(&cat, &me, p(6, 7), &EngineConfig::default()), None);
    }
}
