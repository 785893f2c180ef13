//! Headless stand-in for the game server: applies one move per agent per
//! tick and reports board snapshots from any agent's point of view.

use serde::{Deserialize, Serialize};

use crate::board::{AgentState, BoardSnapshot, Entity, EntityKind, Move, Position};
use crate::constants::{
    BOARD_HEIGHT_DEFAULT, BOARD_WIDTH_DEFAULT, DIAMOND_FIELD_DEFAULT, DIAMOND_POINTS_LARGE,
    DIAMOND_POINTS_SMALL, INVENTORY_SIZE_DEFAULT, LARGE_DIAMOND_ODDS_DEFAULT, MATCH_MS_DEFAULT,
    MS_PER_TICK_DEFAULT, PLACEMENT_ATTEMPTS,
};
use crate::error::SimError;
use crate::rng::{RandomSource, SeededRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: i32,
    pub height: i32,
    pub agents: usize,
    pub inventory_size: u32,
    pub diamond_field: usize,
    pub large_diamond_odds: u32,
    pub teleports: bool,
    pub red_button: bool,
    pub ms_per_tick: u64,
    pub match_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH_DEFAULT,
            height: BOARD_HEIGHT_DEFAULT,
            agents: 2,
            inventory_size: INVENTORY_SIZE_DEFAULT,
            diamond_field: DIAMOND_FIELD_DEFAULT,
            large_diamond_odds: LARGE_DIAMOND_ODDS_DEFAULT,
            teleports: true,
            red_button: true,
            ms_per_tick: MS_PER_TICK_DEFAULT,
            match_ms: MATCH_MS_DEFAULT,
        }
    }
}

impl SimConfig {
    fn check(&self) -> Result<(), SimError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SimError::InvalidSetup {
                reason: "board must have at least one cell",
            });
        }
        if self.agents == 0 {
            return Err(SimError::InvalidSetup {
                reason: "at least one agent is required",
            });
        }
        if self.inventory_size == 0 {
            return Err(SimError::InvalidSetup {
                reason: "inventory size must be > 0",
            });
        }
        if self.ms_per_tick == 0 {
            return Err(SimError::InvalidSetup {
                reason: "ms_per_tick must be > 0",
            });
        }
        if self.large_diamond_odds == 0 {
            return Err(SimError::InvalidSetup {
                reason: "large_diamond_odds must be > 0",
            });
        }
        let fixtures = self.agents
            + if self.teleports { 2 } else { 0 }
            + usize::from(self.red_button)
            + self.diamond_field;
        if fixtures > (self.width * self.height) as usize {
            return Err(SimError::InvalidSetup {
                reason: "board too small for the requested fixtures",
            });
        }
        Ok(())
    }
}

/// Fixed placement for scripted boards. Agents start on their bases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub bases: Vec<Position>,
    pub teleports: Vec<Position>,
    pub red_button: Option<Position>,
    pub diamonds: Vec<(Position, u32)>,
}

/// What happened to one agent during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AgentEvents {
    pub picked_up: u32,
    pub deposited: u32,
    pub teleported: bool,
    pub tackled: Option<usize>,
    pub pressed_button: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SimAgent {
    id: u32,
    position: Position,
    base: Position,
    held: u32,
    score: u32,
}

pub struct LiveBoard {
    cfg: SimConfig,
    rng: SeededRng,
    tick: u32,
    ms_left: u64,
    agents: Vec<SimAgent>,
    diamonds: Vec<(Position, u32)>,
    teleports: Vec<Position>,
    red_button: Option<Position>,
}

impl LiveBoard {
    pub fn new(seed: u32, cfg: SimConfig) -> Result<Self, SimError> {
        cfg.check()?;
        let mut board = Self::empty(seed, cfg);

        for idx in 0..cfg.agents {
            let base = board.free_cell()?;
            board.agents.push(SimAgent {
                id: idx as u32 + 1,
                position: base,
                base,
                held: 0,
                score: 0,
            });
        }
        if cfg.teleports {
            let first = board.free_cell()?;
            board.teleports.push(first);
            let second = board.free_cell()?;
            board.teleports.push(second);
        }
        if cfg.red_button {
            board.red_button = Some(board.free_cell()?);
        }
        board.spawn_diamonds();
        board.validate()?;
        Ok(board)
    }

    /// Scripted board; `cfg.agents` is taken from the layout's base count.
    pub fn with_layout(seed: u32, cfg: SimConfig, layout: Layout) -> Result<Self, SimError> {
        let cfg = SimConfig {
            agents: layout.bases.len(),
            teleports: !layout.teleports.is_empty(),
            red_button: layout.red_button.is_some(),
            ..cfg
        };
        cfg.check()?;
        let mut board = Self::empty(seed, cfg);
        board.agents = layout
            .bases
            .iter()
            .enumerate()
            .map(|(idx, base)| SimAgent {
                id: idx as u32 + 1,
                position: *base,
                base: *base,
                held: 0,
                score: 0,
            })
            .collect();
        board.teleports = layout.teleports;
        board.red_button = layout.red_button;
        board.diamonds = layout.diamonds;
        board.validate()?;
        Ok(board)
    }

    fn empty(seed: u32, cfg: SimConfig) -> Self {
        Self {
            cfg,
            rng: SeededRng::new(seed),
            tick: 0,
            ms_left: cfg.match_ms,
            agents: Vec::with_capacity(cfg.agents),
            diamonds: Vec::with_capacity(cfg.diamond_field),
            teleports: Vec::with_capacity(2),
            red_button: None,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn ms_left(&self) -> u64 {
        self.ms_left
    }

    pub fn is_over(&self) -> bool {
        self.ms_left == 0
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn scores(&self) -> Vec<u32> {
        self.agents.iter().map(|agent| agent.score).collect()
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn agent_state(&self, agent: usize) -> Result<AgentState, SimError> {
        let a = self
            .agents
            .get(agent)
            .ok_or(SimError::UnknownAgent { agent })?;
        Ok(AgentState {
            id: a.id,
            position: a.position,
            base: Some(a.base),
            inventory_size: self.cfg.inventory_size,
            diamonds: a.held,
            milliseconds_left: self.ms_left,
        })
    }

    pub fn rival_states(&self, agent: usize) -> Result<Vec<AgentState>, SimError> {
        if agent >= self.agents.len() {
            return Err(SimError::UnknownAgent { agent });
        }
        (0..self.agents.len())
            .filter(|idx| *idx != agent)
            .map(|idx| self.agent_state(idx))
            .collect()
    }

    /// The board as `agent` sees it: itself tagged `SelfAgent`, everyone
    /// else as a rival.
    pub fn snapshot_for(&self, agent: usize) -> Result<BoardSnapshot, SimError> {
        if agent >= self.agents.len() {
            return Err(SimError::UnknownAgent { agent });
        }
        Ok(self.render(Some(agent)))
    }

    /// Spectator view: every agent appears as a rival tagged with its id.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.render(None)
    }

    fn render(&self, viewer: Option<usize>) -> BoardSnapshot {
        let mut entities = Vec::with_capacity(
            self.diamonds.len() + self.teleports.len() + self.agents.len() + 1,
        );
        entities.extend(
            self.diamonds
                .iter()
                .map(|(pos, value)| Entity::new(*pos, EntityKind::Diamond { value: *value })),
        );
        entities.extend(
            self.teleports
                .iter()
                .map(|pos| Entity::new(*pos, EntityKind::Teleport)),
        );
        if let Some(button) = self.red_button {
            entities.push(Entity::new(button, EntityKind::RedButton));
        }
        for (idx, other) in self.agents.iter().enumerate() {
            let kind = if viewer == Some(idx) {
                EntityKind::SelfAgent
            } else {
                EntityKind::Rival { id: other.id }
            };
            entities.push(Entity::new(other.position, kind));
        }
        BoardSnapshot::new(self.cfg.width, self.cfg.height, entities)
    }

    /// Applies one move per agent, in agent order. Moves are checked before
    /// anything changes, so a rejected tick leaves the board untouched.
    pub fn step(&mut self, moves: &[Move]) -> Result<Vec<AgentEvents>, SimError> {
        if self.is_over() {
            return Err(SimError::GameOver { tick: self.tick });
        }
        if moves.len() != self.agents.len() {
            return Err(SimError::MoveCountMismatch {
                expected: self.agents.len(),
                actual: moves.len(),
            });
        }
        for (agent, mv) in moves.iter().enumerate() {
            if !mv.is_cardinal() {
                return Err(SimError::IllegalMove {
                    agent,
                    dx: mv.dx,
                    dy: mv.dy,
                });
            }
            let next = self.agents[agent].position.offset(*mv);
            if !self.contains(next) {
                return Err(SimError::OffGrid {
                    agent,
                    x: next.x,
                    y: next.y,
                });
            }
        }

        let mut events = vec![AgentEvents::default(); self.agents.len()];
        for (agent, mv) in moves.iter().enumerate() {
            events[agent] = self.apply_move(agent, *mv);
        }
        if self.diamonds.is_empty() {
            self.spawn_diamonds();
        }

        self.tick += 1;
        self.ms_left = self.ms_left.saturating_sub(self.cfg.ms_per_tick);
        Ok(events)
    }

    fn apply_move(&mut self, agent: usize, mv: Move) -> AgentEvents {
        let mut events = AgentEvents::default();
        // An earlier tackle this tick may have moved the agent home, so the
        // target cell is recomputed and re-checked.
        let mut pos = self.agents[agent].position.offset(mv);
        if !self.contains(pos) {
            return events;
        }

        if let Some(exit) = self.teleport_exit(pos) {
            pos = exit;
            events.teleported = true;
        }

        if let Some(victim) = self
            .agents
            .iter()
            .enumerate()
            .position(|(idx, other)| idx != agent && other.position == pos)
        {
            let room = self.cfg.inventory_size - self.agents[agent].held;
            let stolen = self.agents[victim].held.min(room);
            self.agents[agent].held += stolen;
            self.agents[victim].held = 0;
            self.agents[victim].position = self.agents[victim].base;
            events.tackled = Some(victim);
        }

        self.agents[agent].position = pos;

        if let Some(idx) = self.diamonds.iter().position(|(cell, _)| *cell == pos) {
            let value = self.diamonds[idx].1;
            if self.agents[agent].held + value <= self.cfg.inventory_size {
                self.agents[agent].held += value;
                self.diamonds.swap_remove(idx);
                events.picked_up = value;
            }
        }

        if self.red_button == Some(pos) {
            events.pressed_button = true;
            self.spawn_diamonds();
            // A board with no free cell keeps the button where it was.
            if let Ok(cell) = self.free_cell() {
                self.red_button = Some(cell);
            }
        }

        let me = &mut self.agents[agent];
        if me.position == me.base && me.held > 0 {
            events.deposited = me.held;
            me.score += me.held;
            me.held = 0;
        }

        events
    }

    fn teleport_exit(&self, pos: Position) -> Option<Position> {
        match self.teleports.as_slice() {
            [a, b] if *a == pos => Some(*b),
            [a, b] if *b == pos => Some(*a),
            _ => None,
        }
    }

    fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.cfg.width && pos.y < self.cfg.height
    }

    fn is_free(&self, pos: Position) -> bool {
        !self
            .agents
            .iter()
            .any(|agent| agent.position == pos || agent.base == pos)
            && !self.teleports.contains(&pos)
            && self.red_button != Some(pos)
            && !self.diamonds.iter().any(|(cell, _)| *cell == pos)
    }

    fn free_cell(&mut self) -> Result<Position, SimError> {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = Position::new(
                self.rng.next_range(0, self.cfg.width),
                self.rng.next_range(0, self.cfg.height),
            );
            if self.is_free(pos) {
                return Ok(pos);
            }
        }
        (0..self.cfg.height)
            .flat_map(|y| (0..self.cfg.width).map(move |x| Position::new(x, y)))
            .find(|pos| self.is_free(*pos))
            .ok_or(SimError::InvalidSetup {
                reason: "no free cell left",
            })
    }

    fn spawn_diamonds(&mut self) {
        self.diamonds.clear();
        for _ in 0..self.cfg.diamond_field {
            let pos = match self.free_cell() {
                Ok(pos) => pos,
                // Crowded boards get a partial field rather than an error.
                Err(_) => break,
            };
            let value = if self.rng.chance(1, self.cfg.large_diamond_odds) {
                DIAMOND_POINTS_LARGE
            } else {
                DIAMOND_POINTS_SMALL
            };
            self.diamonds.push((pos, value));
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.agents.is_empty() {
            return Err(SimError::InvariantBroken {
                reason: "board has no agents",
            });
        }
        for agent in &self.agents {
            if !self.contains(agent.position) || !self.contains(agent.base) {
                return Err(SimError::InvariantBroken {
                    reason: "agent or base off the grid",
                });
            }
            if agent.held > self.cfg.inventory_size {
                return Err(SimError::InvariantBroken {
                    reason: "agent holds more than its inventory",
                });
            }
        }
        if self.cfg.teleports && self.teleports.len() != 2 {
            return Err(SimError::InvariantBroken {
                reason: "teleports must come in a pair",
            });
        }
        if self.teleports.iter().any(|pos| !self.contains(*pos))
            || self.red_button.is_some_and(|pos| !self.contains(pos))
            || self.diamonds.iter().any(|(pos, _)| !self.contains(*pos))
        {
            return Err(SimError::InvariantBroken {
                reason: "fixture off the grid",
            });
        }
        if self.diamonds.iter().any(|(_, value)| {
            *value != DIAMOND_POINTS_SMALL && *value != DIAMOND_POINTS_LARGE
        }) {
            return Err(SimError::InvariantBroken {
                reason: "diamond value out of range",
            });
        }
        Ok(())
    }
}
