use serde::{Deserialize, Serialize};

use crate::error::SnapshotIssue;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, mv: Move) -> Self {
        Self {
            x: self.x + mv.dx,
            y: self.y + mv.dy,
        }
    }
}

/// One-tick step. Legal moves are the four unit cardinals; `STAY` only ever
/// appears as an intermediate value inside the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub dx: i32,
    pub dy: i32,
}

impl Move {
    pub const STAY: Self = Self::new(0, 0);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const DOWN: Self = Self::new(0, 1);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const UP: Self = Self::new(0, -1);

    /// Clockwise from east, the order the wanderer turns through.
    pub const CARDINALS: [Self; 4] = [Self::RIGHT, Self::DOWN, Self::LEFT, Self::UP];

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_stay(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    pub fn is_cardinal(self) -> bool {
        self.dx.abs() + self.dy.abs() == 1
    }

    pub fn swapped(self) -> Self {
        Self::new(self.dy, self.dx)
    }

    pub fn negated(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Diamond { value: u32 },
    RedButton,
    Teleport,
    Rival { id: u32 },
    SelfAgent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Position,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    pub const fn new(position: Position, kind: EntityKind) -> Self {
        Self { position, kind }
    }

    pub const fn diamond(x: i32, y: i32, value: u32) -> Self {
        Self::new(Position::new(x, y), EntityKind::Diamond { value })
    }

    pub const fn teleport(x: i32, y: i32) -> Self {
        Self::new(Position::new(x, y), EntityKind::Teleport)
    }

    pub const fn red_button(x: i32, y: i32) -> Self {
        Self::new(Position::new(x, y), EntityKind::RedButton)
    }

    pub const fn rival(x: i32, y: i32, id: u32) -> Self {
        Self::new(Position::new(x, y), EntityKind::Rival { id })
    }
}

/// What the game server reports for one tick. Never mutated by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    pub entities: Vec<Entity>,
}

impl BoardSnapshot {
    pub fn new(width: i32, height: i32, entities: Vec<Entity>) -> Self {
        Self {
            width,
            height,
            entities,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn teleports(&self) -> Vec<Position> {
        self.positions_where(|kind| matches!(kind, EntityKind::Teleport))
    }

    pub fn red_buttons(&self) -> Vec<Position> {
        self.positions_where(|kind| matches!(kind, EntityKind::RedButton))
    }

    fn positions_where(&self, keep: impl Fn(&EntityKind) -> bool) -> Vec<Position> {
        self.entities
            .iter()
            .filter(|entity| keep(&entity.kind))
            .map(|entity| entity.position)
            .collect()
    }

    /// Everything about this snapshot the engine has to work around.
    pub fn issues(&self, me: &AgentState) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();
        if self.width <= 0 || self.height <= 0 {
            issues.push(SnapshotIssue::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        let teleports = self.teleports().len();
        if teleports != 0 && teleports != 2 {
            issues.push(SnapshotIssue::TeleportCount { found: teleports });
        }
        let buttons = self.red_buttons().len();
        if buttons > 1 {
            issues.push(SnapshotIssue::MultipleRedButtons { found: buttons });
        }
        if me.base.is_none() {
            issues.push(SnapshotIssue::MissingBase);
        }
        if !self.contains(me.position) {
            issues.push(SnapshotIssue::AgentOffGrid {
                x: me.position.x,
                y: me.position.y,
            });
        }
        issues
    }
}

/// Status of one agent as reported each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    pub id: u32,
    pub position: Position,
    pub base: Option<Position>,
    pub inventory_size: u32,
    pub diamonds: u32,
    pub milliseconds_left: u64,
}

impl AgentState {
    pub fn is_inventory_full(&self) -> bool {
        self.diamonds >= self.inventory_size
    }

    /// One more point fills the inventory.
    pub fn is_one_short_of_full(&self) -> bool {
        self.diamonds + 1 == self.inventory_size
    }

    pub fn is_at_base(&self) -> bool {
        self.base == Some(self.position)
    }
}
