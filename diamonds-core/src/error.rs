use core::fmt;

/// A defect in a board snapshot that the engine degrades around instead of
/// failing the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotIssue {
    EmptyGrid { width: i32, height: i32 },
    TeleportCount { found: usize },
    MultipleRedButtons { found: usize },
    MissingBase,
    AgentOffGrid { x: i32, y: i32 },
}

impl fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { width, height } => {
                write!(f, "board has no cells: {width}x{height}")
            }
            Self::TeleportCount { found } => write!(
                f,
                "expected 0 or 2 teleports, found {found}; portal routing disabled"
            ),
            Self::MultipleRedButtons { found } => {
                write!(f, "expected at most 1 red button, found {found}; using the first")
            }
            Self::MissingBase => write!(f, "agent has no base position"),
            Self::AgentOffGrid { x, y } => write!(f, "agent position ({x}, {y}) is off the grid"),
        }
    }
}

impl std::error::Error for SnapshotIssue {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    InvalidSetup { reason: &'static str },
    MoveCountMismatch { expected: usize, actual: usize },
    IllegalMove { agent: usize, dx: i32, dy: i32 },
    OffGrid { agent: usize, x: i32, y: i32 },
    UnknownAgent { agent: usize },
    GameOver { tick: u32 },
    InvariantBroken { reason: &'static str },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetup { reason } => write!(f, "invalid board setup: {reason}"),
            Self::MoveCountMismatch { expected, actual } => {
                write!(f, "move count mismatch: expected {expected}, got {actual}")
            }
            Self::IllegalMove { agent, dx, dy } => {
                write!(f, "agent {agent} submitted an illegal move ({dx}, {dy})")
            }
            Self::OffGrid { agent, x, y } => {
                write!(f, "agent {agent} would leave the grid at ({x}, {y})")
            }
            Self::UnknownAgent { agent } => write!(f, "no agent with index {agent}"),
            Self::GameOver { tick } => write!(f, "match already over at tick {tick}"),
            Self::InvariantBroken { reason } => write!(f, "board invariant broken: {reason}"),
        }
    }
}

impl std::error::Error for SimError {}
