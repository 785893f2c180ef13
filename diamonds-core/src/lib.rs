pub mod board;
pub mod checksum;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod portal;
pub mod rng;
pub mod sim;

pub use board::{AgentState, BoardSnapshot, Entity, EntityKind, Move, Position};
pub use error::{SimError, SnapshotIssue};
pub use portal::TeleportPair;
pub use rng::{RandomSource, SeededRng};
