pub const BOARD_WIDTH_DEFAULT: i32 = 15;
pub const BOARD_HEIGHT_DEFAULT: i32 = 15;
pub const INVENTORY_SIZE_DEFAULT: u32 = 5;

pub const DIAMOND_FIELD_DEFAULT: usize = 12;
pub const DIAMOND_POINTS_SMALL: u32 = 1;
pub const DIAMOND_POINTS_LARGE: u32 = 2;
// One in N freshly spawned diamonds is worth two points.
pub const LARGE_DIAMOND_ODDS_DEFAULT: u32 = 5;

pub const MS_PER_TICK_DEFAULT: u64 = 1_000;
pub const MATCH_MS_DEFAULT: u64 = 60_000;

// Placement retries before a simulator setup is rejected as too crowded.
pub const PLACEMENT_ATTEMPTS: u32 = 4_096;
