/// Number of player slots tracked by per-player tables.
pub const MAX_PLAYERS: usize = 8;

/// Side of the square map in tiles. Valid coordinates are `0..MAP_SIZE`.
pub const MAP_SIZE: i32 = 256;

/// Fixed simulation rate. Progress-bar time estimates are derived from this.
pub const TICKS_PER_SECOND: u32 = 10;

/// Build points a single construction droid contributes per tick.
pub const CONSTRUCT_POINTS_PER_TICK: u32 = 8;

/// Power delivered to a structure site or research facility per tick while it
/// is still waiting for its power cost to be paid.
pub const POWER_PER_TICK: u32 = 5;

/// Research points a freshly built facility produces per tick.
pub const RESEARCH_POINTS_PER_TICK: u32 = 14;

/// Cost units per cost-bar step on option buttons.
pub const POWER_POINTS_PER_COST_STEP: u32 = 5;

/// The cost bar saturates at this many steps.
pub const COST_BAR_MAX: u32 = 100;
