// Book costs for purchasable rewards
pub const WEAPON_BOOK_COST: i32 = 8;
pub const GLAZE_BOOK_COST: i32 = 3;
pub const TWINE_BOOK_COST: i32 = 4;

// Books earned per member per floor cleared
pub const BOOKS_PER_CLEAR: i32 = 1;

// Simulation safety bound: a plan that hasn't converged by this point is
// returned truncated, not treated as an error
pub const MAX_WEEKS: u32 = 52;

// How far the second pass may reopen floor 4 trading before the end of
// the first-pass plan
pub const MAX_BACKTRACK_WEEKS: u32 = 3;

// Raid layout
pub const FLOOR_COUNT: usize = 4;
