//! Loot-distribution planner.
//!
//! Projects a team roster snapshot into flat per-member state, then
//! simulates raid weeks - floor selection, direct drops, book trading,
//! and purchases - until every tracked job is fully geared or the week
//! cap is reached. The whole planner is a pure synchronous function of
//! (snapshot, trading policy); nothing is shared between calls, so
//! plans for different teams can be computed in parallel.

pub mod allocation;
pub mod driver;
pub mod floors;
pub mod needs;
pub mod plan;
pub mod state;

pub use driver::{calculate_distribution, simulate_distribution};
pub use plan::{DistributionPlan, WeeklyPlan};
pub use state::{build_member_states, GearNeed, GearNeedMap, JobState, MemberState};
