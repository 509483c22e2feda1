//! Book-need accounting shared by floor selection and trading.
//!
//! One formula, used everywhere a deficit is judged: a member's need at
//! a floor is the cost of every still-unsatisfied top-tier slot on that
//! floor plus the material costs gated on that floor's books.

use super::state::MemberState;
use crate::constants::{GLAZE_BOOK_COST, TWINE_BOOK_COST};

/// Books this member still needs at `floor` (1-3) across all their jobs.
/// Floor 4 is excluded: weapon books are handled by the reservation
/// logic, never by deficit accounting.
pub fn member_need_at_floor(member: &MemberState, floor: usize) -> i32 {
    let mut need = 0;
    for job in &member.jobs {
        if floor == 2 {
            need += job.glazes_needed * GLAZE_BOOK_COST;
        }
        if floor == 3 {
            need += job.twines_needed * TWINE_BOOK_COST;
        }
        for gear_need in job.gear_needs.iter() {
            if gear_need.wants_top_tier_piece() && gear_need.slot.floor() == floor {
                need += gear_need.slot.book_cost();
            }
        }
    }
    need
}

/// This member's shortfall at `floor`: need minus banked books, floored
/// at zero.
pub fn member_deficit_at_floor(member: &MemberState, floor: usize) -> i32 {
    (member_need_at_floor(member, floor) - member.books_at(floor)).max(0)
}

/// True when the member needs books at `floor` and can't cover that
/// need from their own balance.
pub fn member_has_deficit(member: &MemberState, floor: usize) -> bool {
    let need = member_need_at_floor(member, floor);
    need > 0 && member.books_at(floor) < need
}

/// Team-wide need at `floor`.
pub fn team_need_at_floor(members: &[MemberState], floor: usize) -> i32 {
    members.iter().map(|m| member_need_at_floor(m, floor)).sum()
}
