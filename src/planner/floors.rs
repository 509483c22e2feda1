//! Per-week floor selection.
//!
//! A floor is worth clearing for either of two reasons: a direct drop
//! somebody still needs, or banking books a member can't otherwise
//! afford their remaining purchases with. Floor 4 additionally runs
//! when a floor 2/3 deficit exists, because its books are the only
//! ones that can be traded to relieve other floors.

use super::needs::member_has_deficit;
use super::state::MemberState;

/// Decides which floors (ascending order) the team clears this week.
/// Empty exactly when every member is fully geared.
pub fn floors_to_run(members: &[MemberState]) -> Vec<usize> {
    if members.iter().all(|m| m.is_fully_geared()) {
        return Vec::new();
    }

    let mut floors = Vec::new();

    for floor in 1..=3 {
        if floor_drop_needed(members, floor) || members.iter().any(|m| member_has_deficit(m, floor))
        {
            floors.push(floor);
        }
    }

    let weapon_missing = members
        .iter()
        .any(|m| !m.has_main_weapon || m.has_alt_weapons.iter().any(|&w| !w));
    let tradeable_deficit = members
        .iter()
        .any(|m| member_has_deficit(m, 2) || member_has_deficit(m, 3));

    if weapon_missing || tradeable_deficit {
        floors.push(4);
    }

    floors
}

/// Whether any job still wants a direct drop from this floor: a
/// top-tier piece on one of its slots, or (floors 2/3) the upgrade
/// material it grants.
fn floor_drop_needed(members: &[MemberState], floor: usize) -> bool {
    members.iter().any(|member| {
        member.jobs.iter().any(|job| {
            let slot_needed = job
                .gear_needs
                .iter()
                .any(|n| n.slot.floor() == floor && n.wants_top_tier_piece());
            let material_needed = match floor {
                2 => job.glazes_needed > 0,
                3 => job.twines_needed > 0,
                _ => false,
            };
            slot_needed || material_needed
        })
    })
}
