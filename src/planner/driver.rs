//! The week loop and the two-pass distribution driver.
//!
//! Pass one runs greedily with floor 4 trading disabled. If that
//! strands floor 4 books at the end, the state is rebuilt and replayed
//! with trading reopened only for the last few weeks, so early weeks
//! keep their banks while the leftover is spent down.

use super::allocation::allocate_week;
use super::floors::floors_to_run;
use super::plan::{DistributionPlan, WeeklyPlan};
use super::state::{build_member_states, MemberState};
use crate::constants::{MAX_BACKTRACK_WEEKS, MAX_WEEKS};
use crate::team::RaidTeam;

/// Computes the full distribution plan for a team snapshot.
///
/// `use_current_state` seeds banked books from the team's recorded
/// clears and ledgers; otherwise the simulation starts from zero. The
/// snapshot itself is never mutated.
pub fn calculate_distribution(team: &RaidTeam, use_current_state: bool) -> DistributionPlan {
    let mut members = build_member_states(team, use_current_state);
    let first_plan = simulate_distribution(&mut members, None);

    // Floor 4 books nobody could spend are a planning defect worth a
    // second pass; a small leftover only needs the last few weeks open.
    let leftover = members.iter().map(|m| m.books_at(4)).max().unwrap_or(0);
    if leftover == 0 {
        return first_plan;
    }

    let backtrack = (leftover as u32).min(MAX_BACKTRACK_WEEKS);
    let trading_from = first_plan.total_weeks.saturating_sub(backtrack).max(1);

    let mut members = build_member_states(team, use_current_state);
    simulate_distribution(&mut members, Some(trading_from))
}

/// Runs the weekly loop to completion, the week cap, or a (never
/// expected) week with nothing to run. `trading_from` opens floor 4
/// trading from that week onward; `None` keeps it closed throughout.
pub fn simulate_distribution(
    members: &mut [MemberState],
    trading_from: Option<u32>,
) -> DistributionPlan {
    let mut plan = DistributionPlan::with_starting_summary(members);
    let mut week: u32 = 0;

    while week < MAX_WEEKS && members.iter().any(|m| !m.is_fully_geared()) {
        week += 1;
        let floors = floors_to_run(members);

        if floors.is_empty() {
            // Floor selection guarantees a floor whenever a need
            // remains; reaching this state is an accounting defect.
            debug_assert!(false, "no floors scheduled while gearing is incomplete");
            plan.weeks.push(WeeklyPlan {
                week_number: week,
                floors_run: floors,
                events: vec![
                    "WARNING: no floors to run but the team is not fully geared".to_string(),
                ],
            });
            break;
        }

        let allow_trading = trading_from.is_some_and(|from| week >= from);
        let events = allocate_week(members, &floors, allow_trading);

        plan.weeks.push(WeeklyPlan {
            week_number: week,
            floors_run: floors,
            events,
        });
    }

    plan.total_weeks = week;
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::{GearSource, Slot};
    use crate::team::{GearSheet, SheetMember};

    fn one_member_team(configure: impl FnOnce(&mut SheetMember)) -> RaidTeam {
        let mut member = SheetMember::new("Alba", "Warrior");
        member.set_piece(Slot::MainHand, GearSource::TopTier, GearSource::TopTier);
        configure(&mut member);
        let mut sheet = GearSheet::new("Main");
        sheet.members.push(member);
        let mut team = RaidTeam::new("Test");
        team.sheets.push(sheet);
        team
    }

    #[test]
    fn test_fully_geared_team_yields_empty_plan() {
        let team = one_member_team(|_| {});
        let plan = calculate_distribution(&team, false);
        assert_eq!(plan.total_weeks, 0);
        assert!(plan.weeks.is_empty());
    }

    #[test]
    fn test_single_need_resolves_in_one_week() {
        let team = one_member_team(|m| {
            m.set_piece(Slot::Head, GearSource::None, GearSource::TopTier);
        });
        let plan = calculate_distribution(&team, false);
        assert_eq!(plan.total_weeks, 1);
        assert_eq!(plan.weeks[0].floors_run, vec![2]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let team = one_member_team(|m| {
            m.set_piece(Slot::Head, GearSource::None, GearSource::TopTier);
            m.set_piece(Slot::Body, GearSource::None, GearSource::TopTier);
            m.set_piece(Slot::Ears, GearSource::Tome, GearSource::UpgradedTome);
        });

        let first = calculate_distribution(&team, false);
        let second = calculate_distribution(&team, false);
        assert_eq!(first.to_json(), second.to_json());
    }

    #[test]
    fn test_seeded_books_shorten_the_plan() {
        let base = one_member_team(|m| {
            m.set_piece(Slot::Ring2, GearSource::None, GearSource::TopTier);
        });
        // Ring 2 never drops directly, so it must be purchased at 3
        // floor 1 books; banked clears cover it immediately.
        let mut seeded = base.clone();
        seeded.floor_clears = [3, 0, 0, 0];

        let cold = calculate_distribution(&base, true);
        let warm = calculate_distribution(&seeded, true);
        assert!(warm.total_weeks < cold.total_weeks);
        assert_eq!(warm.total_weeks, 1);
    }

    #[test]
    fn test_leftover_floor4_books_trigger_the_trading_pass() {
        // Glaze-only needs make floor 4 run for its tradeable books,
        // but pass one can never spend them; the driver must rerun
        // with trading open and the returned plan shows the trades.
        let mut alba = SheetMember::new("Alba", "Warrior");
        alba.set_piece(Slot::MainHand, GearSource::TopTier, GearSource::TopTier);
        alba.set_piece(Slot::Ears, GearSource::Tome, GearSource::UpgradedTome);
        alba.set_piece(Slot::Neck, GearSource::Tome, GearSource::UpgradedTome);
        let mut beryl = SheetMember::new("Beryl", "Sage");
        beryl.set_piece(Slot::MainHand, GearSource::TopTier, GearSource::TopTier);
        beryl.set_piece(Slot::Ears, GearSource::Tome, GearSource::UpgradedTome);
        beryl.set_piece(Slot::Neck, GearSource::Tome, GearSource::UpgradedTome);

        let mut sheet = GearSheet::new("Main");
        sheet.members = vec![alba, beryl];
        let mut team = RaidTeam::new("Test");
        team.sheets.push(sheet);

        let plan = calculate_distribution(&team, false);
        let traded = plan
            .weeks
            .iter()
            .flat_map(|w| &w.events)
            .any(|e| e.contains("TRADES"));
        assert!(traded, "second pass should trade stranded floor 4 books");
    }

    #[test]
    fn test_trading_pass_only_opens_from_the_given_week() {
        let team = one_member_team(|m| {
            m.set_piece(Slot::Ears, GearSource::Tome, GearSource::UpgradedTome);
            m.set_piece(Slot::Wrists, GearSource::Tome, GearSource::UpgradedTome);
        });

        // Trading open from week 2: week 1 must not contain a trade
        let mut members = build_member_states(&team, false);
        let plan = simulate_distribution(&mut members, Some(2));
        if let Some(first_week) = plan.weeks.first() {
            assert!(!first_week.events.iter().any(|e| e.contains("TRADES")));
        }
    }
}
