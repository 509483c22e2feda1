//! Transient per-simulation state: one `MemberState` per member, one
//! `JobState` per job assignment, built fresh for every planner call
//! and discarded once the plan is returned.

use crate::constants::FLOOR_COUNT;
use crate::gear::{GearSource, Slot};
use crate::team::RaidTeam;

/// Planner-side view of one gear slot for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearNeed {
    pub slot: Slot,
    /// Owns the highest-tier source for this slot.
    pub has_top_tier: bool,
    /// Holds the upgradeable tome piece but hasn't applied the material yet.
    pub needs_upgrade: bool,
    pub desired: GearSource,
}

impl GearNeed {
    /// A need is satisfied when the desired source condition holds.
    /// Sources other than the two scarce tiers are never planned for,
    /// so they always count as satisfied.
    pub fn is_satisfied(&self) -> bool {
        match self.desired {
            GearSource::TopTier => self.has_top_tier,
            GearSource::UpgradedTome => self.has_top_tier && !self.needs_upgrade,
            _ => true,
        }
    }

    /// True when this slot still wants a top-tier direct drop or purchase.
    pub fn wants_top_tier_piece(&self) -> bool {
        self.desired == GearSource::TopTier && !self.has_top_tier
    }
}

/// Fixed-size map from `Slot` to `GearNeed`. Iteration always runs in
/// `Slot::ALL` order, so plans never depend on snapshot insertion order.
#[derive(Debug, Clone, Default)]
pub struct GearNeedMap {
    needs: [Option<GearNeed>; Slot::COUNT],
}

impl GearNeedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, need: GearNeed) {
        self.needs[need.slot.index()] = Some(need);
    }

    pub fn get(&self, slot: Slot) -> Option<&GearNeed> {
        self.needs[slot.index()].as_ref()
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut GearNeed> {
        self.needs[slot.index()].as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GearNeed> {
        self.needs.iter().filter_map(|n| n.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GearNeed> {
        self.needs.iter_mut().filter_map(|n| n.as_mut())
    }
}

/// One job assignment (main or alternate) for one member.
#[derive(Debug, Clone)]
pub struct JobState {
    pub name: String,
    pub is_main: bool,
    /// 0 = main job; 1, 2, ... = alternates. Lower wins every
    /// scarce-resource tie-break.
    pub priority: usize,
    pub gear_needs: GearNeedMap,
    pub glazes_needed: i32,
    pub twines_needed: i32,
}

impl JobState {
    pub fn is_fully_geared(&self) -> bool {
        self.gear_needs.iter().all(|need| need.is_satisfied())
            && self.glazes_needed == 0
            && self.twines_needed == 0
    }

    /// Human-readable label for plan lines: "Main" or "Alt Job N".
    pub fn kind_label(&self) -> String {
        if self.is_main {
            "Main".to_string()
        } else {
            format!("Alt Job {}", self.priority)
        }
    }

    /// Clears the upgrade flag on the first still-flagged slot in the
    /// given group, keeping the per-slot flags in lock-step with the
    /// glaze/twine counters. Returns the slot that was upgraded.
    pub fn apply_upgrade(&mut self, group: &[Slot]) -> Option<Slot> {
        for &slot in group {
            if let Some(need) = self.gear_needs.get_mut(slot) {
                if need.needs_upgrade {
                    need.needs_upgrade = false;
                    return Some(slot);
                }
            }
        }
        None
    }
}

/// One member's full planner state across all their job assignments.
#[derive(Debug, Clone)]
pub struct MemberState {
    pub name: String,
    /// Index 0 = main job, rest = alternates in assignment order.
    pub jobs: Vec<JobState>,
    /// Banked books per floor (index 0 = floor 1). Never negative.
    pub books: [i32; FLOOR_COUNT],
    pub has_main_weapon: bool,
    /// Parallel to the alternate jobs (jobs[1..]).
    pub has_alt_weapons: Vec<bool>,
}

impl MemberState {
    pub fn is_fully_geared(&self) -> bool {
        self.jobs.iter().all(|j| j.is_fully_geared())
            && self.has_main_weapon
            && self.has_alt_weapons.iter().all(|&w| w)
    }

    pub fn books_at(&self, floor: usize) -> i32 {
        self.books[floor - 1]
    }

    pub fn add_books(&mut self, floor: usize, amount: i32) {
        self.books[floor - 1] += amount;
    }

    /// Spends books at a floor. Caller must have checked the balance;
    /// the non-negativity invariant is enforced here.
    pub fn spend_books(&mut self, floor: usize, amount: i32) {
        debug_assert!(
            self.books_at(floor) >= amount,
            "overspent floor {floor} books for {}",
            self.name
        );
        self.books[floor - 1] -= amount;
    }
}

/// Projects the roster snapshot into flat planner state.
///
/// Sheet 0 supplies the roster order, each member's main job, and the
/// book ledgers. Later sheets contribute one alternate job per member,
/// skipped entirely when that sheet row has no desired gear. Books are
/// seeded from team clears plus adjustments minus spends only when
/// `use_current_state` is set, and clamped at zero.
pub fn build_member_states(team: &RaidTeam, use_current_state: bool) -> Vec<MemberState> {
    let mut states = Vec::new();
    let Some(main_sheet) = team.main_sheet() else {
        return states;
    };

    for (member_idx, main_member) in main_sheet.members.iter().enumerate() {
        let main_job = build_job_state(main_member, main_member.job.clone(), true, 0);
        let has_main_weapon = main_member
            .gear
            .get(&Slot::MainHand)
            .map(|p| p.source == GearSource::TopTier)
            .unwrap_or(false);

        let mut state = MemberState {
            name: main_member.name.clone(),
            jobs: vec![main_job],
            books: [0; FLOOR_COUNT],
            has_main_weapon,
            has_alt_weapons: Vec::new(),
        };

        for (sheet_idx, sheet) in team.sheets.iter().enumerate().skip(1) {
            let Some(alt_member) = sheet.members.get(member_idx) else {
                continue;
            };
            if !alt_member.has_desired_gear() {
                continue;
            }
            let job_name = RaidTeam::alt_job_name(sheet, alt_member);
            state
                .jobs
                .push(build_job_state(alt_member, job_name, false, sheet_idx));
            state.has_alt_weapons.push(
                alt_member
                    .gear
                    .get(&Slot::MainHand)
                    .map(|p| p.source == GearSource::TopTier)
                    .unwrap_or(false),
            );
        }

        if use_current_state {
            for floor in 1..=FLOOR_COUNT {
                let banked = team.floor_clears[floor - 1] + main_member.book_adjustments[floor - 1]
                    - main_member.spent_books[floor - 1];
                state.books[floor - 1] = banked.max(0);
            }
        }

        states.push(state);
    }

    states
}

fn build_job_state(
    member: &crate::team::SheetMember,
    job_name: String,
    is_main: bool,
    priority: usize,
) -> JobState {
    let mut job = JobState {
        name: job_name,
        is_main,
        priority,
        gear_needs: GearNeedMap::new(),
        glazes_needed: 0,
        twines_needed: 0,
    };

    for &slot in &Slot::ALL {
        let Some(piece) = member.gear.get(&slot) else {
            continue;
        };
        // An UpgradedTome desire assumes the tome base piece is on hand,
        // so the slot never competes for top-tier drops; it only waits
        // on its upgrade material.
        let has_top_tier = piece.source == GearSource::TopTier
            || piece.source == piece.desired
            || piece.desired == GearSource::UpgradedTome;
        let needs_upgrade =
            piece.desired == GearSource::UpgradedTome && piece.source != GearSource::UpgradedTome;

        job.gear_needs.insert(GearNeed {
            slot,
            has_top_tier,
            needs_upgrade,
            desired: piece.desired,
        });
    }

    // Counted once here; the allocator decrements these in lock-step
    // with the per-slot flags instead of recomputing.
    job.glazes_needed = count_upgrades(&job, &Slot::GLAZE_SLOTS);
    job.twines_needed = count_upgrades(&job, &Slot::TWINE_SLOTS);

    job
}

fn count_upgrades(job: &JobState, group: &[Slot]) -> i32 {
    group
        .iter()
        .filter(|&&slot| job.gear_needs.get(slot).is_some_and(|n| n.needs_upgrade))
        .count() as i32
}
