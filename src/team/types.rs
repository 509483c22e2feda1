//! Roster snapshot consumed from the host application.
//!
//! The planner never mutates these types; they are read once per call
//! by the state builder and projected into transient planner state.

use crate::constants::FLOOR_COUNT;
use crate::gear::{GearSource, Slot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current and desired acquisition source for one gear slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearPiece {
    pub source: GearSource,
    pub desired: GearSource,
}

impl GearPiece {
    pub fn new(source: GearSource, desired: GearSource) -> Self {
        Self { source, desired }
    }
}

/// One member's row on a gear sheet: their gear map for that job plus
/// the per-floor book ledgers (only the sheet-0 row's ledgers are read).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
    /// Slot -> piece. A BTreeMap keeps serialized snapshots stable;
    /// the planner itself iterates slots in `Slot::ALL` order.
    #[serde(default)]
    pub gear: BTreeMap<Slot, GearPiece>,
    /// Manual corrections to banked books, per floor (index 0 = floor 1).
    #[serde(default)]
    pub book_adjustments: [i32; FLOOR_COUNT],
    /// Books already spent, per floor (index 0 = floor 1).
    #[serde(default)]
    pub spent_books: [i32; FLOOR_COUNT],
}

impl SheetMember {
    pub fn new(name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
            ..Default::default()
        }
    }

    pub fn set_piece(&mut self, slot: Slot, source: GearSource, desired: GearSource) {
        self.gear.insert(slot, GearPiece::new(source, desired));
    }

    /// True when at least one slot has a desired source set. Alternate
    /// sheets with nothing desired are skipped by the state builder.
    pub fn has_desired_gear(&self) -> bool {
        self.gear.values().any(|p| p.desired != GearSource::None)
    }
}

/// One job assignment sheet. Sheet 0 holds everyone's main job; later
/// sheets hold alternate jobs, members parallel by index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GearSheet {
    pub name: String,
    pub members: Vec<SheetMember>,
}

impl GearSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }
}

/// Full team snapshot handed to the planner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaidTeam {
    pub name: String,
    pub sheets: Vec<GearSheet>,
    /// Team-wide clear counts per floor (index 0 = floor 1); one clear
    /// banks one book for every member.
    #[serde(default)]
    pub floor_clears: [i32; FLOOR_COUNT],
}

impl RaidTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The main-job sheet, when the snapshot has one.
    pub fn main_sheet(&self) -> Option<&GearSheet> {
        self.sheets.first()
    }

    /// Job label for an alternate sheet entry: the member's own job
    /// string when present, otherwise the sheet name.
    pub fn alt_job_name(sheet: &GearSheet, member: &SheetMember) -> String {
        if member.job.is_empty() {
            sheet.name.clone()
        } else {
            member.job.clone()
        }
    }
}
