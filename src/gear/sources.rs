//! Where a gear piece comes from, current or desired.

use serde::{Deserialize, Serialize};

/// Acquisition source for a gear piece. Only `TopTier` and
/// `UpgradedTome` are scarce enough for the planner to schedule; the
/// other sources exist so roster snapshots round-trip unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GearSource {
    #[default]
    None,
    TopTier,
    UpgradedTome,
    Catchup,
    Tome,
    Relic,
    Crafted,
    Prep,
    LowTier,
    Trash,
}

impl GearSource {
    /// Returns the display name for this source.
    pub fn name(&self) -> &'static str {
        match self {
            GearSource::None => "None",
            GearSource::TopTier => "Top Tier",
            GearSource::UpgradedTome => "Upgraded Tome",
            GearSource::Catchup => "Catchup",
            GearSource::Tome => "Tome",
            GearSource::Relic => "Relic",
            GearSource::Crafted => "Crafted",
            GearSource::Prep => "Prep",
            GearSource::LowTier => "Low Tier",
            GearSource::Trash => "Trash",
        }
    }

    /// True for the two sources the simulator actively plans for.
    pub fn is_planned(&self) -> bool {
        matches!(self, GearSource::TopTier | GearSource::UpgradedTome)
    }
}
