//! Raid gear slots and the floor/cost table behind every planner decision.

use serde::{Deserialize, Serialize};

/// One of the eleven raid gear slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    MainHand,
    Head,
    Body,
    Hands,
    Legs,
    Feet,
    Ears,
    Neck,
    Wrists,
    Ring1,
    Ring2,
}

impl Slot {
    pub const COUNT: usize = 11;

    /// All slots in canonical order. Planner iteration always uses this
    /// order so results don't depend on map insertion order.
    pub const ALL: [Slot; Slot::COUNT] = [
        Slot::MainHand,
        Slot::Head,
        Slot::Body,
        Slot::Hands,
        Slot::Legs,
        Slot::Feet,
        Slot::Ears,
        Slot::Neck,
        Slot::Wrists,
        Slot::Ring1,
        Slot::Ring2,
    ];

    /// Accessory slots upgraded by a glaze.
    pub const GLAZE_SLOTS: [Slot; 5] = [
        Slot::Ears,
        Slot::Neck,
        Slot::Wrists,
        Slot::Ring1,
        Slot::Ring2,
    ];

    /// Armor slots upgraded by a twine.
    pub const TWINE_SLOTS: [Slot; 5] = [
        Slot::Head,
        Slot::Body,
        Slot::Hands,
        Slot::Legs,
        Slot::Feet,
    ];

    /// The floor (1-4) this slot drops from and is purchased with.
    pub fn floor(&self) -> usize {
        match self {
            Slot::Ears | Slot::Neck | Slot::Wrists | Slot::Ring1 | Slot::Ring2 => 1,
            Slot::Head | Slot::Hands | Slot::Feet => 2,
            Slot::Body | Slot::Legs => 3,
            Slot::MainHand => 4,
        }
    }

    /// Book cost to purchase a guaranteed top-tier copy of this slot.
    pub fn book_cost(&self) -> i32 {
        match self.floor() {
            1 => 3,
            2 => 4,
            3 => 6,
            _ => 8,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Slot::MainHand => 0,
            Slot::Head => 1,
            Slot::Body => 2,
            Slot::Hands => 3,
            Slot::Legs => 4,
            Slot::Feet => 5,
            Slot::Ears => 6,
            Slot::Neck => 7,
            Slot::Wrists => 8,
            Slot::Ring1 => 9,
            Slot::Ring2 => 10,
        }
    }

    /// Returns the display name for this slot.
    pub fn name(&self) -> &'static str {
        match self {
            Slot::MainHand => "Main Hand",
            Slot::Head => "Head",
            Slot::Body => "Body",
            Slot::Hands => "Hands",
            Slot::Legs => "Legs",
            Slot::Feet => "Feet",
            Slot::Ears => "Ears",
            Slot::Neck => "Neck",
            Slot::Wrists => "Wrists",
            Slot::Ring1 => "Ring 1",
            Slot::Ring2 => "Ring 2",
        }
    }
}

/// Direct-drop slots awarded by each floor, one of each type per clear week.
/// Rings are a single drop type, so Ring2 never drops directly (it can
/// still be purchased with floor 1 books).
pub fn drop_slots_for_floor(floor: usize) -> &'static [Slot] {
    match floor {
        1 => &[Slot::Ears, Slot::Neck, Slot::Wrists, Slot::Ring1],
        2 => &[Slot::Head, Slot::Hands, Slot::Feet],
        3 => &[Slot::Body, Slot::Legs],
        _ => &[],
    }
}
