//! Plan value objects returned to the caller, plus text rendering.

use super::state::MemberState;
use serde::{Deserialize, Serialize};

/// One simulated week: the floors cleared and an ordered, human-readable
/// log of every allocation, trade, and purchase. Immutable once pushed
/// onto a `DistributionPlan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub week_number: u32,
    /// Floors cleared this week, ascending.
    pub floors_run: Vec<usize>,
    pub events: Vec<String>,
}

/// The full computed plan. Produced once per planner call and never
/// mutated afterward; the caller decides what, if anything, to persist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub starting_summary: Vec<String>,
    pub weeks: Vec<WeeklyPlan>,
    pub total_weeks: u32,
}

impl DistributionPlan {
    /// Builds the starting-state block from freshly built member states.
    pub fn with_starting_summary(members: &[MemberState]) -> Self {
        let mut summary = vec!["=== STARTING TEAM STATE ===".to_string()];
        for member in members {
            for job in &member.jobs {
                let pieces_needed = job
                    .gear_needs
                    .iter()
                    .filter(|n| n.wants_top_tier_piece())
                    .count();
                summary.push(format!(
                    "{} ({}) - {}:",
                    member.name,
                    job.name,
                    job.kind_label()
                ));
                summary.push(format!("  Top-tier pieces needed: {}", pieces_needed));
                summary.push(format!("  Glazes needed: {}", job.glazes_needed));
                summary.push(format!("  Twines needed: {}", job.twines_needed));
                summary.push(String::new());
            }
        }
        summary.push("=== WEEK-BY-WEEK DISTRIBUTION PLAN ===".to_string());

        Self {
            starting_summary: summary,
            weeks: Vec::new(),
            total_weeks: 0,
        }
    }

    /// True when the simulation hit the safety bound without fully
    /// gearing the team ("plan did not converge", not an error).
    pub fn hit_week_cap(&self) -> bool {
        self.total_weeks >= crate::constants::MAX_WEEKS
    }

    /// Renders the whole plan as display text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.starting_summary {
            out.push_str(line);
            out.push('\n');
        }
        for week in &self.weeks {
            out.push('\n');
            out.push_str(&format!("--- WEEK {} ---\n", week.week_number));
            let floors: Vec<String> = week.floors_run.iter().map(|f| f.to_string()).collect();
            out.push_str(&format!("Floors run: {}\n", floors.join(", ")));
            for event in &week.events {
                out.push_str(event);
                out.push('\n');
            }
        }
        out.push('\n');
        out.push_str(&format!("Total weeks: {}\n", self.total_weeks));
        if self.hit_week_cap() {
            out.push_str("Plan did not converge within the week cap.\n");
        }
        out
    }

    /// Serializes the plan as pretty JSON for export.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
