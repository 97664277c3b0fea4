use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

//
// ─── HEATMAP ───────────────────────────────────────────────────────────────────
//

/// Display bucket for one heatmap cell.
///
/// Boundary values round down into the lower bucket: a count of exactly 3
/// is `Medium`, 4 is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    None,
    Low,
    Medium,
    High,
}

impl Intensity {
    #[must_use]
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Intensity::None,
            1 => Intensity::Low,
            2 | 3 => Intensity::Medium,
            _ => Intensity::High,
        }
    }
}

/// One day of the rolling activity heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: u32,
    pub intensity: Intensity,
}

//
// ─── MILESTONES ────────────────────────────────────────────────────────────────
//

/// A streak milestone from the static threshold table.
///
/// `unlocked` reflects best-ever, not just current: once the longest streak
/// passes a threshold the milestone never re-locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub threshold_days: u32,
    pub label: &'static str,
    pub unlocked: bool,
}

//
// ─── STREAK STATE ──────────────────────────────────────────────────────────────
//

/// The calendar date with the most recorded activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BestDay {
    pub date: NaiveDate,
    pub count: u32,
}

/// Day-granular activity statistics derived from the event log.
///
/// A pure, recomputed value: holds no identity beyond the snapshot of
/// events that produced it. `longest_streak` is monotonically
/// non-decreasing across recomputations over an append-only log;
/// `current_streak` resets to zero after a missed day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Activity count per calendar day; missing days mean zero.
    pub activity_map: BTreeMap<NaiveDate, u32>,
    /// Fixed-window heatmap ending today, oldest day first.
    pub heatmap: Vec<HeatmapDay>,
    /// Ascending milestone table with unlock state.
    pub milestones: Vec<Milestone>,
    /// Most active day on record; ties go to the most recent date.
    pub best_day: Option<BestDay>,
}

impl StreakState {
    /// Activity count on the given day (zero when absent).
    #[must_use]
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.activity_map.get(&date).copied().unwrap_or(0)
    }

    /// True when the learner has no recorded activity at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activity_map.is_empty()
    }
}
