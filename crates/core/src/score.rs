use chrono::{Days, NaiveDate};
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::model::{ActivityEvent, ActivityKind, ActivityPayload, CategoryStat, FlashcardSetRecord};

//
// ─── FACTOR SCORERS ────────────────────────────────────────────────────────────
//

// Five pure functions, one per learning pillar, each `events → [0, 100]`.
// A pillar with literally zero underlying data scores 0 rather than being
// excluded, so the overall blend reflects incompleteness across all five.

/// Bucket used for quiz attempts that carry no category tag.
pub const UNCATEGORIZED: &str = "General";

/// Per-category quiz accuracy, sorted by descending accuracy then recency.
///
/// Each category is computed from only its own attempts; a category with
/// no attempts simply does not appear.
#[must_use]
pub fn category_stats(events: &[ActivityEvent]) -> Vec<CategoryStat> {
    struct Acc {
        score_sum: f64,
        attempts: u32,
        last_attempt_at: chrono::DateTime<chrono::Utc>,
    }

    let mut by_category: HashMap<&str, Acc> = HashMap::new();
    for event in events {
        let Some(score) = event.quiz_score() else {
            continue;
        };
        let category = event.category.as_deref().unwrap_or(UNCATEGORIZED);
        by_category
            .entry(category)
            .and_modify(|acc| {
                acc.score_sum += score;
                acc.attempts += 1;
                acc.last_attempt_at = acc.last_attempt_at.max(event.occurred_at);
            })
            .or_insert(Acc {
                score_sum: score,
                attempts: 1,
                last_attempt_at: event.occurred_at,
            });
    }

    let mut stats: Vec<CategoryStat> = by_category
        .into_iter()
        .map(|(category, acc)| CategoryStat {
            category: category.to_owned(),
            accuracy_percent: acc.score_sum / f64::from(acc.attempts) * 100.0,
            attempts: acc.attempts,
            last_attempt_at: acc.last_attempt_at,
        })
        .collect();

    stats.sort_by(|a, b| {
        b.accuracy_percent
            .total_cmp(&a.accuracy_percent)
            .then(b.last_attempt_at.cmp(&a.last_attempt_at))
    });
    stats
}

/// Mean of per-category accuracy; zero attempts overall scores 0.
#[must_use]
pub fn quiz_score(events: &[ActivityEvent]) -> f64 {
    let stats = category_stats(events);
    if stats.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = stats.iter().map(|s| s.accuracy_percent).sum::<f64>() / stats.len() as f64;
    mean.clamp(0.0, 100.0)
}

/// Mastered cards over total cards across all active sets.
#[must_use]
pub fn flashcard_score(sets: &[FlashcardSetRecord]) -> f64 {
    let total: u64 = sets.iter().map(|s| u64::from(s.total_cards)).sum();
    if total == 0 {
        return 0.0;
    }
    let mastered: u64 = sets
        .iter()
        .map(|s| u64::from(s.mastered_cards.min(s.total_cards)))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let ratio = mastered as f64 / total as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}

/// Total OJT hours in the event log, uncapped (for display).
#[must_use]
pub fn ojt_hours_logged(events: &[ActivityEvent]) -> f64 {
    events
        .iter()
        .filter_map(|event| match event.payload {
            ActivityPayload::Ojt { hours } => Some(hours),
            _ => None,
        })
        .sum()
}

/// Logged hours against the programme target, capped at 100.
///
/// Overachievement does not push past the cap; the raw figure is surfaced
/// separately via `ojt_hours_logged`.
#[must_use]
pub fn ojt_score(events: &[ActivityEvent], target_hours: f64) -> f64 {
    if target_hours <= 0.0 {
        return 0.0;
    }
    (ojt_hours_logged(events) / target_hours * 100.0).clamp(0.0, 100.0)
}

/// Diary cadence over the heatmap window against the expected
/// entries-per-week, capped at 100.
#[must_use]
pub fn diary_score(events: &[ActivityEvent], today: NaiveDate, config: &EngineConfig) -> f64 {
    let expected = config.diary_entries_per_week * f64::from(config.heatmap_days) / 7.0;
    if expected <= 0.0 {
        return 0.0;
    }

    let entries = events
        .iter()
        .filter(|event| event.kind() == ActivityKind::Diary)
        .filter(|event| {
            in_window(
                event.local_date(config.reporting_offset),
                today,
                config.heatmap_days,
            )
        })
        .count();

    #[allow(clippy::cast_precision_loss)]
    let score = entries as f64 / expected * 100.0;
    score.clamp(0.0, 100.0)
}

/// Saturating ramp on the current streak: linear up to the saturation
/// point, flat 100 beyond it, so very long streaks do not dominate.
#[must_use]
pub fn streak_score(current_streak: u32, saturation_days: u32) -> f64 {
    if saturation_days == 0 {
        return 0.0;
    }
    let capped = current_streak.min(saturation_days);
    f64::from(capped) / f64::from(saturation_days) * 100.0
}

/// True when `date` falls inside the `days`-long window ending `today`.
pub(crate) fn in_window(date: NaiveDate, today: NaiveDate, days: u32) -> bool {
    if date > today {
        return false;
    }
    match today.checked_sub_days(Days::new(u64::from(days.saturating_sub(1)))) {
        Some(start) => date >= start,
        None => true,
    }
}
