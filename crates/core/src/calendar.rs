use chrono::{Days, FixedOffset, NaiveDate};
use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::model::{ActivityEvent, BestDay, HeatmapDay, Intensity, Milestone, StreakState};

//
// ─── CALENDAR / STREAK ENGINE ──────────────────────────────────────────────────
//

/// Derive day-granular activity statistics from normalized events.
///
/// Pure and order-independent: events are bucketed by their local calendar
/// date under the reporting offset, and everything else is a fold over the
/// per-day counts. Recomputed from scratch on every call.
#[must_use]
pub fn build_streak_state(
    events: &[ActivityEvent],
    today: NaiveDate,
    config: &EngineConfig,
) -> StreakState {
    let activity_map = day_counts(events, config.reporting_offset);
    let current_streak = current_streak(&activity_map, today);
    let longest_streak = longest_streak(&activity_map);

    StreakState {
        current_streak,
        longest_streak,
        heatmap: heatmap(&activity_map, today, config.heatmap_days),
        milestones: milestones(config.milestones, current_streak, longest_streak),
        best_day: best_day(&activity_map),
        activity_map,
    }
}

fn day_counts(events: &[ActivityEvent], offset: FixedOffset) -> BTreeMap<NaiveDate, u32> {
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.local_date(offset)).or_insert(0) += 1;
    }
    counts
}

/// Count back from today while contiguous days have at least one event.
///
/// If today has no event yet the existing run still reports from
/// yesterday; it does not increment until today's first event arrives. A
/// missed full day resets the chain to zero.
fn current_streak(counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> u32 {
    let mut day = if counts.contains_key(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while counts.contains_key(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// Longest contiguous run anywhere in the history.
fn longest_streak(counts: &BTreeMap<NaiveDate, u32>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in counts.keys() {
        run = match previous {
            Some(p) if p.succ_opt() == Some(*day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }
    longest
}

/// Fixed-window heatmap ending today, oldest day first.
fn heatmap(counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate, days: u32) -> Vec<HeatmapDay> {
    let mut cells = Vec::with_capacity(days as usize);
    for back in (0..days).rev() {
        let Some(date) = today.checked_sub_days(Days::new(u64::from(back))) else {
            continue;
        };
        let count = counts.get(&date).copied().unwrap_or(0);
        cells.push(HeatmapDay {
            date,
            count,
            intensity: Intensity::from_count(count),
        });
    }
    cells
}

/// Milestones unlock on best-ever streak, so they never re-lock.
fn milestones(
    table: &'static [(u32, &'static str)],
    current: u32,
    longest: u32,
) -> Vec<Milestone> {
    table
        .iter()
        .map(|&(threshold_days, label)| Milestone {
            threshold_days,
            label,
            unlocked: current >= threshold_days || longest >= threshold_days,
        })
        .collect()
}

/// Most active day on record; ties go to the most recent date.
fn best_day(counts: &BTreeMap<NaiveDate, u32>) -> Option<BestDay> {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)))
        .map(|(&date, &count)| BestDay { date, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActivityPayload;
    use chrono::{DateTime, Utc};

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 11, n).unwrap()
    }

    fn event_on(date: NaiveDate) -> ActivityEvent {
        let at: DateTime<Utc> = date.and_hms_opt(12, 0, 0).unwrap().and_utc();
        ActivityEvent::new(at, None, ActivityPayload::Diary { mood: 3, word_count: 10 })
    }

    fn events_on(days: &[u32]) -> Vec<ActivityEvent> {
        days.iter().map(|&n| event_on(day(n))).collect()
    }

    #[test]
    fn gap_splits_streaks() {
        // Days {1,2,3,5,6}, today = day 6: current is the 5-6 run, longest 1-3.
        let state = build_streak_state(&events_on(&[1, 2, 3, 5, 6]), day(6), &EngineConfig::default());
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.longest_streak, 3);
    }

    #[test]
    fn quiet_today_still_reports_existing_run() {
        let state = build_streak_state(&events_on(&[4, 5, 6]), day(7), &EngineConfig::default());
        assert_eq!(state.current_streak, 3);
    }

    #[test]
    fn missed_day_resets_current_to_zero() {
        let state = build_streak_state(&events_on(&[4, 5, 6]), day(8), &EngineConfig::default());
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.longest_streak, 3);
    }

    #[test]
    fn empty_log_produces_zero_state() {
        let state = build_streak_state(&[], day(6), &EngineConfig::default());
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.longest_streak, 0);
        assert!(state.best_day.is_none());
        assert!(state.is_empty());
        assert!(state.milestones.iter().all(|m| !m.unlocked));
    }

    #[test]
    fn longest_streak_is_monotonic_over_subsets() {
        let full = events_on(&[1, 2, 3, 5, 6, 7, 8]);
        let config = EngineConfig::default();
        let full_longest = build_streak_state(&full, day(8), &config).longest_streak;

        for cut in 0..full.len() {
            let subset: Vec<_> = full.iter().take(cut).cloned().collect();
            let subset_longest = build_streak_state(&subset, day(8), &config).longest_streak;
            assert!(subset_longest <= full_longest);
        }
    }

    #[test]
    fn same_local_day_events_bucket_together() {
        let morning = day(6).and_hms_opt(0, 5, 0).unwrap().and_utc();
        let night = day(6).and_hms_opt(23, 55, 0).unwrap().and_utc();
        let events = vec![
            ActivityEvent::new(morning, None, ActivityPayload::Ojt { hours: 2.0 }),
            ActivityEvent::new(night, None, ActivityPayload::Ojt { hours: 1.0 }),
        ];
        let state = build_streak_state(&events, day(6), &EngineConfig::default());
        assert_eq!(state.count_on(day(6)), 2);
        assert_eq!(state.current_streak, 1);
    }

    #[test]
    fn reporting_offset_moves_the_day_boundary() {
        // 23:30 UTC on the 5th is already the 6th at UTC+1.
        let at = day(5).and_hms_opt(23, 30, 0).unwrap().and_utc();
        let config = EngineConfig {
            reporting_offset: FixedOffset::east_opt(3600).unwrap(),
            ..EngineConfig::default()
        };
        let state = build_streak_state(&[ActivityEvent::new(at, None, ActivityPayload::Ojt { hours: 1.0 })], day(6), &config);
        assert_eq!(state.count_on(day(6)), 1);
        assert_eq!(state.count_on(day(5)), 0);
    }

    #[test]
    fn heatmap_covers_window_and_buckets_counts() {
        let mut events = events_on(&[6]);
        events.extend(events_on(&[5, 5]));
        events.extend(events_on(&[4, 4, 4]));
        events.extend(events_on(&[3, 3, 3, 3]));

        let state = build_streak_state(&events, day(6), &EngineConfig::default());
        assert_eq!(state.heatmap.len(), 28);

        let last = &state.heatmap[27];
        assert_eq!(last.date, day(6));
        assert_eq!(last.intensity, Intensity::Low);
        assert_eq!(state.heatmap[26].intensity, Intensity::Medium);
        assert_eq!(state.heatmap[25].intensity, Intensity::Medium);
        assert_eq!(state.heatmap[24].intensity, Intensity::High);
        assert_eq!(state.heatmap[0].intensity, Intensity::None);
    }

    #[test]
    fn milestones_unlock_on_best_ever_run() {
        // A broken 7-day run keeps the one-week milestone unlocked.
        let state = build_streak_state(
            &events_on(&[1, 2, 3, 4, 5, 6, 7]),
            day(9),
            &EngineConfig::default(),
        );
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.longest_streak, 7);

        let week = state
            .milestones
            .iter()
            .find(|m| m.threshold_days == 7)
            .unwrap();
        assert!(week.unlocked);

        let fortnight = state
            .milestones
            .iter()
            .find(|m| m.threshold_days == 14)
            .unwrap();
        assert!(!fortnight.unlocked);
    }

    #[test]
    fn best_day_ties_break_to_most_recent() {
        let events = events_on(&[2, 2, 5, 5]);
        let state = build_streak_state(&events, day(6), &EngineConfig::default());
        let best = state.best_day.unwrap();
        assert_eq!(best.date, day(5));
        assert_eq!(best.count, 2);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let events = events_on(&[1, 2, 3, 5, 6]);
        let config = EngineConfig::default();
        let first = build_streak_state(&events, day(6), &config);
        let second = build_streak_state(&events, day(6), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn event_order_does_not_matter() {
        let config = EngineConfig::default();
        let forward = events_on(&[1, 2, 3, 5, 6]);
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            build_streak_state(&forward, day(6), &config),
            build_streak_state(&reversed, day(6), &config)
        );
    }

    #[test]
    fn advancing_a_day_without_activity_breaks_the_chain_next_check() {
        let events = events_on(&[4, 5, 6]);
        let config = EngineConfig::default();
        assert_eq!(build_streak_state(&events, day(6), &config).current_streak, 3);
        // Next morning: still intact, waiting on today's first event.
        assert_eq!(build_streak_state(&events, day(7), &config).current_streak, 3);
        // A full missed day later: gone.
        assert_eq!(build_streak_state(&events, day(8), &config).current_streak, 0);
    }
}
