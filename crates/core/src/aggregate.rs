use chrono::NaiveDate;
use std::collections::HashSet;

use crate::calendar;
use crate::config::EngineConfig;
use crate::model::{
    ActivityEvent, ActivityKind, FactorScores, FlashcardSetRecord, ProgressSnapshot, QuizTrend,
    StreakState, VideoWatchRecord,
};
use crate::score;

//
// ─── PROGRESS AGGREGATOR ───────────────────────────────────────────────────────
//

/// Everything the recommendation and insight engines evaluate against:
/// the derived snapshot and streak plus the raw-side facts that never
/// pass through the event stream.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFacts {
    pub snapshot: ProgressSnapshot,
    pub streak: StreakState,
    pub today: NaiveDate,
    pub total_events: usize,
    /// Distinct activity kinds seen inside the heatmap window.
    pub active_kinds_in_window: usize,
    pub has_recent_ojt: bool,
    pub has_unwatched_bookmark: bool,
    pub flashcard_sets: Vec<FlashcardSetRecord>,
}

/// One aggregation pass over a materialized input snapshot.
///
/// Pure and idempotent: the same inputs always produce the same facts.
#[must_use]
pub fn build_facts(
    events: &[ActivityEvent],
    sets: &[FlashcardSetRecord],
    videos: &[VideoWatchRecord],
    today: NaiveDate,
    config: &EngineConfig,
) -> DashboardFacts {
    let streak = calendar::build_streak_state(events, today, config);
    let snapshot = build_snapshot(events, sets, &streak, today, config);

    let in_window = |event: &&ActivityEvent| {
        score::in_window(
            event.local_date(config.reporting_offset),
            today,
            config.heatmap_days,
        )
    };
    let active_kinds_in_window = events
        .iter()
        .filter(in_window)
        .map(ActivityEvent::kind)
        .collect::<HashSet<_>>()
        .len();
    let has_recent_ojt = events
        .iter()
        .filter(in_window)
        .any(|event| event.kind() == ActivityKind::Ojt);

    tracing::debug!(
        events = events.len(),
        overall = snapshot.overall_percent,
        streak = streak.current_streak,
        "derived dashboard facts"
    );

    DashboardFacts {
        snapshot,
        streak,
        today,
        total_events: events.len(),
        active_kinds_in_window,
        has_recent_ojt,
        has_unwatched_bookmark: videos.iter().any(|v| v.bookmarked && !v.watched),
        flashcard_sets: sets.to_vec(),
    }
}

/// Blend the five factor scores and derive the quiz-side scalars.
#[must_use]
pub fn build_snapshot(
    events: &[ActivityEvent],
    sets: &[FlashcardSetRecord],
    streak: &StreakState,
    today: NaiveDate,
    config: &EngineConfig,
) -> ProgressSnapshot {
    let factor_scores = FactorScores {
        quiz: score::quiz_score(events),
        flashcards: score::flashcard_score(sets),
        ojt: score::ojt_score(events, config.ojt_target_hours),
        diary: score::diary_score(events, today, config),
        streak: score::streak_score(streak.current_streak, config.streak_saturation_days),
    };

    let weighted: f64 = factor_scores
        .iter()
        .map(|(factor, value)| value * config.weights.get(factor))
        .sum();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let overall_percent = weighted.round().clamp(0.0, 100.0) as u8;

    let category_stats = score::category_stats(events);
    let strongest_category = category_stats
        .iter()
        .max_by(|a, b| {
            a.accuracy_percent
                .total_cmp(&b.accuracy_percent)
                .then(a.last_attempt_at.cmp(&b.last_attempt_at))
        })
        .map(|s| s.category.clone());
    let weakest_category = category_stats
        .iter()
        .min_by(|a, b| {
            a.accuracy_percent
                .total_cmp(&b.accuracy_percent)
                .then(b.last_attempt_at.cmp(&a.last_attempt_at))
        })
        .map(|s| s.category.clone());

    ProgressSnapshot {
        factor_scores,
        overall_percent,
        quiz_trend: quiz_trend(events, config),
        strongest_category,
        weakest_category,
        days_since_last_quiz: days_since_last_quiz(events, today, config),
        ojt_logged_hours: score::ojt_hours_logged(events),
        average_mood: average_mood(events, today, config),
        category_stats,
    }
}

/// Compare the most recent `trend_window` quiz attempts against the
/// window immediately before them.
///
/// Either window falling short reads as `NoData`; the delta must clear
/// the configured threshold to avoid flip-flopping on noise.
#[must_use]
pub fn quiz_trend(events: &[ActivityEvent], config: &EngineConfig) -> QuizTrend {
    let mut attempts: Vec<_> = events
        .iter()
        .filter_map(|event| event.quiz_score().map(|score| (event.occurred_at, score)))
        .collect();
    attempts.sort_by_key(|(at, _)| *at);

    let window = config.trend_window;
    if attempts.len() < window * 2 {
        return QuizTrend::NoData;
    }

    let recent = &attempts[attempts.len() - window..];
    let prior = &attempts[attempts.len() - window * 2..attempts.len() - window];
    let delta = mean_percent(recent) - mean_percent(prior);

    if delta > config.trend_delta_points {
        QuizTrend::Improving
    } else if delta < -config.trend_delta_points {
        QuizTrend::Declining
    } else {
        QuizTrend::Stable
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_percent(attempts: &[(chrono::DateTime<chrono::Utc>, f64)]) -> f64 {
    attempts.iter().map(|(_, score)| score * 100.0).sum::<f64>() / attempts.len() as f64
}

fn days_since_last_quiz(
    events: &[ActivityEvent],
    today: NaiveDate,
    config: &EngineConfig,
) -> Option<i64> {
    events
        .iter()
        .filter(|event| event.kind() == ActivityKind::Quiz)
        .map(|event| event.local_date(config.reporting_offset))
        .max()
        .map(|last| today.signed_duration_since(last).num_days().max(0))
}

fn average_mood(events: &[ActivityEvent], today: NaiveDate, config: &EngineConfig) -> Option<f64> {
    let moods: Vec<f64> = events
        .iter()
        .filter(|event| {
            score::in_window(
                event.local_date(config.reporting_offset),
                today,
                config.heatmap_days,
            )
        })
        .filter_map(|event| match event.payload {
            crate::model::ActivityPayload::Diary { mood, .. } => Some(f64::from(mood)),
            _ => None,
        })
        .collect();
    if moods.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = moods.iter().sum::<f64>() / moods.len() as f64;
    Some(mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActivityPayload;
    use chrono::{DateTime, Utc};

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 11, n).unwrap()
    }

    fn at(n: u32, hour: u32) -> DateTime<Utc> {
        day(n).and_hms_opt(hour, 0, 0).unwrap().and_utc()
    }

    fn quiz_at(n: u32, hour: u32, category: &str, score: f64) -> ActivityEvent {
        ActivityEvent::new(
            at(n, hour),
            Some(category.to_owned()),
            ActivityPayload::Quiz { score },
        )
    }

    #[allow(clippy::cast_possible_truncation)]
    fn quiz_series(scores: &[f64]) -> Vec<ActivityEvent> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| quiz_at(1 + i as u32, 10, "Regulations", score))
            .collect()
    }

    #[test]
    fn zero_state_snapshot_is_all_zero() {
        let config = EngineConfig::default();
        let facts = build_facts(&[], &[], &[], day(6), &config);

        assert_eq!(facts.snapshot.overall_percent, 0);
        assert_eq!(facts.snapshot.quiz_trend, QuizTrend::NoData);
        assert_eq!(facts.snapshot.strongest_category, None);
        assert_eq!(facts.snapshot.days_since_last_quiz, None);
        assert_eq!(facts.snapshot.average_mood, None);
        assert_eq!(facts.streak.current_streak, 0);
        assert_eq!(facts.total_events, 0);
    }

    #[test]
    fn overall_percent_is_the_weighted_blend() {
        let config = EngineConfig::default();
        // One perfect quiz category and nothing else: 100 × 0.30 = 30.
        let events = vec![quiz_at(6, 10, "Regulations", 1.0)];
        let streak = calendar::build_streak_state(&events, day(6), &config);
        let snapshot = build_snapshot(&events, &[], &streak, day(6), &config);

        assert_eq!(snapshot.factor_scores.quiz, 100.0);
        // quiz 30 + streak (1/30 × 100 × 0.15) = 30.5 → 31 once rounded.
        assert_eq!(snapshot.overall_percent, 31);
    }

    #[test]
    fn full_marks_everywhere_clamp_to_100() {
        let config = EngineConfig::default();
        let mut events = vec![quiz_at(6, 10, "Regulations", 1.0)];
        events.push(ActivityEvent::new(
            at(6, 8),
            None,
            ActivityPayload::Ojt { hours: 500.0 },
        ));
        // 30 straight diary days saturate streak and cadence.
        for n in 1..=30 {
            events.push(ActivityEvent::new(
                day(n).and_hms_opt(19, 0, 0).unwrap().and_utc(),
                None,
                ActivityPayload::Diary { mood: 5, word_count: 50 },
            ));
        }
        let sets = vec![FlashcardSetRecord {
            set_name: "A".into(),
            mastered_cards: 10,
            total_cards: 10,
        }];
        let streak = calendar::build_streak_state(&events, day(30), &config);
        let snapshot = build_snapshot(&events, &sets, &streak, day(30), &config);
        assert_eq!(snapshot.overall_percent, 100);
    }

    #[test]
    fn trend_improving_above_threshold() {
        // Prior window mean 70, recent mean 80, threshold 5 → improving.
        let events = quiz_series(&[0.70, 0.70, 0.70, 0.70, 0.70, 0.80, 0.80, 0.80, 0.80, 0.80]);
        assert_eq!(quiz_trend(&events, &EngineConfig::default()), QuizTrend::Improving);
    }

    #[test]
    fn trend_stable_within_threshold() {
        // 72 vs 70 is inside the 5-point dead band.
        let events = quiz_series(&[0.70, 0.70, 0.70, 0.70, 0.70, 0.72, 0.72, 0.72, 0.72, 0.72]);
        assert_eq!(quiz_trend(&events, &EngineConfig::default()), QuizTrend::Stable);
    }

    #[test]
    fn trend_declining_below_threshold() {
        let events = quiz_series(&[0.80, 0.80, 0.80, 0.80, 0.80, 0.60, 0.60, 0.60, 0.60, 0.60]);
        assert_eq!(quiz_trend(&events, &EngineConfig::default()), QuizTrend::Declining);
    }

    #[test]
    fn short_history_reads_no_data() {
        let events = quiz_series(&[0.70, 0.80, 0.90]);
        assert_eq!(quiz_trend(&events, &EngineConfig::default()), QuizTrend::NoData);
    }

    #[test]
    fn trend_ignores_event_order() {
        let config = EngineConfig::default();
        let forward = quiz_series(&[0.70, 0.70, 0.70, 0.70, 0.70, 0.80, 0.80, 0.80, 0.80, 0.80]);
        let mut shuffled = forward.clone();
        shuffled.swap(0, 9);
        shuffled.swap(2, 7);
        assert_eq!(quiz_trend(&forward, &config), quiz_trend(&shuffled, &config));
    }

    #[test]
    fn strongest_and_weakest_categories() {
        let config = EngineConfig {
            trend_window: 1,
            ..EngineConfig::default()
        };
        let events = vec![
            quiz_at(1, 10, "Regulations", 0.90),
            quiz_at(2, 10, "Regulations", 0.60),
            quiz_at(2, 11, "Safety", 0.40),
        ];
        let streak = calendar::build_streak_state(&events, day(2), &config);
        let snapshot = build_snapshot(&events, &[], &streak, day(2), &config);

        assert_eq!(snapshot.strongest_category.as_deref(), Some("Regulations"));
        assert_eq!(snapshot.weakest_category.as_deref(), Some("Safety"));
        assert_eq!(snapshot.days_since_last_quiz, Some(0));
    }

    #[test]
    fn category_tie_breaks_to_most_recent() {
        let events = vec![
            quiz_at(1, 10, "Regulations", 0.50),
            quiz_at(3, 10, "Safety", 0.50),
        ];
        let config = EngineConfig::default();
        let streak = calendar::build_streak_state(&events, day(3), &config);
        let snapshot = build_snapshot(&events, &[], &streak, day(3), &config);

        // Equal accuracy: the most recently attempted category wins both slots.
        assert_eq!(snapshot.strongest_category.as_deref(), Some("Safety"));
        assert_eq!(snapshot.weakest_category.as_deref(), Some("Safety"));
    }

    #[test]
    fn days_since_last_quiz_counts_local_days() {
        let events = vec![quiz_at(2, 10, "Regulations", 0.80)];
        let config = EngineConfig::default();
        let streak = calendar::build_streak_state(&events, day(9), &config);
        let snapshot = build_snapshot(&events, &[], &streak, day(9), &config);
        assert_eq!(snapshot.days_since_last_quiz, Some(7));
    }

    #[test]
    fn raw_side_facts_come_from_records_not_events() {
        let config = EngineConfig::default();
        let videos = vec![VideoWatchRecord {
            id: crate::model::RecordId::random(),
            title: "Earthing Systems".into(),
            duration_seconds: 480,
            watched: false,
            bookmarked: true,
            occurred_at: "2023-11-05T10:00:00Z".into(),
        }];
        let facts = build_facts(&[], &[], &videos, day(6), &config);
        assert!(facts.has_unwatched_bookmark);
        assert!(!facts.has_recent_ojt);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let config = EngineConfig::default();
        let events = quiz_series(&[0.70, 0.80, 0.90]);
        let first = build_facts(&events, &[], &[], day(6), &config);
        let second = build_facts(&events, &[], &[], day(6), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn average_mood_covers_window_only() {
        let config = EngineConfig::default();
        let events = vec![
            ActivityEvent::new(at(5, 19), None, ActivityPayload::Diary { mood: 5, word_count: 10 }),
            ActivityEvent::new(at(6, 19), None, ActivityPayload::Diary { mood: 3, word_count: 10 }),
        ];
        let streak = calendar::build_streak_state(&events, day(6), &config);
        let snapshot = build_snapshot(&events, &[], &streak, day(6), &config);
        assert_eq!(snapshot.average_mood, Some(4.0));
    }
}
