use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::time;

//
// ─── ACTIVITY KIND ─────────────────────────────────────────────────────────────
//

/// The learning domain an activity belongs to.
///
/// Closed set: every record a source store can hand us maps to exactly one
/// of these, and every downstream component branches on it uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Quiz,
    Flashcard,
    Diary,
    Ojt,
    Video,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::Quiz,
        ActivityKind::Flashcard,
        ActivityKind::Diary,
        ActivityKind::Ojt,
        ActivityKind::Video,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Quiz => "quiz",
            ActivityKind::Flashcard => "flashcard",
            ActivityKind::Diary => "diary",
            ActivityKind::Ojt => "ojt",
            ActivityKind::Video => "video",
        }
    }
}

//
// ─── CANONICAL EVENT ───────────────────────────────────────────────────────────
//

/// Kind-specific numeric payload of a canonical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityPayload {
    /// Score achieved, as a fraction in `[0, 1]`.
    Quiz { score: f64 },
    /// Change in mastery produced by one review (may be negative).
    Flashcard { mastery_delta: f64 },
    /// Mood rating (1-5) and entry length.
    Diary { mood: u8, word_count: u32 },
    /// Hours worked on the job.
    Ojt { hours: f64 },
    /// Whether the video was watched to completion, and its length.
    Video { watched: bool, duration_seconds: u32 },
}

/// The canonical unit consumed by every downstream component.
///
/// Produced only by the normalizer; an `ActivityEvent` always carries a
/// valid instant and an in-range payload. Ordering within a batch is not
/// guaranteed, so downstream folds must be commutative except where
/// explicitly time-windowed (quiz trend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub occurred_at: DateTime<Utc>,
    /// Subject/skill tag, e.g. "Regulations", "Safety".
    pub category: Option<String>,
    pub payload: ActivityPayload,
}

impl ActivityEvent {
    #[must_use]
    pub fn new(
        occurred_at: DateTime<Utc>,
        category: Option<String>,
        payload: ActivityPayload,
    ) -> Self {
        Self {
            occurred_at,
            category,
            payload,
        }
    }

    /// The learning domain this event belongs to.
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        match self.payload {
            ActivityPayload::Quiz { .. } => ActivityKind::Quiz,
            ActivityPayload::Flashcard { .. } => ActivityKind::Flashcard,
            ActivityPayload::Diary { .. } => ActivityKind::Diary,
            ActivityPayload::Ojt { .. } => ActivityKind::Ojt,
            ActivityPayload::Video { .. } => ActivityKind::Video,
        }
    }

    /// Calendar date of this event under the reporting context's offset.
    #[must_use]
    pub fn local_date(&self, offset: FixedOffset) -> NaiveDate {
        time::local_date(self.occurred_at, offset)
    }

    /// Quiz score as a fraction, `None` for non-quiz events.
    #[must_use]
    pub fn quiz_score(&self) -> Option<f64> {
        match self.payload {
            ActivityPayload::Quiz { score } => Some(score),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn kind_is_derived_from_payload() {
        let event = ActivityEvent::new(
            fixed_now(),
            None,
            ActivityPayload::Ojt { hours: 4.0 },
        );
        assert_eq!(event.kind(), ActivityKind::Ojt);
    }

    #[test]
    fn local_date_shifts_with_reporting_offset() {
        let event = ActivityEvent::new(
            fixed_now(), // 2023-11-14T22:13:20Z
            None,
            ActivityPayload::Diary { mood: 4, word_count: 120 },
        );
        let east = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(
            event.local_date(east),
            NaiveDate::from_ymd_opt(2023, 11, 15).unwrap()
        );
    }

    #[test]
    fn quiz_score_only_for_quiz_events() {
        let quiz = ActivityEvent::new(
            fixed_now(),
            Some("Safety".into()),
            ActivityPayload::Quiz { score: 0.4 },
        );
        assert_eq!(quiz.quiz_score(), Some(0.4));

        let diary = ActivityEvent::new(
            fixed_now(),
            None,
            ActivityPayload::Diary { mood: 3, word_count: 50 },
        );
        assert_eq!(diary.quiz_score(), None);
    }
}
