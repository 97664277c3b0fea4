use serde::{Deserialize, Serialize};

use crate::model::ids::RecordId;

//
// ─── RAW SOURCE RECORDS ────────────────────────────────────────────────────────
//

// These shapes mirror what the external source stores return, before any
// validation. Timestamps stay as RFC 3339 strings here: they cross a JSON
// boundary and may be malformed, which the normalizer handles by skipping
// the record.

/// A completed quiz attempt as reported by the quiz-results store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttemptRecord {
    pub id: RecordId,
    /// Subject/skill tag, e.g. "Regulations", "Safety".
    pub category: Option<String>,
    /// Score achieved, in percent (0-100).
    pub score_percent: f64,
    pub taken_at: String,
}

/// A single flashcard review as reported by the flashcard store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardReviewRecord {
    pub id: RecordId,
    pub set_name: String,
    /// Change in mastery produced by this review (may be negative).
    pub mastery_delta: f64,
    pub reviewed_at: String,
}

/// Current mastery summary for one flashcard set.
///
/// This is a state snapshot, not an event; it feeds the flashcard factor
/// score and the low-mastery recommendation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardSetRecord {
    pub set_name: String,
    pub mastered_cards: u32,
    pub total_cards: u32,
}

impl FlashcardSetRecord {
    /// Mastery of this set in percent, `None` for an empty set.
    #[must_use]
    pub fn mastery_percent(&self) -> Option<f64> {
        if self.total_cards == 0 {
            return None;
        }
        Some(f64::from(self.mastered_cards) / f64::from(self.total_cards) * 100.0)
    }
}

/// A learning-diary entry as reported by the diary store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntryRecord {
    pub id: RecordId,
    /// Mood rating, 1 (rough day) to 5 (great day).
    pub mood: u8,
    pub word_count: u32,
    pub written_at: String,
}

/// An on-the-job-training log entry as reported by the OJT store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OjtLogRecord {
    pub id: RecordId,
    pub category: Option<String>,
    pub hours: f64,
    pub logged_at: String,
}

/// A video interaction as reported by the video-watch store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoWatchRecord {
    pub id: RecordId,
    pub title: String,
    pub duration_seconds: u32,
    pub watched: bool,
    pub bookmarked: bool,
    pub occurred_at: String,
}

//
// ─── TAGGED UNION ──────────────────────────────────────────────────────────────
//

/// A raw record from any source store, tagged by origin.
///
/// The `Unknown` variant absorbs source tags this engine does not
/// recognize so a foreign record deserializes instead of failing the
/// whole batch; the normalizer drops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawRecord {
    Quiz(QuizAttemptRecord),
    Flashcard(FlashcardReviewRecord),
    Diary(DiaryEntryRecord),
    Ojt(OjtLogRecord),
    Video(VideoWatchRecord),
    #[serde(other)]
    Unknown,
}
