use chrono::{DateTime, Utc};

use crate::model::{
    ActivityEvent, ActivityPayload, DiaryEntryRecord, FlashcardReviewRecord, OjtLogRecord,
    QuizAttemptRecord, RawRecord, RecordId, VideoWatchRecord,
};

//
// ─── NORMALIZER ────────────────────────────────────────────────────────────────
//

// Boundary rule: a raw record either becomes a valid canonical event or is
// skipped. Nothing in here returns an error; a bad record must never take
// the rest of the batch down with it.

/// Convert one raw record into a canonical event.
///
/// Returns `None` for unknown sources, unparsable timestamps, and
/// out-of-range payloads; each skip is logged with the record id.
#[must_use]
pub fn normalize(record: &RawRecord) -> Option<ActivityEvent> {
    match record {
        RawRecord::Quiz(quiz) => normalize_quiz(quiz),
        RawRecord::Flashcard(review) => normalize_flashcard(review),
        RawRecord::Diary(entry) => normalize_diary(entry),
        RawRecord::Ojt(log) => normalize_ojt(log),
        RawRecord::Video(watch) => normalize_video(watch),
        RawRecord::Unknown => {
            tracing::warn!("skipping record from unrecognized source");
            None
        }
    }
}

/// Normalize a batch, dropping whatever does not survive.
///
/// Output order follows input order but downstream consumers must not
/// rely on it.
#[must_use]
pub fn normalize_batch<'a>(records: impl IntoIterator<Item = &'a RawRecord>) -> Vec<ActivityEvent> {
    records.into_iter().filter_map(normalize).collect()
}

fn normalize_quiz(record: &QuizAttemptRecord) -> Option<ActivityEvent> {
    let occurred_at = parse_timestamp(record.id, &record.taken_at)?;
    if !record.score_percent.is_finite() {
        tracing::warn!(record_id = %record.id, score = record.score_percent, "skipping quiz attempt with invalid score");
        return None;
    }
    let score = (record.score_percent.clamp(0.0, 100.0)) / 100.0;
    Some(ActivityEvent::new(
        occurred_at,
        record.category.clone(),
        ActivityPayload::Quiz { score },
    ))
}

fn normalize_flashcard(record: &FlashcardReviewRecord) -> Option<ActivityEvent> {
    let occurred_at = parse_timestamp(record.id, &record.reviewed_at)?;
    if !record.mastery_delta.is_finite() {
        tracing::warn!(record_id = %record.id, "skipping flashcard review with invalid mastery delta");
        return None;
    }
    Some(ActivityEvent::new(
        occurred_at,
        Some(record.set_name.clone()),
        ActivityPayload::Flashcard {
            mastery_delta: record.mastery_delta,
        },
    ))
}

fn normalize_diary(record: &DiaryEntryRecord) -> Option<ActivityEvent> {
    let occurred_at = parse_timestamp(record.id, &record.written_at)?;
    if !(1..=5).contains(&record.mood) {
        tracing::warn!(record_id = %record.id, mood = record.mood, "skipping diary entry with out-of-range mood");
        return None;
    }
    Some(ActivityEvent::new(
        occurred_at,
        None,
        ActivityPayload::Diary {
            mood: record.mood,
            word_count: record.word_count,
        },
    ))
}

fn normalize_ojt(record: &OjtLogRecord) -> Option<ActivityEvent> {
    let occurred_at = parse_timestamp(record.id, &record.logged_at)?;
    if !record.hours.is_finite() || record.hours < 0.0 {
        tracing::warn!(record_id = %record.id, hours = record.hours, "skipping OJT log with invalid hours");
        return None;
    }
    Some(ActivityEvent::new(
        occurred_at,
        record.category.clone(),
        ActivityPayload::Ojt {
            hours: record.hours,
        },
    ))
}

fn normalize_video(record: &VideoWatchRecord) -> Option<ActivityEvent> {
    let occurred_at = parse_timestamp(record.id, &record.occurred_at)?;
    Some(ActivityEvent::new(
        occurred_at,
        None,
        ActivityPayload::Video {
            watched: record.watched,
            duration_seconds: record.duration_seconds,
        },
    ))
}

fn parse_timestamp(id: RecordId, raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(error) => {
            tracing::warn!(record_id = %id, raw, %error, "skipping record with unparsable timestamp");
            None
        }
    }
}
