use apprentice_core::model::{ActivityEvent, FlashcardSetRecord, RawRecord, VideoWatchRecord};
use apprentice_core::normalize;
use storage::sources::Sources;

use crate::error::DashboardError;

/// One materialized read of the five source stores.
///
/// Callers treat the bundle as an immutable snapshot for the duration of
/// an aggregation pass; a store mutating afterwards simply means the next
/// pass sees fresher data.
pub(crate) struct ActivityBundle {
    pub events: Vec<ActivityEvent>,
    pub flashcard_sets: Vec<FlashcardSetRecord>,
    pub videos: Vec<VideoWatchRecord>,
}

/// Store-backed reads feeding the dashboard projections.
pub(crate) struct DashboardQueries;

impl DashboardQueries {
    /// Fetch every source store and normalize the event-shaped records.
    ///
    /// Malformed records are dropped by the normalizer; a failing store
    /// query is the only way this returns an error.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Source` when any store query fails.
    pub async fn load_bundle(sources: &Sources) -> Result<ActivityBundle, DashboardError> {
        let attempts = sources.quizzes.list_quiz_attempts().await?;
        let reviews = sources.flashcards.list_flashcard_reviews().await?;
        let flashcard_sets = sources.flashcards.list_flashcard_sets().await?;
        let entries = sources.diary.list_diary_entries().await?;
        let logs = sources.ojt.list_ojt_logs().await?;
        let videos = sources.videos.list_video_watches().await?;

        let mut raw: Vec<RawRecord> = Vec::with_capacity(
            attempts.len() + reviews.len() + entries.len() + logs.len() + videos.len(),
        );
        raw.extend(attempts.into_iter().map(RawRecord::Quiz));
        raw.extend(reviews.into_iter().map(RawRecord::Flashcard));
        raw.extend(entries.into_iter().map(RawRecord::Diary));
        raw.extend(logs.into_iter().map(RawRecord::Ojt));
        raw.extend(videos.iter().cloned().map(RawRecord::Video));

        let events = normalize::normalize_batch(&raw);
        tracing::debug!(
            records = raw.len(),
            events = events.len(),
            "normalized activity snapshot"
        );

        Ok(ActivityBundle {
            events,
            flashcard_sets,
            videos,
        })
    }
}
