use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use apprentice_core::model::{
    DiaryEntryRecord, FlashcardReviewRecord, FlashcardSetRecord, OjtLogRecord, QuizAttemptRecord,
    VideoWatchRecord,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by source-store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── SOURCE CONTRACTS ──────────────────────────────────────────────────────────
//

// One read-only trait per external store. The queries are scoped to the
// authenticated learner by the store itself; nothing here writes.

#[async_trait]
pub trait QuizResultSource: Send + Sync {
    /// Fetch every quiz attempt on record for the learner.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the store cannot be queried.
    async fn list_quiz_attempts(&self) -> Result<Vec<QuizAttemptRecord>, SourceError>;
}

#[async_trait]
pub trait FlashcardSource: Send + Sync {
    /// Fetch every flashcard review event for the learner.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the store cannot be queried.
    async fn list_flashcard_reviews(&self) -> Result<Vec<FlashcardReviewRecord>, SourceError>;

    /// Fetch the current mastery summary of each active card set.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the store cannot be queried.
    async fn list_flashcard_sets(&self) -> Result<Vec<FlashcardSetRecord>, SourceError>;
}

#[async_trait]
pub trait DiarySource: Send + Sync {
    /// Fetch every learning-diary entry for the learner.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the store cannot be queried.
    async fn list_diary_entries(&self) -> Result<Vec<DiaryEntryRecord>, SourceError>;
}

#[async_trait]
pub trait OjtLogSource: Send + Sync {
    /// Fetch every on-the-job-training log entry for the learner.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the store cannot be queried.
    async fn list_ojt_logs(&self) -> Result<Vec<OjtLogRecord>, SourceError>;
}

#[async_trait]
pub trait VideoWatchSource: Send + Sync {
    /// Fetch every video interaction (watches and bookmarks) for the learner.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the store cannot be queried.
    async fn list_video_watches(&self) -> Result<Vec<VideoWatchRecord>, SourceError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory source set for testing and prototyping.
///
/// Clones share the underlying vectors, so a test can keep one handle for
/// seeding records while the service reads through another.
#[derive(Clone, Default)]
pub struct InMemorySources {
    quiz_attempts: Arc<Mutex<Vec<QuizAttemptRecord>>>,
    flashcard_reviews: Arc<Mutex<Vec<FlashcardReviewRecord>>>,
    flashcard_sets: Arc<Mutex<Vec<FlashcardSetRecord>>>,
    diary_entries: Arc<Mutex<Vec<DiaryEntryRecord>>>,
    ojt_logs: Arc<Mutex<Vec<OjtLogRecord>>>,
    video_watches: Arc<Mutex<Vec<VideoWatchRecord>>>,
}

impl InMemorySources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `SourceError::Connection` if the store lock is poisoned.
    pub fn add_quiz_attempt(&self, record: QuizAttemptRecord) -> Result<(), SourceError> {
        push(&self.quiz_attempts, record)
    }

    /// # Errors
    ///
    /// Returns `SourceError::Connection` if the store lock is poisoned.
    pub fn add_flashcard_review(&self, record: FlashcardReviewRecord) -> Result<(), SourceError> {
        push(&self.flashcard_reviews, record)
    }

    /// # Errors
    ///
    /// Returns `SourceError::Connection` if the store lock is poisoned.
    pub fn add_flashcard_set(&self, record: FlashcardSetRecord) -> Result<(), SourceError> {
        push(&self.flashcard_sets, record)
    }

    /// # Errors
    ///
    /// Returns `SourceError::Connection` if the store lock is poisoned.
    pub fn add_diary_entry(&self, record: DiaryEntryRecord) -> Result<(), SourceError> {
        push(&self.diary_entries, record)
    }

    /// # Errors
    ///
    /// Returns `SourceError::Connection` if the store lock is poisoned.
    pub fn add_ojt_log(&self, record: OjtLogRecord) -> Result<(), SourceError> {
        push(&self.ojt_logs, record)
    }

    /// # Errors
    ///
    /// Returns `SourceError::Connection` if the store lock is poisoned.
    pub fn add_video_watch(&self, record: VideoWatchRecord) -> Result<(), SourceError> {
        push(&self.video_watches, record)
    }
}

fn push<T>(store: &Arc<Mutex<Vec<T>>>, record: T) -> Result<(), SourceError> {
    let mut guard = store
        .lock()
        .map_err(|e| SourceError::Connection(e.to_string()))?;
    guard.push(record);
    Ok(())
}

fn snapshot<T: Clone>(store: &Arc<Mutex<Vec<T>>>) -> Result<Vec<T>, SourceError> {
    let guard = store
        .lock()
        .map_err(|e| SourceError::Connection(e.to_string()))?;
    Ok(guard.clone())
}

#[async_trait]
impl QuizResultSource for InMemorySources {
    async fn list_quiz_attempts(&self) -> Result<Vec<QuizAttemptRecord>, SourceError> {
        snapshot(&self.quiz_attempts)
    }
}

#[async_trait]
impl FlashcardSource for InMemorySources {
    async fn list_flashcard_reviews(&self) -> Result<Vec<FlashcardReviewRecord>, SourceError> {
        snapshot(&self.flashcard_reviews)
    }

    async fn list_flashcard_sets(&self) -> Result<Vec<FlashcardSetRecord>, SourceError> {
        snapshot(&self.flashcard_sets)
    }
}

#[async_trait]
impl DiarySource for InMemorySources {
    async fn list_diary_entries(&self) -> Result<Vec<DiaryEntryRecord>, SourceError> {
        snapshot(&self.diary_entries)
    }
}

#[async_trait]
impl OjtLogSource for InMemorySources {
    async fn list_ojt_logs(&self) -> Result<Vec<OjtLogRecord>, SourceError> {
        snapshot(&self.ojt_logs)
    }
}

#[async_trait]
impl VideoWatchSource for InMemorySources {
    async fn list_video_watches(&self) -> Result<Vec<VideoWatchRecord>, SourceError> {
        snapshot(&self.video_watches)
    }
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates the five source stores behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Sources {
    pub quizzes: Arc<dyn QuizResultSource>,
    pub flashcards: Arc<dyn FlashcardSource>,
    pub diary: Arc<dyn DiarySource>,
    pub ojt: Arc<dyn OjtLogSource>,
    pub videos: Arc<dyn VideoWatchSource>,
}

impl Sources {
    /// Fresh, empty in-memory sources for prototyping.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemorySources::new())
    }

    /// Wrap an existing in-memory source set (tests keep the original
    /// handle for seeding).
    #[must_use]
    pub fn from_in_memory(stores: InMemorySources) -> Self {
        Self {
            quizzes: Arc::new(stores.clone()),
            flashcards: Arc::new(stores.clone()),
            diary: Arc::new(stores.clone()),
            ojt: Arc::new(stores.clone()),
            videos: Arc::new(stores),
        }
    }
}
