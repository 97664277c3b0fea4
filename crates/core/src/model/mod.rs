mod activity;
mod ids;
mod recommendation;
mod records;
mod snapshot;
mod streak;

pub use activity::{ActivityEvent, ActivityKind, ActivityPayload};
pub use ids::RecordId;
pub use recommendation::{Recommendation, RecommendationKind};
pub use records::{
    DiaryEntryRecord, FlashcardReviewRecord, FlashcardSetRecord, OjtLogRecord, QuizAttemptRecord,
    RawRecord, VideoWatchRecord,
};
pub use snapshot::{CategoryStat, Factor, FactorScores, ProgressSnapshot, QuizTrend};
pub use streak::{BestDay, HeatmapDay, Intensity, Milestone, StreakState};
