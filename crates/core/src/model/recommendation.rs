use serde::Serialize;

/// Closed set of recommendation types; the emitted list contains at most
/// one entry per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    GetStarted,
    TakeQuiz,
    WeakCategory,
    StreakAtRisk,
    RebuildStreak,
    FlashcardMastery,
    WatchVideo,
    MixItUp,
    LogOjt,
}

/// A ranked "what to do next" suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    /// Higher is more urgent.
    pub priority: u8,
    pub title: String,
    pub description: String,
    /// In-app route the suggestion links to.
    pub action_path: String,
}
