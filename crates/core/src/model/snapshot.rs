use chrono::{DateTime, Utc};
use serde::Serialize;

//
// ─── FACTORS ───────────────────────────────────────────────────────────────────
//

/// The five learning pillars blended into the overall score.
///
/// The diary pillar covers diary/portfolio entries; see the weights table
/// in the engine configuration for how the pillars are blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Quiz,
    Flashcards,
    Ojt,
    Diary,
    Streak,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Quiz,
        Factor::Flashcards,
        Factor::Ojt,
        Factor::Diary,
        Factor::Streak,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Factor::Quiz => "quiz",
            Factor::Flashcards => "flashcards",
            Factor::Ojt => "ojt",
            Factor::Diary => "diary",
            Factor::Streak => "streak",
        }
    }
}

/// One `[0, 100]` sub-score per learning pillar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct FactorScores {
    pub quiz: f64,
    pub flashcards: f64,
    pub ojt: f64,
    pub diary: f64,
    pub streak: f64,
}

impl FactorScores {
    #[must_use]
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Quiz => self.quiz,
            Factor::Flashcards => self.flashcards,
            Factor::Ojt => self.ojt,
            Factor::Diary => self.diary,
            Factor::Streak => self.streak,
        }
    }

    /// Iterate `(factor, score)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.into_iter().map(|f| (f, self.get(f)))
    }
}

//
// ─── QUIZ TREND ────────────────────────────────────────────────────────────────
//

/// Coarse classification of recent quiz performance against the window
/// immediately before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizTrend {
    Improving,
    Declining,
    Stable,
    NoData,
}

//
// ─── CATEGORY STATS ────────────────────────────────────────────────────────────
//

/// Per-category quiz accuracy, computed from only that category's attempts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub accuracy_percent: f64,
    pub attempts: u32,
    pub last_attempt_at: DateTime<Utc>,
}

//
// ─── PROGRESS SNAPSHOT ─────────────────────────────────────────────────────────
//

/// The normalized multi-factor progress picture for one learner.
///
/// A pure, recomputed value; never mutated in place. A factor with zero
/// underlying data contributes 0 to the blend rather than being excluded,
/// so the overall percentage reflects incompleteness across all pillars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub factor_scores: FactorScores,
    /// Weighted blend of the factor scores, rounded, clamped to `[0, 100]`.
    pub overall_percent: u8,
    pub quiz_trend: QuizTrend,
    pub strongest_category: Option<String>,
    pub weakest_category: Option<String>,
    /// Local days since the most recent quiz attempt; `None` if none exists.
    pub days_since_last_quiz: Option<i64>,
    /// Raw OJT hours logged, uncapped (the factor score caps at target).
    pub ojt_logged_hours: f64,
    /// Mean diary mood over the heatmap window, when any entries exist.
    pub average_mood: Option<f64>,
    /// Per-category accuracy, sorted by descending accuracy.
    pub category_stats: Vec<CategoryStat>,
}
