use chrono::FixedOffset;
use thiserror::Error;

use crate::model::Factor;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A configuration defect. Surfaces at engine construction and in tests,
/// never mid-aggregation.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("factor weights sum to {sum}, expected 1.0")]
    WeightSum { sum: f64 },
    #[error("milestone thresholds must be strictly ascending")]
    MilestoneOrder,
    #[error("heatmap window must cover at least one day")]
    EmptyHeatmapWindow,
    #[error("trend window must cover at least one attempt")]
    EmptyTrendWindow,
}

//
// ─── FACTOR WEIGHTS ────────────────────────────────────────────────────────────
//

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Fixed blend weights for the five learning pillars.
///
/// The weights must sum to exactly 1.0; this is validated when an engine
/// configuration is constructed, not re-checked per aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    pub quiz: f64,
    pub flashcards: f64,
    pub ojt: f64,
    pub diary: f64,
    pub streak: f64,
}

impl FactorWeights {
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

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.quiz + self.flashcards + self.ojt + self.diary + self.streak
    }

    /// # Errors
    ///
    /// Returns `ConfigError::WeightSum` when the weights do not sum to 1.0
    /// within floating-point tolerance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            quiz: 0.30,
            flashcards: 0.20,
            ojt: 0.20,
            diary: 0.15,
            streak: 0.15,
        }
    }
}

//
// ─── ENGINE CONFIG ─────────────────────────────────────────────────────────────
//

/// Static streak milestone table: ascending thresholds with display labels.
pub const MILESTONES: [(u32, &str); 6] = [
    (3, "Getting Started"),
    (7, "One Week Strong"),
    (14, "Fortnight Focus"),
    (30, "Monthly Master"),
    (60, "Relentless"),
    (100, "Century Club"),
];

/// Every product-tuning parameter of the engine, in one table.
///
/// These are build-time constants with documented defaults, not runtime
/// knobs; `validate()` fails fast on an inconsistent table.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub weights: FactorWeights,
    /// Offset defining the reporting context's local day boundary.
    pub reporting_offset: FixedOffset,
    /// Length of the rolling activity heatmap, in days.
    pub heatmap_days: u32,
    /// Ascending streak milestone thresholds with labels.
    pub milestones: &'static [(u32, &'static str)],
    /// Days at which the streak factor saturates at 100.
    pub streak_saturation_days: u32,
    /// Quiz attempts per trend window.
    pub trend_window: usize,
    /// Percentage-point delta below which the trend reads as stable.
    pub trend_delta_points: f64,
    /// Programme target for on-the-job-training hours.
    pub ojt_target_hours: f64,
    /// Expected diary cadence, entries per week.
    pub diary_entries_per_week: f64,
    /// Days without a quiz before the take-quiz rule fires.
    pub stale_quiz_days: i64,
    /// Accuracy below which a category counts as weak, in percent.
    pub weak_category_threshold: f64,
    /// Set mastery below which the flashcard rule fires, in percent.
    pub low_mastery_threshold: f64,
    /// Minimum run length before a streak is worth protecting.
    pub streak_at_risk_min: u32,
    /// Days after a break during which the rebuild-streak rule fires.
    pub rebuild_streak_window_days: i64,
    /// Default cap on the emitted recommendation list.
    pub max_recommendations: usize,
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns the first `ConfigError` found in the table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.heatmap_days == 0 {
            return Err(ConfigError::EmptyHeatmapWindow);
        }
        if self.trend_window == 0 {
            return Err(ConfigError::EmptyTrendWindow);
        }
        if !self.milestones.windows(2).all(|w| w[0].0 < w[1].0) {
            return Err(ConfigError::MilestoneOrder);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            reporting_offset: FixedOffset::east_opt(0).expect("zero offset is valid"),
            heatmap_days: 28,
            milestones: &MILESTONES,
            streak_saturation_days: 30,
            trend_window: 5,
            trend_delta_points: 5.0,
            ojt_target_hours: 200.0,
            diary_entries_per_week: 3.0,
            stale_quiz_days: 7,
            weak_category_threshold: 50.0,
            low_mastery_threshold: 40.0,
            streak_at_risk_min: 3,
            rebuild_streak_window_days: 3,
            max_recommendations: 4,
        }
    }
}
