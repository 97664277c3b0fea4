use chrono::{DateTime, NaiveDate, Utc};

use apprentice_core::aggregate::{self, DashboardFacts};
use apprentice_core::config::EngineConfig;
use apprentice_core::model::{ProgressSnapshot, Recommendation, StreakState};
use apprentice_core::time::Clock;
use apprentice_core::{insight, recommend};
use storage::sources::Sources;

use super::queries::DashboardQueries;
use crate::error::DashboardError;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// The outbound query surface of the progress engine.
///
/// Every method is a pure projection over a fresh materialized snapshot
/// of the source stores: no caching, no side effects, safe to call as
/// often as the presentation layer likes.
pub struct DashboardService {
    sources: Sources,
    config: EngineConfig,
    clock: Clock,
}

impl DashboardService {
    /// Create a service over the given stores with the default tuning
    /// table and real-time clock.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Config` if the configuration table is
    /// inconsistent.
    pub fn new(sources: Sources) -> Result<Self, DashboardError> {
        Self::with_config(sources, EngineConfig::default())
    }

    /// Create a service with a custom tuning table, validated up front so
    /// a defective table fails here rather than mid-aggregation.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Config` if the configuration table is
    /// inconsistent.
    pub fn with_config(sources: Sources, config: EngineConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        Ok(Self {
            sources,
            config,
            clock: Clock::default(),
        })
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the service's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn today(&self) -> NaiveDate {
        self.clock.today(self.config.reporting_offset)
    }

    async fn facts(&self) -> Result<DashboardFacts, DashboardError> {
        let bundle = DashboardQueries::load_bundle(&self.sources).await?;
        Ok(aggregate::build_facts(
            &bundle.events,
            &bundle.flashcard_sets,
            &bundle.videos,
            self.today(),
            &self.config,
        ))
    }

    /// Current/longest streak, heatmap, milestones and best day.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Source` when a store query fails.
    pub async fn streak_summary(&self) -> Result<StreakState, DashboardError> {
        Ok(self.facts().await?.streak)
    }

    /// The multi-factor progress picture with quiz trend.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Source` when a store query fails.
    pub async fn progress_snapshot(&self) -> Result<ProgressSnapshot, DashboardError> {
        Ok(self.facts().await?.snapshot)
    }

    /// Ranked, deduplicated "what to do next" list, at most `max_count`
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Source` when a store query fails.
    pub async fn recommendations(
        &self,
        max_count: usize,
    ) -> Result<Vec<Recommendation>, DashboardError> {
        let facts = self.facts().await?;
        Ok(recommend::recommendations_with_limit(
            &facts,
            &self.config,
            max_count,
        ))
    }

    /// The single best-fit insight sentence, `None` in the true zero
    /// state.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Source` when a store query fails.
    pub async fn insight_text(&self) -> Result<Option<String>, DashboardError> {
        let facts = self.facts().await?;
        Ok(insight::insight_text(&facts, &self.config))
    }
}
