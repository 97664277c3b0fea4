use crate::aggregate::DashboardFacts;
use crate::config::EngineConfig;
use crate::model::QuizTrend;

//
// ─── INSIGHT TABLE ─────────────────────────────────────────────────────────────
//

type Applies = fn(&DashboardFacts, &EngineConfig) -> bool;
type Render = fn(&DashboardFacts, &EngineConfig) -> String;

/// One row of the insight table: coarser than recommendations, evaluated
/// top-to-bottom, first match wins.
struct InsightRule {
    applies: Applies,
    render: Render,
}

static INSIGHTS: [InsightRule; 6] = [
    InsightRule {
        applies: |facts, _| facts.snapshot.quiz_trend == QuizTrend::Improving,
        render: |_, _| {
            "Your quiz scores are climbing: recent attempts beat the ones before.".into()
        },
    },
    InsightRule {
        applies: |facts, _| facts.snapshot.quiz_trend == QuizTrend::Declining,
        render: |_, _| {
            "Your recent quiz scores dipped below your earlier average. A short revision session could turn that around."
                .into()
        },
    },
    InsightRule {
        applies: |facts, _| facts.streak.current_streak >= 7,
        render: |facts, _| {
            format!(
                "You have studied {} days in a row. Consistency like that compounds fast.",
                facts.streak.current_streak
            )
        },
    },
    InsightRule {
        applies: |facts, config| {
            facts
                .snapshot
                .category_stats
                .iter()
                .any(|stat| stat.accuracy_percent < config.weak_category_threshold)
        },
        render: |facts, _| {
            let name = facts
                .snapshot
                .weakest_category
                .as_deref()
                .unwrap_or("your weakest area");
            format!("Your {name} scores are trailing the rest. A focused session there would lift your overall progress.")
        },
    },
    InsightRule {
        applies: |facts, config| facts.snapshot.ojt_logged_hours >= config.ojt_target_hours,
        render: |_, config| {
            format!(
                "You have hit your {:.0}-hour on-the-job training target. Excellent site work.",
                config.ojt_target_hours
            )
        },
    },
    InsightRule {
        applies: |facts, _| facts.total_events > 0,
        render: |facts, _| {
            let active_days = facts
                .streak
                .heatmap
                .iter()
                .filter(|cell| cell.count > 0)
                .count();
            format!(
                "You were active on {active_days} of the last {} days. Keep the momentum going.",
                facts.streak.heatmap.len()
            )
        },
    },
];

/// The single highest-priority applicable insight, or `None` for the true
/// zero state.
#[must_use]
pub fn insight_text(facts: &DashboardFacts, config: &EngineConfig) -> Option<String> {
    INSIGHTS
        .iter()
        .find(|rule| (rule.applies)(facts, config))
        .map(|rule| (rule.render)(facts, config))
}
