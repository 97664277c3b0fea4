use std::collections::HashSet;

use crate::aggregate::DashboardFacts;
use crate::config::EngineConfig;
use crate::model::{CategoryStat, FlashcardSetRecord, Recommendation, RecommendationKind};

//
// ─── RULE TABLE ────────────────────────────────────────────────────────────────
//

type Trigger = fn(&DashboardFacts, &EngineConfig) -> bool;
type Render = fn(&DashboardFacts, &EngineConfig) -> (String, String, &'static str);

/// One row of the recommendation table: trigger predicate, base priority,
/// and the title/description/action template.
struct Rule {
    kind: RecommendationKind,
    priority: u8,
    trigger: Trigger,
    render: Render,
}

// Declaration order is the tie-break for equal priorities, so the table
// reads top-down from most to least urgent.
static RULES: [Rule; 9] = [
    Rule {
        kind: RecommendationKind::GetStarted,
        priority: 100,
        trigger: |facts, _| facts.total_events == 0,
        render: |_, _| {
            (
                "Start your learning journey".into(),
                "Take your first quiz or log a diary entry to begin tracking progress.".into(),
                "/apprentice/courses",
            )
        },
    },
    Rule {
        kind: RecommendationKind::TakeQuiz,
        priority: 90,
        trigger: |facts, config| {
            facts.total_events > 0
                && facts
                    .snapshot
                    .days_since_last_quiz
                    .map_or(true, |days| days >= config.stale_quiz_days)
        },
        render: |facts, _| {
            let description = match facts.snapshot.days_since_last_quiz {
                Some(days) => format!("It has been {days} days since your last quiz."),
                None => "You have not taken a quiz yet. Test where you stand.".into(),
            };
            ("Time for a quiz".into(), description, "/apprentice/quiz")
        },
    },
    Rule {
        kind: RecommendationKind::WeakCategory,
        priority: 80,
        trigger: |facts, config| {
            weakest_stat(facts)
                .is_some_and(|stat| stat.accuracy_percent < config.weak_category_threshold)
        },
        render: |facts, _| {
            let (name, accuracy) = weakest_stat(facts)
                .map_or(("your weakest area".into(), 0.0), |stat| {
                    (stat.category.clone(), stat.accuracy_percent)
                });
            (
                format!("Brush up on {name}"),
                format!("Your {name} accuracy sits at {accuracy:.0}%. A focused session would lift it."),
                "/apprentice/quiz",
            )
        },
    },
    Rule {
        kind: RecommendationKind::StreakAtRisk,
        priority: 75,
        trigger: |facts, config| {
            facts.streak.current_streak >= config.streak_at_risk_min
                && facts.streak.count_on(facts.today) == 0
        },
        render: |facts, _| {
            let days = facts.streak.current_streak;
            (
                "Keep your streak alive".into(),
                format!("You are on a {days}-day streak and have not logged anything today."),
                "/apprentice",
            )
        },
    },
    Rule {
        kind: RecommendationKind::RebuildStreak,
        priority: 70,
        trigger: |facts, config| {
            facts.streak.current_streak == 0
                && facts.streak.longest_streak >= config.streak_at_risk_min
                && days_since_last_activity(facts)
                    .is_some_and(|gap| gap >= 2 && gap <= config.rebuild_streak_window_days + 1)
        },
        render: |facts, _| {
            let longest = facts.streak.longest_streak;
            (
                "Rebuild your streak".into(),
                format!("Your {longest}-day best is waiting. One activity today starts a new run."),
                "/apprentice",
            )
        },
    },
    Rule {
        kind: RecommendationKind::FlashcardMastery,
        priority: 65,
        trigger: |facts, config| {
            weakest_set(facts)
                .is_some_and(|(_, mastery)| mastery < config.low_mastery_threshold)
        },
        render: |facts, _| {
            let (name, mastery) = weakest_set(facts)
                .map_or(("a flashcard set".into(), 0.0), |(set, mastery)| {
                    (set.set_name.clone(), mastery)
                });
            (
                format!("Review the {name} flashcards"),
                format!("Mastery of {name} is at {mastery:.0}%. A review session will push it up."),
                "/apprentice/flashcards",
            )
        },
    },
    Rule {
        kind: RecommendationKind::WatchVideo,
        priority: 60,
        trigger: |facts, _| facts.has_unwatched_bookmark,
        render: |_, _| {
            (
                "Watch your bookmarked video".into(),
                "You bookmarked a video you have not watched yet.".into(),
                "/apprentice/videos",
            )
        },
    },
    Rule {
        kind: RecommendationKind::MixItUp,
        priority: 55,
        trigger: |facts, _| facts.total_events > 0 && facts.active_kinds_in_window < 2,
        render: |_, _| {
            (
                "Mix up your learning".into(),
                "All your recent activity is one type. Blending quizzes, cards and diary entries sticks better.".into(),
                "/apprentice/courses",
            )
        },
    },
    Rule {
        kind: RecommendationKind::LogOjt,
        priority: 50,
        trigger: |facts, _| facts.total_events > 0 && !facts.has_recent_ojt,
        render: |_, _| {
            (
                "Log your site hours".into(),
                "No on-the-job hours recorded recently. Keep your evidence log current.".into(),
                "/apprentice/ojt",
            )
        },
    },
];

fn weakest_stat(facts: &DashboardFacts) -> Option<&CategoryStat> {
    let name = facts.snapshot.weakest_category.as_ref()?;
    facts
        .snapshot
        .category_stats
        .iter()
        .find(|stat| &stat.category == name)
}

fn weakest_set(facts: &DashboardFacts) -> Option<(&FlashcardSetRecord, f64)> {
    facts
        .flashcard_sets
        .iter()
        .filter_map(|set| set.mastery_percent().map(|mastery| (set, mastery)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

fn days_since_last_activity(facts: &DashboardFacts) -> Option<i64> {
    let last = facts.streak.activity_map.keys().next_back()?;
    Some(facts.today.signed_duration_since(*last).num_days())
}

//
// ─── EVALUATION ────────────────────────────────────────────────────────────────
//

/// Evaluate the rule table and return the ranked, deduplicated top list
/// capped at the configured default.
#[must_use]
pub fn recommendations(facts: &DashboardFacts, config: &EngineConfig) -> Vec<Recommendation> {
    recommendations_with_limit(facts, config, config.max_recommendations)
}

/// Same as [`recommendations`] with an explicit cap.
#[must_use]
pub fn recommendations_with_limit(
    facts: &DashboardFacts,
    config: &EngineConfig,
    limit: usize,
) -> Vec<Recommendation> {
    evaluate(&RULES, facts, config, limit)
}

/// Deterministic: run every trigger, sort by priority descending (stable,
/// so declaration order breaks ties), keep the first of each kind,
/// truncate.
fn evaluate(
    rules: &[Rule],
    facts: &DashboardFacts,
    config: &EngineConfig,
    limit: usize,
) -> Vec<Recommendation> {
    let mut triggered: Vec<Recommendation> = rules
        .iter()
        .filter(|rule| (rule.trigger)(facts, config))
        .map(|rule| {
            let (title, description, action_path) = (rule.render)(facts, config);
            Recommendation {
                kind: rule.kind,
                priority: rule.priority,
                title,
                description,
                action_path: action_path.to_owned(),
            }
        })
        .collect();

    triggered.sort_by(|a, b| b.priority.cmp(&a.priority));

    let mut seen = HashSet::new();
    triggered.retain(|rec| seen.insert(rec.kind));
    triggered.truncate(limit);
    triggered
}
