//! Domain models for Jornada

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::simulation::compute_scenarios;

/// A (rate, required monthly contribution) pair computed for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub rate: f64,
    pub monthly_contribution: f64,
}

/// The canonical scenario pair of a goal.
///
/// Always recomputed from `(target_amount, initial_amount, term_months)` via
/// [`compute_scenarios`], never mutated independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenarios {
    pub conservative: Scenario,
    pub moderate: Scenario,
}

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress stage of the goal-collection dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    CollectName,
    CollectTarget,
    CollectTerm,
    CollectInitial,
    CollectIncome,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CollectName => "collect_name",
            Self::CollectTarget => "collect_target",
            Self::CollectTerm => "collect_term",
            Self::CollectInitial => "collect_initial",
            Self::CollectIncome => "collect_income",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: u32,
    pub name: String,
    pub target_amount: f64,
    pub term_months: u32,
    #[serde(default)]
    pub initial_amount: f64,
    #[serde(default)]
    pub monthly_income: f64,
    pub scenarios: Scenarios,
    #[serde(default)]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A goal under construction during the collection dialogue.
///
/// Numeric fields stay unset until the matching stage fills them;
/// `initial_amount` and `monthly_income` default to 0 ("not informed").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_amount: Option<f64>,
    #[serde(default)]
    pub term_months: Option<u32>,
    #[serde(default)]
    pub initial_amount: f64,
    #[serde(default)]
    pub monthly_income: f64,
}

/// Per-user conversation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserState {
    pub user_id: String,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub draft: Option<GoalDraft>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserState {
    /// Fresh state for a user on first contact.
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            stage: Stage::Idle,
            goals: Vec::new(),
            draft: None,
            updated_at: None,
        }
    }

    /// Next goal id: `max(existing) + 1`, starting at 1.
    ///
    /// Ids are never reused even after a goal is removed by hand.
    pub fn next_goal_id(&self) -> u32 {
        self.goals.iter().map(|g| g.id).max().map_or(1, |max| max + 1)
    }

    /// Abort any in-progress collection flow.
    pub fn reset_flow(&mut self) {
        self.stage = Stage::Idle;
        self.draft = None;
    }

    /// Normalize a raw persisted record into the current shape.
    ///
    /// Missing or invalid fields take safe defaults (an unknown `stage`
    /// becomes `Idle`). A legacy flat record (goal fields directly on the
    /// state object) is folded into a one-element `goals` list with
    /// recomputed scenarios; once `goals` is non-empty the fold never runs
    /// again, so the transform is idempotent. Never errors.
    pub fn migrate(value: Value, user_id: &str) -> Self {
        let obj = match value.as_object() {
            Some(obj) => obj.clone(),
            None => return Self::new(user_id),
        };

        let stage = obj
            .get("stage")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let mut goals: Vec<Goal> = obj
            .get("goals")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let draft = obj
            .get("draft")
            .and_then(|v| serde_json::from_value(v.clone()).ok());
        let updated_at: Option<DateTime<Utc>> = obj
            .get("updated_at")
            .and_then(|v| serde_json::from_value(v.clone()).ok());

        // fold the old single-goal flat shape
        if goals.is_empty() {
            let name = obj.get("dream_name").and_then(Value::as_str);
            let target = obj.get("target_amount").and_then(Value::as_f64);
            let months = obj
                .get("term_months")
                .and_then(Value::as_u64)
                .and_then(|m| u32::try_from(m).ok());
            if let (Some(name), Some(target), Some(months)) = (name, target, months) {
                if target > 0.0 && months > 0 {
                    let initial = obj
                        .get("initial_amount")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0);
                    let income = obj
                        .get("monthly_income")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0);
                    let now = Utc::now();
                    debug!(user_id, name, "migrating legacy flat goal record");
                    goals.push(Goal {
                        id: 1,
                        name: name.to_string(),
                        target_amount: target,
                        term_months: months,
                        initial_amount: initial,
                        monthly_income: income,
                        scenarios: compute_scenarios(target, initial, months),
                        status: GoalStatus::Active,
                        created_at: updated_at.unwrap_or(now),
                        updated_at: now,
                    });
                }
            }
        }

        Self {
            user_id: user_id.to_string(),
            stage,
            goals,
            draft,
            updated_at,
        }
    }
}
