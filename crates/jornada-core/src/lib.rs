//! Jornada Core Library
//!
//! Shared functionality for the Jornada financial-goal planning assistant:
//! - Text normalization and Brazilian-locale currency/term parsing
//! - Compound-interest contribution solver and feasibility analysis
//! - Dream naming and keyword-based goal estimation
//! - Scope guard and command-intent classification
//! - Multi-turn goal-collection state machine and turn dispatcher
//! - Pluggable text-generation backends (Ollama, mock)
//! - JSON state store with legacy-shape migration

pub mod ai;
pub mod assistant;
pub mod error;
pub mod estimate;
pub mod flow;
pub mod intent;
pub mod models;
pub mod parse;
pub mod prompt;
pub mod simulation;
pub mod store;
pub mod text;

pub use ai::{GeneratorClient, MockGenerator, OllamaGenerator, TextGenerator};
pub use assistant::Assistant;
pub use error::{Error, Result};
pub use estimate::{estimate_goal_by_keywords, prettify_dream_name};
pub use intent::{IntentRules, SCOPE_BLOCK_MESSAGE};
pub use models::{Goal, GoalDraft, GoalStatus, Scenario, Scenarios, Stage, UserState};
pub use parse::{format_currency, parse_currency, parse_months};
pub use prompt::{ChatMessage, ChatRole};
pub use simulation::{
    compute_scenarios, feasible_feedback, months_for_budget, pmt_for_goal,
    CONSERVATIVE_RATE, MAX_TERM_MONTHS, MODERATE_RATE,
};
pub use store::StateStore;
pub use text::normalize;
