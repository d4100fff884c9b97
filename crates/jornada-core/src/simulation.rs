//! Goal simulation
//!
//! Compound-interest math behind every scenario shown to the user: the
//! ordinary-annuity payment solver, the two canonical rate scenarios, and the
//! income-feasibility check.

use tracing::debug;

use crate::models::{Scenario, Scenarios};
use crate::parse::format_currency;

/// Monthly rate of the conservative scenario (0.5%/month).
pub const CONSERVATIVE_RATE: f64 = 0.005;
/// Monthly rate of the moderate scenario (0.8%/month).
pub const MODERATE_RATE: f64 = 0.008;
/// Longest term the simulator will consider, in months.
pub const MAX_TERM_MONTHS: u32 = 720;

/// Income share above which a contribution triggers a feasibility warning.
const FEASIBILITY_WARN_RATIO: f64 = 0.8;
/// Income share used as the alternative budget in warnings.
const SUGGESTED_BUDGET_RATIO: f64 = 0.35;

/// Round a monetary value to 2 decimal places, half away from zero.
///
/// Applied to every monetary value that is persisted or shown to the user.
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Required monthly contribution to reach `target` in `months` at
/// `monthly_rate`, given `initial` already saved.
///
/// The initial amount grows to `initial * (1 + rate)^months`; whatever target
/// remains is solved with the ordinary-annuity payment formula. Returns 0
/// when the initial amount alone already funds the goal.
pub fn pmt_for_goal(target: f64, initial: f64, months: u32, monthly_rate: f64) -> f64 {
    let growth = (1.0 + monthly_rate).powi(months as i32);
    let remaining = target - initial * growth;
    if remaining <= 0.0 {
        return 0.0;
    }
    let factor = (growth - 1.0) / monthly_rate;
    remaining / factor
}

/// Compute the canonical scenario pair for a goal.
pub fn compute_scenarios(target: f64, initial: f64, months: u32) -> Scenarios {
    Scenarios {
        conservative: Scenario {
            rate: CONSERVATIVE_RATE,
            monthly_contribution: round_money(pmt_for_goal(
                target,
                initial,
                months,
                CONSERVATIVE_RATE,
            )),
        },
        moderate: Scenario {
            rate: MODERATE_RATE,
            monthly_contribution: round_money(pmt_for_goal(target, initial, months, MODERATE_RATE)),
        },
    }
}

/// Smallest term (in months, up to [`MAX_TERM_MONTHS`]) whose required
/// contribution fits within `budget`, or `None` if no term does.
///
/// The required contribution is non-increasing in the term for a fixed
/// target, so the first match of the linear scan is also the minimum.
pub fn months_for_budget(target: f64, initial: f64, budget: f64, monthly_rate: f64) -> Option<u32> {
    if budget <= 0.0 {
        return None;
    }
    (1..=MAX_TERM_MONTHS).find(|&m| pmt_for_goal(target, initial, m, monthly_rate) <= budget)
}

/// Warn when a contribution is disproportionate to income.
///
/// Returns `None` when income is unknown (`<= 0`) or the contribution stays
/// under 80% of income. Otherwise the warning reports the income share as a
/// whole percent and proposes a 35%-of-income budget with the shortest term
/// that fits it at the moderate rate; when even a 720-month term cannot fund
/// the goal on that budget, it suggests reducing or splitting the goal.
pub fn feasible_feedback(
    contribution: f64,
    monthly_income: f64,
    target: f64,
    initial: f64,
) -> Option<String> {
    if monthly_income <= 0.0 {
        return None;
    }
    let ratio = contribution / monthly_income;
    if ratio < FEASIBILITY_WARN_RATIO {
        return None;
    }

    let percent = (ratio * 100.0).round() as i64;
    let budget = monthly_income * SUGGESTED_BUDGET_RATIO;
    let suggested = months_for_budget(target, initial, budget, MODERATE_RATE);
    debug!(percent, budget, ?suggested, "contribution over feasibility threshold");

    match suggested {
        Some(months) => Some(format!(
            "Guardar {} por mes consumiria {}% da sua renda. \
             Para manter viabilidade, podemos mirar {}/mes e prazo de {} meses.",
            format_currency(contribution),
            percent,
            format_currency(budget),
            months
        )),
        None => Some(format!(
            "Guardar {} por mes consumiria {}% da sua renda. \
             Mesmo com prazo longo, a meta fica agressiva. \
             Podemos reduzir o valor-alvo ou dividir a meta em fases.",
            format_currency(contribution),
            percent
        )),
    }
}
