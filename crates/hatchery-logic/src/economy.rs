//! Pure economy logic: effective income, income gating, prices.

/// All multipliers that apply to one animal's income.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeFactors {
    pub base: f64,
    pub happiness: f64,
    pub habitat: f64,
    pub prestige: f64,
    pub event: f64,
}

impl IncomeFactors {
    /// Base income with every multiplier at 1.
    pub fn neutral(base: f64) -> Self {
        Self {
            base,
            happiness: 1.0,
            habitat: 1.0,
            prestige: 1.0,
            event: 1.0,
        }
    }
}

/// Base income × all active multipliers.
pub fn effective_income(f: &IncomeFactors) -> f64 {
    f.base * f.happiness * f.habitat * f.prestige * f.event
}

/// An animal earns only while healthy, outside an active treatment, and with
/// hunger and cleanliness both above zero.
pub fn earns_income(healthy: bool, in_treatment: bool, hunger: f64, cleanliness: f64) -> bool {
    healthy && !in_treatment && hunger > 0.0 && cleanliness > 0.0
}

/// Contribution of one animal to the step's income total.
pub fn contribution(
    factors: &IncomeFactors,
    healthy: bool,
    in_treatment: bool,
    hunger: f64,
    cleanliness: f64,
) -> f64 {
    if earns_income(healthy, in_treatment, hunger, cleanliness) {
        effective_income(factors)
    } else {
        0.0
    }
}

/// Price of a per-animal service (bath, clinic, feed, clean).
pub fn service_cost(base_income: f64, multiplier: f64) -> f64 {
    base_income * multiplier
}

/// Coins received for selling an animal.
pub fn sale_value(base_income: f64, sale_multiplier: f64) -> f64 {
    base_income * sale_multiplier
}

/// Prestige points for cashing out `balance`; never less than one.
pub fn prestige_points(balance: f64, divisor: f64) -> u64 {
    if divisor <= 0.0 || !balance.is_finite() {
        return 1;
    }
    ((balance / divisor).floor().max(0.0) as u64).max(1)
}
