// src/domain/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Balance-sheet and market inputs for the cost of capital.
///
/// All monetary fields share one currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructure {
    pub market_cap: f64,
    pub debt: f64,
    pub cash: f64,
    pub beta: f64,
    pub risk_free_rate: f64,
    pub market_return: f64,
    pub tax_rate: f64,
    /// Configured pre-tax cost of debt; zero for debt-free companies
    pub cost_of_debt: f64,
}

impl CapitalStructure {
    /// Debt minus cash; negative for a net-cash position
    pub fn net_debt(&self) -> f64 {
        self.debt - self.cash
    }

    /// Market cap plus net debt
    pub fn total_value(&self) -> f64 {
        self.market_cap + self.debt - self.cash
    }

    /// CAPM cost of equity
    pub fn cost_of_equity(&self) -> f64 {
        self.risk_free_rate + self.beta * (self.market_return - self.risk_free_rate)
    }
}

/// FCF margin assumption for revenue-driven projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarginSchedule {
    /// One margin applied to every projected year
    Constant(f64),
    /// One margin per projected year
    PerYear(Vec<f64>),
}

/// Linear margin glide from `initial_margin` to `target_margin`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarginPath {
    pub initial_margin: f64,
    pub target_margin: f64,
    pub years_to_target: usize,
}

/// A business line projected independently and summed into the consolidated FCF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    pub name: String,
    pub initial_revenue: f64,
    pub growth_rates: Vec<f64>,
    pub margins: MarginSchedule,
}

/// How a scenario's free cash flows are projected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case", deny_unknown_fields)]
pub enum ProjectionAssumptions {
    /// FCF compounds directly by the growth table
    DirectGrowth {
        initial_fcf: f64,
        growth_rates: Vec<f64>,
    },
    /// Revenue compounds by the growth table; FCF is revenue times margin
    RevenueMargin {
        initial_revenue: f64,
        growth_rates: Vec<f64>,
        margins: MarginSchedule,
    },
    /// Revenue times a margin gliding toward a target, with reported actuals first
    MarginExpansion {
        initial_revenue: f64,
        growth_rates: Vec<f64>,
        #[serde(default)]
        known_fcf: Vec<f64>,
        margin_path: MarginPath,
    },
    /// Elementwise sum of independently projected segments
    MultiSegment { segments: Vec<Segment> },
    /// One growth rate for every year, first year already grown
    ConstantGrowth {
        initial_fcf: f64,
        growth_rate: f64,
        years: usize,
    },
}

impl ProjectionAssumptions {
    /// Short label used in logs
    pub fn strategy_name(&self) -> &'static str {
        match self {
            ProjectionAssumptions::DirectGrowth { .. } => "direct_growth",
            ProjectionAssumptions::RevenueMargin { .. } => "revenue_margin",
            ProjectionAssumptions::MarginExpansion { .. } => "margin_expansion",
            ProjectionAssumptions::MultiSegment { .. } => "multi_segment",
            ProjectionAssumptions::ConstantGrowth { .. } => "constant_growth",
        }
    }
}

/// Annual share-count change program
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ShareChange {
    #[default]
    None,
    Buyback { rate: f64 },
    Dilution { rate: f64 },
}

impl ShareChange {
    /// Per-period growth of the share count (negative for repurchases)
    pub fn signed_rate(&self) -> f64 {
        match self {
            ShareChange::None => 0.0,
            ShareChange::Buyback { rate } => -rate,
            ShareChange::Dilution { rate } => *rate,
        }
    }
}

/// Share count evolution inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShareCountPath {
    pub initial_shares: f64,
    pub change: ShareChange,
    pub horizon: usize,
}

/// Projected free cash flows, one per forecast year.
///
/// Only the projector builds these, so a value always has at least one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FcfProjection(Vec<f64>);

impl FcfProjection {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn horizon(&self) -> usize {
        self.0.len()
    }

    /// Final forecast year
    pub fn last(&self) -> f64 {
        self.0.last().copied().unwrap_or_default()
    }

    /// Tail of the projection starting at `year`
    pub fn suffix(&self, year: usize) -> &[f64] {
        &self.0[year.min(self.0.len())..]
    }
}

/// Output of the discounting engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DcfResult {
    pub enterprise_value: f64,
    /// Present value of the terminal value
    pub terminal_value_component: f64,
    pub pv_of_explicit_flows: f64,
}

/// Scenario tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScenarioName {
    Pessimistic,
    Base,
    Optimistic,
    Custom(String),
}

impl From<String> for ScenarioName {
    fn from(value: String) -> Self {
        let normalized = value.trim().to_lowercase();
        let normalized = normalized.trim_end_matches(" case");
        match normalized {
            "pessimistic" => ScenarioName::Pessimistic,
            "base" => ScenarioName::Base,
            "optimistic" => ScenarioName::Optimistic,
            _ => ScenarioName::Custom(value),
        }
    }
}

impl From<&str> for ScenarioName {
    fn from(value: &str) -> Self {
        ScenarioName::from(value.to_string())
    }
}

impl From<ScenarioName> for String {
    fn from(value: ScenarioName) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScenarioName::Pessimistic => write!(f, "Pessimistic Case"),
            ScenarioName::Base => write!(f, "Base Case"),
            ScenarioName::Optimistic => write!(f, "Optimistic Case"),
            ScenarioName::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// One named scenario: projection assumptions plus terminal growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioSpec {
    pub name: ScenarioName,
    pub terminal_growth: f64,
    pub projection: ProjectionAssumptions,
}

/// Company-level inputs shared by every scenario of one valuation run
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationContext {
    pub capital: CapitalStructure,
    pub discount_rate: f64,
    /// Absolute share count at the start of the projection
    pub initial_shares: f64,
    pub share_change: ShareChange,
}

/// Valuation bundle for one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub name: ScenarioName,
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub dcf: DcfResult,
    pub fcf_projection: FcfProjection,
    pub share_counts: Vec<f64>,
    /// Implied price per share valuing the business from each forecast year onward
    pub share_prices: Vec<f64>,
    pub final_price_per_share: f64,
    pub price_to_fcf: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capital() -> CapitalStructure {
        CapitalStructure {
            market_cap: 100.0,
            debt: 10.0,
            cash: 25.0,
            beta: 1.2,
            risk_free_rate: 0.04,
            market_return: 0.09,
            tax_rate: 0.21,
            cost_of_debt: 0.05,
        }
    }

    #[test]
    fn net_debt_is_negative_for_net_cash() {
        let capital = capital();
        assert_eq!(capital.net_debt(), -15.0);
        assert_eq!(capital.total_value(), 85.0);
    }

    #[test]
    fn signed_rate_flips_for_buybacks() {
        assert_eq!(ShareChange::Buyback { rate: 0.02 }.signed_rate(), -0.02);
        assert_eq!(ShareChange::Dilution { rate: 0.03 }.signed_rate(), 0.03);
        assert_eq!(ShareChange::None.signed_rate(), 0.0);
    }

    #[test]
    fn scenario_names_parse_case_insensitively() {
        assert_eq!(ScenarioName::from("Base Case"), ScenarioName::Base);
        assert_eq!(ScenarioName::from("pessimistic"), ScenarioName::Pessimistic);
        assert_eq!(ScenarioName::from("OPTIMISTIC"), ScenarioName::Optimistic);
        assert_eq!(
            ScenarioName::from("Bear market"),
            ScenarioName::Custom("Bear market".to_string())
        );
    }

    #[test]
    fn projection_strategies_deserialize_by_tag() {
        let json = r#"{
            "strategy": "revenue_margin",
            "initial_revenue": 156.0,
            "growth_rates": [0.09, 0.14],
            "margins": 0.3
        }"#;
        let projection: ProjectionAssumptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            projection,
            ProjectionAssumptions::RevenueMargin {
                initial_revenue: 156.0,
                growth_rates: vec![0.09, 0.14],
                margins: MarginSchedule::Constant(0.3),
            }
        );

        let json = r#"{"kind": "buyback", "rate": 0.02}"#;
        let change: ShareChange = serde_json::from_str(json).unwrap();
        assert_eq!(change, ShareChange::Buyback { rate: 0.02 });
    }

    #[test]
    fn suffix_is_clamped_to_projection() {
        let projection = FcfProjection::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(projection.suffix(1), &[2.0, 3.0]);
        assert!(projection.suffix(5).is_empty());
        assert_eq!(projection.last(), 3.0);
    }
}
