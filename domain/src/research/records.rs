//! Stage records - the typed outputs each stage hands to the next.
//!
//! These are immutable value objects. A record only exists after it has
//! passed [`Validate::validate`] (service responses) or been produced by a
//! fallback generator that satisfies the same rules.
//!
//! - [`MarketAnalysis`] - competition, customers and demand
//! - [`FinancialAnalysis`] - costs, revenue and funding
//! - [`OperationsAnalysis`] - permits, staffing and logistics
//! - [`Recommendation`] - the final go / no-go / conditional call

use crate::research::stage::Stage;
use crate::research::validation::{
    Validate, ValidationFailure, check_entries, require_amount, require_amounts, require_list,
    require_text,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Named monetary amounts (costs, projections, margins)
pub type Amounts = BTreeMap<String, f64>;

/// A coarse High / Medium / Low assessment
///
/// Parsed case-insensitively, always displayed capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "High",
            Level::Medium => "Medium",
            Level::Low => "Low",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Level::High),
            "medium" => Ok(Level::Medium),
            "low" => Ok(Level::Low),
            other => Err(format!("expected High, Medium or Low, got '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The overall business call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Go,
    NoGo,
    Conditional,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::Go => "go",
            RecommendationKind::NoGo => "no_go",
            RecommendationKind::Conditional => "conditional",
        }
    }
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RecommendationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "go" => Ok(RecommendationKind::Go),
            "no_go" => Ok(RecommendationKind::NoGo),
            "conditional" => Ok(RecommendationKind::Conditional),
            other => Err(format!("expected go, no_go or conditional, got '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for RecommendationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A competitor identified during market research
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub name: String,
    /// Food type or cuisine
    #[serde(rename = "type")]
    pub cuisine: String,
    pub location: String,
    pub strengths: String,
    pub weaknesses: String,
}

/// Output of the Market Research stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub location: String,
    pub competition_level: Level,
    pub target_customers: Vec<String>,
    pub peak_hours: Vec<String>,
    pub seasonal_factors: Vec<String>,
    /// e.g. "500-1000 daily customers"
    pub market_size_estimate: String,
    pub competition_analysis: Vec<CompetitorProfile>,
    pub opportunities: Vec<String>,
    pub challenges: Vec<String>,
}

impl Validate for MarketAnalysis {
    const RECORD: &'static str = "market_analysis";

    fn validate(&self) -> Result<(), ValidationFailure> {
        let r = Self::RECORD;
        require_text(r, "location", &self.location)?;
        require_list(r, "target_customers", &self.target_customers)?;
        require_list(r, "peak_hours", &self.peak_hours)?;
        check_entries(r, "seasonal_factors", &self.seasonal_factors)?;
        require_text(r, "market_size_estimate", &self.market_size_estimate)?;
        // An empty competitor list means the area has none yet.
        for competitor in &self.competition_analysis {
            require_text(r, "competition_analysis.name", &competitor.name)?;
            require_text(r, "competition_analysis.type", &competitor.cuisine)?;
        }
        require_list(r, "opportunities", &self.opportunities)?;
        require_list(r, "challenges", &self.challenges)?;
        Ok(())
    }
}

/// Output of the Financial Advisor stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub startup_costs: Amounts,
    pub monthly_operating_costs: Amounts,
    /// daily / monthly / annual revenue
    pub revenue_projections: Amounts,
    pub break_even_timeline: String,
    /// Fractions, e.g. `gross_margin = 0.65`
    pub profit_margins: Amounts,
    pub cash_flow_analysis: String,
    /// Total funding needed to start
    pub funding_requirements: f64,
    pub roi_projection: String,
}

impl FinancialAnalysis {
    pub fn startup_total(&self) -> f64 {
        self.startup_costs.values().sum()
    }

    pub fn monthly_total(&self) -> f64 {
        self.monthly_operating_costs.values().sum()
    }

    pub fn monthly_revenue(&self) -> f64 {
        self.revenue_projections
            .get("monthly_revenue")
            .copied()
            .unwrap_or(0.0)
    }
}

impl Validate for FinancialAnalysis {
    const RECORD: &'static str = "financial_analysis";

    fn validate(&self) -> Result<(), ValidationFailure> {
        let r = Self::RECORD;
        require_amounts(r, "startup_costs", &self.startup_costs)?;
        require_amounts(r, "monthly_operating_costs", &self.monthly_operating_costs)?;
        require_amounts(r, "revenue_projections", &self.revenue_projections)?;
        require_text(r, "break_even_timeline", &self.break_even_timeline)?;
        require_amounts(r, "profit_margins", &self.profit_margins)?;
        require_text(r, "cash_flow_analysis", &self.cash_flow_analysis)?;
        require_amount(r, "funding_requirements", self.funding_requirements)?;
        require_text(r, "roi_projection", &self.roi_projection)?;
        Ok(())
    }
}

/// Staffing requirements from the Operations Consultant stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingNeeds {
    pub minimum_staff: u32,
    pub peak_staff: u32,
    pub roles: Vec<String>,
    pub labor_costs_hourly: Amounts,
}

impl std::fmt::Display for StaffingNeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{} staff ({})",
            self.minimum_staff,
            self.peak_staff,
            self.roles.join(", ")
        )
    }
}

/// Output of the Operations Consultant stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationsAnalysis {
    pub permits_required: Vec<String>,
    pub permit_costs: Amounts,
    pub permit_timeline: String,
    pub health_regulations: Vec<String>,
    pub location_constraints: Vec<String>,
    pub equipment_requirements: Vec<String>,
    pub staffing_needs: StaffingNeeds,
    pub daily_operations: Vec<String>,
    pub logistics_challenges: Vec<String>,
}

impl Validate for OperationsAnalysis {
    const RECORD: &'static str = "operations_analysis";

    fn validate(&self) -> Result<(), ValidationFailure> {
        let r = Self::RECORD;
        require_list(r, "permits_required", &self.permits_required)?;
        require_amounts(r, "permit_costs", &self.permit_costs)?;
        require_text(r, "permit_timeline", &self.permit_timeline)?;
        require_list(r, "health_regulations", &self.health_regulations)?;
        check_entries(r, "location_constraints", &self.location_constraints)?;
        require_list(r, "equipment_requirements", &self.equipment_requirements)?;

        let staffing = &self.staffing_needs;
        if staffing.minimum_staff == 0 {
            return Err(ValidationFailure::invalid_field(
                r,
                "staffing_needs.minimum_staff",
                "must be at least 1",
            ));
        }
        if staffing.peak_staff < staffing.minimum_staff {
            return Err(ValidationFailure::invalid_field(
                r,
                "staffing_needs.peak_staff",
                "must not be lower than minimum_staff",
            ));
        }
        require_list(r, "staffing_needs.roles", &staffing.roles)?;
        require_amounts(r, "staffing_needs.labor_costs_hourly", &staffing.labor_costs_hourly)?;

        require_list(r, "daily_operations", &self.daily_operations)?;
        check_entries(r, "logistics_challenges", &self.logistics_challenges)?;
        Ok(())
    }
}

/// Output of the Business Synthesis stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: RecommendationKind,
    pub confidence_level: Level,
    pub key_strengths: Vec<String>,
    pub key_risks: Vec<String>,
    pub success_factors: Vec<String>,
    pub next_steps: Vec<String>,
    pub timeline_recommendation: String,
    /// Only when applicable; may be empty
    pub alternative_suggestions: Vec<String>,
}

impl Validate for Recommendation {
    const RECORD: &'static str = "recommendation";

    fn validate(&self) -> Result<(), ValidationFailure> {
        let r = Self::RECORD;
        require_list(r, "key_strengths", &self.key_strengths)?;
        require_list(r, "key_risks", &self.key_risks)?;
        require_list(r, "success_factors", &self.success_factors)?;
        require_list(r, "next_steps", &self.next_steps)?;
        require_text(r, "timeline_recommendation", &self.timeline_recommendation)?;
        check_entries(r, "alternative_suggestions", &self.alternative_suggestions)?;
        Ok(())
    }
}

/// The record produced by one stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StageRecord {
    Market(MarketAnalysis),
    Financial(FinancialAnalysis),
    Operations(OperationsAnalysis),
    Recommendation(Recommendation),
}

impl StageRecord {
    /// The stage this record belongs to
    pub fn stage(&self) -> Stage {
        match self {
            StageRecord::Market(_) => Stage::MarketResearch,
            StageRecord::Financial(_) => Stage::FinancialAdvisor,
            StageRecord::Operations(_) => Stage::OperationsConsultant,
            StageRecord::Recommendation(_) => Stage::BusinessSynthesis,
        }
    }

    /// Re-check the record against its schema
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        match self {
            StageRecord::Market(r) => r.validate(),
            StageRecord::Financial(r) => r.validate(),
            StageRecord::Operations(r) => r.validate(),
            StageRecord::Recommendation(r) => r.validate(),
        }
    }

    /// The record as the JSON object a service response would carry
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
