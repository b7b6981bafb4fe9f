//! Report rendering
//!
//! Turns a finished [`ResearchState`] into the text the user reads. Rendering
//! is pure: the same state always yields byte-identical output.

use foodtruck_domain::{
    FinancialAnalysis, MarketAnalysis, OperationsAnalysis, OutputFormat, PipelineStatus,
    Recommendation, ResearchState, format_money,
};

/// Renders research results as Markdown or JSON
pub struct ReportRenderer;

impl ReportRenderer {
    /// Render in the requested format
    pub fn render(state: &ResearchState, format: OutputFormat) -> String {
        match format {
            OutputFormat::Markdown => Self::render_markdown(state),
            OutputFormat::Json => Self::render_json(state),
        }
    }

    /// Markdown report with one section per stage that produced a record.
    ///
    /// A failed run renders as a single failure line.
    pub fn render_markdown(state: &ResearchState) -> String {
        if state.status() == PipelineStatus::Failed
            && let Some(failure) = state.failure()
        {
            return format!(
                "Research failed at {}: {}",
                failure.stage.display_name(),
                failure.reason
            );
        }

        let mut lines = vec![
            format!("# Food Truck Business Research Report: {}", state.location()),
            "=".repeat(60),
            String::new(),
        ];

        if let Some(market) = state.market() {
            Self::market_section(&mut lines, market);
        }
        if let Some(financial) = state.financial() {
            Self::financial_section(&mut lines, financial);
        }
        if let Some(operations) = state.operations() {
            Self::operations_section(&mut lines, operations);
        }
        if let Some(recommendation) = state.recommendation() {
            Self::recommendation_section(&mut lines, recommendation);
        }

        lines.join("\n")
    }

    /// The whole state as pretty-printed JSON
    pub fn render_json(state: &ResearchState) -> String {
        serde_json::to_string_pretty(state).unwrap_or_else(|_| "{}".to_string())
    }

    fn market_section(lines: &mut Vec<String>, market: &MarketAnalysis) {
        lines.extend([
            "## Market Research Analysis".to_string(),
            format!("**Competition Level:** {}", market.competition_level),
            format!(
                "**Target Customers:** {}",
                market.target_customers.join(", ")
            ),
            format!("**Market Size:** {}", market.market_size_estimate),
            format!("**Peak Hours:** {}", market.peak_hours.join(", ")),
            format!(
                "**Key Opportunities:** {}",
                market.opportunities.join(", ")
            ),
            String::new(),
        ]);
    }

    fn financial_section(lines: &mut Vec<String>, financial: &FinancialAnalysis) {
        lines.extend([
            "## Financial Analysis".to_string(),
            format!(
                "**Total Funding Required:** {}",
                format_money(financial.funding_requirements)
            ),
            format!(
                "**Break-even Timeline:** {}",
                financial.break_even_timeline
            ),
            format!("**ROI Projection:** {}", financial.roi_projection),
            String::new(),
        ]);
    }

    fn operations_section(lines: &mut Vec<String>, operations: &OperationsAnalysis) {
        lines.extend([
            "## Operations Requirements".to_string(),
            format!(
                "**Required Permits:** {}",
                operations.permits_required.join(", ")
            ),
            format!("**Permit Timeline:** {}", operations.permit_timeline),
            format!(
                "**Staffing Needs:** {} minimum staff",
                operations.staffing_needs.minimum_staff
            ),
            String::new(),
        ]);
    }

    fn recommendation_section(lines: &mut Vec<String>, recommendation: &Recommendation) {
        lines.extend([
            "## Business Recommendation".to_string(),
            format!(
                "**Recommendation:** {} (Confidence: {})",
                recommendation.recommendation.as_str().to_uppercase(),
                recommendation.confidence_level
            ),
            format!(
                "**Key Strengths:** {}",
                recommendation.key_strengths.join(", ")
            ),
            format!("**Key Risks:** {}", recommendation.key_risks.join(", ")),
            format!(
                "**Timeline:** {}",
                recommendation.timeline_recommendation
            ),
            String::new(),
        ]);

        if !recommendation.next_steps.is_empty() {
            lines.push("**Recommended Next Steps:**".to_string());
            lines.extend(
                recommendation
                    .next_steps
                    .iter()
                    .map(|step| format!("- {}", step)),
            );
            lines.push(String::new());
        }
    }
}
