//! Context formatting
//!
//! Later stages see what earlier stages found through a plain-text summary
//! built from the state. Only records that are present appear, always in
//! stage order, and identical states always produce identical text.

use crate::research::state::ResearchState;

/// Format an amount as dollars with thousands separators, e.g. `$127,000.00`
pub fn format_money(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i128;
    let negative = cents < 0;
    let cents = cents.abs();
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        fraction
    )
}

fn first_three(items: &[String]) -> String {
    items.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
}

/// Summary of prior records for the analysis stages.
///
/// Returns an empty string when no record exists yet.
pub fn format_context(state: &ResearchState) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(market) = state.market() {
        sections.push(format!(
            "MARKET RESEARCH FINDINGS:\n\
             - Competition Level: {}\n\
             - Target Customers: {}\n\
             - Market Size: {}",
            market.competition_level,
            market.target_customers.join(", "),
            market.market_size_estimate
        ));
    }

    if let Some(financial) = state.financial() {
        sections.push(format!(
            "FINANCIAL ANALYSIS:\n\
             - Funding Required: {}\n\
             - Break-even Timeline: {}",
            format_money(financial.funding_requirements),
            financial.break_even_timeline
        ));
    }

    if let Some(operations) = state.operations() {
        sections.push(format!(
            "OPERATIONS ANALYSIS:\n\
             - Permits Required: {}\n\
             - Permit Timeline: {}",
            operations.permits_required.join(", "),
            operations.permit_timeline
        ));
    }

    sections.join("\n\n")
}

/// Everything the synthesis stage needs to weigh, from every prior record.
pub fn comprehensive_context(state: &ResearchState) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(market) = state.market() {
        sections.push(
            [
                "=== MARKET RESEARCH ANALYSIS ===".to_string(),
                format!("Competition Level: {}", market.competition_level),
                format!("Target Customers: {}", market.target_customers.join(", ")),
                format!("Market Size Estimate: {}", market.market_size_estimate),
                format!("Peak Hours: {}", market.peak_hours.join(", ")),
                format!("Key Opportunities: {}", market.opportunities.join(", ")),
                format!("Key Challenges: {}", market.challenges.join(", ")),
                format!("Seasonal Factors: {}", market.seasonal_factors.join(", ")),
            ]
            .join("\n"),
        );
    }

    if let Some(financial) = state.financial() {
        sections.push(
            [
                "=== FINANCIAL ANALYSIS ===".to_string(),
                format!(
                    "Total Funding Required: {}",
                    format_money(financial.funding_requirements)
                ),
                format!("Break-even Timeline: {}", financial.break_even_timeline),
                format!(
                    "Monthly Revenue Projection: {}",
                    format_money(financial.monthly_revenue())
                ),
                format!("ROI Projection: {}", financial.roi_projection),
                format!("Cash Flow Analysis: {}", financial.cash_flow_analysis),
                format!(
                    "Total Startup Costs: {}",
                    format_money(financial.startup_total())
                ),
                format!(
                    "Monthly Operating Costs: {}",
                    format_money(financial.monthly_total())
                ),
            ]
            .join("\n"),
        );
    }

    if let Some(operations) = state.operations() {
        sections.push(
            [
                "=== OPERATIONS ANALYSIS ===".to_string(),
                format!(
                    "Permits Required: {}",
                    operations.permits_required.join(", ")
                ),
                format!("Permit Timeline: {}", operations.permit_timeline),
                format!(
                    "Key Health Regulations: {}",
                    first_three(&operations.health_regulations)
                ),
                format!(
                    "Location Constraints: {}",
                    first_three(&operations.location_constraints)
                ),
                format!("Staffing Requirements: {}", operations.staffing_needs),
                format!(
                    "Major Logistics Challenges: {}",
                    first_three(&operations.logistics_challenges)
                ),
            ]
            .join("\n"),
        );
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::Location;
    use crate::research::stage::Stage;

    fn state_after(stages: usize) -> ResearchState {
        let mut state = ResearchState::new(Location::try_new("Austin, TX").unwrap());
        for stage in &Stage::ALL[..stages] {
            let record = stage.fallback(&state);
            state.record(record).unwrap();
        }
        state
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(127000.0), "$127,000.00");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.999), "$1,000.00");
        assert_eq!(format_money(1234567.5), "$1,234,567.50");
        assert_eq!(format_money(12.3), "$12.30");
    }

    #[test]
    fn test_empty_state_has_no_context() {
        let state = state_after(0);
        assert_eq!(format_context(&state), "");
        assert_eq!(comprehensive_context(&state), "");
    }

    #[test]
    fn test_market_only() {
        let context = format_context(&state_after(1));
        assert!(context.starts_with("MARKET RESEARCH FINDINGS:"));
        assert!(context.contains("- Competition Level: Medium"));
        assert!(context.contains("- Market Size: 300-500 daily customers"));
        assert!(!context.contains("FINANCIAL ANALYSIS"));
        assert!(!context.contains("OPERATIONS ANALYSIS"));
    }

    #[test]
    fn test_sections_in_stage_order() {
        let context = format_context(&state_after(3));
        let market = context.find("MARKET RESEARCH FINDINGS").unwrap();
        let financial = context.find("FINANCIAL ANALYSIS").unwrap();
        let operations = context.find("OPERATIONS ANALYSIS").unwrap();
        assert!(market < financial && financial < operations);
        assert!(context.contains("- Funding Required: $127,000.00"));
        assert!(context.contains("- Permit Timeline: 4-8 weeks to obtain all permits"));
    }

    #[test]
    fn test_comprehensive_context_totals() {
        let context = comprehensive_context(&state_after(3));
        assert!(context.contains("Total Startup Costs: $127,000.00"));
        assert!(context.contains("Monthly Operating Costs: $17,000.00"));
        assert!(context.contains("Monthly Revenue Projection: $20,000.00"));
        assert!(context.contains("Staffing Requirements: 2-4 staff"));
        assert!(context.contains(
            "Key Health Regulations: Food handler certifications required, \
             Regular health inspections, Temperature monitoring logs"
        ));
    }

    #[test]
    fn test_context_is_deterministic() {
        let state = state_after(3);
        assert_eq!(format_context(&state), format_context(&state));
        assert_eq!(comprehensive_context(&state), comprehensive_context(&state));
    }
}
