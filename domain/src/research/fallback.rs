//! Fallback records.
//!
//! When a service response fails validation the stage substitutes one of
//! these. They are deterministic, conservative estimates for a typical U.S.
//! city and satisfy the same schema rules as a validated response.

use crate::core::location::Location;
use crate::research::records::{
    Amounts, CompetitorProfile, FinancialAnalysis, Level, MarketAnalysis, OperationsAnalysis,
    Recommendation, RecommendationKind, StaffingNeeds,
};
use crate::research::state::ResearchState;

/// Funding above this makes the fallback recommendation a firm no-go
pub const NO_GO_FUNDING_THRESHOLD: f64 = 150_000.0;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn amounts(items: &[(&str, f64)]) -> Amounts {
    items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub fn market_analysis(location: &Location) -> MarketAnalysis {
    MarketAnalysis {
        location: location.as_str().to_string(),
        competition_level: Level::Medium,
        target_customers: strings(&["Office workers", "Students", "Families"]),
        peak_hours: strings(&["11:30 AM - 1:30 PM", "5:30 PM - 7:30 PM"]),
        seasonal_factors: strings(&["Weather dependent", "Event-driven demand"]),
        market_size_estimate: "300-500 daily customers".to_string(),
        competition_analysis: vec![CompetitorProfile {
            name: "Local food trucks".to_string(),
            cuisine: "Various cuisines".to_string(),
            location: "Downtown area".to_string(),
            strengths: "Established customer base".to_string(),
            weaknesses: "Limited variety".to_string(),
        }],
        opportunities: strings(&[
            "High foot traffic areas",
            "Event catering",
            "Corporate partnerships",
        ]),
        challenges: strings(&[
            "Permit requirements",
            "Seasonal weather",
            "Competition from restaurants",
        ]),
    }
}

pub fn financial_analysis() -> FinancialAnalysis {
    FinancialAnalysis {
        startup_costs: amounts(&[
            ("food_truck", 75000.0),
            ("equipment", 25000.0),
            ("permits_licenses", 5000.0),
            ("initial_inventory", 3000.0),
            ("marketing", 2000.0),
            ("working_capital", 10000.0),
            ("insurance", 4000.0),
            ("other", 3000.0),
        ]),
        monthly_operating_costs: amounts(&[
            ("food_costs", 8000.0),
            ("fuel", 800.0),
            ("insurance", 400.0),
            ("permits", 200.0),
            ("maintenance", 500.0),
            ("marketing", 300.0),
            ("staff", 6000.0),
            ("other", 800.0),
        ]),
        revenue_projections: amounts(&[
            ("daily_revenue", 800.0),
            ("monthly_revenue", 20000.0),
            ("annual_revenue", 240000.0),
        ]),
        break_even_timeline: "12-18 months".to_string(),
        profit_margins: amounts(&[("gross_margin", 0.65), ("net_margin", 0.15)]),
        cash_flow_analysis: "Seasonal variations expected, maintain 3-month cash reserve"
            .to_string(),
        funding_requirements: 127000.0,
        roi_projection: "15-20% ROI expected within 2-3 years".to_string(),
    }
}

pub fn operations_analysis() -> OperationsAnalysis {
    OperationsAnalysis {
        permits_required: strings(&[
            "Business License",
            "Food Service Permit",
            "Mobile Vendor Permit",
            "Fire Department Permit",
            "Zoning Permit",
        ]),
        permit_costs: amounts(&[
            ("business_license", 200.0),
            ("food_service_permit", 500.0),
            ("mobile_vendor_permit", 1000.0),
            ("fire_permit", 150.0),
            ("other_permits", 300.0),
        ]),
        permit_timeline: "4-8 weeks to obtain all permits".to_string(),
        health_regulations: strings(&[
            "Food handler certifications required",
            "Regular health inspections",
            "Temperature monitoring logs",
            "Hand washing stations",
            "Proper food storage protocols",
        ]),
        location_constraints: strings(&[
            "Distance restrictions from restaurants",
            "Designated parking zones only",
            "Time limits on parking",
            "Noise ordinance compliance",
            "Special event permits needed",
        ]),
        equipment_requirements: strings(&[
            "Commercial-grade cooking equipment",
            "Refrigeration units",
            "Generator or electrical hookup",
            "Fire suppression system",
            "Hand washing station",
            "Point of sale system",
            "Storage and prep areas",
        ]),
        staffing_needs: StaffingNeeds {
            minimum_staff: 2,
            peak_staff: 4,
            roles: strings(&["Manager/Cook", "Cashier", "Prep Cook", "Driver"]),
            labor_costs_hourly: amounts(&[
                ("manager", 20.0),
                ("cook", 18.0),
                ("cashier", 16.0),
                ("prep", 15.0),
            ]),
        },
        daily_operations: strings(&[
            "Pre-service equipment checks",
            "Food prep and inventory",
            "Location setup and permits",
            "Service operations",
            "End-of-day cleaning and storage",
            "Daily sales reporting",
        ]),
        logistics_challenges: strings(&[
            "Fresh ingredient sourcing",
            "Propane and fuel management",
            "Waste disposal logistics",
            "Equipment maintenance scheduling",
            "Seasonal storage considerations",
        ]),
    }
}

/// Fallback recommendation, decided from whatever earlier stages produced.
///
/// Funding above [`NO_GO_FUNDING_THRESHOLD`] wins over a low-competition
/// market.
pub fn recommendation(state: &ResearchState) -> Recommendation {
    let (recommendation, confidence_level) = match (state.financial(), state.market()) {
        (Some(financial), _) if financial.funding_requirements > NO_GO_FUNDING_THRESHOLD => {
            (RecommendationKind::NoGo, Level::High)
        }
        (_, Some(market)) if market.competition_level == Level::Low => {
            (RecommendationKind::Go, Level::High)
        }
        _ => (RecommendationKind::Conditional, Level::Medium),
    };

    Recommendation {
        recommendation,
        confidence_level,
        key_strengths: strings(&[
            "Market opportunity identified",
            "Clear target customer segments",
            "Manageable operational requirements",
        ]),
        key_risks: strings(&[
            "High initial investment",
            "Regulatory complexity",
            "Weather and seasonal dependencies",
        ]),
        success_factors: strings(&[
            "Unique food offering",
            "Prime location strategy",
            "Strong operational execution",
            "Effective marketing",
        ]),
        next_steps: strings(&[
            "Conduct detailed location scouting",
            "Secure financing commitments",
            "Begin permit application process",
            "Develop detailed business plan",
        ]),
        timeline_recommendation: "6-12 months from decision to launch".to_string(),
        alternative_suggestions: strings(&[
            "Consider food cart instead of truck",
            "Partner with existing business",
            "Start with catering focus",
        ]),
    }
}
