//! Prompt templates for the research stages

use crate::research::stage::Stage;

/// Instructions for one stage call: a system prompt plus the user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompt {
    pub system: String,
    pub user: String,
}

impl StagePrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a stage: the role, its expertise and the JSON shape
    /// the response must follow
    pub fn system(stage: Stage) -> String {
        let (expertise, shape, focus) = match stage {
            Stage::MarketResearch => (
                MARKET_EXPERTISE,
                MARKET_SHAPE,
                "Ground the analysis in the location: local food culture, demographics, \
business districts, events and the rules that affect food trucks there.\n\
Financial and operational planning will build on your findings.",
            ),
            Stage::FinancialAdvisor => (
                FINANCIAL_EXPERTISE,
                FINANCIAL_SHAPE,
                "Use realistic figures for the location's cost of living and labor market.\n\
All amounts are plain numbers in U.S. dollars; margins are fractions between 0 and 1.",
            ),
            Stage::OperationsConsultant => (
                OPERATIONS_EXPERTISE,
                OPERATIONS_SHAPE,
                "Focus on the location's health department, parking and zoning rules.\n\
peak_staff must be at least minimum_staff, and minimum_staff at least 1.",
            ),
            Stage::BusinessSynthesis => (
                SYNTHESIS_EXPERTISE,
                SYNTHESIS_SHAPE,
                "Weigh the market, financial and operations findings together.\n\
Be honest about risks while pointing out viable paths to success.",
            ),
        };

        format!(
            "You are a {} specializing in food truck businesses.\n\
Your expertise includes:\n{}\n\n\
IMPORTANT: Respond with a single JSON object with exactly this structure:\n{}\n\n{}",
            stage.display_name(),
            expertise,
            shape,
            focus
        )
    }

    /// User prompt for the analysis stages
    pub fn analysis_prompt(location: &str, context: Option<&str>) -> String {
        let mut prompt = format!(
            "Please analyze the food truck business opportunity in {}.",
            location
        );

        if let Some(context) = context {
            prompt.push_str("\n\nContext from previous analysis:\n");
            prompt.push_str(context);
        }

        prompt.push_str("\n\nProvide a comprehensive analysis based on your expertise.");
        prompt
    }

    /// User prompt for the final recommendation
    pub fn synthesis_prompt(location: &str, context: &str) -> String {
        format!(
            r#"Based on the analysis below, give a strategic recommendation on starting a food truck business in {}.

{}

Consider the complete business picture:
1. Market viability and competitive landscape
2. Financial feasibility and investment requirements
3. Operational complexity and regulatory requirements
4. Risk factors and probability of success
5. Timeline and resource requirements

Give a clear recommendation (go/no_go/conditional) with supporting rationale.
If recommending to proceed, include concrete next steps and success factors."#,
            location, context
        )
    }
}

const MARKET_EXPERTISE: &str = "\
- Competitive landscape analysis
- Customer segmentation and demand assessment
- Market sizing
- Peak hours and seasonal patterns";

const MARKET_SHAPE: &str = r#"{
    "location": "the target location",
    "competition_level": "High | Medium | Low",
    "target_customers": ["customer segments"],
    "peak_hours": ["busiest service windows"],
    "seasonal_factors": ["seasonal considerations"],
    "market_size_estimate": "estimated daily customer potential",
    "competition_analysis": [
        {
            "name": "competitor name",
            "type": "food type or cuisine",
            "location": "where they operate",
            "strengths": "their key strengths",
            "weaknesses": "their weaknesses"
        }
    ],
    "opportunities": ["market opportunities"],
    "challenges": ["market challenges"]
}"#;

const FINANCIAL_EXPERTISE: &str = "\
- Startup cost estimation and budgeting
- Revenue projections and break-even analysis
- Cash flow and working capital planning
- Profit margin and ROI analysis";

const FINANCIAL_SHAPE: &str = r#"{
    "startup_costs": {"food_truck": 75000.0, "equipment": 25000.0, "permits_licenses": 5000.0},
    "monthly_operating_costs": {"food_costs": 8000.0, "fuel": 800.0, "staff": 6000.0},
    "revenue_projections": {"daily_revenue": 800.0, "monthly_revenue": 20000.0, "annual_revenue": 240000.0},
    "break_even_timeline": "estimated months to break even",
    "profit_margins": {"gross_margin": 0.65, "net_margin": 0.15},
    "cash_flow_analysis": "cash flow summary",
    "funding_requirements": 127000.0,
    "roi_projection": "expected return on investment"
}"#;

const OPERATIONS_EXPERTISE: &str = "\
- Permit and licensing requirements
- Health department regulations
- Equipment and staffing requirements
- Location restrictions and logistics";

const OPERATIONS_SHAPE: &str = r#"{
    "permits_required": ["required permits and licenses"],
    "permit_costs": {"business_license": 200.0, "food_service_permit": 500.0},
    "permit_timeline": "time needed to obtain permits",
    "health_regulations": ["key health requirements"],
    "location_constraints": ["operational constraints"],
    "equipment_requirements": ["essential equipment"],
    "staffing_needs": {
        "minimum_staff": 2,
        "peak_staff": 4,
        "roles": ["Manager/Cook", "Cashier"],
        "labor_costs_hourly": {"manager": 20.0, "cashier": 16.0}
    },
    "daily_operations": ["key daily tasks"],
    "logistics_challenges": ["supply chain considerations"]
}"#;

const SYNTHESIS_EXPERTISE: &str = "\
- Strategic business analysis and synthesis
- Risk assessment and mitigation
- Market entry strategy and timing
- Alternative strategy development";

const SYNTHESIS_SHAPE: &str = r#"{
    "recommendation": "go | no_go | conditional",
    "confidence_level": "High | Medium | Low",
    "key_strengths": ["business strengths"],
    "key_risks": ["business risks"],
    "success_factors": ["critical success factors"],
    "next_steps": ["recommended next steps"],
    "timeline_recommendation": "recommended launch timeline",
    "alternative_suggestions": ["alternatives worth considering, if applicable (may be empty)"]
}"#;
