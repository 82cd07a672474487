//! Fixed copy and sample data shown on the pages.

use crate::models::InsurancePlan;

pub const PAGE_TITLE: &str = "Health Insurance Premium Predictor";
pub const PAGE_SUBTITLE: &str =
    "Estimate your health insurance premium based on personal and health factors";
pub const FOOTER: &str = "© 2025 Health Insurance Premium Predictor";

pub const AGE_HELP: &str = "Your current age (between 18-100 years)";
pub const DEPENDANTS_HELP: &str = "Number of people financially dependent on you";
pub const INCOME_HELP: &str = "Your annual income in lakhs (₹100,000s)";
pub const GENETICAL_RISK_HELP: &str = "Genetic risk factor score from 0 (low) to 5 (high)";

/// Presentation of one plan tier on the calculator
pub struct PlanCard {
    pub plan: InsurancePlan,
    pub help: &'static str,
    pub lines: [&'static str; 3],
    pub color: &'static str,
    pub border: &'static str,
}

pub const PLAN_CARDS: [PlanCard; 3] = [
    PlanCard {
        plan: InsurancePlan::Bronze,
        help: "Basic coverage with lower premiums",
        lines: ["Basic coverage", "Lower premium", "Higher out-of-pocket costs"],
        color: "#CD7F32",
        border: "#CD7F32",
    },
    PlanCard {
        plan: InsurancePlan::Silver,
        help: "Balanced coverage and costs",
        lines: ["Moderate coverage", "Balanced premium", "Moderate out-of-pocket costs"],
        color: "#808080",
        border: "#C0C0C0",
    },
    PlanCard {
        plan: InsurancePlan::Gold,
        help: "Comprehensive coverage with higher premiums",
        lines: ["Comprehensive coverage", "Higher premium", "Lower out-of-pocket costs"],
        color: "#DAA520",
        border: "#FFD700",
    },
];

/// (factor, explanation) pairs for the "How It Works" list
pub const HOW_IT_WORKS: [(&str, &str); 5] = [
    (
        "Age",
        "Older individuals typically have higher premiums due to increased health risks",
    ),
    (
        "BMI Category",
        "Weight relative to height affects health risks and premiums",
    ),
    (
        "Smoking Status",
        "Smokers face significantly higher premiums due to associated health risks",
    ),
    (
        "Medical History",
        "Pre-existing conditions impact premium calculations",
    ),
    (
        "Insurance Plan",
        "Higher tier plans (Gold, Silver) provide better coverage but cost more",
    ),
];

pub const ABOUT_INTRO: &str = "This health insurance premium calculator uses machine learning to estimate your annual premium based on various personal and health factors.";
pub const DATA_PRIVACY: &str =
    "All information entered is processed locally and is not stored or shared with third parties.";
pub const ABOUT_DISCLAIMER: &str = "This calculator provides estimates only. Actual premiums will vary based on insurance provider policies, additional health assessments, and other factors not captured in this model.";

/// Illustrative premium trend, not model output
pub const TREND_AGES: [u32; 6] = [20, 30, 40, 50, 60, 70];
pub const TREND_NON_SMOKER: [u32; 6] = [5000, 8000, 12000, 18000, 25000, 35000];
pub const TREND_SMOKER: [u32; 6] = [8000, 13000, 20000, 30000, 42000, 55000];
