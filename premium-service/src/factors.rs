//! Qualitative "how much does this push your premium" buckets for the result chart.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{
    BmiCategory, InsurancePlan, MedicalHistory, PremiumRecord, SmokingStatus, field_keys,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub const ALL: [ImpactLevel; 3] = [ImpactLevel::Low, ImpactLevel::Medium, ImpactLevel::High];

    /// Bar length on the factor chart
    pub fn score(self) -> u8 {
        match self {
            ImpactLevel::Low => 1,
            ImpactLevel::Medium => 2,
            ImpactLevel::High => 3,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ImpactLevel::Low => "#4CAF50",
            ImpactLevel::Medium => "#FFC107",
            ImpactLevel::High => "#F44336",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImpactLevel::Low => "Low",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::High => "High",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Record fields that get an impact bucket, in chart order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    #[serde(rename = "Age")]
    Age,
    #[serde(rename = "BMI Category")]
    BmiCategory,
    #[serde(rename = "Smoking Status")]
    SmokingStatus,
    #[serde(rename = "Medical History")]
    MedicalHistory,
    #[serde(rename = "Insurance Plan")]
    InsurancePlan,
}

impl Factor {
    pub fn label(self) -> &'static str {
        match self {
            Factor::Age => field_keys::AGE,
            Factor::BmiCategory => field_keys::BMI_CATEGORY,
            Factor::SmokingStatus => field_keys::SMOKING_STATUS,
            Factor::MedicalHistory => field_keys::MEDICAL_HISTORY,
            Factor::InsurancePlan => field_keys::INSURANCE_PLAN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorImpact {
    pub factor: Factor,
    pub impact: ImpactLevel,
}

pub fn age_impact(age: u32) -> ImpactLevel {
    if age > 50 {
        ImpactLevel::High
    } else if age > 30 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

pub fn bmi_impact(bmi: BmiCategory) -> ImpactLevel {
    match bmi {
        BmiCategory::Obesity | BmiCategory::Underweight => ImpactLevel::High,
        BmiCategory::Overweight => ImpactLevel::Medium,
        BmiCategory::Normal => ImpactLevel::Low,
    }
}

pub fn smoking_impact(smoking: SmokingStatus) -> ImpactLevel {
    match smoking {
        SmokingStatus::Regular => ImpactLevel::High,
        SmokingStatus::Occasional => ImpactLevel::Medium,
        SmokingStatus::NoSmoking => ImpactLevel::Low,
    }
}

/// Any recorded condition counts as high; there is no medium bucket.
pub fn medical_history_impact(history: MedicalHistory) -> ImpactLevel {
    if history == MedicalHistory::NoDisease {
        ImpactLevel::Low
    } else {
        ImpactLevel::High
    }
}

pub fn plan_impact(plan: InsurancePlan) -> ImpactLevel {
    match plan {
        InsurancePlan::Gold => ImpactLevel::High,
        InsurancePlan::Silver => ImpactLevel::Medium,
        InsurancePlan::Bronze => ImpactLevel::Low,
    }
}

pub fn classify_factors(record: &PremiumRecord) -> Vec<FactorImpact> {
    vec![
        FactorImpact {
            factor: Factor::Age,
            impact: age_impact(record.age),
        },
        FactorImpact {
            factor: Factor::BmiCategory,
            impact: bmi_impact(record.bmi_category),
        },
        FactorImpact {
            factor: Factor::SmokingStatus,
            impact: smoking_impact(record.smoking_status),
        },
        FactorImpact {
            factor: Factor::MedicalHistory,
            impact: medical_history_impact(record.medical_history),
        },
        FactorImpact {
            factor: Factor::InsurancePlan,
            impact: plan_impact(record.insurance_plan),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Categorical;

    #[test]
    fn age_thresholds() {
        assert_eq!(age_impact(18), ImpactLevel::Low);
        assert_eq!(age_impact(30), ImpactLevel::Low);
        assert_eq!(age_impact(31), ImpactLevel::Medium);
        assert_eq!(age_impact(50), ImpactLevel::Medium);
        assert_eq!(age_impact(51), ImpactLevel::High);
        assert_eq!(age_impact(100), ImpactLevel::High);
    }

    #[test]
    fn bmi_extremes_are_high() {
        assert_eq!(bmi_impact(BmiCategory::Obesity), ImpactLevel::High);
        assert_eq!(bmi_impact(BmiCategory::Underweight), ImpactLevel::High);
        assert_eq!(bmi_impact(BmiCategory::Overweight), ImpactLevel::Medium);
        assert_eq!(bmi_impact(BmiCategory::Normal), ImpactLevel::Low);
    }

    #[test]
    fn smoking_and_plan_tiers() {
        assert_eq!(smoking_impact(SmokingStatus::Regular), ImpactLevel::High);
        assert_eq!(smoking_impact(SmokingStatus::Occasional), ImpactLevel::Medium);
        assert_eq!(smoking_impact(SmokingStatus::NoSmoking), ImpactLevel::Low);

        assert_eq!(plan_impact(InsurancePlan::Gold), ImpactLevel::High);
        assert_eq!(plan_impact(InsurancePlan::Silver), ImpactLevel::Medium);
        assert_eq!(plan_impact(InsurancePlan::Bronze), ImpactLevel::Low);
    }

    #[test]
    fn every_condition_is_high() {
        for history in MedicalHistory::ALL {
            let expected = if *history == MedicalHistory::NoDisease {
                ImpactLevel::Low
            } else {
                ImpactLevel::High
            };
            assert_eq!(medical_history_impact(*history), expected, "{history}");
        }
    }

    #[test]
    fn classification_keeps_chart_order() {
        let record = PremiumRecord {
            age: 55,
            bmi_category: BmiCategory::Overweight,
            smoking_status: SmokingStatus::NoSmoking,
            medical_history: MedicalHistory::Thyroid,
            insurance_plan: InsurancePlan::Silver,
            ..PremiumRecord::default()
        };

        let factors = classify_factors(&record);
        let summary: Vec<_> = factors
            .iter()
            .map(|f| (f.factor.label(), f.impact.score()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Age", 3),
                ("BMI Category", 2),
                ("Smoking Status", 1),
                ("Medical History", 3),
                ("Insurance Plan", 2),
            ]
        );
    }
}
