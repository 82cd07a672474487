//! The premium record and its field schema.
//!
//! The record serializes to the flat key/value shape the prediction backend
//! expects: keys are the human-readable field names and categorical values are
//! their display strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
pub const DEPENDANTS_RANGE: RangeInclusive<u32> = 0..=20;
pub const INCOME_LAKHS_RANGE: RangeInclusive<f64> = 0.0..=200.0;
pub const GENETICAL_RISK_RANGE: RangeInclusive<u32> = 0..=5;

pub mod field_keys {
    pub const AGE: &str = "Age";
    pub const NUMBER_OF_DEPENDANTS: &str = "Number of Dependants";
    pub const INCOME_LAKHS: &str = "Income in Lakhs";
    pub const GENETICAL_RISK: &str = "Genetical Risk";
    pub const INSURANCE_PLAN: &str = "Insurance Plan";
    pub const EMPLOYMENT_STATUS: &str = "Employment Status";
    pub const GENDER: &str = "Gender";
    pub const MARITAL_STATUS: &str = "Marital Status";
    pub const BMI_CATEGORY: &str = "BMI Category";
    pub const SMOKING_STATUS: &str = "Smoking Status";
    pub const REGION: &str = "Region";
    pub const MEDICAL_HISTORY: &str = "Medical History";
}

/// Shared behaviour of the categorical fields: a fixed option list, a wire
/// label per option and a help text for the whole field.
pub trait Categorical: Sized + Copy + PartialEq + 'static {
    const ALL: &'static [Self];
    const FIELD: &'static str;
    const HELP: &'static str;

    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.label() == label)
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:expr, help = $help:expr,
        { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Categorical for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];
            const FIELD: &'static str = $field;
            const HELP: &'static str = $help;

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical!(
    InsurancePlan,
    field = field_keys::INSURANCE_PLAN,
    help = "Higher tier plans offer better coverage but come with higher premium costs.",
    { Bronze => "Bronze", Silver => "Silver", Gold => "Gold" }
);

categorical!(
    /// `Unspecified` is the blank option and goes over the wire as `""`.
    EmploymentStatus,
    field = field_keys::EMPLOYMENT_STATUS,
    help = "Your employment type may affect premium calculations and payment options.",
    {
        Salaried => "Salaried",
        SelfEmployed => "Self-Employed",
        Freelancer => "Freelancer",
        Unspecified => "",
    }
);

categorical!(
    Gender,
    field = field_keys::GENDER,
    help = "Your biological gender affects premium calculations based on statistical health risks.",
    { Male => "Male", Female => "Female" }
);

categorical!(
    MaritalStatus,
    field = field_keys::MARITAL_STATUS,
    help = "Marital status can influence premium rates due to statistical risk factors.",
    { Unmarried => "Unmarried", Married => "Married" }
);

categorical!(
    BmiCategory,
    field = field_keys::BMI_CATEGORY,
    help = "Body Mass Index category is a key health indicator used in premium calculations.",
    {
        Normal => "Normal",
        Obesity => "Obesity",
        Overweight => "Overweight",
        Underweight => "Underweight",
    }
);

categorical!(
    SmokingStatus,
    field = field_keys::SMOKING_STATUS,
    help = "Smoking significantly impacts health risks and insurance premiums.",
    { NoSmoking => "No Smoking", Regular => "Regular", Occasional => "Occasional" }
);

categorical!(
    Region,
    field = field_keys::REGION,
    help = "Geographic location influences premium rates due to regional healthcare costs.",
    {
        Northwest => "Northwest",
        Southeast => "Southeast",
        Northeast => "Northeast",
        Southwest => "Southwest",
    }
);

categorical!(
    MedicalHistory,
    field = field_keys::MEDICAL_HISTORY,
    help = "Pre-existing conditions are important factors in determining premium rates.",
    {
        NoDisease => "No Disease",
        Diabetes => "Diabetes",
        HighBloodPressure => "High blood pressure",
        DiabetesAndHighBloodPressure => "Diabetes & High blood pressure",
        Thyroid => "Thyroid",
        HeartDisease => "Heart disease",
        HighBloodPressureAndHeartDisease => "High blood pressure & Heart disease",
        DiabetesAndThyroid => "Diabetes & Thyroid",
        DiabetesAndHeartDisease => "Diabetes & Heart disease",
    }
);

/// One submission's worth of applicant attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumRecord {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Number of Dependants")]
    pub number_of_dependants: u32,
    #[serde(rename = "Income in Lakhs")]
    pub income_lakhs: f64,
    #[serde(rename = "Genetical Risk")]
    pub genetical_risk: u32,
    #[serde(rename = "Insurance Plan")]
    pub insurance_plan: InsurancePlan,
    #[serde(rename = "Employment Status")]
    pub employment_status: EmploymentStatus,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Marital Status")]
    pub marital_status: MaritalStatus,
    #[serde(rename = "BMI Category")]
    pub bmi_category: BmiCategory,
    #[serde(rename = "Smoking Status")]
    pub smoking_status: SmokingStatus,
    #[serde(rename = "Region")]
    pub region: Region,
    #[serde(rename = "Medical History")]
    pub medical_history: MedicalHistory,
}

impl Default for PremiumRecord {
    /// The form's initial state: numeric fields at their lower bound and the
    /// first option of every selector.
    fn default() -> Self {
        Self {
            age: *AGE_RANGE.start(),
            number_of_dependants: *DEPENDANTS_RANGE.start(),
            income_lakhs: *INCOME_LAKHS_RANGE.start(),
            genetical_risk: *GENETICAL_RISK_RANGE.start(),
            insurance_plan: InsurancePlan::Bronze,
            employment_status: EmploymentStatus::Salaried,
            gender: Gender::Male,
            marital_status: MaritalStatus::Unmarried,
            bmi_category: BmiCategory::Normal,
            smoking_status: SmokingStatus::NoSmoking,
            region: Region::Northwest,
            medical_history: MedicalHistory::NoDisease,
        }
    }
}

impl PremiumRecord {
    /// Check every numeric field against its inclusive bound, collecting all
    /// violations.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_range(&mut errors, field_keys::AGE, self.age, &AGE_RANGE);
        check_range(
            &mut errors,
            field_keys::NUMBER_OF_DEPENDANTS,
            self.number_of_dependants,
            &DEPENDANTS_RANGE,
        );
        if self.income_lakhs.is_finite() {
            check_range(
                &mut errors,
                field_keys::INCOME_LAKHS,
                self.income_lakhs,
                &INCOME_LAKHS_RANGE,
            );
        } else {
            errors.push(ValidationError::NotANumber {
                field: field_keys::INCOME_LAKHS,
                value: self.income_lakhs.to_string(),
            });
        }
        check_range(
            &mut errors,
            field_keys::GENETICAL_RISK,
            self.genetical_risk,
            &GENETICAL_RISK_RANGE,
        );

        errors.into_result()
    }
}

fn check_range<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: T,
    range: &RangeInclusive<T>,
) where
    T: PartialOrd + fmt::Display,
{
    if !range.contains(&value) {
        errors.push(out_of_range(field, &value, range));
    }
}

fn out_of_range<T: fmt::Display>(
    field: &'static str,
    value: &dyn fmt::Display,
    range: &RangeInclusive<T>,
) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        value: value.to_string(),
        min: range.start().to_string(),
        max: range.end().to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("'{value}' is not a valid {field}")]
    UnknownOption { field: &'static str, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::UnknownOption { field, .. } => field,
        }
    }
}

/// All problems found in one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// The first error reported for a field, if any
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// Raw calculator form as posted by the browser.
///
/// Numbers arrive as text and are parsed here so that bad input can be shown
/// next to the offending field. Each plan checkbox is present only when ticked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateForm {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub number_of_dependants: String,
    #[serde(default)]
    pub income_lakhs: String,
    #[serde(default)]
    pub genetical_risk: String,
    #[serde(default)]
    pub employment_status: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub marital_status: String,
    #[serde(default)]
    pub bmi_category: String,
    #[serde(default)]
    pub smoking_status: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub plan_bronze: Option<String>,
    #[serde(default)]
    pub plan_silver: Option<String>,
    #[serde(default)]
    pub plan_gold: Option<String>,
}

impl EstimateForm {
    /// The untouched calculator: defaults filled in, no plan ticked
    pub fn initial() -> Self {
        let record = PremiumRecord::default();
        Self {
            age: record.age.to_string(),
            number_of_dependants: record.number_of_dependants.to_string(),
            income_lakhs: format!("{:.1}", record.income_lakhs),
            genetical_risk: record.genetical_risk.to_string(),
            employment_status: record.employment_status.label().to_string(),
            gender: record.gender.label().to_string(),
            marital_status: record.marital_status.label().to_string(),
            bmi_category: record.bmi_category.label().to_string(),
            smoking_status: record.smoking_status.label().to_string(),
            region: record.region.label().to_string(),
            medical_history: record.medical_history.label().to_string(),
            plan_bronze: None,
            plan_silver: None,
            plan_gold: None,
        }
    }

    pub fn plan_selection(&self) -> PlanSelection {
        PlanSelection {
            bronze: self.plan_bronze.is_some(),
            silver: self.plan_silver.is_some(),
            gold: self.plan_gold.is_some(),
        }
    }

    /// Parse and validate the form into a record.
    ///
    /// Every field is checked, so one bad option does not hide a range error
    /// elsewhere.
    pub fn to_record(&self) -> Result<PremiumRecord, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let age = parse_integer(&mut errors, field_keys::AGE, &self.age, &AGE_RANGE);
        let number_of_dependants = parse_integer(
            &mut errors,
            field_keys::NUMBER_OF_DEPENDANTS,
            &self.number_of_dependants,
            &DEPENDANTS_RANGE,
        );
        let income_lakhs = parse_income(&mut errors, &self.income_lakhs);
        let genetical_risk = parse_integer(
            &mut errors,
            field_keys::GENETICAL_RISK,
            &self.genetical_risk,
            &GENETICAL_RISK_RANGE,
        );

        let employment_status = parse_option(&mut errors, &self.employment_status);
        let gender = parse_option(&mut errors, &self.gender);
        let marital_status = parse_option(&mut errors, &self.marital_status);
        let bmi_category = parse_option(&mut errors, &self.bmi_category);
        let smoking_status = parse_option(&mut errors, &self.smoking_status);
        let region = parse_option(&mut errors, &self.region);
        let medical_history = parse_option(&mut errors, &self.medical_history);

        let (
            Some(age),
            Some(number_of_dependants),
            Some(income_lakhs),
            Some(genetical_risk),
            Some(employment_status),
            Some(gender),
            Some(marital_status),
            Some(bmi_category),
            Some(smoking_status),
            Some(region),
            Some(medical_history),
        ) = (
            age,
            number_of_dependants,
            income_lakhs,
            genetical_risk,
            employment_status,
            gender,
            marital_status,
            bmi_category,
            smoking_status,
            region,
            medical_history,
        )
        else {
            return Err(errors);
        };

        errors.into_result()?;
        Ok(PremiumRecord {
            age,
            number_of_dependants,
            income_lakhs,
            genetical_risk,
            insurance_plan: self.plan_selection().resolve(),
            employment_status,
            gender,
            marital_status,
            bmi_category,
            smoking_status,
            region,
            medical_history,
        })
    }
}

/// Which plan checkboxes were ticked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSelection {
    pub bronze: bool,
    pub silver: bool,
    pub gold: bool,
}

impl PlanSelection {
    /// The highest ticked tier, Bronze when nothing is ticked.
    pub fn resolve(&self) -> InsurancePlan {
        if self.gold {
            InsurancePlan::Gold
        } else if self.silver {
            InsurancePlan::Silver
        } else {
            InsurancePlan::Bronze
        }
    }

    pub fn is_ticked(&self, plan: InsurancePlan) -> bool {
        match plan {
            InsurancePlan::Bronze => self.bronze,
            InsurancePlan::Silver => self.silver,
            InsurancePlan::Gold => self.gold,
        }
    }
}

fn parse_integer(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: &str,
    range: &RangeInclusive<u32>,
) -> Option<u32> {
    let trimmed = raw.trim();
    let value = match trimmed.parse::<u32>() {
        Ok(value) => value,
        // Whole numbers below zero or beyond u32 are range problems, not parse problems
        Err(e) if *e.kind() == IntErrorKind::PosOverflow || is_negative_integer(trimmed) => {
            errors.push(out_of_range(field, &trimmed, range));
            return None;
        }
        Err(_) => {
            errors.push(ValidationError::NotANumber {
                field,
                value: raw.to_string(),
            });
            return None;
        }
    };

    if range.contains(&value) {
        Some(value)
    } else {
        errors.push(out_of_range(field, &value, range));
        None
    }
}

fn is_negative_integer(raw: &str) -> bool {
    raw.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Income is entered in steps of 0.1 and kept to one decimal place.
fn parse_income(errors: &mut ValidationErrors, raw: &str) -> Option<f64> {
    let value = match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => (value * 10.0).round() / 10.0,
        _ => {
            errors.push(ValidationError::NotANumber {
                field: field_keys::INCOME_LAKHS,
                value: raw.to_string(),
            });
            return None;
        }
    };

    if INCOME_LAKHS_RANGE.contains(&value) {
        Some(value)
    } else {
        errors.push(out_of_range(field_keys::INCOME_LAKHS, &value, &INCOME_LAKHS_RANGE));
        None
    }
}

fn parse_option<T: Categorical>(errors: &mut ValidationErrors, raw: &str) -> Option<T> {
    let value = T::from_label(raw);
    if value.is_none() {
        errors.push(ValidationError::UnknownOption {
            field: T::FIELD,
            value: raw.to_string(),
        });
    }
    value
}
