//! Server-rendered pages for the calculator and the about tab.

use std::fmt::Write;

use super::charts::{LineChart, LineSeries, factor_impact_chart};
use super::content::*;
use super::format::html_escape;
use crate::models::{
    AGE_RANGE, BmiCategory, Categorical, DEPENDANTS_RANGE, EmploymentStatus, EstimateForm,
    GENETICAL_RISK_RANGE, Gender, INCOME_LAKHS_RANGE, InsurancePlan, MaritalStatus,
    MedicalHistory, Region, SmokingStatus, ValidationErrors, field_keys,
};
use crate::tasks::PremiumEstimate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Calculator,
    About,
}

/// Everything the calculator page can show
pub struct CalculatorView<'a> {
    pub form: &'a EstimateForm,
    pub errors: Option<&'a ValidationErrors>,
    pub estimate: Option<&'a PremiumEstimate>,
    /// Shown instead of a result when the estimate could not be produced
    pub failure: Option<&'a str>,
}

impl<'a> CalculatorView<'a> {
    pub fn blank(form: &'a EstimateForm) -> Self {
        Self {
            form,
            errors: None,
            estimate: None,
            failure: None,
        }
    }
}

pub fn render_calculator(view: &CalculatorView<'_>) -> String {
    let mut body = String::with_capacity(16 * 1024);

    if let Some(errors) = view.errors {
        body.push_str(
            r#"<div class="alert alert-error"><strong>Please correct the highlighted fields:</strong><ul>"#,
        );
        for message in errors.messages() {
            let _ = write!(body, "<li>{}</li>", html_escape(&message));
        }
        body.push_str("</ul></div>");
    }

    body.push_str(r#"<form method="post" action="/estimate">"#);
    body.push_str(&personal_section(view));
    body.push_str(&health_section(view));
    body.push_str(&plan_section(view.form));
    body.push_str(
        r#"<div class="actions"><button type="submit">Calculate Premium</button></div></form>"#,
    );

    if let Some(failure) = view.failure {
        let _ = write!(
            body,
            r#"<div class="alert alert-error">We could not calculate your premium right now. {}</div>"#,
            html_escape(failure)
        );
    }

    if let Some(estimate) = view.estimate {
        body.push_str(&result_section(estimate));
    }

    layout(Tab::Calculator, &body)
}

pub fn render_about() -> String {
    let mut body = String::with_capacity(16 * 1024);

    body.push_str(
        r#"<div class="card"><h2 class="sub-header">About the Premium Prediction Model</h2>"#,
    );
    let _ = write!(body, "<p>{}</p>", html_escape(ABOUT_INTRO));
    body.push_str(
        "<h3>How It Works</h3><p>The model analyzes the following key factors to predict your premium:</p><ul>",
    );
    for (factor, explanation) in HOW_IT_WORKS {
        let _ = write!(
            body,
            "<li><strong>{}</strong>: {}</li>",
            html_escape(factor),
            html_escape(explanation)
        );
    }
    body.push_str("</ul>");
    let _ = write!(
        body,
        "<h3>Data Privacy</h3><p>{}</p><h3>Disclaimer</h3><p>{}</p></div>",
        html_escape(DATA_PRIVACY),
        html_escape(ABOUT_DISCLAIMER)
    );

    body.push_str(r#"<div class="card"><h2 class="sub-header">Premium Trends</h2>"#);
    body.push_str(&trend_chart().to_svg());
    body.push_str("</div>");

    layout(Tab::About, &body)
}

/// The illustrative age/smoking premium chart on the about tab
pub fn trend_chart() -> LineChart {
    let to_f64 = |values: &[u32]| values.iter().map(|&v| f64::from(v)).collect::<Vec<_>>();
    LineChart {
        title: "Average Premium by Age and Smoking Status".to_string(),
        x_label: "Age".to_string(),
        y_label: "Average Annual Premium (₹)".to_string(),
        x_values: to_f64(&TREND_AGES),
        series: vec![
            LineSeries {
                label: "Non-smoker".to_string(),
                values: to_f64(&TREND_NON_SMOKER),
            },
            LineSeries {
                label: "Smoker".to_string(),
                values: to_f64(&TREND_SMOKER),
            },
        ],
    }
}

fn personal_section(view: &CalculatorView<'_>) -> String {
    let form = view.form;
    let errors = view.errors;

    let age = NumberField {
        name: "age",
        key: field_keys::AGE,
        value: &form.age,
        min: AGE_RANGE.start().to_string(),
        max: AGE_RANGE.end().to_string(),
        step: "1",
        help: AGE_HELP,
    };
    let dependants = NumberField {
        name: "number_of_dependants",
        key: field_keys::NUMBER_OF_DEPENDANTS,
        value: &form.number_of_dependants,
        min: DEPENDANTS_RANGE.start().to_string(),
        max: DEPENDANTS_RANGE.end().to_string(),
        step: "1",
        help: DEPENDANTS_HELP,
    };
    let income = NumberField {
        name: "income_lakhs",
        key: field_keys::INCOME_LAKHS,
        value: &form.income_lakhs,
        min: format!("{:.1}", INCOME_LAKHS_RANGE.start()),
        max: format!("{:.1}", INCOME_LAKHS_RANGE.end()),
        step: "0.1",
        help: INCOME_HELP,
    };

    let left = [
        number_input(age, errors),
        select_input::<Gender>("gender", &form.gender, errors),
        select_input::<MaritalStatus>("marital_status", &form.marital_status, errors),
        number_input(dependants, errors),
    ];
    let right = [
        number_input(income, errors),
        select_input::<EmploymentStatus>("employment_status", &form.employment_status, errors),
        select_input::<Region>("region", &form.region, errors),
    ];

    card("Personal Information", &two_columns(&left, &right))
}

fn health_section(view: &CalculatorView<'_>) -> String {
    let form = view.form;
    let errors = view.errors;

    let left = [
        select_input::<BmiCategory>("bmi_category", &form.bmi_category, errors),
        select_input::<SmokingStatus>("smoking_status", &form.smoking_status, errors),
    ];
    let right = [
        select_input::<MedicalHistory>("medical_history", &form.medical_history, errors),
        slider_input(&form.genetical_risk, errors),
    ];

    card("Health Information", &two_columns(&left, &right))
}

fn plan_section(form: &EstimateForm) -> String {
    let selection = form.plan_selection();
    let mut html = String::from(r#"<div class="plans">"#);

    for plan_card in &PLAN_CARDS {
        let name = match plan_card.plan {
            InsurancePlan::Bronze => "plan_bronze",
            InsurancePlan::Silver => "plan_silver",
            InsurancePlan::Gold => "plan_gold",
        };
        let checked = if selection.is_ticked(plan_card.plan) { " checked" } else { "" };
        let _ = write!(
            html,
            r#"<div class="plan"><label title="{help}"><input type="checkbox" name="{name}" value="on"{checked}> {plan} Plan</label><div class="plan-card" style="border: 1px solid {border};"><h3 style="color: {color};">{plan}</h3>"#,
            help = html_escape(plan_card.help),
            plan = plan_card.plan,
            border = plan_card.border,
            color = plan_card.color,
        );
        for line in plan_card.lines {
            let _ = write!(html, "<p>{}</p>", html_escape(line));
        }
        html.push_str("</div></div>");
    }
    html.push_str("</div>");

    card(field_keys::INSURANCE_PLAN, &html)
}

fn result_section(estimate: &PremiumEstimate) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="prediction-result"><p>Your Estimated Annual Premium</p><h2>{}</h2></div>"#,
        html_escape(&estimate.formatted_premium)
    );
    let _ = write!(
        html,
        r#"<div class="alert alert-info">{}</div>"#,
        html_escape(&estimate.disclaimer)
    );
    html.push_str("<h3>Key Factors Influencing Your Premium</h3>");
    html.push_str(r#"<div class="chart">"#);
    html.push_str(&factor_impact_chart(&estimate.factors));
    html.push_str("</div>");
    html
}

struct NumberField<'a> {
    name: &'a str,
    key: &'static str,
    value: &'a str,
    min: String,
    max: String,
    step: &'a str,
    help: &'a str,
}

fn number_input(field: NumberField<'_>, errors: Option<&ValidationErrors>) -> String {
    let (class, message) = field_error(field.key, errors);
    format!(
        r#"<div class="field{class}"><label for="{name}" title="{help}">{key}</label><input type="number" id="{name}" name="{name}" value="{value}" min="{min}" max="{max}" step="{step}" required>{message}</div>"#,
        name = field.name,
        help = html_escape(field.help),
        key = html_escape(field.key),
        value = html_escape(field.value),
        min = field.min,
        max = field.max,
        step = field.step,
    )
}

fn slider_input(value: &str, errors: Option<&ValidationErrors>) -> String {
    let (class, message) = field_error(field_keys::GENETICAL_RISK, errors);
    format!(
        r#"<div class="field{class}"><label for="genetical_risk" title="{help}">{key}</label><input type="range" id="genetical_risk" name="genetical_risk" value="{value}" min="{min}" max="{max}" step="1" list="genetical_risk_marks"><datalist id="genetical_risk_marks">{marks}</datalist>{message}</div>"#,
        help = html_escape(GENETICAL_RISK_HELP),
        key = html_escape(field_keys::GENETICAL_RISK),
        value = html_escape(value),
        min = GENETICAL_RISK_RANGE.start(),
        max = GENETICAL_RISK_RANGE.end(),
        marks = GENETICAL_RISK_RANGE
            .map(|v| format!(r#"<option value="{v}" label="{v}"></option>"#))
            .collect::<String>(),
    )
}

fn select_input<T: Categorical>(
    name: &str,
    current: &str,
    errors: Option<&ValidationErrors>,
) -> String {
    let (class, message) = field_error(T::FIELD, errors);
    let options: String = T::ALL
        .iter()
        .map(|option| {
            let label = html_escape(option.label());
            let selected = if option.label() == current { " selected" } else { "" };
            format!(r#"<option value="{label}"{selected}>{label}</option>"#)
        })
        .collect();
    format!(
        r#"<div class="field{class}"><label for="{name}" title="{help}">{key}</label><select id="{name}" name="{name}">{options}</select>{message}</div>"#,
        help = html_escape(T::HELP),
        key = html_escape(T::FIELD),
    )
}

fn field_error(key: &str, errors: Option<&ValidationErrors>) -> (&'static str, String) {
    match errors.and_then(|e| e.for_field(key)) {
        Some(error) => (
            " field-error",
            format!(
                r#"<p class="error-text">{}</p>"#,
                html_escape(&error.to_string())
            ),
        ),
        None => ("", String::new()),
    }
}

fn two_columns(left: &[String], right: &[String]) -> String {
    format!(
        r#"<div class="columns"><div class="column">{}</div><div class="column">{}</div></div>"#,
        left.concat(),
        right.concat()
    )
}

fn card(title: &str, inner: &str) -> String {
    format!(
        r#"<div class="card"><h2 class="sub-header">{}</h2>{}</div>"#,
        html_escape(title),
        inner
    )
}

fn layout(active: Tab, body: &str) -> String {
    let tab = |tab: Tab, href: &str, label: &str| {
        let class = if tab == active { "tab active" } else { "tab" };
        format!(r#"<a class="{class}" href="{href}">{label}</a>"#)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1 class="main-header">🏥 {title}</h1>
        <p class="subtitle">{subtitle}</p>
        <nav class="tabs">{calculator_tab}{about_tab}</nav>
        {body}
        <footer><p>{footer}</p></footer>
    </div>
</body>
</html>"#,
        title = html_escape(PAGE_TITLE),
        subtitle = html_escape(PAGE_SUBTITLE),
        css = inline_css(),
        calculator_tab = tab(Tab::Calculator, "/", "💰 Premium Calculator"),
        about_tab = tab(Tab::About, "/about", "ℹ️ About the Model"),
        footer = html_escape(FOOTER),
    )
}

fn inline_css() -> &'static str {
    r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; background: #ffffff; color: #212121; }
.container { max-width: 1100px; margin: 0 auto; padding: 20px; }
.main-header { font-size: 2.5rem; color: #1E88E5; text-align: center; margin-bottom: 1rem; }
.subtitle { text-align: center; }
.sub-header { font-size: 1.5rem; color: #424242; margin-bottom: 1rem; }
.tabs { display: flex; gap: 8px; border-bottom: 2px solid #e0e0e0; margin: 20px 0; }
.tab { padding: 10px 16px; text-decoration: none; color: #424242; border-bottom: 3px solid transparent; }
.tab.active { color: #1E88E5; border-bottom-color: #1E88E5; font-weight: bold; }
.card { background-color: #f8f9fa; border-radius: 10px; padding: 20px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); margin-bottom: 20px; }
.columns { display: flex; gap: 24px; flex-wrap: wrap; }
.column { flex: 1 1 300px; }
.field { margin-bottom: 14px; display: flex; flex-direction: column; }
.field label { font-weight: 600; margin-bottom: 4px; border-bottom: 1px dotted #9e9e9e; align-self: flex-start; cursor: help; }
.field input, .field select { padding: 8px; border: 1px solid #bdbdbd; border-radius: 5px; font-size: 1rem; }
.field-error input, .field-error select { border-color: #F44336; }
.error-text { color: #C62828; margin: 4px 0 0; font-size: 0.9rem; }
.plans { display: flex; gap: 16px; flex-wrap: wrap; }
.plan { flex: 1 1 200px; }
.plan-card { padding: 10px; border-radius: 5px; text-align: center; margin-top: 8px; }
.actions { display: flex; justify-content: center; margin: 20px 0; }
button { background-color: #1E88E5; color: white; font-weight: bold; border: none; border-radius: 5px; padding: 0.5rem 1rem; width: 100%; font-size: 1rem; cursor: pointer; }
button:hover { background-color: #1565C0; }
.prediction-result { background-color: #e3f2fd; border-radius: 10px; padding: 20px; margin: 20px 0; text-align: center; font-size: 1.5rem; font-weight: bold; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); }
.alert { border-radius: 8px; padding: 14px 18px; margin: 16px 0; }
.alert-info { background: #e8f4fd; color: #0d47a1; }
.alert-error { background: #fdecea; color: #b71c1c; }
.chart svg { max-width: 100%; height: auto; }
footer { text-align: center; margin-top: 30px; padding: 10px; border-top: 1px solid #e0e0e0; }
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::classify_factors;
    use crate::models::PremiumRecord;
    use crate::tasks::DISCLAIMER;

    #[test]
    fn blank_calculator_has_every_field() {
        let form = EstimateForm::initial();
        let html = render_calculator(&CalculatorView::blank(&form));

        for name in [
            "age",
            "number_of_dependants",
            "income_lakhs",
            "genetical_risk",
            "employment_status",
            "gender",
            "marital_status",
            "bmi_category",
            "smoking_status",
            "region",
            "medical_history",
            "plan_bronze",
            "plan_silver",
            "plan_gold",
        ] {
            assert!(html.contains(&format!(r#"name="{name}""#)), "missing {name}");
        }
        assert!(html.contains(r#"value="18""#));
        assert!(html.contains(r#"step="0.1""#));
        assert!(html.contains("Diabetes &amp; High blood pressure"));
        assert!(!html.contains(r#"class="prediction-result""#));
        assert!(!html.contains(" checked"));
    }

    #[test]
    fn errors_are_listed_and_fields_marked() {
        let form = EstimateForm {
            age: "7".to_string(),
            ..EstimateForm::initial()
        };
        let errors = form.to_record().unwrap_err();
        let view = CalculatorView {
            errors: Some(&errors),
            ..CalculatorView::blank(&form)
        };

        let html = render_calculator(&view);
        assert!(html.contains("Age must be between 18 and 100, got 7"));
        assert_eq!(html.matches(r#"class="field field-error""#).count(), 1);
        assert!(html.contains(r#"value="7""#));
    }

    #[test]
    fn result_shows_premium_note_and_chart() {
        let form = EstimateForm::initial();
        let estimate = PremiumEstimate {
            premium: 15_000.0,
            formatted_premium: "₹15,000".to_string(),
            factors: classify_factors(&PremiumRecord::default()),
            disclaimer: DISCLAIMER.to_string(),
        };
        let view = CalculatorView {
            estimate: Some(&estimate),
            ..CalculatorView::blank(&form)
        };

        let html = render_calculator(&view);
        assert!(html.contains(r#"class="prediction-result""#));
        assert!(html.contains("₹15,000"));
        assert!(html.contains("Actual premiums may vary"));
        assert!(html.contains("Key Factors Influencing Your Premium"));
        assert_eq!(html.matches(r#"class="bar""#).count(), 5);
    }

    #[test]
    fn about_page_has_trend_chart() {
        let html = render_about();
        assert!(html.contains("About the Premium Prediction Model"));
        assert!(html.contains("Average Premium by Age and Smoking Status"));
        assert!(html.contains("Non-smoker"));
        assert!(html.contains(r#"class="tab active" href="/about""#));
    }

    #[test]
    fn trend_chart_uses_sample_data() {
        let chart = trend_chart();
        assert_eq!(chart.x_values, vec![20.0, 30.0, 40.0, 50.0, 60.0, 70.0]);
        assert_eq!(chart.series[1].values.last(), Some(&55_000.0));
    }
}
