use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct PensionInputs {
    pub weeks_contributed: u32,
    pub reference_salary: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    pub spouse_allowance: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BuyUpInputs {
    pub pension: PensionInputs,
    pub buy_up_salary: f64,
    pub buy_up_months: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionResult {
    pub monthly_pension: f64,
    pub annual_pension: f64,
    pub projected_weeks: f64,
    pub age_factor: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyUpResult {
    pub base_monthly_pension: f64,
    pub enhanced_monthly_pension: f64,
    pub monthly_increment: f64,
    pub investment: f64,
    pub payback_months: f64,
    pub twenty_year_gain: f64,
    pub roi_pct: f64,
    pub blended_salary: f64,
}
