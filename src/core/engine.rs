use super::types::{BuyUpInputs, BuyUpResult, PensionInputs, PensionResult};

const DAYS_PER_YEAR: f64 = 365.0;
const WEEKS_PER_YEAR: f64 = 52.0;
const MONTHS_PER_YEAR: f64 = 12.0;

// Article 167 quota rates, applied to the daily reference salary.
const BASIC_QUOTA_RATE: f64 = 0.13;
const INCREMENT_QUOTA_RATE: f64 = 0.0245;
const INCREMENT_THRESHOLD_WEEKS: f64 = 500.0;

const SPOUSE_ALLOWANCE_RATE: f64 = 0.15;
const STATUTORY_SUPPLEMENT_RATE: f64 = 0.11;

// Fixed final multiplier of the enhanced-scheme payout chain.
const ENHANCED_PAYOUT_ADJUSTMENT: f64 = 1.2166;

// Voluntary continuation: contribution days billed per enrolled month, and
// the salary-averaging window the scheme feeds into.
const CONTRIBUTION_DAYS_PER_MONTH: f64 = 30.4;
const SALARY_AVERAGING_WEEKS: f64 = 250.0;
const MIN_BLENDING_MONTHS: u32 = 6;

// Statutory share of the full pension by retirement age.
const AGE_FACTORS: [(u32, f64); 6] = [
    (60, 0.75),
    (61, 0.80),
    (62, 0.85),
    (63, 0.90),
    (64, 0.95),
    (65, 1.00),
];
const DEFAULT_AGE_FACTOR: f64 = 0.75;

// Contribution rate per enrollment year of the voluntary scheme.
const CONTINUATION_YEAR_RATES: [f64; 4] = [0.13347, 0.14438, 0.15529, 0.1662];

pub const SCENARIO_DURATIONS: [u32; 8] = [6, 12, 18, 24, 30, 36, 42, 48];

pub fn compute_base_pension(inputs: &PensionInputs) -> PensionResult {
    let factor = age_factor(inputs.retirement_age);
    let years = years_to_retirement(inputs);
    let projected_weeks = inputs.weeks_contributed as f64 + WEEKS_PER_YEAR * years as f64;

    let total_quota = annual_quota(inputs.reference_salary, projected_weeks);
    let allowance = total_quota * spouse_rate(inputs);
    let with_allowance = total_quota + allowance;
    let supplement = with_allowance * STATUTORY_SUPPLEMENT_RATE;
    let base_total = with_allowance + supplement;

    let annual_pension = base_total * factor;
    let monthly_pension = annual_pension / MONTHS_PER_YEAR;

    PensionResult {
        monthly_pension: round2(monthly_pension),
        annual_pension: round2(annual_pension),
        projected_weeks: projected_weeks.round(),
        age_factor: factor,
    }
}

pub fn compute_buy_up(inputs: &BuyUpInputs) -> BuyUpResult {
    let base = compute_base_pension(&inputs.pension);
    let years = years_to_retirement(&inputs.pension);

    let investment = continuation_cost(inputs.buy_up_salary, inputs.buy_up_months);

    let buy_up_weeks = inputs.buy_up_months as f64 / MONTHS_PER_YEAR * WEEKS_PER_YEAR;
    let projected_weeks = inputs.pension.weeks_contributed as f64
        + WEEKS_PER_YEAR * years as f64
        + buy_up_weeks;

    let blended_salary = blend_salary(
        inputs.pension.reference_salary,
        inputs.buy_up_salary,
        inputs.buy_up_months,
        buy_up_weeks,
    );

    let enhanced_annual = annual_quota(blended_salary, projected_weeks)
        * (1.0 + spouse_rate(&inputs.pension))
        * (1.0 + STATUTORY_SUPPLEMENT_RATE)
        * age_factor(inputs.pension.retirement_age)
        * ENHANCED_PAYOUT_ADJUSTMENT;
    let enhanced_monthly = enhanced_annual / MONTHS_PER_YEAR;

    let increment = enhanced_monthly - base.monthly_pension;
    let twenty_year_total = increment * MONTHS_PER_YEAR * 20.0;

    BuyUpResult {
        base_monthly_pension: base.monthly_pension,
        enhanced_monthly_pension: round2(enhanced_monthly),
        monthly_increment: round2(increment),
        investment: round2(investment),
        payback_months: round1(investment / increment.max(1.0)),
        twenty_year_gain: round2(twenty_year_total - investment),
        roi_pct: if investment > 0.0 {
            (twenty_year_total / investment * 100.0).round()
        } else {
            0.0
        },
        blended_salary: round2(blended_salary),
    }
}

pub fn compare_scenarios(inputs: &PensionInputs, buy_up_salary: f64) -> Vec<BuyUpResult> {
    SCENARIO_DURATIONS
        .iter()
        .map(|&buy_up_months| {
            compute_buy_up(&BuyUpInputs {
                pension: *inputs,
                buy_up_salary,
                buy_up_months,
            })
        })
        .collect()
}

pub fn inflation_adjusted_monthly(
    monthly_pension: f64,
    annual_inflation: f64,
    years_to_retirement: u32,
) -> f64 {
    round2(monthly_pension * (1.0 + annual_inflation).powi(years_to_retirement as i32))
}

fn years_to_retirement(inputs: &PensionInputs) -> u32 {
    inputs.retirement_age.saturating_sub(inputs.current_age)
}

fn spouse_rate(inputs: &PensionInputs) -> f64 {
    if inputs.spouse_allowance {
        SPOUSE_ALLOWANCE_RATE
    } else {
        0.0
    }
}

fn age_factor(retirement_age: u32) -> f64 {
    AGE_FACTORS
        .iter()
        .find(|(age, _)| *age == retirement_age)
        .map(|(_, factor)| *factor)
        .unwrap_or(DEFAULT_AGE_FACTOR)
}

fn continuation_rate(enrollment_year: u32) -> f64 {
    CONTINUATION_YEAR_RATES
        .get(enrollment_year.saturating_sub(1) as usize)
        .copied()
        .unwrap_or(CONTINUATION_YEAR_RATES[0])
}

// Annualized basic quota plus increment quota for service beyond the
// 500-week threshold. Shared by the baseline and enhanced chains.
fn annual_quota(daily_salary: f64, projected_weeks: f64) -> f64 {
    let basic_daily = daily_salary * BASIC_QUOTA_RATE;
    let basic_annual = basic_daily * DAYS_PER_YEAR;

    let increment_daily = daily_salary * INCREMENT_QUOTA_RATE;
    let years_beyond_threshold =
        ((projected_weeks - INCREMENT_THRESHOLD_WEEKS) / WEEKS_PER_YEAR).max(0.0);
    let increment_annual = increment_daily * DAYS_PER_YEAR * years_beyond_threshold;

    basic_annual + increment_annual
}

// Flat year-bucketed sum: at most four buckets of up to 12 months each, no
// compounding. Months beyond the fourth bucket are never billed.
fn continuation_cost(buy_up_salary: f64, buy_up_months: u32) -> f64 {
    let mut cost = 0.0;
    let mut remaining = buy_up_months;
    for year in 1..=CONTINUATION_YEAR_RATES.len() as u32 {
        if remaining == 0 {
            break;
        }
        let months = remaining.min(12);
        cost +=
            buy_up_salary * months as f64 * CONTRIBUTION_DAYS_PER_MONTH * continuation_rate(year);
        remaining -= months;
    }
    cost
}

// Weighted average over the 250-week window. The scheme requires a 6-month
// minimum before it affects the average at all.
fn blend_salary(
    reference_salary: f64,
    buy_up_salary: f64,
    buy_up_months: u32,
    buy_up_weeks: f64,
) -> f64 {
    if buy_up_months < MIN_BLENDING_MONTHS {
        return reference_salary;
    }

    let weighted_weeks = buy_up_weeks.min(SALARY_AVERAGING_WEEKS);
    let prior_weeks = SALARY_AVERAGING_WEEKS - weighted_weeks;
    if prior_weeks > 0.0 {
        (reference_salary * prior_weeks + buy_up_salary * weighted_weeks) / SALARY_AVERAGING_WEEKS
    } else {
        buy_up_salary
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
