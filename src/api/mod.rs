use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    BuyUpInputs, BuyUpResult, PensionInputs, PensionResult, SCENARIO_DURATIONS, compare_scenarios,
    compute_base_pension, compute_buy_up, inflation_adjusted_monthly,
};

const MAX_WEEKS_CONTRIBUTED: u32 = 3000;
const MAX_REFERENCE_SALARY: f64 = 10_000.0;
const MAX_BUY_UP_SALARY: f64 = 20_000.0;
const MAX_INFLATION_PCT: f64 = 10.0;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EstimatePayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    weeks_contributed: Option<u32>,
    reference_salary: Option<f64>,
    spouse_allowance: Option<bool>,
    inflation_rate: Option<f64>,
    buy_up_salary: Option<f64>,
    buy_up_months: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(
    name = "ley73",
    about = "IMSS Ley 73 pension estimator (Article 167 with Modalidad 40 buy-up analysis)"
)]
struct Cli {
    #[arg(long, default_value_t = 55)]
    current_age: u32,
    #[arg(long, default_value_t = 60, help = "Retirement age, one of 60 through 65")]
    retirement_age: u32,
    #[arg(
        long,
        default_value_t = 1315,
        help = "Contribution weeks accrued to date"
    )]
    weeks_contributed: u32,
    #[arg(
        long,
        default_value_t = 965.25,
        help = "Average daily salary over the statutory averaging window"
    )]
    reference_salary: f64,
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        help = "Include the dependent-spouse allowance"
    )]
    spouse_allowance: bool,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Expected annual inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 2932.0,
        help = "Elected daily contribution salary while enrolled in the buy-up scheme"
    )]
    buy_up_salary: f64,
    #[arg(
        long,
        default_value_t = 24,
        help = "Months enrolled in the buy-up scheme: 6, 12, 18, 24, 30, 36, 42 or 48"
    )]
    buy_up_months: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PensionResponse {
    retirement_age: u32,
    years_to_retirement: u32,
    pension: PensionResult,
    inflation_adjusted_monthly: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuyUpResponse {
    buy_up_months: u32,
    buy_up_salary: f64,
    analysis: BuyUpResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioEntry {
    buy_up_months: u32,
    analysis: BuyUpResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenariosResponse {
    buy_up_salary: f64,
    base_monthly_pension: f64,
    scenarios: Vec<ScenarioEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_pension_inputs(cli: &Cli) -> Result<PensionInputs, String> {
    if !(40..=65).contains(&cli.current_age) {
        return Err("--current-age must be between 40 and 65".to_string());
    }

    if !(60..=65).contains(&cli.retirement_age) {
        return Err("--retirement-age must be one of 60 through 65".to_string());
    }

    if cli.weeks_contributed > MAX_WEEKS_CONTRIBUTED {
        return Err("--weeks-contributed must be between 0 and 3000".to_string());
    }

    if !cli.reference_salary.is_finite() || !(0.0..=MAX_REFERENCE_SALARY).contains(&cli.reference_salary)
    {
        return Err("--reference-salary must be between 0 and 10000".to_string());
    }

    if !cli.inflation_rate.is_finite() || !(0.0..=MAX_INFLATION_PCT).contains(&cli.inflation_rate) {
        return Err("--inflation-rate must be between 0 and 10".to_string());
    }

    Ok(PensionInputs {
        weeks_contributed: cli.weeks_contributed,
        reference_salary: cli.reference_salary,
        current_age: cli.current_age,
        retirement_age: cli.retirement_age,
        spouse_allowance: cli.spouse_allowance,
    })
}

fn validate_buy_up_salary(buy_up_salary: f64) -> Result<(), String> {
    if !buy_up_salary.is_finite() || !(0.0..=MAX_BUY_UP_SALARY).contains(&buy_up_salary) {
        return Err("--buy-up-salary must be between 0 and 20000".to_string());
    }
    Ok(())
}

fn build_buy_up_inputs(cli: &Cli) -> Result<BuyUpInputs, String> {
    let pension = build_pension_inputs(cli)?;
    validate_buy_up_salary(cli.buy_up_salary)?;

    if !SCENARIO_DURATIONS.contains(&cli.buy_up_months) {
        return Err("--buy-up-months must be one of 6, 12, 18, 24, 30, 36, 42 or 48".to_string());
    }

    Ok(BuyUpInputs {
        pension,
        buy_up_salary: cli.buy_up_salary,
        buy_up_months: cli.buy_up_months,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/pension",
            get(pension_get_handler).post(pension_post_handler),
        )
        .route(
            "/api/buyup",
            get(buy_up_get_handler).post(buy_up_post_handler),
        )
        .route(
            "/api/scenarios",
            get(scenarios_get_handler).post(scenarios_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Ley 73 pension API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/pension");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn pension_get_handler(Query(payload): Query<EstimatePayload>) -> Response {
    pension_handler_impl(payload).await
}

async fn pension_post_handler(Json(payload): Json<EstimatePayload>) -> Response {
    pension_handler_impl(payload).await
}

async fn buy_up_get_handler(Query(payload): Query<EstimatePayload>) -> Response {
    buy_up_handler_impl(payload).await
}

async fn buy_up_post_handler(Json(payload): Json<EstimatePayload>) -> Response {
    buy_up_handler_impl(payload).await
}

async fn scenarios_get_handler(Query(payload): Query<EstimatePayload>) -> Response {
    scenarios_handler_impl(payload).await
}

async fn scenarios_post_handler(Json(payload): Json<EstimatePayload>) -> Response {
    scenarios_handler_impl(payload).await
}

async fn pension_handler_impl(payload: EstimatePayload) -> Response {
    let cli = cli_from_payload(payload);
    let inputs = match build_pension_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    json_response(StatusCode::OK, build_pension_response(&cli, &inputs))
}

async fn buy_up_handler_impl(payload: EstimatePayload) -> Response {
    let cli = cli_from_payload(payload);
    let inputs = match build_buy_up_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let response = BuyUpResponse {
        buy_up_months: inputs.buy_up_months,
        buy_up_salary: inputs.buy_up_salary,
        analysis: compute_buy_up(&inputs),
    };
    json_response(StatusCode::OK, response)
}

async fn scenarios_handler_impl(payload: EstimatePayload) -> Response {
    let cli = cli_from_payload(payload);
    let inputs = match build_pension_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    if let Err(msg) = validate_buy_up_salary(cli.buy_up_salary) {
        return error_response(StatusCode::BAD_REQUEST, &msg);
    }

    json_response(
        StatusCode::OK,
        build_scenarios_response(&inputs, cli.buy_up_salary),
    )
}

fn build_pension_response(cli: &Cli, inputs: &PensionInputs) -> PensionResponse {
    let pension = compute_base_pension(inputs);
    let years_to_retirement = inputs.retirement_age.saturating_sub(inputs.current_age);
    let annual_inflation = cli.inflation_rate / 100.0;
    let adjusted_monthly = (years_to_retirement > 0 && annual_inflation > 0.0).then(|| {
        inflation_adjusted_monthly(pension.monthly_pension, annual_inflation, years_to_retirement)
    });

    PensionResponse {
        retirement_age: inputs.retirement_age,
        years_to_retirement,
        pension,
        inflation_adjusted_monthly: adjusted_monthly,
    }
}

fn build_scenarios_response(inputs: &PensionInputs, buy_up_salary: f64) -> ScenariosResponse {
    let base_monthly_pension = compute_base_pension(inputs).monthly_pension;
    let scenarios = compare_scenarios(inputs, buy_up_salary)
        .into_iter()
        .zip(SCENARIO_DURATIONS)
        .map(|(analysis, buy_up_months)| ScenarioEntry {
            buy_up_months,
            analysis,
        })
        .collect();

    ScenariosResponse {
        buy_up_salary,
        base_monthly_pension,
        scenarios,
    }
}

fn cli_from_payload(payload: EstimatePayload) -> Cli {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.weeks_contributed {
        cli.weeks_contributed = v;
    }
    if let Some(v) = payload.reference_salary {
        cli.reference_salary = v;
    }
    if let Some(v) = payload.spouse_allowance {
        cli.spouse_allowance = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.buy_up_salary {
        cli.buy_up_salary = v;
    }
    if let Some(v) = payload.buy_up_months {
        cli.buy_up_months = v;
    }

    cli
}

fn default_cli_for_api() -> Cli {
    Cli {
        current_age: 55,
        retirement_age: 60,
        weeks_contributed: 1315,
        reference_salary: 965.25,
        spouse_allowance: true,
        inflation_rate: 4.0,
        buy_up_salary: 2932.0,
        buy_up_months: 24,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn cli_from_json(json: &str) -> Result<Cli, String> {
    let payload = serde_json::from_str::<EstimatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(cli_from_payload(payload))
}
