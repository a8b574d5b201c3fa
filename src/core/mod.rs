mod engine;
mod types;

pub use engine::{
    SCENARIO_DURATIONS, compare_scenarios, compute_base_pension, compute_buy_up,
    inflation_adjusted_monthly,
};
pub use types::{BuyUpInputs, BuyUpResult, PensionInputs, PensionResult};
