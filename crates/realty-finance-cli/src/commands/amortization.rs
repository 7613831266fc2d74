use clap::Args;
use serde_json::Value;

use realty_finance_core::amortization::{self, LoanParameters};

use crate::input;

#[derive(Args)]
pub struct AmortizationArgs {
    /// JSON input file (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanParameters = input::read_input(args.input.as_deref(), "amortization")?;
    let result = amortization::calculate_amortization(&loan)?;
    Ok(serde_json::to_value(result)?)
}
