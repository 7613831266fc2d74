use clap::Args;
use serde_json::Value;

use realty_finance_core::registration_tax::{self, TaxableAsset};

use crate::input;

#[derive(Args)]
pub struct RegistrationTaxArgs {
    /// JSON input file (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_registration_tax(
    args: RegistrationTaxArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let asset: TaxableAsset = input::read_input(args.input.as_deref(), "registration-tax")?;
    let result = registration_tax::calculate_registration_tax(&asset)?;
    Ok(serde_json::to_value(result)?)
}
