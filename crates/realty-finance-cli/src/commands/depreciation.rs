use clap::Args;
use serde_json::Value;

use realty_finance_core::depreciation::{self, BuildingAsset};

use crate::input;

#[derive(Args)]
pub struct DepreciationArgs {
    /// JSON input file (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let building: BuildingAsset = input::read_input(args.input.as_deref(), "depreciation")?;
    let result = depreciation::calculate_depreciation(&building)?;
    Ok(serde_json::to_value(result)?)
}
