use clap::Args;
use serde_json::Value;

use realty_finance_core::dead_cross::{self, DeadCrossInput};

use crate::input;

#[derive(Args)]
pub struct DeadCrossArgs {
    /// JSON input file (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_dead_cross(args: DeadCrossArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis: DeadCrossInput = input::read_input(args.input.as_deref(), "dead-cross")?;
    let result = dead_cross::analyze_dead_cross(&analysis)?;
    Ok(serde_json::to_value(result)?)
}
