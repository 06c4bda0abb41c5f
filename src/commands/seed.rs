use anyhow::Result;

use crate::cli::GenerateArgs;
use crate::commands::generate::{OutputFormat, run_with_format};

pub fn run(args: GenerateArgs) -> Result<()> {
    run_with_format(args, OutputFormat::Sql)
}
