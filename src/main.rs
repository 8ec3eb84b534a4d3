use anyhow::Result;
use clap::Parser;

use mapademic::cli::{Cli, Commands};
use mapademic::commands::{run_duplicates, run_pipeline, run_resolve};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve(args) => {
            run_resolve(args)?;
        }
        Commands::Pipeline(args) => {
            run_pipeline(args)?;
        }
        Commands::Duplicates(args) => {
            run_duplicates(args)?;
        }
    }

    Ok(())
}
