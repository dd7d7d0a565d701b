//! metcast - Fetch met.no forecasts through a memory + disk cache
//!
//! metcast provides:
//! - Cached forecast retrieval with conditional revalidation
//! - Inspection of the disk cache freshness metadata
//! - Explicit cache invalidation

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    metcast::core::logging::init(cli.verbose, cli.quiet);
    cli::run(cli)
}
