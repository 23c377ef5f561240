mod commands;
mod input;
mod terminal;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use commands::{CommandLine, scan};
use sweepr_core::lookup::{Lookup, ShodanLookup};
use terminal::{logging, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();

    spinner::init_spinner(!cli.quiet);
    logging::init_logging(cli.verbose, cli.quiet);

    let cfg = Arc::new(cli.to_config()?);

    let source = input::select_source(cli.list.clone(), cli.target.clone(), !io::stdin().is_terminal())?;
    let ranges = input::read_ranges(source)?;

    let lookup: Arc<dyn Lookup> = Arc::new(ShodanLookup::with_base_url(&cfg, &cli.lookup_url)?);

    scan::scan(ranges, cfg, lookup).await
}
