use clap::Parser;

use swapiprobe::cmd::{run_probe, Cli};
use swapiprobe::errors::Result;
use swapiprobe::log::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_probe(cli).await
}
