mod commands;
mod terminal;

use std::process::ExitCode;
use std::sync::Arc;

use commands::CommandLine;
use probr_common::config::Config;
use probr_core::{Pipeline, RunSummary, StdoutSink};
use tokio::io::BufReader;
use tracing::debug;

use crate::terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    let cfg: Config = commands.to_config();
    debug!("{cfg:?}");

    let pipeline: Pipeline = Pipeline::from_config(cfg)?;
    let input = BufReader::new(tokio::io::stdin());
    let summary: RunSummary = pipeline.run(input, Arc::new(StdoutSink::stdout())).await?;

    // A read error after some input is only a diagnostic, failing before the
    // first line means there was no usable input at all.
    if summary.input_error.is_some() && summary.hosts == 0 {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
