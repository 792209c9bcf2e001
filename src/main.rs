//! Command line entry point: compares two recorded interaction logs.

use clap::{ArgAction, Parser, ValueEnum};
use interaction_diff::{logging, AbstractionOptions, OutputFormat, RunConfig};
use std::{io, path::PathBuf, process::ExitCode};
use tracing::debug;

const ERROR_STATUS: u8 = 2;

/// Compare two recorded HTTP interaction logs and report what changed
#[derive(Parser, Debug)]
#[command(name = "interaction-diff", version)]
struct Cli {
    /// Recording of the baseline run
    old_log: PathBuf,

    /// Recording of the run being checked
    new_log: PathBuf,

    /// Parse bodies as JSON and compare their canonical form
    #[arg(long)]
    json_body: bool,

    /// Leave responses out of the comparison
    #[arg(long)]
    only_requests: bool,

    /// Don't compare the response bodies of GET requests
    #[arg(long)]
    ignore_get_responses: bool,

    /// Print equal body lines instead of folding them
    #[arg(long)]
    show_equal: bool,

    /// Abstraction set: `none`, `volatile` or a path to a .toml rules file
    #[arg(short, long, default_value = "none")]
    abstractions: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Exit with status 1 when the logs differ
    #[arg(long)]
    fail_on_difference: bool,

    /// More log output on stderr (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Text,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
        }
    }
}

impl Cli {
    fn into_config(self) -> interaction_diff::Result<RunConfig> {
        let mut config = RunConfig::new(self.old_log, self.new_log);

        config.set_json_body(self.json_body);
        config.set_only_requests(self.only_requests);
        config.set_ignore_get_responses(self.ignore_get_responses);
        config.set_show_equal(self.show_equal);
        config.set_abstraction_options(AbstractionOptions::resolve(&self.abstractions)?);
        config.set_output_format(self.format.into());
        config.set_pretty(self.pretty);
        config.set_fail_on_difference(self.fail_on_difference);

        Ok(config)
    }
}

fn execute(cli: Cli) -> interaction_diff::Result<ExitCode> {
    let config = cli.into_config()?;
    debug!(?config, "starting run");

    let report = interaction_diff::run(&config, io::stdout().lock())?;

    Ok(ExitCode::from(exit_status(
        report.has_differences(),
        config.fail_on_difference(),
    )))
}

/// 1 only when differences were asked to fail the run.
fn exit_status(has_differences: bool, fail_on_difference: bool) -> u8 {
    if fail_on_difference && has_differences {
        1
    } else {
        0
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(ERROR_STATUS)
        }
    }
}
