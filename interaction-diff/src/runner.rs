use crate::{
    configuration::RunConfig,
    data::InteractionLog,
    diff::{diff_logs, DiffReport},
    error::Result,
    markdown,
    serializer::write_report,
    transformer::transform,
};
use std::io::Write;
use tracing::info;

/// Loads both recordings named by `config`, diffs them and writes the report.
///
/// Both files are read before any diff work starts, so an unreadable file
/// means nothing is written at all.
pub fn run<W: Write>(config: &RunConfig, writer: W) -> Result<DiffReport> {
    let old_log = markdown::load_log(config.old_log_path())?;
    let new_log = markdown::load_log(config.new_log_path())?;

    let report = compare_logs(&old_log, &new_log, config);
    write_report(&report, &config.render_options(), writer)?;

    info!(
        old = %config.old_log_path().display(),
        new = %config.new_log_path().display(),
        differences = report.has_differences(),
        "diff written"
    );

    Ok(report)
}

/// Transforms both logs the same way and diffs the results.
pub fn compare_logs(
    old_log: &InteractionLog,
    new_log: &InteractionLog,
    config: &RunConfig,
) -> DiffReport {
    diff_logs(&transform(old_log, config), &transform(new_log, config))
}
