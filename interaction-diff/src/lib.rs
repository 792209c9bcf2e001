pub mod abstractions;
mod configuration;
pub mod data;
pub mod diff;
mod error;
pub mod line_diff;
pub mod logging;
pub mod markdown;
mod runner;
pub mod serializer;
mod transformer;

pub use abstractions::AbstractionOptions;
pub use configuration::{OutputFormat, RunConfig};
pub use data::{Body, InteractionData, InteractionGroup, InteractionLog, RequestData, ResponseData};
pub use diff::{diff_logs, DiffReport, DiffSummary};
pub use error::{Error, Result};
pub use line_diff::Tag;
pub use runner::{compare_logs, run};
pub use transformer::transform;
