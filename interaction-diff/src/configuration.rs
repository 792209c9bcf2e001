use crate::{abstractions::AbstractionOptions, serializer::RenderOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Flags of a single diff run. Built up front, then only ever borrowed.
#[derive(Debug, Clone)]
pub struct RunConfig {
    old_log_path: PathBuf,
    new_log_path: PathBuf,
    json_body: bool,
    only_requests: bool,
    ignore_get_responses: bool,
    show_equal: bool,
    abstraction_options: AbstractionOptions,
    output_format: OutputFormat,
    pretty: bool,
    fail_on_difference: bool,
}

impl RunConfig {
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(old_log_path: P1, new_log_path: P2) -> Self {
        Self {
            old_log_path: old_log_path.into(),
            new_log_path: new_log_path.into(),
            json_body: false,
            only_requests: false,
            ignore_get_responses: false,
            show_equal: false,
            abstraction_options: AbstractionOptions::none(),
            output_format: OutputFormat::Json,
            pretty: false,
            fail_on_difference: false,
        }
    }

    pub fn old_log_path(&self) -> &Path {
        &self.old_log_path
    }

    pub fn new_log_path(&self) -> &Path {
        &self.new_log_path
    }

    pub fn set_json_body(&mut self, value: bool) {
        self.json_body = value;
    }

    pub fn json_body(&self) -> bool {
        self.json_body
    }

    pub fn set_only_requests(&mut self, value: bool) {
        self.only_requests = value;
    }

    pub fn only_requests(&self) -> bool {
        self.only_requests
    }

    pub fn set_ignore_get_responses(&mut self, value: bool) {
        self.ignore_get_responses = value;
    }

    pub fn ignore_get_responses(&self) -> bool {
        self.ignore_get_responses
    }

    pub fn set_show_equal(&mut self, value: bool) {
        self.show_equal = value;
    }

    pub fn show_equal(&self) -> bool {
        self.show_equal
    }

    pub fn set_abstraction_options(&mut self, abstraction_options: AbstractionOptions) {
        self.abstraction_options = abstraction_options;
    }

    pub fn abstraction_options(&self) -> &AbstractionOptions {
        &self.abstraction_options
    }

    pub fn set_output_format(&mut self, output_format: OutputFormat) {
        self.output_format = output_format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn set_pretty(&mut self, value: bool) {
        self.pretty = value;
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }

    pub fn set_fail_on_difference(&mut self, value: bool) {
        self.fail_on_difference = value;
    }

    pub fn fail_on_difference(&self) -> bool {
        self.fail_on_difference
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.output_format,
            show_equal: self.show_equal,
            pretty: self.pretty,
        }
    }
}
