mod body_replace_abstraction;
mod headers_abstraction;
mod path_replace_abstraction;
mod rules_file;

use crate::{
    data::{Body, Headers, RequestData, ResponseData},
    error::{Error, Result},
};
use body_replace_abstraction::{BodyReplaceAbstraction, BodyReplaceRegexAbstraction};
use headers_abstraction::{
    RemoveHeadersAbstraction, RemoveHeadersRegexAbstraction, ReplaceHeaderValuesAbstraction,
};
use lazy_static::lazy_static;
use path_replace_abstraction::PathReplaceRegexAbstraction;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::{fmt::Debug, path::Path, sync::Arc};

pub use rules_file::load_rules_file;

lazy_static! {
    static ref TIMESTAMP_REGEX: Regex = Regex::new(
        r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?"
    )
    .unwrap();
    static ref UUID_REGEX: Regex = Regex::new(
        r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\b"
    )
    .unwrap();
}

const VOLATILE_HEADERS: &[&str] = &[
    "date",
    "expires",
    "last-modified",
    "age",
    "etag",
    "set-cookie",
    "x-request-id",
    "x-correlation-id",
];

pub const NO_ABSTRACTIONS: &str = "none";
pub const VOLATILE_ABSTRACTIONS: &str = "volatile";

pub trait BodyAbstraction: Debug {
    fn apply(&self, body: &mut String);
}

pub trait HeadersAbstraction: Debug {
    fn apply(&self, headers: &mut Headers);
}

pub trait PathAbstraction: Debug {
    fn apply(&self, path: &mut String);
}

#[derive(Debug, Clone)]
enum AbstractionType {
    Body(Arc<dyn BodyAbstraction + Send + Sync>),
    Headers(Arc<dyn HeadersAbstraction + Send + Sync>),
    Path(Arc<dyn PathAbstraction + Send + Sync>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractionTarget {
    Request,
    Response,
    #[default]
    Both,
}

#[derive(Debug, Clone)]
pub struct RequestAbstraction {
    abstraction_type: AbstractionType,
}

impl RequestAbstraction {
    fn from_abstraction_type(abstraction_type: AbstractionType) -> Self {
        Self { abstraction_type }
    }

    pub fn apply(&self, request_data: &mut RequestData) {
        match &self.abstraction_type {
            AbstractionType::Headers(ha) => ha.apply(&mut request_data.headers),
            AbstractionType::Body(ba) => apply_to_body(ba.as_ref(), &mut request_data.body),
            AbstractionType::Path(pa) => pa.apply(&mut request_data.path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseAbstraction {
    abstraction_type: AbstractionType,
}

impl ResponseAbstraction {
    fn from_abstraction_type(abstraction_type: AbstractionType) -> Self {
        Self { abstraction_type }
    }

    pub fn apply(&self, response_data: &mut ResponseData) {
        match &self.abstraction_type {
            AbstractionType::Headers(ha) => ha.apply(&mut response_data.headers),
            AbstractionType::Body(ba) => apply_to_body(ba.as_ref(), &mut response_data.body),
            // responses don't have a path
            AbstractionType::Path(_) => {}
        }
    }
}

fn apply_to_body(abstraction: &dyn BodyAbstraction, body: &mut Body) {
    match body {
        Body::Text(text) => abstraction.apply(text),
        Body::Json(value) => apply_to_json_strings(abstraction, value),
        Body::Masked => {}
    }
}

fn apply_to_json_strings(abstraction: &dyn BodyAbstraction, value: &mut Value) {
    match value {
        Value::String(text) => abstraction.apply(text),
        Value::Array(items) => items
            .iter_mut()
            .for_each(|item| apply_to_json_strings(abstraction, item)),
        Value::Object(fields) => fields
            .values_mut()
            .for_each(|field| apply_to_json_strings(abstraction, field)),
        _ => {}
    }
}

pub struct AbstractionsBuilder {
    abstractions: Vec<AbstractionType>,
}

impl AbstractionsBuilder {
    pub(crate) fn new() -> Self {
        Self {
            abstractions: Vec::new(),
        }
    }

    pub fn remove_headers<S: Into<String>, I: IntoIterator<Item = S>>(
        &mut self,
        headers: I,
    ) -> &mut Self {
        self.add_headers_abstraction(RemoveHeadersAbstraction::new(headers))
    }

    pub fn remove_headers_regex<I: IntoIterator<Item = Regex>>(
        &mut self,
        patterns: I,
    ) -> &mut Self {
        self.add_headers_abstraction(RemoveHeadersRegexAbstraction::new(patterns))
    }

    pub fn replace_header_values<S: Into<String>>(
        &mut self,
        pattern: Regex,
        replacement: S,
    ) -> &mut Self {
        self.add_headers_abstraction(ReplaceHeaderValuesAbstraction::new(pattern, replacement))
    }

    pub fn body_replace<S1: Into<String>, S2: Into<String>>(
        &mut self,
        text: S1,
        replacement: S2,
    ) -> &mut Self {
        self.add_body_abstraction(BodyReplaceAbstraction::new(text, replacement))
    }

    pub fn body_replace_regex<S: Into<String>>(
        &mut self,
        pattern: Regex,
        replacement: S,
    ) -> &mut Self {
        self.add_body_abstraction(BodyReplaceRegexAbstraction::new(pattern, replacement))
    }

    pub fn path_replace_regex<S: Into<String>>(
        &mut self,
        pattern: Regex,
        replacement: S,
    ) -> &mut Self {
        self.add_path_abstraction(PathReplaceRegexAbstraction::new(pattern, replacement))
    }

    pub fn add_headers_abstraction<HA: HeadersAbstraction + Send + Sync + 'static>(
        &mut self,
        abstraction: HA,
    ) -> &mut Self {
        self.abstractions
            .push(AbstractionType::Headers(Arc::new(abstraction)));
        self
    }

    pub fn add_body_abstraction<BA: BodyAbstraction + Send + Sync + 'static>(
        &mut self,
        abstraction: BA,
    ) -> &mut Self {
        self.abstractions
            .push(AbstractionType::Body(Arc::new(abstraction)));
        self
    }

    pub fn add_path_abstraction<PA: PathAbstraction + Send + Sync + 'static>(
        &mut self,
        abstraction: PA,
    ) -> &mut Self {
        self.abstractions
            .push(AbstractionType::Path(Arc::new(abstraction)));
        self
    }
}

impl Default for AbstractionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A named set of normalization rules applied to both logs before diffing.
#[derive(Debug, Clone)]
pub struct AbstractionOptions {
    name: String,
    request_abstractions: Vec<RequestAbstraction>,
    response_abstractions: Vec<ResponseAbstraction>,
}

impl AbstractionOptions {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            request_abstractions: Vec::new(),
            response_abstractions: Vec::new(),
        }
    }

    pub fn none() -> Self {
        Self::new(NO_ABSTRACTIONS)
    }

    /// Timestamps, UUIDs and the headers that carry per-request values.
    pub fn volatile() -> Self {
        let mut options = Self::new(VOLATILE_ABSTRACTIONS);

        options.add_abstractions(|abstractions| {
            abstractions
                .remove_headers(VOLATILE_HEADERS.iter().copied())
                .replace_header_values(TIMESTAMP_REGEX.clone(), "<timestamp>")
                .replace_header_values(UUID_REGEX.clone(), "<uuid>")
                .body_replace_regex(TIMESTAMP_REGEX.clone(), "<timestamp>")
                .body_replace_regex(UUID_REGEX.clone(), "<uuid>")
                .path_replace_regex(TIMESTAMP_REGEX.clone(), "<timestamp>")
                .path_replace_regex(UUID_REGEX.clone(), "<uuid>")
        });

        options
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            NO_ABSTRACTIONS => Some(Self::none()),
            VOLATILE_ABSTRACTIONS => Some(Self::volatile()),
            _ => None,
        }
    }

    /// Resolves a built-in set name or a path to a `.toml` rules file.
    pub fn resolve<S: AsRef<str>>(selector: S) -> Result<Self> {
        let selector = selector.as_ref();

        if let Some(options) = Self::builtin(selector) {
            return Ok(options);
        }

        let path = Path::new(selector);
        if path.extension().map_or(false, |extension| extension == "toml") {
            return load_rules_file(path);
        }

        Err(Error::UnknownAbstractions(selector.into()))
    }

    pub fn add_request_abstractions<
        F: FnOnce(&mut AbstractionsBuilder) -> &mut AbstractionsBuilder,
    >(
        &mut self,
        func: F,
    ) -> &mut Self {
        self.add_for_target(AbstractionTarget::Request, func)
    }

    pub fn add_response_abstractions<
        F: FnOnce(&mut AbstractionsBuilder) -> &mut AbstractionsBuilder,
    >(
        &mut self,
        func: F,
    ) -> &mut Self {
        self.add_for_target(AbstractionTarget::Response, func)
    }

    pub fn add_abstractions<F: FnOnce(&mut AbstractionsBuilder) -> &mut AbstractionsBuilder>(
        &mut self,
        func: F,
    ) -> &mut Self {
        self.add_for_target(AbstractionTarget::Both, func)
    }

    pub(crate) fn add_for_target<
        F: FnOnce(&mut AbstractionsBuilder) -> &mut AbstractionsBuilder,
    >(
        &mut self,
        target: AbstractionTarget,
        func: F,
    ) -> &mut Self {
        let mut abstractions = AbstractionsBuilder::new();
        let _ = func(&mut abstractions);
        self.extend(target, abstractions);
        self
    }

    fn extend(&mut self, target: AbstractionTarget, abstractions: AbstractionsBuilder) {
        if target != AbstractionTarget::Response {
            self.request_abstractions.extend(
                abstractions
                    .abstractions
                    .iter()
                    .cloned()
                    .map(RequestAbstraction::from_abstraction_type),
            );
        }

        if target != AbstractionTarget::Request {
            self.response_abstractions.extend(
                abstractions
                    .abstractions
                    .into_iter()
                    .map(ResponseAbstraction::from_abstraction_type),
            );
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.request_abstractions.is_empty() && self.response_abstractions.is_empty()
    }

    pub fn request_abstractions(&self) -> &[RequestAbstraction] {
        &self.request_abstractions
    }

    pub fn response_abstractions(&self) -> &[ResponseAbstraction] {
        &self.response_abstractions
    }
}

impl Default for AbstractionOptions {
    fn default() -> Self {
        Self::none()
    }
}
