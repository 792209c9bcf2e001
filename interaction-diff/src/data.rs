use serde_json::Value;
use std::collections::BTreeMap;

pub type Headers = BTreeMap<String, String>;

/// Body of a recorded request or response.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    /// A body that parsed as JSON; rendered as compact JSON with sorted keys.
    Json(Value),
    /// A body that was intentionally excluded from comparison.
    Masked,
}

impl Body {
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Text(text) if text.is_empty())
    }

    /// Splits the body into the units compared by the line diff.
    pub fn lines(&self) -> Vec<Line> {
        match self {
            Body::Text(text) => text.lines().map(|l| Line::Text(l.into())).collect(),
            Body::Json(value) => vec![Line::Text(value.to_string())],
            Body::Masked => vec![Line::Masked],
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Text(String::new())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.into())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

/// One comparable line of a body. `Masked` never equals any text line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Line {
    Text(String),
    Masked,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestData {
    pub method: String,
    pub path: String,
    pub headers: Headers,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: Headers,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionData {
    pub request_data: RequestData,
    pub response_data: Option<ResponseData>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionGroup {
    pub name: Option<String>,
    pub interactions: Vec<InteractionData>,
}

/// A whole recording: groups of interactions in the order they were captured.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionLog {
    pub groups: Vec<InteractionGroup>,
}

impl InteractionLog {
    pub fn interaction_count(&self) -> usize {
        self.groups.iter().map(|g| g.interactions.len()).sum()
    }
}
