use super::HeadersAbstraction;
use crate::data::Headers;
use regex::Regex;

#[derive(Debug)]
pub struct RemoveHeadersAbstraction {
    headers: Vec<String>,
}

impl RemoveHeadersAbstraction {
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(headers: I) -> Self {
        Self {
            headers: headers
                .into_iter()
                .map(|e| e.into().to_lowercase())
                .collect(),
        }
    }
}

impl HeadersAbstraction for RemoveHeadersAbstraction {
    fn apply(&self, headers: &mut Headers) {
        // recorded header names keep their original case
        headers.retain(|name, _| !self.headers.contains(&name.to_lowercase()));
    }
}

#[derive(Debug)]
pub struct RemoveHeadersRegexAbstraction {
    patterns: Vec<Regex>,
}

impl RemoveHeadersRegexAbstraction {
    pub fn new<I: IntoIterator<Item = Regex>>(patterns: I) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }
}

impl HeadersAbstraction for RemoveHeadersRegexAbstraction {
    fn apply(&self, headers: &mut Headers) {
        headers.retain(|name, _| !self.patterns.iter().any(|p| p.is_match(name)));
    }
}

#[derive(Debug)]
pub struct ReplaceHeaderValuesAbstraction {
    pattern: Regex,
    substitution: String,
}

impl ReplaceHeaderValuesAbstraction {
    pub fn new<S: Into<String>>(pattern: Regex, substitution: S) -> Self {
        Self {
            pattern,
            substitution: substitution.into(),
        }
    }
}

impl HeadersAbstraction for ReplaceHeaderValuesAbstraction {
    fn apply(&self, headers: &mut Headers) {
        for value in headers.values_mut() {
            *value = self
                .pattern
                .replace_all(value, self.substitution.as_str())
                .into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Headers {
        vec![
            ("Content-Type", "application/json"),
            ("X-Trace-Span", "abc"),
            ("X-Trace-Parent", "def"),
            ("Location", "/orders/17"),
        ]
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
    }

    #[test]
    fn removes_headers_ignoring_case() {
        let mut headers = headers();

        RemoveHeadersAbstraction::new(vec!["content-type", "LOCATION"]).apply(&mut headers);

        assert_eq!(
            headers.keys().collect::<Vec<_>>(),
            vec!["X-Trace-Parent", "X-Trace-Span"]
        );
    }

    #[test]
    fn removes_headers_matching_a_pattern() {
        let mut headers = headers();

        RemoveHeadersRegexAbstraction::new(vec![Regex::new("^X-Trace-").unwrap()])
            .apply(&mut headers);

        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn replaces_values_in_place() {
        let mut headers = headers();

        ReplaceHeaderValuesAbstraction::new(Regex::new(r"\d+").unwrap(), "<n>")
            .apply(&mut headers);

        assert_eq!(headers["Location"], "/orders/<n>");
    }
}
