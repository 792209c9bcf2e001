use super::BodyAbstraction;
use regex::Regex;

#[derive(Debug)]
pub struct BodyReplaceAbstraction {
    text: String,
    substitution: String,
}

impl BodyReplaceAbstraction {
    pub fn new<S1: Into<String>, S2: Into<String>>(text: S1, substitution: S2) -> Self {
        BodyReplaceAbstraction {
            text: text.into(),
            substitution: substitution.into(),
        }
    }
}

impl BodyAbstraction for BodyReplaceAbstraction {
    fn apply(&self, body: &mut String) {
        if !self.text.is_empty() && body.contains(&self.text) {
            *body = body.replace(&self.text, &self.substitution);
        }
    }
}

#[derive(Debug)]
pub struct BodyReplaceRegexAbstraction {
    pattern: Regex,
    substitution: String,
}

impl BodyReplaceRegexAbstraction {
    pub fn new<S: Into<String>>(pattern: Regex, substitution: S) -> Self {
        BodyReplaceRegexAbstraction {
            pattern,
            substitution: substitution.into(),
        }
    }
}

impl BodyAbstraction for BodyReplaceRegexAbstraction {
    fn apply(&self, body: &mut String) {
        *body = self
            .pattern
            .replace_all(body, self.substitution.as_str())
            .into();
    }
}
