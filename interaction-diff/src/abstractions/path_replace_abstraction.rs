use super::PathAbstraction;
use regex::Regex;

#[derive(Debug)]
pub struct PathReplaceRegexAbstraction {
    pattern: Regex,
    substitution: String,
}

impl PathReplaceRegexAbstraction {
    pub fn new<S: Into<String>>(pattern: Regex, substitution: S) -> Self {
        Self {
            pattern,
            substitution: substitution.into(),
        }
    }
}

impl PathAbstraction for PathReplaceRegexAbstraction {
    fn apply(&self, path: &mut String) {
        *path = self
            .pattern
            .replace_all(path, self.substitution.as_str())
            .into();
    }
}
