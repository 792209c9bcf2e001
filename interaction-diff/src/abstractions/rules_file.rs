use super::{AbstractionOptions, AbstractionTarget};
use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    name: Option<String>,
    #[serde(default, rename = "rule")]
    rules: Vec<RuleDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum RuleDefinition {
    RemoveHeaders {
        headers: Vec<String>,
        #[serde(default)]
        target: AbstractionTarget,
    },
    RemoveHeadersRegex {
        patterns: Vec<String>,
        #[serde(default)]
        target: AbstractionTarget,
    },
    ReplaceHeaderValues {
        pattern: String,
        replacement: String,
        #[serde(default)]
        target: AbstractionTarget,
    },
    BodyReplace {
        text: String,
        replacement: String,
        #[serde(default)]
        target: AbstractionTarget,
    },
    BodyReplaceRegex {
        pattern: String,
        replacement: String,
        #[serde(default)]
        target: AbstractionTarget,
    },
    PathReplaceRegex {
        pattern: String,
        replacement: String,
    },
}

/// Reads an abstraction set from a TOML file of `[[rule]]` tables.
///
/// The set is named after the file's `name` key, or its file stem.
pub fn load_rules_file<P: AsRef<Path>>(path: P) -> Result<AbstractionOptions> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(Error::io(path))?;
    let rules_file: RulesFile =
        toml::from_str(&contents).map_err(|source| Error::InvalidRulesFile {
            path: path.into(),
            source,
        })?;

    let name = rules_file.name.unwrap_or_else(|| {
        path.file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned())
    });
    let mut options = AbstractionOptions::new(name);

    for rule in rules_file.rules {
        add_rule(&mut options, rule)?;
    }

    debug!(
        name = options.name(),
        request_rules = options.request_abstractions().len(),
        response_rules = options.response_abstractions().len(),
        "loaded abstraction rules"
    );

    Ok(options)
}

fn add_rule(options: &mut AbstractionOptions, rule: RuleDefinition) -> Result<()> {
    match rule {
        RuleDefinition::RemoveHeaders { headers, target } => {
            options.add_for_target(target, |a| a.remove_headers(headers));
        }
        RuleDefinition::RemoveHeadersRegex { patterns, target } => {
            let patterns = patterns
                .iter()
                .map(|p| Regex::new(p))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            options.add_for_target(target, |a| a.remove_headers_regex(patterns));
        }
        RuleDefinition::ReplaceHeaderValues {
            pattern,
            replacement,
            target,
        } => {
            let pattern = Regex::new(&pattern)?;
            options.add_for_target(target, |a| a.replace_header_values(pattern, replacement));
        }
        RuleDefinition::BodyReplace {
            text,
            replacement,
            target,
        } => {
            options.add_for_target(target, |a| a.body_replace(text, replacement));
        }
        RuleDefinition::BodyReplaceRegex {
            pattern,
            replacement,
            target,
        } => {
            let pattern = Regex::new(&pattern)?;
            options.add_for_target(target, |a| a.body_replace_regex(pattern, replacement));
        }
        RuleDefinition::PathReplaceRegex {
            pattern,
            replacement,
        } => {
            let pattern = Regex::new(&pattern)?;
            options.add_request_abstractions(|a| a.path_replace_regex(pattern, replacement));
        }
    }

    Ok(())
}
