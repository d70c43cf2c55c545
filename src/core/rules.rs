// Transformation rules: file pattern -> ordered loader chain.

use crate::core::filename::FilenamePattern;
use crate::utils::{BuildError, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Regular expression matched against a module request path.
/// Compiled on first use and kept for later matches.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    compiled: OnceCell<Regex>,
}

impl FilePattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn compile(&self) -> Result<&Regex> {
        self.compiled
            .get_or_try_init(|| Regex::new(&self.source))
            .map_err(|e| BuildError::pattern(&self.source, e))
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    pub fn is_match(&self, path: &str) -> Result<bool> {
        Ok(self.compile()?.is_match(path))
    }
}

impl PartialEq for FilePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FilePattern {}

impl Serialize for FilePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Paths a rule must skip.
///
/// A path is excluded when `pattern` occurs somewhere in it and that
/// occurrence is not immediately followed by `unless_followed_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exclusion {
    pub pattern: FilePattern,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unless_followed_by: Option<String>,
}

impl Exclusion {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: FilePattern::new(pattern),
            unless_followed_by: None,
        }
    }

    pub fn unless_followed_by(mut self, suffix: &str) -> Self {
        self.unless_followed_by = Some(suffix.to_string());
        self
    }

    pub fn excludes(&self, path: &str) -> Result<bool> {
        let regex = self.pattern.compile()?;
        let excluded = regex.find_iter(path).any(|m| match &self.unless_followed_by {
            Some(suffix) => !path[m.end()..].starts_with(suffix.as_str()),
            None => true,
        });
        Ok(excluded)
    }
}

/// One named processing step with its options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderStep {
    pub loader: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl LoaderStep {
    pub fn new(loader: &str) -> Self {
        Self {
            loader: loader.to_string(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    /// Convenience for asset loaders that take an output `name` template
    pub fn file_output(loader: &str, name: &FilenamePattern) -> Self {
        Self::new(loader).with_option("name", name.as_str())
    }

    pub fn output_name(&self) -> Option<FilenamePattern> {
        self.options
            .get("name")
            .and_then(Value::as_str)
            .map(FilenamePattern::new)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub test: FilePattern,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Exclusion>,
    #[serde(rename = "use")]
    pub chain: Vec<LoaderStep>,
}

impl Rule {
    pub fn new(test: &str, chain: Vec<LoaderStep>) -> Self {
        Self {
            test: FilePattern::new(test),
            exclude: None,
            chain,
        }
    }

    pub fn excluding(mut self, exclusion: Exclusion) -> Self {
        self.exclude = Some(exclusion);
        self
    }

    pub fn applies_to(&self, path: &str) -> Result<bool> {
        if !self.test.is_match(path)? {
            return Ok(false);
        }
        match &self.exclude {
            Some(exclusion) => Ok(!exclusion.excludes(path)?),
            None => Ok(true),
        }
    }

    pub fn loader_names(&self) -> Vec<&str> {
        self.chain.iter().map(|step| step.loader.as_str()).collect()
    }

    /// Output filename template of the rule, if its chain emits files
    pub fn output_name(&self) -> Option<FilenamePattern> {
        self.chain.iter().find_map(LoaderStep::output_name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ModuleRules {
    pub rules: Vec<Rule>,
}

impl ModuleRules {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// First rule that applies to `path`
    pub fn rule_for(&self, path: &str) -> Result<Option<&Rule>> {
        for rule in &self.rules {
            if rule.applies_to(path)? {
                return Ok(Some(rule));
            }
        }
        Ok(None)
    }

    /// Compile every pattern once, reporting the first that fails
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            rule.test.compile()?;
            if let Some(exclusion) = &rule.exclude {
                exclusion.pattern.compile()?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
