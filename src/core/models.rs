use crate::core::filename::FilenamePattern;
use crate::core::mode::Mode;
use crate::core::plugins::PluginSpec;
use crate::core::rules::ModuleRules;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Fully resolved build configuration for one mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescriptor {
    pub mode: Mode,
    /// Named entry bundles, each an ordered list of source requests
    pub entry: BTreeMap<String, Vec<String>>,
    pub output: OutputDescriptor,
    pub resolve: ResolveDescriptor,
    pub devtool: SourceMapStyle,
    pub module: ModuleRules,
    pub optimization: Optimization,
    pub plugins: Vec<PluginSpec>,
    pub node: NodeShims,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDescriptor {
    pub path: PathBuf,
    pub filename: FilenamePattern,
    pub chunk_filename: FilenamePattern,
    pub public_path: String,
}

/// Short symbolic import name mapped to a path or module request.
/// `exact` aliases only match the bare name (`vue$` in bundler syntax).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub target: PathBuf,
    pub exact: bool,
}

impl Alias {
    pub fn prefix(name: &str, target: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            target: target.into(),
            exact: false,
        }
    }

    pub fn exact(name: &str, target: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            target: target.into(),
            exact: true,
        }
    }

    pub fn key(&self) -> String {
        if self.exact {
            format!("{}$", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AliasTable(pub Vec<Alias>);

impl AliasTable {
    pub fn iter(&self) -> std::slice::Iter<'_, Alias> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Alias> {
        self.0.iter().find(|alias| alias.key() == key)
    }
}

impl Serialize for AliasTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for alias in &self.0 {
            map.serialize_entry(&alias.key(), &alias.target)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveDescriptor {
    pub extensions: Vec<String>,
    pub alias: AliasTable,
    /// Directories searched for bare module requests, in order
    pub modules: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMapStyle {
    EvalSourceMap,
    SourceMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitChunks {
    pub name: String,
    /// Modules shared by at least this many entry bundles move into the chunk
    pub min_chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    pub named_modules: bool,
    pub split_chunks: SplitChunks,
    pub no_emit_on_errors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShim {
    Empty,
}

/// Replacements for node built-ins requested from browser code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeShims {
    pub fs: NodeShim,
}
