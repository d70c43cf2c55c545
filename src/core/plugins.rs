// Post-processing and output-generation steps handed to the bundler.

use crate::core::env::{BuildVersion, EnvTable};
use crate::core::filename::FilenamePattern;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginKind {
    Manifest,
    Define,
    Copy,
    HotModuleReplacement,
    Provide,
    Html,
    VueLoader,
    MiniCssExtract,
    OptimizeCssAssets,
    SvgStore,
    Imagemin,
}

impl PluginKind {
    pub const ALL: [PluginKind; 11] = [
        PluginKind::Manifest,
        PluginKind::Define,
        PluginKind::Copy,
        PluginKind::HotModuleReplacement,
        PluginKind::Provide,
        PluginKind::Html,
        PluginKind::VueLoader,
        PluginKind::MiniCssExtract,
        PluginKind::OptimizeCssAssets,
        PluginKind::SvgStore,
        PluginKind::Imagemin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PluginKind::Manifest => "manifest",
            PluginKind::Define => "define",
            PluginKind::Copy => "copy",
            PluginKind::HotModuleReplacement => "hot-module-replacement",
            PluginKind::Provide => "provide",
            PluginKind::Html => "html",
            PluginKind::VueLoader => "vue-loader",
            PluginKind::MiniCssExtract => "mini-css-extract",
            PluginKind::OptimizeCssAssets => "optimize-css-assets",
            PluginKind::SvgStore => "svg-store",
            PluginKind::Imagemin => "imagemin",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single svgo plugin toggle, serialized as `{ "<name>": <enabled> }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgoToggle {
    pub name: String,
    pub enabled: bool,
}

impl SvgoToggle {
    pub fn on(name: &str) -> Self {
        Self { name: name.to_string(), enabled: true }
    }

    pub fn off(name: &str) -> Self {
        Self { name: name.to_string(), enabled: false }
    }
}

impl Serialize for SvgoToggle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.enabled)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyPattern {
    pub context: PathBuf,
    pub from_glob: String,
    pub dot: bool,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlMinify {
    pub remove_comments: bool,
    pub collapse_whitespace: bool,
    pub remove_attribute_quotes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardComments {
    pub remove_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssProcessorOptions {
    pub reduce_idents: bool,
    pub autoprefixer: bool,
    pub zindex: bool,
    pub discard_comments: DiscardComments,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptipngOptions {
    pub optimization_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JpegtranOptions {
    pub progressive: bool,
    pub quality: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase", tag = "plugin")]
pub enum PluginSpec {
    /// Logical asset name -> emitted filename map
    #[serde(rename_all = "camelCase")]
    Manifest {
        file_name: String,
        write_to_file_emit: bool,
    },
    /// Build-time `process.env` constants
    Define {
        #[serde(rename = "process.env")]
        process_env: EnvTable,
    },
    Copy {
        patterns: Vec<CopyPattern>,
    },
    HotModuleReplacement,
    /// Free identifiers bound to modules everywhere
    Provide {
        bindings: BTreeMap<String, String>,
    },
    #[serde(rename_all = "camelCase")]
    Html {
        filename: String,
        template: PathBuf,
        inject: bool,
        minify: Option<HtmlMinify>,
        build_version: BuildVersion,
        chunks_sort_mode: String,
    },
    VueLoader,
    #[serde(rename_all = "camelCase")]
    MiniCssExtract {
        filename: FilenamePattern,
        chunk_filename: FilenamePattern,
    },
    #[serde(rename_all = "camelCase")]
    OptimizeCssAssets {
        css_processor_options: CssProcessorOptions,
    },
    #[serde(rename_all = "camelCase")]
    SvgStore {
        prefix: String,
        svgo_plugins: Vec<SvgoToggle>,
    },
    /// Image compression; each optimizer is `None` when switched off
    Imagemin {
        optipng: Option<OptipngOptions>,
        jpegtran: Option<JpegtranOptions>,
        svgo: Option<Vec<SvgoToggle>>,
    },
}

impl PluginSpec {
    pub fn kind(&self) -> PluginKind {
        match self {
            PluginSpec::Manifest { .. } => PluginKind::Manifest,
            PluginSpec::Define { .. } => PluginKind::Define,
            PluginSpec::Copy { .. } => PluginKind::Copy,
            PluginSpec::HotModuleReplacement => PluginKind::HotModuleReplacement,
            PluginSpec::Provide { .. } => PluginKind::Provide,
            PluginSpec::Html { .. } => PluginKind::Html,
            PluginSpec::VueLoader => PluginKind::VueLoader,
            PluginSpec::MiniCssExtract { .. } => PluginKind::MiniCssExtract,
            PluginSpec::OptimizeCssAssets { .. } => PluginKind::OptimizeCssAssets,
            PluginSpec::SvgStore { .. } => PluginKind::SvgStore,
            PluginSpec::Imagemin { .. } => PluginKind::Imagemin,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Filename templates this plugin emits under
    pub fn output_names(&self) -> Vec<&FilenamePattern> {
        match self {
            PluginSpec::MiniCssExtract { filename, chunk_filename } => vec![filename, chunk_filename],
            _ => Vec::new(),
        }
    }

    pub(crate) fn with_build_version(self, version: BuildVersion) -> Self {
        match self {
            PluginSpec::Define { process_env } => PluginSpec::Define {
                process_env: process_env.with_build_version(version),
            },
            PluginSpec::Html {
                filename,
                template,
                inject,
                minify,
                chunks_sort_mode,
                ..
            } => PluginSpec::Html {
                filename,
                template,
                inject,
                minify,
                build_version: version,
                chunks_sort_mode,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svgo_toggle_serializes_as_single_entry() {
        let json = serde_json::to_value(SvgoToggle::off("cleanupIDs")).unwrap();
        assert_eq!(json, serde_json::json!({ "cleanupIDs": false }));
    }

    #[test]
    fn test_plugin_tagged_serialization() {
        let plugin = PluginSpec::Manifest {
            file_name: "assets/manifest.json".to_string(),
            write_to_file_emit: true,
        };
        let json = serde_json::to_value(&plugin).unwrap();
        assert_eq!(json["plugin"], "manifest");
        assert_eq!(json["fileName"], "assets/manifest.json");
        assert_eq!(json["writeToFileEmit"], true);
    }

    #[test]
    fn test_unit_variant_kind() {
        assert_eq!(PluginSpec::HotModuleReplacement.kind(), PluginKind::HotModuleReplacement);
        assert_eq!(PluginSpec::VueLoader.name(), "vue-loader");
    }
}
