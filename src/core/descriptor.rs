// Construction of the build descriptor.
// Every mode-dependent field is resolved here, once, before hand-off.

use crate::core::env::{BuildVersion, EnvTable};
use crate::core::filename::{FilenamePattern, HashKind, EXT_TOKEN};
use crate::core::mode::{compact, if_dev, if_prod, Mode};
use crate::core::models::*;
use crate::core::plugins::*;
use crate::core::rules::{Exclusion, LoaderStep, ModuleRules, Rule};
use crate::paths::ProjectPaths;
use crate::utils::Result;
use std::collections::BTreeMap;
use std::path::Path;

pub const APP_ENTRY: &str = "app";
pub const HOT_CLIENT: &str = "webpack-hot-middleware/client?reload=true";
pub const VENDOR_CHUNK: &str = "vendor";
pub const MANIFEST_FILE: &str = "assets/manifest.json";
pub const CSS_EXTRACT_LOADER: &str = "mini-css-extract-plugin/loader";

/// Resolve the descriptor for `mode` against the default layout under the working directory
pub fn resolve_for_mode(mode: Mode) -> BuildDescriptor {
    DescriptorBuilder::new(mode).build()
}

pub struct DescriptorBuilder {
    mode: Mode,
    paths: ProjectPaths,
    public_path: String,
    build_version: Option<BuildVersion>,
}

impl DescriptorBuilder {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            paths: ProjectPaths::from_working_dir(),
            public_path: "/".to_string(),
            build_version: None,
        }
    }

    pub fn with_paths(mut self, paths: ProjectPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = public_path.into();
        self
    }

    /// Pin the build version instead of taking the current time
    pub fn with_build_version(mut self, version: BuildVersion) -> Self {
        self.build_version = Some(version);
        self
    }

    pub fn build(self) -> BuildDescriptor {
        let mode = self.mode;
        let version = self.build_version.unwrap_or_else(BuildVersion::now);

        BuildDescriptor {
            mode,
            entry: self.entry(),
            output: self.output(),
            resolve: self.resolve(),
            devtool: mode.pick(SourceMapStyle::EvalSourceMap, SourceMapStyle::SourceMap),
            module: self.rules(),
            optimization: Optimization {
                named_modules: true,
                split_chunks: SplitChunks {
                    name: VENDOR_CHUNK.to_string(),
                    min_chunks: 2,
                },
                no_emit_on_errors: true,
            },
            plugins: self.plugins(version),
            node: NodeShims { fs: NodeShim::Empty },
        }
    }

    fn entry(&self) -> BTreeMap<String, Vec<String>> {
        let sources = compact([
            if_dev(self.mode, HOT_CLIENT.to_string()),
            Some(path_string(&self.paths.in_src("assets/sass/main.scss"))),
            Some(path_string(&self.paths.in_src("main.js"))),
        ]);

        BTreeMap::from([(APP_ENTRY.to_string(), sources)])
    }

    fn output(&self) -> OutputDescriptor {
        OutputDescriptor {
            path: self.paths.build.clone(),
            filename: FilenamePattern::hashed_in(self.mode, "assets/js", HashKind::Build, "js"),
            chunk_filename: FilenamePattern::hashed_in(self.mode, "assets/js", HashKind::Chunk, "js"),
            public_path: self.public_path.clone(),
        }
    }

    fn resolve(&self) -> ResolveDescriptor {
        let paths = &self.paths;
        let node_modules = paths.from_config("../node_modules");

        ResolveDescriptor {
            extensions: vec![".js".to_string(), ".scss".to_string(), ".vue".to_string()],
            alias: AliasTable(vec![
                Alias::exact("vue", "vue/dist/vue.esm.js"),
                Alias::prefix("modernizr", paths.from_config("../.modernizr")),
                Alias::prefix("modules", node_modules.clone()),
                Alias::prefix("images", paths.in_src("assets/images")),
                Alias::prefix("fonts", paths.in_src("assets/fonts")),
                Alias::prefix("variables", paths.in_src("assets/sass/variables")),
                Alias::prefix("settings", paths.in_src("assets/sass/1-settings/index")),
                Alias::prefix(
                    "utilityFunctions",
                    paths.in_src("assets/sass/2-utility-functions/index"),
                ),
                Alias::prefix("vue-mirror", paths.from_config("../src")),
            ]),
            modules: vec![paths.src.clone(), node_modules],
        }
    }

    fn style_chain(&self, extra: &[&str]) -> Vec<LoaderStep> {
        let extract = self.mode.pick("vue-style-loader", CSS_EXTRACT_LOADER);
        let mut chain = vec![
            LoaderStep::new(extract),
            LoaderStep::new("css-loader"),
            LoaderStep::new("postcss-loader"),
        ];
        chain.extend(extra.iter().map(|loader| LoaderStep::new(loader)));
        chain
    }

    fn rules(&self) -> ModuleRules {
        let mode = self.mode;
        let babel = match if_dev(mode, true) {
            Some(cache) => LoaderStep::new("babel-loader").with_option("cacheDirectory", cache),
            None => LoaderStep::new("babel-loader"),
        };
        let images = FilenamePattern::hashed_in(mode, "assets/images", HashKind::Build, EXT_TOKEN);
        let fonts = FilenamePattern::hashed_in(mode, "assets/fonts", HashKind::Build, EXT_TOKEN);

        ModuleRules::new(vec![
            Rule::new(r"\.modernizr$", vec![LoaderStep::new("modernizr-loader")]),
            Rule::new(r"\.vue$", vec![LoaderStep::new("vue-loader")]),
            Rule::new(r"\.js$", vec![babel])
                .excluding(Exclusion::new("node_modules").unless_followed_by("/quill")),
            Rule::new(r"\.(graphql|gql)$", vec![LoaderStep::new("graphql-tag/loader")])
                .excluding(Exclusion::new("node_modules")),
            Rule::new(r"\.css$", self.style_chain(&[])),
            Rule::new(r"\.scss$", self.style_chain(&["sass-loader"])),
            Rule::new(
                r"\.(png|jpe?g|gif|svg|ico)(\?.*)?$",
                vec![LoaderStep::file_output("file-loader", &images)],
            ),
            Rule::new(
                r"\.(woff2?|eot|ttf|otf)(\?.*)?$",
                vec![LoaderStep::file_output("file-loader", &fonts)],
            ),
        ])
    }

    fn plugins(&self, version: BuildVersion) -> Vec<PluginSpec> {
        let mode = self.mode;
        let paths = &self.paths;
        let css_name = FilenamePattern::hashed_in(mode, "assets/css", HashKind::Build, "css");

        compact([
            Some(PluginSpec::Manifest {
                file_name: MANIFEST_FILE.to_string(),
                write_to_file_emit: true,
            }),
            Some(PluginSpec::Define {
                process_env: EnvTable::for_mode(mode, version),
            }),
            Some(PluginSpec::Copy {
                patterns: vec![CopyPattern {
                    context: paths.in_src("assets/static"),
                    from_glob: "**/*".to_string(),
                    dot: false,
                    to: paths.build.join("assets"),
                }],
            }),
            if_dev(mode, PluginSpec::HotModuleReplacement),
            Some(PluginSpec::Provide {
                bindings: BTreeMap::from([("collect".to_string(), "collect.js".to_string())]),
            }),
            Some(PluginSpec::Html {
                filename: "index.html".to_string(),
                template: paths.in_src("index.html"),
                inject: true,
                minify: if_prod(
                    mode,
                    HtmlMinify {
                        remove_comments: true,
                        collapse_whitespace: true,
                        remove_attribute_quotes: true,
                    },
                ),
                build_version: version,
                chunks_sort_mode: "none".to_string(),
            }),
            Some(PluginSpec::VueLoader),
            if_prod(
                mode,
                PluginSpec::MiniCssExtract {
                    filename: css_name.clone(),
                    chunk_filename: css_name,
                },
            ),
            if_prod(
                mode,
                PluginSpec::OptimizeCssAssets {
                    css_processor_options: CssProcessorOptions {
                        reduce_idents: false,
                        autoprefixer: false,
                        zindex: false,
                        discard_comments: DiscardComments { remove_all: true },
                    },
                },
            ),
            Some(PluginSpec::SvgStore {
                prefix: "icon--".to_string(),
                svgo_plugins: vec![
                    SvgoToggle::off("cleanupIDs"),
                    SvgoToggle::off("collapseGroups"),
                    SvgoToggle::on("removeTitle"),
                ],
            }),
            Some(PluginSpec::Imagemin {
                optipng: if_prod(mode, OptipngOptions { optimization_level: 3 }),
                jpegtran: if_prod(
                    mode,
                    JpegtranOptions {
                        progressive: true,
                        quality: 80,
                    },
                ),
                svgo: if_prod(
                    mode,
                    vec![
                        SvgoToggle::off("cleanupIDs"),
                        SvgoToggle::off("removeViewBox"),
                        SvgoToggle::off("removeUselessStrokeAndFill"),
                        SvgoToggle::off("removeEmptyAttrs"),
                    ],
                ),
            }),
        ])
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl BuildDescriptor {
    pub fn entry_sources(&self, name: &str) -> &[String] {
        self.entry.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn plugin_kinds(&self) -> Vec<PluginKind> {
        self.plugins.iter().map(PluginSpec::kind).collect()
    }

    pub fn plugin(&self, kind: PluginKind) -> Option<&PluginSpec> {
        self.plugins.iter().find(|plugin| plugin.kind() == kind)
    }

    pub fn has_plugin(&self, kind: PluginKind) -> bool {
        self.plugin(kind).is_some()
    }

    pub fn env(&self) -> Option<&EnvTable> {
        match self.plugin(PluginKind::Define) {
            Some(PluginSpec::Define { process_env }) => Some(process_env),
            _ => None,
        }
    }

    pub fn build_version(&self) -> Option<BuildVersion> {
        self.env().and_then(EnvTable::build_version)
    }

    /// Every filename template that names an emitted file, labelled by asset type
    pub fn output_patterns(&self) -> Vec<(String, FilenamePattern)> {
        let mut patterns = vec![
            ("script".to_string(), self.output.filename.clone()),
            ("script-chunk".to_string(), self.output.chunk_filename.clone()),
        ];

        for rule in &self.module.rules {
            if let Some(name) = rule.output_name() {
                patterns.push((format!("rule {}", rule.test.source()), name));
            }
        }

        for plugin in &self.plugins {
            for name in plugin.output_names() {
                patterns.push((format!("plugin {}", plugin.name()), name.clone()));
            }
        }

        patterns
    }

    /// Copy of the descriptor with the build version set to `version`
    pub fn with_build_version(&self, version: BuildVersion) -> Self {
        let mut copy = self.clone();
        copy.plugins = copy
            .plugins
            .into_iter()
            .map(|plugin| plugin.with_build_version(version))
            .collect();
        copy
    }

    /// Stable hash of the descriptor, ignoring the build version
    pub fn fingerprint(&self) -> Result<String> {
        let normalized = self.with_build_version(BuildVersion(0));
        let bytes = serde_json::to_vec(&normalized)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    pub fn validate(&self) -> Result<()> {
        self.module.validate()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn descriptor(mode: Mode) -> BuildDescriptor {
        DescriptorBuilder::new(mode)
            .with_paths(ProjectPaths::from_project_root("/app"))
            .with_build_version(BuildVersion(1_600_000_000_000))
            .build()
    }

    #[test]
    fn test_dev_entry_includes_hot_client() {
        let dev = descriptor(Mode::Development);
        assert_eq!(
            dev.entry_sources(APP_ENTRY),
            &[
                HOT_CLIENT.to_string(),
                "/app/src/assets/sass/main.scss".to_string(),
                "/app/src/main.js".to_string(),
            ]
        );
    }

    #[test]
    fn test_prod_entry_drops_hot_client() {
        let prod = descriptor(Mode::Production);
        assert_eq!(
            prod.entry_sources(APP_ENTRY),
            &[
                "/app/src/assets/sass/main.scss".to_string(),
                "/app/src/main.js".to_string(),
            ]
        );
    }

    #[test]
    fn test_alias_targets_resolve_from_config_dir() {
        let prod = descriptor(Mode::Production);
        let alias = &prod.resolve.alias;
        assert_eq!(alias.get("vue$").unwrap().target, PathBuf::from("vue/dist/vue.esm.js"));
        assert_eq!(alias.get("modules").unwrap().target, PathBuf::from("/app/node_modules"));
        assert_eq!(alias.get("vue-mirror").unwrap().target, PathBuf::from("/app/src"));
        assert_eq!(
            prod.resolve.modules,
            vec![PathBuf::from("/app/src"), PathBuf::from("/app/node_modules")]
        );
    }

    #[test]
    fn test_style_chain_per_mode() {
        let dev = descriptor(Mode::Development);
        let prod = descriptor(Mode::Production);

        let dev_scss = dev.module.rule_for("main.scss").unwrap().unwrap();
        let prod_scss = prod.module.rule_for("main.scss").unwrap().unwrap();

        assert_eq!(
            dev_scss.loader_names(),
            vec!["vue-style-loader", "css-loader", "postcss-loader", "sass-loader"]
        );
        assert_eq!(
            prod_scss.loader_names(),
            vec![CSS_EXTRACT_LOADER, "css-loader", "postcss-loader", "sass-loader"]
        );
    }

    #[test]
    fn test_babel_cache_only_in_development() {
        let dev = descriptor(Mode::Development);
        let prod = descriptor(Mode::Production);

        let dev_js = dev.module.rule_for("src/main.js").unwrap().unwrap();
        let prod_js = prod.module.rule_for("src/main.js").unwrap().unwrap();

        assert_eq!(dev_js.chain[0].options["cacheDirectory"], true);
        assert!(prod_js.chain[0].options.is_empty());
    }

    #[test]
    fn test_html_minify_only_in_production() {
        let dev = descriptor(Mode::Development);
        let prod = descriptor(Mode::Production);

        assert!(matches!(
            dev.plugin(PluginKind::Html),
            Some(PluginSpec::Html { minify: None, .. })
        ));
        assert!(matches!(
            prod.plugin(PluginKind::Html),
            Some(PluginSpec::Html { minify: Some(_), .. })
        ));
    }

    #[test]
    fn test_build_version_shared_by_define_and_html() {
        let prod = descriptor(Mode::Production);
        assert_eq!(prod.build_version(), Some(BuildVersion(1_600_000_000_000)));
        assert!(matches!(
            prod.plugin(PluginKind::Html),
            Some(PluginSpec::Html { build_version: BuildVersion(1_600_000_000_000), .. })
        ));
    }

    #[test]
    fn test_fingerprint_ignores_build_version() {
        let a = descriptor(Mode::Production);
        let b = a.with_build_version(BuildVersion(1));
        assert_ne!(a, b);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_fingerprint_differs_between_modes() {
        let dev = descriptor(Mode::Development);
        let prod = descriptor(Mode::Production);
        assert_ne!(dev.fingerprint().unwrap(), prod.fingerprint().unwrap());
    }

    #[test]
    fn test_default_paths_are_absolute() {
        let prod = resolve_for_mode(Mode::Production);
        assert!(prod.output.path.is_absolute(), "{:?}", prod.output.path);
        assert!(prod.resolve.modules.iter().all(|dir| dir.is_absolute()));
        assert!(prod
            .entry_sources(APP_ENTRY)
            .iter()
            .all(|source| Path::new(source).is_absolute()));
    }

    #[test]
    fn test_validate() {
        for mode in Mode::ALL {
            descriptor(mode).validate().unwrap();
        }
    }
}
