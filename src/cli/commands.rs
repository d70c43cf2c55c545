use crate::core::{BuildDescriptor, DescriptorBuilder, Mode};
use crate::utils::{AliasResolver, BuildError, CliOverrides, ConfigLoader, Logger, Result, Timer, Ui};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "scrumpy-build")]
#[command(about = "Resolve the front-end build descriptor for development or production")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that resolves a descriptor
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Build mode (development | production)
    #[arg(short, long, env = "NODE_ENV", default_value = "development", value_parser = parse_mode)]
    pub mode: Mode,
    /// Project root directory
    #[arg(short, long, default_value = ".")]
    pub root: String,
    /// Source directory, relative to the root
    #[arg(long)]
    pub src_dir: Option<String>,
    /// Output directory, relative to the root
    #[arg(long)]
    pub build_dir: Option<String>,
    /// Public base path of emitted assets
    #[arg(long)]
    pub public_path: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved descriptor as JSON
    Describe {
        #[command(flatten)]
        args: ResolveArgs,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show which rule and loader chain handle a file
    Explain {
        #[command(flatten)]
        args: ResolveArgs,
        /// Module request path, e.g. src/components/App.vue
        file: String,
    },
    /// Resolve an import specifier through the alias table
    Alias {
        #[command(flatten)]
        args: ResolveArgs,
        specifier: String,
    },
    /// Compare plugin activation between development and production
    Plugins {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        root: String,
    },
    /// Summarize the descriptor for one mode
    Info {
        #[command(flatten)]
        args: ResolveArgs,
    },
}

fn parse_mode(value: &str) -> std::result::Result<Mode, String> {
    value.parse::<Mode>().map_err(|e| e.to_string())
}

pub struct CliHandler;

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Describe { args, out } => self.handle_describe_command(&args, out.as_deref()).await,
            Commands::Explain { args, file } => self.handle_explain_command(&args, &file),
            Commands::Alias { args, specifier } => self.handle_alias_command(&args, &specifier),
            Commands::Plugins { root } => self.handle_plugins_command(&root),
            Commands::Info { args } => self.handle_info_command(&args),
        }
    }

    async fn handle_describe_command(&self, args: &ResolveArgs, out: Option<&Path>) -> Result<()> {
        let descriptor = resolve(args)?;
        let json = descriptor.to_json_pretty()?;

        match out {
            Some(path) => {
                write_descriptor(path, &json).await?;
                Logger::written(&path.display().to_string(), json.len());
            }
            None => println!("{}", json),
        }

        Ok(())
    }

    fn handle_explain_command(&self, args: &ResolveArgs, file: &str) -> Result<()> {
        let descriptor = resolve(args)?;

        let Some(rule) = descriptor.module.rule_for(file)? else {
            Logger::warn(&format!("No rule handles {}", file));
            return Ok(());
        };

        println!("rule:   {}", rule.test.source());
        if let Some(exclusion) = &rule.exclude {
            println!("skips:  {}", exclusion.pattern.source());
        }
        println!("chain:  {}", rule.loader_names().join(" → "));

        if let Some(name) = rule.output_name() {
            let path = Path::new(file);
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(file);
            let ext = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| ext.split('?').next().unwrap_or(ext))
                .unwrap_or_default();
            println!("emits:  {}", name.render(stem, "<hash>", ext));
        }

        Ok(())
    }

    fn handle_alias_command(&self, args: &ResolveArgs, specifier: &str) -> Result<()> {
        let descriptor = resolve(args)?;
        let resolver = AliasResolver::new(&descriptor.resolve.alias);

        match resolver.find(specifier) {
            Some((alias, _)) => {
                let target = resolver
                    .resolve(specifier)
                    .ok_or_else(|| BuildError::Other(format!("alias {} did not resolve", alias.key())))?;
                println!("{} → {}  (via {})", specifier, target.display(), alias.key());
            }
            None => println!("{} is not aliased", specifier),
        }

        Ok(())
    }

    fn handle_plugins_command(&self, root: &str) -> Result<()> {
        let project = ConfigLoader::load(Path::new(root), CliOverrides::default())?;
        let build = |mode: Mode| {
            DescriptorBuilder::new(mode)
                .with_paths(project.paths.clone())
                .with_public_path(project.public_path.clone())
                .build()
        };

        Ui::show_banner();
        Ui::show_plugin_matrix(&build(Mode::Development), &build(Mode::Production));
        Ok(())
    }

    fn handle_info_command(&self, args: &ResolveArgs) -> Result<()> {
        let descriptor = resolve(args)?;
        let fingerprint = descriptor.fingerprint()?;

        Ui::show_banner();
        Ui::show_summary(&descriptor, &fingerprint);
        Ok(())
    }
}

/// Load project config, merge CLI overrides and resolve the descriptor
pub fn resolve(args: &ResolveArgs) -> Result<BuildDescriptor> {
    let _timer = Timer::start("descriptor resolution");
    Logger::resolving(args.mode.as_str(), &args.root);

    let project = ConfigLoader::load(
        Path::new(&args.root),
        CliOverrides {
            src_dir: args.src_dir.clone(),
            build_dir: args.build_dir.clone(),
            public_path: args.public_path.clone(),
        },
    )?;

    let descriptor = DescriptorBuilder::new(args.mode)
        .with_paths(project.paths)
        .with_public_path(project.public_path)
        .build();

    descriptor.validate()?;
    Logger::resolved(
        descriptor.entry.values().map(Vec::len).sum(),
        descriptor.module.len(),
        descriptor.plugins.len(),
    );

    Ok(descriptor)
}

/// Write a serialized descriptor, creating parent directories as needed
pub async fn write_descriptor(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_describe_command() {
        let cli = Cli::try_parse_from([
            "scrumpy-build",
            "describe",
            "--mode",
            "production",
            "--root",
            "/app",
            "--out",
            "dist/webpack.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Describe { args, out } => {
                assert_eq!(args.mode, Mode::Production);
                assert_eq!(args.root, "/app");
                assert_eq!(out, Some(PathBuf::from("dist/webpack.json")));
            }
            _ => panic!("expected describe"),
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["scrumpy-build", "info", "--mode", "staging"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_write_descriptor_creates_parents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out/nested/descriptor.json");

        write_descriptor(&path, "{}").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_relative_root_yields_absolute_output() {
        let args = ResolveArgs {
            mode: Mode::Production,
            root: ".".to_string(),
            src_dir: None,
            build_dir: None,
            public_path: None,
        };

        let descriptor = resolve(&args).unwrap();

        assert!(descriptor.output.path.is_absolute(), "{:?}", descriptor.output.path);
        assert_eq!(descriptor.output.path, crate::paths::working_dir().join("dist"));
    }

    #[test]
    fn test_resolve_with_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = ResolveArgs {
            mode: Mode::Production,
            root: temp_dir.path().to_string_lossy().into_owned(),
            src_dir: None,
            build_dir: Some("public".to_string()),
            public_path: Some("/static/".to_string()),
        };

        let descriptor = resolve(&args).unwrap();

        assert_eq!(descriptor.output.path, temp_dir.path().join("public"));
        assert_eq!(descriptor.output.public_path, "/static/");
    }
}
