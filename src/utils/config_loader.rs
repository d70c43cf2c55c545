use crate::paths::{absolutize, ProjectPaths, DEFAULT_BUILD_DIR, DEFAULT_CONFIG_DIR, DEFAULT_SRC_DIR};
use crate::utils::{BuildError, Logger, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "scrumpy.config.json";

/// Project layout overrides (scrumpy.config.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory of the bundler configuration (default: "webpack")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<String>,

    /// Source directory (default: "src")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_dir: Option<String>,

    /// Output directory (default: "dist")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<String>,

    /// Public base path of emitted assets (default: "/")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
}

/// Layout and public path after merging file config with CLI overrides
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProject {
    pub paths: ProjectPaths,
    pub public_path: String,
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub src_dir: Option<String>,
    pub build_dir: Option<String>,
    pub public_path: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load scrumpy.config.json from the project root, if present
    pub fn load_from_file(root: &Path) -> Result<Option<ProjectConfig>> {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE));
            return Ok(None);
        }

        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(&config_path)?;
        let config: ProjectConfig = serde_json::from_str(&content).map_err(|e| {
            BuildError::config_in(format!("Failed to parse {}: {}", CONFIG_FILE, e), config_path.clone())
        })?;

        Ok(Some(config))
    }

    /// CLI > config file > defaults. Relative directories are taken from `root`.
    pub fn merge_with_cli(
        file_config: Option<ProjectConfig>,
        root: &Path,
        cli: CliOverrides,
    ) -> ResolvedProject {
        let base = file_config.unwrap_or_default();

        let dir = |flag: Option<String>, file: Option<String>, default: &str| -> PathBuf {
            let chosen = flag.or(file).unwrap_or_else(|| default.to_string());
            if Path::new(&chosen).is_absolute() {
                PathBuf::from(chosen)
            } else {
                root.join(chosen)
            }
        };

        let paths = ProjectPaths::new(
            dir(None, base.config_dir, DEFAULT_CONFIG_DIR),
            dir(cli.src_dir, base.src_dir, DEFAULT_SRC_DIR),
            dir(cli.build_dir, base.build_dir, DEFAULT_BUILD_DIR),
        );

        ResolvedProject {
            paths,
            public_path: cli
                .public_path
                .or(base.public_path)
                .unwrap_or_else(|| "/".to_string()),
        }
    }

    /// Load and merge, anchoring a relative `root` at the working directory
    /// so every path handed to the bundler is absolute.
    pub fn load(root: &Path, cli: CliOverrides) -> Result<ResolvedProject> {
        let root = absolutize(root);
        let file_config = Self::load_from_file(&root)?;
        Ok(Self::merge_with_cli(file_config, &root, cli))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file_not_exists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load_from_file(temp_dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_from_file_valid() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"{"buildDir": "public", "publicPath": "/static/"}"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.build_dir, Some("public".to_string()));
        assert_eq!(config.public_path, Some("/static/".to_string()));
        assert_eq!(config.src_dir, None);
    }

    #[test]
    fn test_load_from_file_invalid() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), r#"{"outdir": 3}"#).unwrap();

        let err = ConfigLoader::load_from_file(temp_dir.path()).unwrap_err();
        assert!(matches!(err, BuildError::Config { file: Some(_), .. }));
    }

    #[test]
    fn test_load_relative_root_is_absolute() {
        let resolved = ConfigLoader::load(Path::new("."), CliOverrides::default()).unwrap();

        assert!(resolved.paths.build.is_absolute());
        assert!(resolved.paths.src.is_absolute());
        assert_eq!(resolved.paths, ProjectPaths::from_working_dir());
    }

    #[test]
    fn test_merge_defaults() {
        let resolved = ConfigLoader::merge_with_cli(None, Path::new("/app"), CliOverrides::default());

        assert_eq!(resolved.paths, ProjectPaths::from_project_root("/app"));
        assert_eq!(resolved.public_path, "/");
    }

    #[test]
    fn test_merge_with_cli_override() {
        let file_config = ProjectConfig {
            build_dir: Some("public".to_string()),
            public_path: Some("/static/".to_string()),
            ..Default::default()
        };

        let resolved = ConfigLoader::merge_with_cli(
            Some(file_config),
            Path::new("/app"),
            CliOverrides {
                build_dir: Some("/srv/www".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(resolved.paths.build, PathBuf::from("/srv/www"));
        assert_eq!(resolved.paths.src, PathBuf::from("/app/src"));
        assert_eq!(resolved.public_path, "/static/");
    }
}
