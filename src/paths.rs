// Fixed source layout the descriptor is resolved against.

use std::path::{Component, Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = "webpack";
pub const DEFAULT_SRC_DIR: &str = "src";
pub const DEFAULT_BUILD_DIR: &str = "dist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Directory holding the bundler configuration; sibling paths are resolved from here
    pub config_dir: PathBuf,
    pub src: PathBuf,
    pub build: PathBuf,
}

impl ProjectPaths {
    pub fn new(config_dir: impl Into<PathBuf>, src: impl Into<PathBuf>, build: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: normalize(&config_dir.into()),
            src: normalize(&src.into()),
            build: normalize(&build.into()),
        }
    }

    pub fn from_project_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(
            root.join(DEFAULT_CONFIG_DIR),
            root.join(DEFAULT_SRC_DIR),
            root.join(DEFAULT_BUILD_DIR),
        )
    }

    /// Layout rooted at the process working directory
    pub fn from_working_dir() -> Self {
        Self::from_project_root(working_dir())
    }

    pub fn in_src(&self, relative: &str) -> PathBuf {
        self.src.join(relative)
    }

    /// Resolve `relative` against the config directory, e.g. `../node_modules`
    pub fn from_config(&self, relative: &str) -> PathBuf {
        normalize(&self.config_dir.join(relative))
    }
}

/// Current directory, falling back to the filesystem root when it is unavailable
pub fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))
}

/// Anchor a relative path at the working directory
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&working_dir().join(path))
    }
}

/// Lexically collapse `.` and `..` components. Never touches the file system.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
