use crate::core::mode::{if_prod, Mode};
use serde::Serialize;
use std::fmt;

pub const NAME_TOKEN: &str = "[name]";
pub const HASH_TOKEN: &str = "[hash]";
pub const CHUNKHASH_TOKEN: &str = "[chunkhash]";
pub const EXT_TOKEN: &str = "[ext]";

/// Which hash placeholder a production filename carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    /// Hash of the whole compilation
    Build,
    /// Hash of the individual chunk
    Chunk,
}

impl HashKind {
    fn token(self) -> &'static str {
        match self {
            HashKind::Build => HASH_TOKEN,
            HashKind::Chunk => CHUNKHASH_TOKEN,
        }
    }
}

/// An output filename template such as `assets/js/[name].[hash].js`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilenamePattern(String);

impl FilenamePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// `<dir>/[name](.<hash>).<ext>`, with the hash segment present only in production.
    ///
    /// `ext` is used verbatim, so pass `EXT_TOKEN` to keep the source extension.
    pub fn hashed_in(mode: Mode, dir: &str, hash: HashKind, ext: &str) -> Self {
        let hash_segment = if_prod(mode, format!(".{}", hash.token())).unwrap_or_default();
        Self(format!("{}/{}{}.{}", dir, NAME_TOKEN, hash_segment, ext))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains_hash(&self) -> bool {
        self.0.contains(HASH_TOKEN) || self.0.contains(CHUNKHASH_TOKEN)
    }

    /// Substitute the placeholders the way the bundler would for one asset
    pub fn render(&self, name: &str, hash: &str, ext: &str) -> String {
        self.0
            .replace(NAME_TOKEN, name)
            .replace(CHUNKHASH_TOKEN, hash)
            .replace(HASH_TOKEN, hash)
            .replace(EXT_TOKEN, ext)
    }
}

impl fmt::Display for FilenamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashed_in_production() {
        let pattern = FilenamePattern::hashed_in(Mode::Production, "assets/js", HashKind::Build, "js");
        assert_eq!(pattern.as_str(), "assets/js/[name].[hash].js");
        assert!(pattern.contains_hash());
    }

    #[test]
    fn test_plain_in_development() {
        let pattern =
            FilenamePattern::hashed_in(Mode::Development, "assets/fonts", HashKind::Build, EXT_TOKEN);
        assert_eq!(pattern.as_str(), "assets/fonts/[name].[ext]");
        assert!(!pattern.contains_hash());
    }

    #[test]
    fn test_chunk_hash() {
        let pattern = FilenamePattern::hashed_in(Mode::Production, "assets/js", HashKind::Chunk, "js");
        assert_eq!(pattern.as_str(), "assets/js/[name].[chunkhash].js");
        assert!(pattern.contains_hash());
    }

    #[test]
    fn test_render() {
        let pattern = FilenamePattern::new("assets/images/[name].[hash].[ext]");
        assert_eq!(
            pattern.render("logo", "3f2a9c", "png"),
            "assets/images/logo.3f2a9c.png"
        );
    }
}
