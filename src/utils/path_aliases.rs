use crate::core::models::{Alias, AliasTable};
use crate::utils::Logger;
use std::path::PathBuf;

/// Rewrites import specifiers through a descriptor's alias table,
/// the way the bundler will at build time.
pub struct AliasResolver<'a> {
    aliases: &'a AliasTable,
}

impl<'a> AliasResolver<'a> {
    pub fn new(aliases: &'a AliasTable) -> Self {
        Logger::debug(&format!("🔗 Initialized AliasResolver with {} aliases", aliases.len()));
        Self { aliases }
    }

    /// Resolve an import specifier; `None` when no alias applies.
    /// Aliases are tried in table order and the first match wins.
    pub fn resolve(&self, import_path: &str) -> Option<PathBuf> {
        let (alias, rest) = self.find(import_path)?;

        let resolved = match rest {
            Some(rest) => alias.target.join(rest),
            None => alias.target.clone(),
        };

        Logger::debug(&format!("🔗 Resolved alias: {} → {}", import_path, resolved.display()));
        Some(resolved)
    }

    pub fn matches_alias(&self, import_path: &str) -> bool {
        self.find(import_path).is_some()
    }

    /// The alias that applies to `import_path`, with the remainder after it
    pub fn find<'p>(&self, import_path: &'p str) -> Option<(&'a Alias, Option<&'p str>)> {
        self.aliases.iter().find_map(|alias| {
            if import_path == alias.name {
                return Some((alias, None));
            }
            if alias.exact {
                return None;
            }
            import_path
                .strip_prefix(alias.name.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .map(|rest| (alias, Some(rest)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        AliasTable(vec![
            Alias::exact("vue", "vue/dist/vue.esm.js"),
            Alias::prefix("images", "/project/src/assets/images"),
            Alias::prefix("vue-mirror", "/project/src"),
        ])
    }

    #[test]
    fn test_exact_alias_match() {
        let aliases = table();
        let resolver = AliasResolver::new(&aliases);

        assert_eq!(resolver.resolve("vue"), Some(PathBuf::from("vue/dist/vue.esm.js")));
    }

    #[test]
    fn test_exact_alias_ignores_subpaths() {
        let aliases = table();
        let resolver = AliasResolver::new(&aliases);

        assert_eq!(resolver.resolve("vue/types/index"), None);
    }

    #[test]
    fn test_pattern_alias_match() {
        let aliases = table();
        let resolver = AliasResolver::new(&aliases);

        assert_eq!(
            resolver.resolve("images/logo.svg"),
            Some(PathBuf::from("/project/src/assets/images/logo.svg"))
        );
    }

    #[test]
    fn test_name_prefix_is_not_a_match() {
        let aliases = table();
        let resolver = AliasResolver::new(&aliases);

        // `vue-mirror` must not be swallowed by the `vue` alias
        assert_eq!(
            resolver.resolve("vue-mirror/components/Button.vue"),
            Some(PathBuf::from("/project/src/components/Button.vue"))
        );
        assert!(!resolver.matches_alias("imagesets/a.png"));
    }

    #[test]
    fn test_no_alias_match() {
        let aliases = table();
        let resolver = AliasResolver::new(&aliases);

        assert_eq!(resolver.resolve("./relative/path.js"), None);
        assert!(!resolver.matches_alias("lodash"));
    }
}
