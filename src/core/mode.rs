// Mode selection helpers.
// Every mode-dependent value in the descriptor goes through one of these,
// with the mode passed explicitly rather than read from a global.

use crate::utils::BuildError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Development, Mode::Production];

    pub fn is_dev(self) -> bool {
        matches!(self, Mode::Development)
    }

    pub fn is_prod(self) -> bool {
        matches!(self, Mode::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    /// Pick `dev` in development, `prod` otherwise
    pub fn pick<T>(self, dev: T, prod: T) -> T {
        pick_by_mode(self, dev, prod)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(BuildError::InvalidMode(other.to_string())),
        }
    }
}

pub fn pick_by_mode<T>(mode: Mode, dev: T, prod: T) -> T {
    match mode {
        Mode::Development => dev,
        Mode::Production => prod,
    }
}

/// `Some(value)` in development, a disabled slot in production
pub fn if_dev<T>(mode: Mode, value: T) -> Option<T> {
    pick_by_mode(mode, Some(value), None)
}

/// `Some(value)` in production, a disabled slot in development
pub fn if_prod<T>(mode: Mode, value: T) -> Option<T> {
    pick_by_mode(mode, None, Some(value))
}

/// Drop disabled slots, keeping the remaining items in order
pub fn compact<T, I>(items: I) -> Vec<T>
where
    I: IntoIterator<Item = Option<T>>,
{
    items.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_by_mode() {
        assert_eq!(pick_by_mode(Mode::Development, "a", "b"), "a");
        assert_eq!(pick_by_mode(Mode::Production, "a", "b"), "b");
        assert_eq!(Mode::Production.pick(1, 2), 2);
    }

    #[test]
    fn test_if_dev_and_if_prod() {
        assert_eq!(if_dev(Mode::Development, 1), Some(1));
        assert_eq!(if_dev(Mode::Production, 1), None);
        assert_eq!(if_prod(Mode::Development, 1), None);
        assert_eq!(if_prod(Mode::Production, 1), Some(1));
    }

    #[test]
    fn test_compact_preserves_order() {
        let items = vec![Some("A"), None, Some("B"), None];
        assert_eq!(compact(items), vec!["A", "B"]);
    }

    #[test]
    fn test_compact_all_disabled() {
        let items: Vec<Option<u8>> = vec![None, None];
        assert!(compact(items).is_empty());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("production".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!("Dev".parse::<Mode>().unwrap(), Mode::Development);
        assert!("staging".parse::<Mode>().is_err());
    }
}
