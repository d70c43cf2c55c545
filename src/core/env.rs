// Build-time constants exposed to the application as `process.env.*`.

use crate::core::mode::Mode;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

static PROCESS_ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"process\.env\.([A-Za-z_][A-Za-z0-9_]*)").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnvKey {
    ApiBaseUrl,
    SocketKey,
    SocketHost,
    SubscriptionsHost,
    StripeKey,
    CrispWebsiteId,
    AnalyticsId,
    BuildVersion,
}

impl EnvKey {
    pub const ALL: [EnvKey; 8] = [
        EnvKey::ApiBaseUrl,
        EnvKey::SocketKey,
        EnvKey::SocketHost,
        EnvKey::SubscriptionsHost,
        EnvKey::StripeKey,
        EnvKey::CrispWebsiteId,
        EnvKey::AnalyticsId,
        EnvKey::BuildVersion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnvKey::ApiBaseUrl => "API_BASEURL",
            EnvKey::SocketKey => "SOCKET_KEY",
            EnvKey::SocketHost => "SOCKET_HOST",
            EnvKey::SubscriptionsHost => "SUBSCRIPTIONS_HOST",
            EnvKey::StripeKey => "STRIPE_KEY",
            EnvKey::CrispWebsiteId => "CRISP_WEBSITE_ID",
            EnvKey::AnalyticsId => "ANALYTICS_ID",
            EnvKey::BuildVersion => "BUILD_VERSION",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    Null,
    Str(String),
    Number(i64),
}

impl EnvValue {
    pub fn str(value: &str) -> Self {
        EnvValue::Str(value.to_string())
    }

    /// The JavaScript expression substituted for `process.env.KEY`
    pub fn expression(&self) -> String {
        match self {
            EnvValue::Null => "null".to_string(),
            EnvValue::Str(s) => serde_json::Value::String(s.clone()).to_string(),
            EnvValue::Number(n) => n.to_string(),
        }
    }

    /// The plain value, without JavaScript quoting
    pub fn literal(&self) -> Option<String> {
        match self {
            EnvValue::Null => None,
            EnvValue::Str(s) => Some(s.clone()),
            EnvValue::Number(n) => Some(n.to_string()),
        }
    }
}

/// Epoch milliseconds at which the descriptor was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct BuildVersion(pub i64);

impl BuildVersion {
    pub fn now() -> Self {
        BuildVersion(chrono::Utc::now().timestamp_millis())
    }
}

/// The complete, ordered set of injected constants for one mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTable {
    entries: Vec<(EnvKey, EnvValue)>,
}

impl EnvTable {
    pub fn for_mode(mode: Mode, build_version: BuildVersion) -> Self {
        let per_mode = |dev: &str, prod: &str| EnvValue::str(mode.pick(dev, prod));

        let entries = vec![
            (
                EnvKey::ApiBaseUrl,
                per_mode("http://local.app.scrumpy.io/api/", "https://app.scrumpy.io/api/"),
            ),
            (
                EnvKey::SocketKey,
                per_mode(
                    "981d87f7695904cec025e4039dd4048b",
                    "981d87f7695904cec025e4039dd4048b",
                ),
            ),
            (
                EnvKey::SocketHost,
                per_mode("http://local.socket.scrumpy.io/", "https://socket.scrumpy.io/"),
            ),
            (
                EnvKey::SubscriptionsHost,
                per_mode(
                    "ws://local.subscriptions.scrumpy.io/",
                    "wss://subscriptions.scrumpy.io/",
                ),
            ),
            (
                EnvKey::StripeKey,
                per_mode(
                    "pk_test_yU17swZxi2a289XgEI9F20qS",
                    "pk_live_XWgEzw9TgxpY8Tsf7PKXzk1k",
                ),
            ),
            (
                EnvKey::CrispWebsiteId,
                mode.pick(
                    EnvValue::Null,
                    EnvValue::str("463813ad-c274-4da1-8045-f5ceac88832b"),
                ),
            ),
            (
                EnvKey::AnalyticsId,
                mode.pick(EnvValue::Null, EnvValue::str("UA-93829826-2")),
            ),
            (EnvKey::BuildVersion, EnvValue::Number(build_version.0)),
        ];

        Self { entries }
    }

    pub fn get(&self, key: EnvKey) -> Option<&EnvValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Plain value of a constant; `None` when it is injected as `null`
    pub fn literal(&self, key: EnvKey) -> Option<String> {
        self.get(key).and_then(EnvValue::literal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(EnvKey, EnvValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build_version(&self) -> Option<BuildVersion> {
        match self.get(EnvKey::BuildVersion) {
            Some(EnvValue::Number(n)) => Some(BuildVersion(*n)),
            _ => None,
        }
    }

    pub(crate) fn with_build_version(mut self, version: BuildVersion) -> Self {
        for (key, value) in &mut self.entries {
            if *key == EnvKey::BuildVersion {
                *value = EnvValue::Number(version.0);
            }
        }
        self
    }

    /// Replace `process.env.KEY` references with their define expressions.
    /// References to keys outside the table are left untouched.
    pub fn replace_in_code(&self, code: &str) -> String {
        PROCESS_ENV_REF
            .replace_all(code, |caps: &Captures| {
                EnvKey::from_name(&caps[1])
                    .and_then(|key| self.get(key))
                    .map(EnvValue::expression)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl Serialize for EnvTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            match value {
                EnvValue::Null => map.serialize_entry(key.name(), &Option::<String>::None)?,
                other => map.serialize_entry(key.name(), &other.expression())?,
            }
        }
        map.end()
    }
}
