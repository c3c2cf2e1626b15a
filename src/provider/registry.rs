use serde::Serialize;

use crate::provider::ProviderKind;

/// Registry row describing one data source
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub kind: ProviderKind,
    pub name: String,
    pub base_url: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderInfo>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        let entry = |kind, name: &str, base_url: Option<&str>, enabled| ProviderInfo {
            kind,
            name: name.to_string(),
            base_url: base_url.map(str::to_string),
            enabled,
        };

        Self {
            providers: vec![
                entry(ProviderKind::Mock, "Mock API", None, true),
                entry(
                    ProviderKind::GoogleTrends,
                    "Google Trends",
                    Some("https://trends.google.com/trends/api"),
                    true,
                ),
                entry(
                    ProviderKind::KeywordPlanner,
                    "Google Keyword Planner",
                    Some("https://googleads.googleapis.com"),
                    false,
                ),
                entry(
                    ProviderKind::Semrush,
                    "SEMrush",
                    Some("https://api.semrush.com"),
                    false,
                ),
                entry(
                    ProviderKind::Ahrefs,
                    "Ahrefs",
                    Some("https://apiv2.ahrefs.com"),
                    false,
                ),
            ],
        }
    }
}

impl ProviderRegistry {
    /// Default registry; keyed providers are enabled when their API key is set
    pub fn from_env() -> Self {
        let mut registry = Self::default();
        for (kind, var) in [
            (ProviderKind::KeywordPlanner, "GOOGLE_ADS_API_KEY"),
            (ProviderKind::Semrush, "SEMRUSH_API_KEY"),
            (ProviderKind::Ahrefs, "AHREFS_API_KEY"),
        ] {
            if std::env::var(var).is_ok_and(|key| !key.trim().is_empty()) {
                registry.set_enabled(kind, true);
            }
        }
        registry
    }

    pub fn list(&self) -> &[ProviderInfo] {
        &self.providers
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderInfo> {
        self.providers.iter().find(|p| p.kind == kind)
    }

    pub fn is_enabled(&self, kind: ProviderKind) -> bool {
        self.get(kind).is_some_and(|p| p.enabled)
    }

    pub fn set_enabled(&mut self, kind: ProviderKind, enabled: bool) {
        if let Some(info) = self.providers.iter_mut().find(|p| p.kind == kind) {
            info.enabled = enabled;
        }
    }
}
