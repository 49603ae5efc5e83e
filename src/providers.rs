use serde::Serialize;
use url::Url;

/// A remote chat endpoint the shell can load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub label: String,
    pub url: Url,
}

const BUILT_IN_PROVIDERS: &[(&str, &str)] = &[
    ("ChatGPT", "https://chat.openai.com"),
    ("Copilot", "https://copilot.microsoft.com/"),
    ("MistralAI", "https://chat.mistral.ai/chat"),
];

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    pub fn built_in() -> Self {
        let providers = BUILT_IN_PROVIDERS
            .iter()
            .map(|(label, url)| Provider {
                label: (*label).to_string(),
                url: Url::parse(url).expect("valid built-in provider url"),
            })
            .collect();
        Self { providers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.iter()
    }

    pub fn default_provider(&self) -> &Provider {
        &self.providers[0]
    }

    pub fn find(&self, label: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.label == label)
    }

    pub fn resolve(&self, label: &str) -> &Provider {
        self.find(label).unwrap_or_else(|| self.default_provider())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}
