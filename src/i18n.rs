//! Localized labels used by tool grouping

use serde::{Deserialize, Serialize};

/// Locale used when a tag is unknown
pub const DEFAULT_LOCALE: &str = "en";

/// Display labels for the fixed tool groups and the fallback bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub local: String,
    pub langchain: String,
    pub other: String,
}

impl Labels {
    pub fn english() -> Self {
        Self {
            local: "Local".to_string(),
            langchain: "LangChain".to_string(),
            other: "Other".to_string(),
        }
    }

    pub fn chinese() -> Self {
        Self {
            local: "本地工具".to_string(),
            langchain: "LangChain".to_string(),
            other: "其他".to_string(),
        }
    }

    /// Labels for a language tag such as `en-US` or `zh-Hans-CN`.
    ///
    /// Matching is on the primary subtag, case-insensitive; unknown tags get English.
    pub fn for_locale(tag: &str) -> Self {
        match primary_subtag(tag).as_str() {
            "zh" => Self::chinese(),
            "en" => Self::english(),
            other => {
                log::debug!("No labels for locale '{}', using {}", other, DEFAULT_LOCALE);
                Self::english()
            }
        }
    }

    /// Replace individual labels, ignoring blank overrides
    pub fn with_overrides(mut self, overrides: &LabelOverrides) -> Self {
        if let Some(v) = non_blank(&overrides.local) {
            self.local = v;
        }
        if let Some(v) = non_blank(&overrides.langchain) {
            self.langchain = v;
        }
        if let Some(v) = non_blank(&overrides.other) {
            self.other = v;
        }
        self
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

/// Per-label overrides read from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOverrides {
    pub local: Option<String>,
    pub langchain: Option<String>,
    pub other: Option<String>,
}

fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_locale_resolves_primary_subtag() {
        assert_eq!(Labels::for_locale("en-US"), Labels::english());
        assert_eq!(Labels::for_locale("zh-CN"), Labels::chinese());
        assert_eq!(Labels::for_locale("ZH_hans"), Labels::chinese());
        assert_eq!(Labels::for_locale("zh"), Labels::chinese());
    }

    #[test]
    fn test_for_locale_falls_back_to_english() {
        assert_eq!(Labels::for_locale("fr-FR"), Labels::english());
        assert_eq!(Labels::for_locale(""), Labels::english());
    }

    #[test]
    fn test_overrides_skip_blank_values() {
        let overrides = LabelOverrides {
            local: Some("Built-in".to_string()),
            langchain: Some("  ".to_string()),
            other: None,
        };
        let labels = Labels::english().with_overrides(&overrides);
        assert_eq!(labels.local, "Built-in");
        assert_eq!(labels.langchain, "LangChain");
        assert_eq!(labels.other, "Other");
    }
}
