//! One-shot feedback messages shown on the next rendered page.

use serde::{Deserialize, Serialize};

/// Severity of a flash message; doubles as the CSS modifier in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashLevel {
    /// Lowercase name used as a CSS class suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl std::fmt::Display for FlashLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued message with its severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub message: String,
    pub level: FlashLevel,
}

impl FlashMessage {
    #[must_use]
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, message)
    }

    #[must_use]
    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&FlashMessage::warning("careful")).unwrap_or_default();
        assert_eq!(json, r#"{"message":"careful","level":"warning"}"#);
    }

    #[test]
    fn test_level_css_name() {
        assert_eq!(FlashLevel::Danger.to_string(), "danger");
        assert_eq!(FlashMessage::success("ok").level.as_str(), "success");
    }
}
