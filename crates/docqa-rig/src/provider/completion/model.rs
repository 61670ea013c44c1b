//! Completion model references.

use serde::{Deserialize, Serialize};

use crate::provider::embedding::strip_gemini_prefix;

/// Output token cap applied to Gemini chat models.
const GEMINI_MAX_TOKENS: u64 = 1000;

/// Reference to a chat model of one provider, with its sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum CompletionModel {
    /// OpenAI chat model.
    OpenAi {
        name: String,
        temperature: f64,
        max_tokens: Option<u64>,
    },
    /// Google Gemini chat model.
    Gemini {
        name: String,
        temperature: f64,
        max_tokens: Option<u64>,
    },
}

impl CompletionModel {
    /// Creates an OpenAI model reference: temperature 0, no token cap.
    pub fn openai(name: impl Into<String>) -> Self {
        Self::OpenAi {
            name: name.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Creates a Gemini model reference: temperature 0, 1000 output tokens.
    ///
    /// A leading `models/` is stripped from the name.
    pub fn gemini(name: impl AsRef<str>) -> Self {
        Self::Gemini {
            name: strip_gemini_prefix(name.as_ref()).to_owned(),
            temperature: 0.0,
            max_tokens: Some(GEMINI_MAX_TOKENS),
        }
    }

    /// Returns the model name as sent to the provider.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi { name, .. } | Self::Gemini { name, .. } => name,
        }
    }

    /// Returns the sampling temperature.
    pub fn temperature(&self) -> f64 {
        match self {
            Self::OpenAi { temperature, .. } | Self::Gemini { temperature, .. } => *temperature,
        }
    }

    /// Returns the output token cap, if any.
    pub fn max_tokens(&self) -> Option<u64> {
        match self {
            Self::OpenAi { max_tokens, .. } | Self::Gemini { max_tokens, .. } => *max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_settings() {
        let model = CompletionModel::openai("gpt-4o-mini");
        assert_eq!(model.as_str(), "gpt-4o-mini");
        assert_eq!(model.temperature(), 0.0);
        assert_eq!(model.max_tokens(), None);
    }

    #[test]
    fn gemini_settings() {
        let model = CompletionModel::gemini("models/gemini-2.5-flash-lite");
        assert_eq!(model.as_str(), "gemini-2.5-flash-lite");
        assert_eq!(model.temperature(), 0.0);
        assert_eq!(model.max_tokens(), Some(1000));
    }
}
