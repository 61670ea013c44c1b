//! Shared credential types for AI providers.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// API key credentials for AI providers.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiKeyCredentials {
    /// API key.
    pub api_key: String,
}

impl ApiKeyCredentials {
    /// Creates credentials from an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ApiKeyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyCredentials")
            .field("api_key", &"***")
            .finish()
    }
}

/// Credentials for the supported providers.
///
/// Both providers support completion and embedding.
#[derive(Debug, Clone, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum Credentials {
    /// OpenAI credentials.
    #[strum(serialize = "openai")]
    OpenAi(ApiKeyCredentials),
    /// Google Gemini credentials.
    #[strum(serialize = "gemini")]
    Gemini(ApiKeyCredentials),
}

impl Credentials {
    /// Returns the provider name as a string.
    pub fn provider(&self) -> &'static str {
        self.into()
    }
}
