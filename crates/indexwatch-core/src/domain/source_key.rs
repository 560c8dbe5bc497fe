use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SOURCE_KEY_LEN: usize = 256;

/// Provider-specific lookup key: a ticker for the quote API, a URL for a scraped page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceKey(String);

impl SourceKey {
    /// Parse a key, trimming surrounding whitespace. Case is preserved.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySourceKey);
        }

        let len = trimmed.chars().count();
        if len > MAX_SOURCE_KEY_LEN {
            return Err(ValidationError::SourceKeyTooLong {
                len,
                max: MAX_SOURCE_KEY_LEN,
            });
        }

        if let Some(index) = trimmed.chars().position(char::is_whitespace) {
            return Err(ValidationError::SourceKeyWhitespace { index });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Wraps a built-in key that is known to be valid.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_http_url(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }
}

impl Display for SourceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SourceKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for SourceKey {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SourceKey> for String {
    fn from(value: SourceKey) -> Self {
        value.0
    }
}
