//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;

/// API key for Notion API authentication
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if !key.is_ascii() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must be ASCII".to_string(),
            });
        }

        if !key.starts_with("secret_") && !key.starts_with("ntn_") {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if key.len() < 20 {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact API key in display
        write!(f, "{}...", &self.0[..10])
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

/// How many page tasks may run at once against the Notion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Concurrency(usize);

impl Concurrency {
    pub const MIN: usize = 1;
    pub const MAX: usize = 32;

    /// Validates a requested concurrency limit.
    pub fn new(limit: usize) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&limit) {
            return Err(ValidationError::OutOfBounds {
                value: limit.min(u32::MAX as usize) as u32,
                min: Self::MIN as u32,
                max: Self::MAX as u32,
            });
        }
        Ok(Self(limit))
    }

    /// Clamps a requested limit into the supported range.
    pub fn clamped(limit: usize) -> Self {
        Self(limit.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Concurrency {
    fn default() -> Self {
        Self(crate::constants::DEFAULT_PAGE_CONCURRENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_validation() {
        assert!(ApiKey::new("").is_err());
        assert!(ApiKey::new("bearer_0123456789abcdef").is_err());
        assert!(ApiKey::new("secret_short").is_err());

        let key = ApiKey::new("secret_0123456789abcdef").unwrap();
        assert_eq!(key.to_string(), "secret_012...");
        assert!(!format!("{:?}", key).contains("abcdef"));
    }

    #[test]
    fn api_key_rejects_non_ascii() {
        let err = ApiKey::new("secret_ééééééééééééé").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidApiKey { .. }));
    }

    #[test]
    fn concurrency_bounds() {
        assert!(Concurrency::new(0).is_err());
        assert!(Concurrency::new(33).is_err());
        assert_eq!(Concurrency::new(8).unwrap().get(), 8);
        assert_eq!(Concurrency::clamped(0).get(), 1);
        assert_eq!(Concurrency::clamped(100).get(), 32);
    }
}
