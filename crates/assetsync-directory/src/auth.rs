//! Bearer token authentication.

use reqwest::RequestBuilder;

/// API bearer token.
///
/// The [`Debug`] impl redacts the value so the token never lands in logs.
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Attach `Authorization: Bearer <token>` to a request.
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.0)
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let token = ApiToken::new("super-secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_blank_token_is_empty() {
        assert!(ApiToken::new("  ").is_empty());
        assert!(!ApiToken::new("t").is_empty());
    }
}
