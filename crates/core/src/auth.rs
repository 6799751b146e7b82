use std::fmt::{Debug, Display, Formatter};

use url::Url;

use crate::{AppError, AppResult, NonEmptyString, SecretString};

/// Root URL of the platform API every endpoint is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBaseUrl(Url);

impl ApiBaseUrl {
    /// Parses a bare host (`api.example.com`) or a full `http(s)` URL.
    ///
    /// A value without a scheme is treated as an HTTPS host.
    pub fn parse(value: &str) -> AppResult<Self> {
        let trimmed = value.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "api url must not be empty".to_owned(),
            ));
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("https://{trimmed}")
        };

        let url = Url::parse(candidate.as_str()).map_err(|error| {
            AppError::Validation(format!("invalid api url '{trimmed}': {error}"))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "api url '{trimmed}' must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(AppError::Validation(format!(
                "api url '{trimmed}' has no host"
            )));
        }

        Ok(Self(url))
    }

    /// Builds an endpoint URL by appending percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.0.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!("api url '{self}' cannot carry path segments"))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl Display for ApiBaseUrl {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str().trim_end_matches('/'))
    }
}

/// Access key pair used to log in.
///
/// The API root lives with the gateway that talks to it.
#[derive(Debug, Clone)]
pub struct Credentials {
    access_key: NonEmptyString,
    secret_key: SecretString,
}

impl Credentials {
    /// Creates credentials from already validated parts.
    #[must_use]
    pub fn new(access_key: NonEmptyString, secret_key: SecretString) -> Self {
        Self {
            access_key,
            secret_key,
        }
    }

    /// Returns the access key identifier.
    #[must_use]
    pub fn access_key(&self) -> &str {
        self.access_key.as_str()
    }

    /// Returns the secret key.
    #[must_use]
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }
}

/// Opaque token returned by the login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wraps a token value, rejecting empty tokens.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        SecretString::new(value)
            .map(Self)
            .map_err(|_| AppError::Unauthorized("session token is empty".to_owned()))
    }

    /// Returns the raw header value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.expose()
    }
}

impl Debug for SessionToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("SessionToken(<redacted>)")
    }
}
