//! Auth configuration types

use crate::error::{Error, Result};

/// Authentication scheme understood by PCO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// Personal Access Token (application id + secret, HTTP Basic)
    PersonalAccessToken,
    /// OAuth access token (Bearer)
    OAuth,
}

/// Resolved authentication configuration
#[derive(Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// Personal Access Token, sent as HTTP Basic credentials
    PersonalAccessToken {
        /// Application ID
        application_id: String,
        /// Application secret
        secret: String,
    },

    /// OAuth access token, sent as a bearer token
    OAuth {
        /// The access token
        token: String,
    },
}

impl AuthConfig {
    /// Create a Personal Access Token config
    pub fn personal_access_token(
        application_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self::PersonalAccessToken {
            application_id: application_id.into(),
            secret: secret.into(),
        }
    }

    /// Create an OAuth config
    pub fn oauth(token: impl Into<String>) -> Self {
        Self::OAuth {
            token: token.into(),
        }
    }

    /// Resolve a config from optional credential fields.
    ///
    /// Exactly one of (`application_id` + `secret`) or `token` must be
    /// supplied. Empty strings count as absent.
    pub fn from_credentials(
        application_id: Option<&str>,
        secret: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|s| !s.is_empty())
        }

        match (present(application_id), present(secret), present(token)) {
            (Some(id), Some(secret), None) => Ok(Self::personal_access_token(id, secret)),
            (None, None, Some(token)) => Ok(Self::oauth(token)),
            _ => Err(Error::credentials(
                "You must specify either an application id and a secret for your \
                 Personal Access Token (PAT) or an OAuth token",
            )),
        }
    }

    /// The auth scheme this config selects
    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::PersonalAccessToken { .. } => AuthType::PersonalAccessToken,
            Self::OAuth { .. } => AuthType::OAuth,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonalAccessToken { application_id, .. } => f
                .debug_struct("PersonalAccessToken")
                .field("application_id", application_id)
                .field("secret", &"***")
                .finish(),
            Self::OAuth { .. } => f.debug_struct("OAuth").field("token", &"***").finish(),
        }
    }
}
