//! Authentication types for the Dynatrace API.
//!
//! Responsibilities:
//! - Hold the API token and any additional static headers.
//! - Render the token as the `Authorization: Api-Token <token>` header.
//!
//! Does NOT handle:
//! - Retrieving the token from a secret store (external collaborator).
//!
//! Invariants:
//! - The token is stored as a `SecretString` and never appears in `Debug` output.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{API_TOKEN_SCHEME, AUTHORIZATION_HEADER};

/// Module for serializing SecretString as strings.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Dynatrace API token.
    #[serde(with = "secret_string")]
    pub api_token: SecretString,
    /// Additional static headers sent with every request.
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl AuthConfig {
    /// Create an auth config from an API token.
    pub fn with_api_token(api_token: SecretString) -> Self {
        Self {
            api_token,
            extra_headers: BTreeMap::new(),
        }
    }

    /// Full static header set: the authorization header plus extra headers.
    ///
    /// Extra headers never override the authorization header.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            AUTHORIZATION_HEADER.to_string(),
            format!("{} {}", API_TOKEN_SCHEME, self.api_token.expose_secret()),
        )];
        headers.extend(
            self.extra_headers
                .iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER))
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        headers
    }
}
