//! API key handling.
//!
//! Keys live only in process memory. A key entered during the session wins
//! over one supplied by the environment.

use crate::error::{FaceSwapError, Result};
use std::fmt;

/// Environment variables consulted for the default key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GOOGLE_API_KEY", "API_KEY"];

/// An opaque, non-empty API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a key, trimming whitespace. Returns `None` for blank input.
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let key = key.as_ref().trim();
        (!key.is_empty()).then(|| Self(key.to_string()))
    }

    /// Returns the raw key for use in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// The two places a key can come from.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    user: Option<Credential>,
    env: Option<Credential>,
}

impl Credentials {
    /// Creates credentials with the given environment default and no user key.
    pub fn new(env_default: Option<String>) -> Self {
        Self {
            user: None,
            env: env_default.and_then(Credential::new),
        }
    }

    /// Reads the environment default from [`API_KEY_ENV_VARS`].
    pub fn from_env() -> Self {
        let env = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find_map(Credential::new);
        Self { user: None, env }
    }

    /// Sets the session key. A blank value clears it.
    pub fn set_user_key(&mut self, key: impl AsRef<str>) {
        self.user = Credential::new(key);
    }

    /// Builder-style variant of [`Credentials::set_user_key`].
    pub fn with_user_key(mut self, key: impl AsRef<str>) -> Self {
        self.set_user_key(key);
        self
    }

    /// Returns true if the session key is set.
    pub fn has_user_key(&self) -> bool {
        self.user.is_some()
    }

    /// Returns true if some key is available.
    pub fn is_ready(&self) -> bool {
        self.user.is_some() || self.env.is_some()
    }

    /// Picks the key to use: session value first, then the environment.
    pub fn resolve(&self) -> Result<&Credential> {
        self.user
            .as_ref()
            .or(self.env.as_ref())
            .ok_or(FaceSwapError::MissingCredential)
    }
}
