//! Externally-supplied board configuration.
//!
//! # Responsibility
//! - Carry the literals the core must not hardcode: the accepted mock
//!   credential pair and the page window size.
//!
//! # Invariants
//! - Missing fields fall back to the defaults the original board shipped
//!   with (`user` / `password`, six notices per page).

use crate::query::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_USERNAME: &str = "user";
const DEFAULT_PASSWORD: &str = "password";

/// The single accepted login pair. A stand-in, not a security mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

/// Board-wide configuration literals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub credentials: Credentials,
    /// Notices revealed per window increment.
    pub notices_per_page: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            notices_per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BoardConfig {
    /// Parses a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }
}

/// Configuration parse failure.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid board configuration: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}
