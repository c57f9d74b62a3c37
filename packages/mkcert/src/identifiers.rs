//! Hostname and IP validation for certificate requests

use std::fmt;
use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MkcertError, Result};

/// Optional `*.` prefix followed by dot-separated labels of alphanumerics,
/// `_` and `-` that neither start nor end with `_` or `-`.
static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\*\.)?[0-9a-z]([0-9a-z_-]*[0-9a-z])?(\.[0-9a-z]([0-9a-z_-]*[0-9a-z])?)*$",
    )
    .unwrap_or_else(|e| unreachable!("hostname pattern is a constant: {e}"))
});

/// A validated certificate subject name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    name: String,
    ip: Option<IpAddr>,
}

impl Identifier {
    /// Validate a single user-supplied name
    ///
    /// # Errors
    ///
    /// Returns [`MkcertError::InvalidIdentifier`] when `name` is neither an IP
    /// literal nor a (wildcard) hostname.
    pub fn parse(name: &str) -> Result<Self> {
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Ok(Self {
                name: name.to_string(),
                ip: Some(ip),
            });
        }
        if HOSTNAME.is_match(name) {
            return Ok(Self {
                name: name.to_string(),
                ip: None,
            });
        }
        Err(MkcertError::InvalidIdentifier(name.to_string()))
    }

    /// The name exactly as supplied
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Parsed address when the name is an IP literal
    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    /// Whether this is a `*.` wildcard hostname
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.ip.is_none() && self.name.starts_with("*.")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Validate every name, failing on the first invalid one
///
/// # Errors
///
/// Returns [`MkcertError::InvalidIdentifier`] naming the first rejected entry.
/// Nothing is returned for the valid entries in that case.
pub fn validate_identifiers<S: AsRef<str>>(names: &[S]) -> Result<Vec<Identifier>> {
    names
        .iter()
        .map(|name| Identifier::parse(name.as_ref()))
        .collect()
}
