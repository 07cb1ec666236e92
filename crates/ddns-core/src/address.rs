//! Public IPv4 address as reported by an IP lookup service
//!
//! The accepted syntax is four dot-separated groups of one to three digits.
//! Octets are deliberately not bounded to 0-255: `999.1.1.1` is accepted.
//! Lookup services have always been trusted on that point and tightening the
//! check would reject input earlier releases accepted.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("dotted-quad pattern is valid")
});

/// Whether `candidate` looks like a dotted-quad IPv4 address
pub fn is_dotted_quad(candidate: &str) -> bool {
    DOTTED_QUAD.is_match(candidate)
}

/// A validated dotted-quad address
///
/// Constructed only through [`ResolvedIp::parse`], so holding one means the
/// pattern check already passed. The value is compared as text against the
/// values published in the zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedIp(String);

impl ResolvedIp {
    /// Validate `candidate` as-is. Callers trim lookup bodies first.
    pub fn parse(candidate: &str) -> Result<Self> {
        if is_dotted_quad(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(Error::malformed_address(candidate))
        }
    }

    /// The address text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
