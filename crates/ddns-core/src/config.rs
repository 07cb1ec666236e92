//! Configuration types for the DDNS system
//!
//! [`UpdateConfig`] is the only input the engine accepts. It is either built
//! in code (and checked with [`UpdateConfig::validate`]) or produced from
//! untyped JSON by [`validate_config`] / [`parse_config`], which apply the
//! defaults and report every violated constraint at once.
//!
//! The serialized form uses camelCase keys and doubles as the JSON config
//! file format:
//!
//! ```json
//! {
//!   "dryRun": false,
//!   "ttl": 60,
//!   "profile": "home",
//!   "hostedZoneId": "Z0123456789ABCDEFGHIJ",
//!   "recordName": ["home.example.com.", "vpn.example.com."]
//! }
//! ```

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// TTL applied when none is configured
pub const DEFAULT_TTL: u32 = 60;

/// Validated reconciliation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfig {
    /// Compute changes but never submit them
    pub dry_run: bool,

    /// TTL written on every upserted record
    pub ttl: u32,

    /// Named credentials profile; `None` means the ambient default chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Hosted zone holding the records
    pub hosted_zone_id: String,

    /// Record names to reconcile, in order
    #[serde(rename = "recordName")]
    pub record_names: Vec<String>,
}

impl UpdateConfig {
    /// Create a configuration with default ttl and dry-run disabled
    pub fn new(hosted_zone_id: impl Into<String>, record_names: Vec<String>) -> Self {
        Self {
            dry_run: false,
            ttl: DEFAULT_TTL,
            profile: None,
            hosted_zone_id: hosted_zone_id.into(),
            record_names,
        }
    }

    /// Set the record TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the credentials profile
    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// Enable or disable dry-run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check the value constraints of an already typed configuration
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.ttl < 1 {
            errors.push("ttl", TOO_SMALL_TTL);
        }
        if let Some(profile) = &self.profile {
            check_non_empty(&mut errors, "profile", profile);
        }
        check_non_empty(&mut errors, "hostedZoneId", &self.hosted_zone_id);
        if self.record_names.is_empty() {
            errors.push("recordName", EMPTY_ARRAY);
        }
        for (index, name) in self.record_names.iter().enumerate() {
            check_non_empty(&mut errors, &format!("recordName[{index}]"), name);
        }

        errors.into_result()
    }
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location of the offending value, e.g. `recordName[1]`
    pub path: String,
    /// What was wrong with it
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at \"{}\"", self.message, self.path)
    }
}

/// Every constraint a configuration violated, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// The individual violations
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether no constraint was violated
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }

    fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation error: ")?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

const REQUIRED: &str = "Required";
const EMPTY_STRING: &str = "String must contain at least 1 character(s)";
const EMPTY_ARRAY: &str = "Array must contain at least 1 element(s)";
const TOO_SMALL_TTL: &str = "Number must be greater than or equal to 1";

fn check_non_empty(errors: &mut ValidationErrors, path: &str, value: &str) {
    if value.is_empty() {
        errors.push(path, EMPTY_STRING);
    }
}

/// Validate an untyped value and normalise it into an [`UpdateConfig`]
///
/// Absent `dryRun` becomes `false`, absent `ttl` becomes [`DEFAULT_TTL`].
/// Unknown keys are ignored. On failure every violation is reported, not
/// only the first.
pub fn validate_config(value: &Value) -> std::result::Result<UpdateConfig, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(object) = value.as_object() else {
        errors.push("", expected("object", value));
        return Err(errors);
    };

    let dry_run = match object.get("dryRun") {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            errors.push("dryRun", expected("boolean", other));
            false
        }
    };

    let ttl = match object.get("ttl") {
        None => DEFAULT_TTL,
        Some(Value::Number(number)) => match number.as_i64() {
            Some(ttl) if ttl < 1 => {
                errors.push("ttl", TOO_SMALL_TTL);
                DEFAULT_TTL
            }
            Some(ttl) => u32::try_from(ttl).unwrap_or_else(|_| {
                errors.push(
                    "ttl",
                    format!("Number must be less than or equal to {}", u32::MAX),
                );
                DEFAULT_TTL
            }),
            None if number.as_u64().is_some() => {
                errors.push(
                    "ttl",
                    format!("Number must be less than or equal to {}", u32::MAX),
                );
                DEFAULT_TTL
            }
            None => {
                errors.push("ttl", "Expected integer, received float");
                DEFAULT_TTL
            }
        },
        Some(other) => {
            errors.push("ttl", expected("number", other));
            DEFAULT_TTL
        }
    };

    let profile = match object.get("profile") {
        None => None,
        Some(Value::String(profile)) => {
            check_non_empty(&mut errors, "profile", profile);
            Some(profile.clone())
        }
        Some(other) => {
            errors.push("profile", expected("string", other));
            None
        }
    };

    let hosted_zone_id = required_string(&mut errors, object, "hostedZoneId");

    let record_names = match object.get("recordName") {
        None => {
            errors.push("recordName", REQUIRED);
            Vec::new()
        }
        Some(Value::Array(items)) => {
            if items.is_empty() {
                errors.push("recordName", EMPTY_ARRAY);
            }
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    let path = format!("recordName[{index}]");
                    match item {
                        Value::String(name) => {
                            check_non_empty(&mut errors, &path, name);
                            Some(name.clone())
                        }
                        other => {
                            errors.push(path, expected("string", other));
                            None
                        }
                    }
                })
                .collect()
        }
        Some(other) => {
            errors.push("recordName", expected("array", other));
            Vec::new()
        }
    };

    errors.into_result()?;

    Ok(UpdateConfig {
        dry_run,
        ttl,
        profile,
        hosted_zone_id,
        record_names,
    })
}

/// Parse a JSON document and validate it
///
/// Text that is not JSON at all fails with [`crate::Error::ConfigFormat`];
/// well-formed JSON that breaks a constraint fails with
/// [`crate::Error::InvalidConfig`].
pub fn parse_config(text: &str) -> Result<UpdateConfig> {
    let value: Value = serde_json::from_str(text)?;
    Ok(validate_config(&value)?)
}

fn required_string(errors: &mut ValidationErrors, object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        None => {
            errors.push(key, REQUIRED);
            String::new()
        }
        Some(Value::String(value)) => {
            check_non_empty(errors, key, value);
            value.clone()
        }
        Some(other) => {
            errors.push(key, expected("string", other));
            String::new()
        }
    }
}

fn expected(kind: &str, received: &Value) -> String {
    format!("Expected {kind}, received {}", json_type_name(received))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
