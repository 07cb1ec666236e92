// # DNS Provider Trait
//
// Defines the interface for reading and changing record sets in a hosted
// zone.
//
// ## Implementations
//
// - AWS Route 53: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.list_record_sets("Z0123456789ABCDEFGHIJ").await?;
//     for record in &records {
//         println!("{} {} {:?}", record.name, record.record_type, record.values);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;

/// DNS record type as published in the zone
///
/// Only `A` is ever matched or written by the engine; the other variants
/// exist so listings can be represented faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Caa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Srv,
    Txt,
    /// Any type not listed above, by its wire name
    Other(String),
}

impl RecordType {
    /// Map a wire name such as `"A"` or `"CNAME"` to a record type
    pub fn from_wire(name: &str) -> Self {
        match name {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CAA" => Self::Caa,
            "CNAME" => Self::Cname,
            "MX" => Self::Mx,
            "NS" => Self::Ns,
            "PTR" => Self::Ptr,
            "SOA" => Self::Soa,
            "SRV" => Self::Srv,
            "TXT" => Self::Txt,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire name of this type
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record set currently published in the zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingRecord {
    /// Record name exactly as the provider reports it
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Record values in provider order
    pub values: Vec<String>,
}

impl ExistingRecord {
    /// Create a record set
    pub fn new(name: impl Into<String>, record_type: RecordType, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            record_type,
            values,
        }
    }
}

/// Change action; record sets are only ever created-or-replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Upsert,
}

/// A single record change within a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub action: ChangeAction,
    pub record_type: RecordType,
    pub name: String,
    pub value: String,
    pub ttl: u32,
}

/// All changes for one zone, submitted as a single atomic call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBatchRequest {
    pub hosted_zone_id: String,
    pub comment: String,
    pub changes: Vec<Change>,
}

/// What the provider reported after accepting a change batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReceipt {
    /// Provider-assigned change id
    pub id: String,
    /// Provider-reported status, e.g. `PENDING`
    pub status: String,
}

/// Trait for DNS provider implementations
///
/// Covers the two provider calls the engine needs: a read-only listing of
/// the zone and submission of a change batch. Implementations must be
/// thread-safe and usable across async tasks.
///
/// # Contract
///
/// - No retries, no caching, no validation of what they are asked to submit.
/// - Listing returns the complete zone; if the provider paginates, the
///   implementation collects every page.
/// - Any failure (authentication, missing zone, network) is reported as
///   [`crate::Error::Transport`].
/// - Credentials are resolved once, when the provider is constructed.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record set in a hosted zone
    ///
    /// # Parameters
    ///
    /// - `hosted_zone_id`: The hosted zone to read
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ExistingRecord>)`: The record sets, in provider order
    /// - `Err(Error)`: If the listing failed
    async fn list_record_sets(
        &self,
        hosted_zone_id: &str,
    ) -> Result<Vec<ExistingRecord>, crate::Error>;

    /// Submit a change batch verbatim
    ///
    /// The batch is applied all-or-nothing by the provider.
    ///
    /// # Parameters
    ///
    /// - `batch`: The fully built change batch
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeReceipt)`: The provider accepted the batch
    /// - `Err(Error)`: If the submission failed
    async fn submit_change_batch(
        &self,
        batch: &ChangeBatchRequest,
    ) -> Result<ChangeReceipt, crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "route53")
    fn provider_name(&self) -> &'static str;
}
