//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces the engine is wired with.
//!
//! - [`IpSource`]: Look up the current public IPv4 address
//! - [`DnsProvider`]: List and change record sets in a hosted zone

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{
    Change, ChangeAction, ChangeBatchRequest, ChangeReceipt, DnsProvider, ExistingRecord,
    RecordType,
};
