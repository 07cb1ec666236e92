// # ddns-core
//
// Core library for the Route 53 DDNS updater.
//
// ## Architecture Overview
//
// This library provides the reconciliation logic for dynamic DNS updates:
// - **IpSource**: Trait for looking up the current public IPv4 address
// - **DnsProvider**: Trait for listing and changing record sets in a zone
// - **UpdateConfig**: Validated settings, built in code or from JSON
// - **DdnsEngine**: Orchestrates one IP lookup → zone read → change batch run
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic holds no network code
// 2. **Dependency Injection**: Collaborators are constructed by the caller
// 3. **Single Snapshot**: All records are diffed against one lookup and one listing
// 4. **Library-First**: The binary is a thin caller of `DdnsEngine::reconcile`
// 5. **Idempotency**: Records that already match are never resubmitted

pub mod address;
pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use address::ResolvedIp;
pub use traits::{DnsProvider, IpSource};
pub use engine::{DdnsEngine, ReconcileOutcome, RecordDiff};
pub use config::{UpdateConfig, ValidationErrors, Violation, parse_config, validate_config};
pub use error::{Error, Result};
