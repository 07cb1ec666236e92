//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Looking up the current public IP via IpSource
//! - Reading the zone's record sets via DnsProvider
//! - Deciding which requested records have drifted
//! - Submitting one UPSERT change batch for the drifted records
//!
//! ## Flow
//!
//! ```text
//!  UpdateConfig
//!       │ validate
//!       ▼
//! ┌─────────────┐   ResolvedIp    ┌──────────────┐
//! │  IpSource   │────────────────▶│              │
//! └─────────────┘                 │              │   ChangeBatchRequest   ┌──────────────┐
//! ┌─────────────┐ ExistingRecords │  DdnsEngine  │───────────────────────▶│ DnsProvider  │
//! │ DnsProvider │────────────────▶│              │   (skipped on dry run  │  (submit)    │
//! │  (list)     │                 │              │    or empty batch)     └──────────────┘
//! └─────────────┘                 └──────────────┘
//! ```
//!
//! Every step runs strictly in sequence. The address and the listing are
//! fetched once per call and every requested name is diffed against that
//! single snapshot. A failure in either lookup aborts the call before any
//! change is built.

use crate::address::ResolvedIp;
use crate::config::UpdateConfig;
use crate::error::Result;
use crate::traits::{
    Change, ChangeAction, ChangeBatchRequest, ChangeReceipt, DnsProvider, ExistingRecord,
    IpSource, RecordType,
};
use tracing::{debug, info};

/// Comment attached to every submitted change batch
pub const CHANGE_BATCH_COMMENT: &str = "Update from route53-ddns";

/// Published versus desired value for one requested record name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDiff {
    pub record_name: String,
    /// First value of the matching A record set, if there is one
    pub current_value: Option<String>,
    pub desired_value: String,
}

impl RecordDiff {
    /// Whether the published value already matches
    pub fn is_current(&self) -> bool {
        self.current_value.as_deref() == Some(self.desired_value.as_str())
    }
}

/// Result of a single reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Every requested record already points at the current address
    NoChangeNeeded,

    /// Dry run: these changes would have been submitted
    DryRun {
        planned: Vec<Change>,
    },

    /// The change batch was accepted by the provider
    Applied {
        changes: Vec<Change>,
        receipt: ChangeReceipt,
    },
}

/// Published value of `record_name`
///
/// Takes the first record set whose name matches exactly and whose type is
/// `A`, and returns its first value. Later duplicates are ignored.
pub fn current_value<'a>(records: &'a [ExistingRecord], record_name: &str) -> Option<&'a str> {
    records
        .iter()
        .find(|record| record.name == record_name && record.record_type == RecordType::A)
        .and_then(|record| record.values.first())
        .map(String::as_str)
}

/// Diff every requested name against one snapshot of the zone, in request order
pub fn diff_records(
    records: &[ExistingRecord],
    record_names: &[String],
    desired: &ResolvedIp,
) -> Vec<RecordDiff> {
    record_names
        .iter()
        .map(|record_name| RecordDiff {
            record_name: record_name.clone(),
            current_value: current_value(records, record_name).map(str::to_string),
            desired_value: desired.as_str().to_string(),
        })
        .collect()
}

/// Queue an UPSERT for every drifted record, logging the decision per name
pub fn plan_changes(diffs: &[RecordDiff], ttl: u32) -> Vec<Change> {
    let mut changes = Vec::new();

    for diff in diffs {
        if diff.is_current() {
            info!("[{}]: IP has not changed, skipping change", diff.record_name);
            continue;
        }

        info!(
            "[{}]: Adding change: IP from {} to {} with ttl {}",
            diff.record_name,
            diff.current_value.as_deref().unwrap_or("<none>"),
            diff.desired_value,
            ttl
        );

        changes.push(Change {
            action: ChangeAction::Upsert,
            record_type: RecordType::A,
            name: diff.record_name.clone(),
            value: diff.desired_value.clone(),
            ttl,
        });
    }

    changes
}

/// Core DDNS engine
///
/// Holds the collaborators for one invocation. Construct them once (the
/// provider resolves its credentials at that point) and pass them in.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Call [`DdnsEngine::reconcile()`] once per scheduled run
pub struct DdnsEngine {
    /// Public IP lookup
    ip_source: Box<dyn IpSource>,

    /// Zone reader and change submitter
    provider: Box<dyn DnsProvider>,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    pub fn new(ip_source: Box<dyn IpSource>, provider: Box<dyn DnsProvider>) -> Self {
        Self {
            ip_source,
            provider,
        }
    }

    /// Reconcile the configured records with the current public IP
    ///
    /// The configuration is validated before anything touches the network.
    /// Dry runs never submit, even when there is nothing to change. A live
    /// run with nothing to change never submits either; otherwise exactly
    /// one batch holding every change is submitted.
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: What happened
    /// - `Err(Error)`: Invalid config, IP lookup failure, or provider failure
    pub async fn reconcile(&self, config: &UpdateConfig) -> Result<ReconcileOutcome> {
        config.validate()?;

        info!(
            "{}",
            if config.dry_run {
                "Dry run: reconciling target DNS records"
            } else {
                "Reconciling target DNS records"
            }
        );

        let ip = self.ip_source.current().await?;
        info!("Current public IP ({}): {}", self.ip_source.source_name(), ip);

        let records = self
            .provider
            .list_record_sets(&config.hosted_zone_id)
            .await?;
        debug!(
            "Fetched {} record set(s) from {} zone {}",
            records.len(),
            self.provider.provider_name(),
            config.hosted_zone_id
        );

        let diffs = diff_records(&records, &config.record_names, &ip);
        let changes = plan_changes(&diffs, config.ttl);

        if config.dry_run {
            for change in &changes {
                info!(
                    "[DRY-RUN] Would upsert {} {} -> {} (ttl {})",
                    change.record_type, change.name, change.value, change.ttl
                );
            }
            info!("Skip on dry run");
            return Ok(ReconcileOutcome::DryRun { planned: changes });
        }

        if changes.is_empty() {
            info!("No records to update, exiting");
            return Ok(ReconcileOutcome::NoChangeNeeded);
        }

        let batch = ChangeBatchRequest {
            hosted_zone_id: config.hosted_zone_id.clone(),
            comment: CHANGE_BATCH_COMMENT.to_string(),
            changes,
        };

        let receipt = self.provider.submit_change_batch(&batch).await?;
        info!(
            "Updated {} record(s) (change {} is {})",
            batch.changes.len(),
            receipt.id,
            receipt.status
        );

        Ok(ReconcileOutcome::Applied {
            changes: batch.changes,
            receipt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(name: &str, values: &[&str]) -> ExistingRecord {
        ExistingRecord::new(
            name,
            RecordType::A,
            values.iter().map(|v| v.to_string()).collect(),
        )
    }

    fn ip(text: &str) -> ResolvedIp {
        ResolvedIp::parse(text).unwrap()
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_current_value_requires_type_a() {
        let records = vec![
            ExistingRecord::new(
                "home.example.com.",
                RecordType::Txt,
                vec!["\"hello\"".to_string()],
            ),
            ExistingRecord::new(
                "home.example.com.",
                RecordType::Aaaa,
                vec!["2001:db8::1".to_string()],
            ),
            a("home.example.com.", &["203.0.113.4", "203.0.113.9"]),
        ];

        assert_eq!(current_value(&records, "home.example.com."), Some("203.0.113.4"));
        assert_eq!(current_value(&records, "other.example.com."), None);
    }

    #[test]
    fn test_current_value_first_match_wins() {
        let records = vec![
            a("home.example.com.", &["203.0.113.1"]),
            a("home.example.com.", &["203.0.113.2"]),
        ];
        assert_eq!(current_value(&records, "home.example.com."), Some("203.0.113.1"));
    }

    #[test]
    fn test_current_value_exact_name_match() {
        let records = vec![a("home.example.com.", &["203.0.113.1"])];
        assert_eq!(current_value(&records, "home.example.com"), None);
        assert_eq!(current_value(&records, "HOME.example.com."), None);
    }

    #[test]
    fn test_empty_value_list_counts_as_absent() {
        let records = vec![a("home.example.com.", &[])];
        assert_eq!(current_value(&records, "home.example.com."), None);
    }

    #[test]
    fn test_only_drifted_records_are_queued() {
        let records = vec![
            a("a.example.com", &["203.0.113.4"]),
            a("b.example.com", &["203.0.113.5"]),
        ];
        let diffs = diff_records(
            &records,
            &names(&["a.example.com", "b.example.com"]),
            &ip("203.0.113.5"),
        );

        assert_eq!(diffs[0].current_value.as_deref(), Some("203.0.113.4"));
        assert!(!diffs[0].is_current());
        assert!(diffs[1].is_current());

        assert_eq!(
            plan_changes(&diffs, 120),
            vec![Change {
                action: ChangeAction::Upsert,
                record_type: RecordType::A,
                name: "a.example.com".to_string(),
                value: "203.0.113.5".to_string(),
                ttl: 120,
            }]
        );
    }

    #[test]
    fn test_missing_record_is_created_in_request_order() {
        let diffs = diff_records(
            &[],
            &names(&["z.example.com.", "a.example.com."]),
            &ip("198.51.100.7"),
        );
        let changes = plan_changes(&diffs, 60);

        let queued: Vec<&str> = changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(queued, vec!["z.example.com.", "a.example.com."]);
        assert!(changes.iter().all(|c| c.action == ChangeAction::Upsert));
    }
}
