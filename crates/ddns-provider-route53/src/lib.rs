// # Route 53 DNS Provider
//
// This crate provides an AWS Route 53 implementation of `DnsProvider`.
//
// ## Behavior
//
// - Listing follows `IsTruncated` / `NextRecord*` until the zone is complete
// - Change batches are forwarded verbatim as one `ChangeResourceRecordSets` call
// - No retry logic, no caching, no validation of the batch
// - Every SDK failure becomes `Error::Transport`
//
// ## Credentials
//
// Resolved once, when the provider is built:
// - `Some(profile)`: the named profile from the shared config/credentials files
// - `None`: the SDK's default chain (environment, shared files, instance role)
//
// Route 53 is a global service; requests are signed for `us-east-1`.
//
// ## API Reference
//
// - ListResourceRecordSets: GET `/2013-04-01/hostedzone/{Id}/rrset`
// - ChangeResourceRecordSets: POST `/2013-04-01/hostedzone/{Id}/rrset/`

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types as sdk;
use ddns_core::traits::{
    Change, ChangeAction, ChangeBatchRequest, ChangeReceipt, DnsProvider, ExistingRecord,
    RecordType,
};
use ddns_core::{Error, Result};

/// Region Route 53 requests are signed for
pub const ROUTE53_REGION: &str = "us-east-1";

/// Route 53 DNS provider
pub struct Route53Provider {
    /// SDK client, carries the resolved credentials
    client: aws_sdk_route53::Client,
}

impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("credentials", &"<REDACTED>")
            .finish()
    }
}

impl Route53Provider {
    /// Wrap an already configured SDK client
    pub fn new(client: aws_sdk_route53::Client) -> Self {
        Self { client }
    }

    /// Build a provider, resolving credentials from `profile` or the default chain
    ///
    /// # Parameters
    ///
    /// - `profile`: Named profile from the shared AWS config, if any
    pub async fn from_profile(profile: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(ROUTE53_REGION));

        if let Some(profile) = profile {
            tracing::debug!("Using AWS profile {}", profile);
            loader = loader.profile_name(profile);
        } else {
            tracing::debug!("Using default AWS credential chain");
        }

        let sdk_config = loader.load().await;
        Self::new(aws_sdk_route53::Client::new(&sdk_config))
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_record_sets(&self, hosted_zone_id: &str) -> Result<Vec<ExistingRecord>> {
        let mut records = Vec::new();
        let mut next_name: Option<String> = None;
        let mut next_type: Option<sdk::RrType> = None;
        let mut next_identifier: Option<String> = None;

        loop {
            let page = self
                .client
                .list_resource_record_sets()
                .hosted_zone_id(hosted_zone_id)
                .set_start_record_name(next_name.take())
                .set_start_record_type(next_type.take())
                .set_start_record_identifier(next_identifier.take())
                .send()
                .await
                .map_err(|e| {
                    Error::transport(
                        "route53",
                        format!("ListResourceRecordSets failed: {}", DisplayErrorContext(&e)),
                    )
                })?;

            records.extend(page.resource_record_sets().iter().map(to_existing_record));

            if !page.is_truncated() {
                break;
            }

            // A truncated page without a continuation point would loop forever
            let Some(name) = page.next_record_name() else {
                return Err(Error::transport(
                    "route53",
                    "Truncated listing without NextRecordName",
                ));
            };
            tracing::debug!("Listing truncated, continuing at {}", name);

            next_name = Some(name.to_string());
            next_type = page.next_record_type().cloned();
            next_identifier = page.next_record_identifier().map(str::to_string);
        }

        tracing::debug!(
            "Listed {} record set(s) in hosted zone {}",
            records.len(),
            hosted_zone_id
        );
        Ok(records)
    }

    async fn submit_change_batch(&self, batch: &ChangeBatchRequest) -> Result<ChangeReceipt> {
        tracing::info!(
            "Submitting {} change(s) to hosted zone {}",
            batch.changes.len(),
            batch.hosted_zone_id
        );

        let change_batch = to_sdk_change_batch(batch)?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&batch.hosted_zone_id)
            .change_batch(change_batch)
            .send()
            .await
            .map_err(|e| {
                Error::transport(
                    "route53",
                    format!("ChangeResourceRecordSets failed: {}", DisplayErrorContext(&e)),
                )
            })?;

        let receipt = match output.change_info() {
            Some(info) => ChangeReceipt {
                id: info.id().to_string(),
                status: info.status().as_str().to_string(),
            },
            None => ChangeReceipt {
                id: String::new(),
                status: "UNKNOWN".to_string(),
            },
        };

        tracing::debug!("Change {} accepted with status {}", receipt.id, receipt.status);
        Ok(receipt)
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}

/// Convert an SDK record set into the engine's view of it
pub fn to_existing_record(record_set: &sdk::ResourceRecordSet) -> ExistingRecord {
    ExistingRecord::new(
        record_set.name(),
        RecordType::from_wire(record_set.r#type().as_str()),
        record_set
            .resource_records()
            .iter()
            .map(|record| record.value().to_string())
            .collect(),
    )
}

/// Convert a change batch into its SDK form
pub fn to_sdk_change_batch(batch: &ChangeBatchRequest) -> Result<sdk::ChangeBatch> {
    let changes = batch
        .changes
        .iter()
        .map(to_sdk_change)
        .collect::<Result<Vec<_>>>()?;

    sdk::ChangeBatch::builder()
        .comment(&batch.comment)
        .set_changes(Some(changes))
        .build()
        .map_err(build_error)
}

fn to_sdk_change(change: &Change) -> Result<sdk::Change> {
    let action = match change.action {
        ChangeAction::Upsert => sdk::ChangeAction::Upsert,
    };

    let record = sdk::ResourceRecord::builder()
        .value(&change.value)
        .build()
        .map_err(build_error)?;

    let record_set = sdk::ResourceRecordSet::builder()
        .name(&change.name)
        .r#type(sdk::RrType::from(change.record_type.as_str()))
        .ttl(i64::from(change.ttl))
        .resource_records(record)
        .build()
        .map_err(build_error)?;

    sdk::Change::builder()
        .action(action)
        .resource_record_set(record_set)
        .build()
        .map_err(build_error)
}

fn build_error(e: aws_sdk_route53::error::BuildError) -> Error {
    Error::transport("route53", format!("Failed to build request: {}", e))
}
