//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides minimal test doubles that record how the engine
//! uses its collaborators without doing any network I/O.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{
    ChangeBatchRequest, ChangeReceipt, DnsProvider, ExistingRecord, IpSource, RecordType,
};
use ddns_core::{ResolvedIp, UpdateConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// How a test IP source answers
#[derive(Clone)]
enum IpAnswer {
    Address(String),
    Malformed(String),
    Unreachable,
}

/// An IpSource with a scripted answer and a call counter
pub struct ScriptedIpSource {
    answer: IpAnswer,
    current_call_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    /// Always answer with `ip`
    pub fn fixed(ip: &str) -> Self {
        Self::with_answer(IpAnswer::Address(ip.to_string()))
    }

    /// Answer with a body that fails the address check
    pub fn malformed(body: &str) -> Self {
        Self::with_answer(IpAnswer::Malformed(body.to_string()))
    }

    /// Fail as if the lookup service could not be reached
    pub fn unreachable() -> Self {
        Self::with_answer(IpAnswer::Unreachable)
    }

    fn with_answer(answer: IpAnswer) -> Self {
        Self {
            answer,
            current_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn current_call_count(&self) -> usize {
        self.current_call_count.load(Ordering::SeqCst)
    }

    /// Create a new ScriptedIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            answer: other.answer.clone(),
            current_call_count: Arc::clone(&other.current_call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<ResolvedIp> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            IpAnswer::Address(ip) => ResolvedIp::parse(ip),
            IpAnswer::Malformed(body) => ResolvedIp::parse(body.trim()),
            IpAnswer::Unreachable => Err(Error::transport("test", "connection refused")),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A mock DnsProvider that serves a fixed zone and records submissions
pub struct MockDnsProvider {
    /// Zone contents returned by list_record_sets()
    records: Vec<ExistingRecord>,
    /// Fail list_record_sets() with a transport error
    fail_listing: bool,
    /// Fail submit_change_batch() with a transport error
    fail_submit: bool,
    /// Call counter for list_record_sets()
    list_call_count: Arc<AtomicUsize>,
    /// Zone ids passed to list_record_sets()
    listed_zones: Arc<Mutex<Vec<String>>>,
    /// Batches passed to submit_change_batch()
    submitted: Arc<Mutex<Vec<ChangeBatchRequest>>>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<ExistingRecord>) -> Self {
        Self {
            records,
            fail_listing: false,
            fail_submit: false,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            listed_zones: Arc::new(Mutex::new(Vec::new())),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_submit(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    /// Get the number of times list_record_sets() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the zone ids that were listed
    pub fn listed_zones(&self) -> Vec<String> {
        self.listed_zones.lock().unwrap().clone()
    }

    /// Get the number of times submit_change_batch() was called
    pub fn submit_call_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    /// Get the batches that were submitted
    pub fn submitted(&self) -> Vec<ChangeBatchRequest> {
        self.submitted.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            records: other.records.clone(),
            fail_listing: other.fail_listing,
            fail_submit: other.fail_submit,
            list_call_count: Arc::clone(&other.list_call_count),
            listed_zones: Arc::clone(&other.listed_zones),
            submitted: Arc::clone(&other.submitted),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_record_sets(&self, hosted_zone_id: &str) -> Result<Vec<ExistingRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        self.listed_zones
            .lock()
            .unwrap()
            .push(hosted_zone_id.to_string());

        if self.fail_listing {
            return Err(Error::transport("mock", "NoSuchHostedZone"));
        }
        Ok(self.records.clone())
    }

    async fn submit_change_batch(&self, batch: &ChangeBatchRequest) -> Result<ChangeReceipt> {
        self.submitted.lock().unwrap().push(batch.clone());

        if self.fail_submit {
            return Err(Error::transport("mock", "InvalidChangeBatch"));
        }
        Ok(ChangeReceipt {
            id: "/change/C0000000000001".to_string(),
            status: "PENDING".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An A record set with a single value
pub fn a_record(name: &str, value: &str) -> ExistingRecord {
    ExistingRecord::new(name, RecordType::A, vec![value.to_string()])
}

/// Helper to create a minimal UpdateConfig for testing
pub fn config_for(record_names: &[&str]) -> UpdateConfig {
    UpdateConfig::new(
        "Z0123456789ABCDEFGHIJ",
        record_names.iter().map(|name| name.to_string()).collect(),
    )
}
