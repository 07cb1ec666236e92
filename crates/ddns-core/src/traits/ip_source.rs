// # IP Source Trait
//
// Defines the interface for looking up this host's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP lookup service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("Public IP: {}", current_ip);
//
//     Ok(())
// }
// ```

use crate::address::ResolvedIp;
use async_trait::async_trait;

/// Trait for IP source implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Contract
///
/// - Every call performs a fresh lookup. Nothing is cached between calls.
/// - Exactly one attempt per call. No retries.
/// - Lookup bodies are trimmed before validation.
/// - A response that is not a dotted-quad address fails with
///   [`crate::Error::MalformedAddress`]; network failures, including non-2xx
///   responses, fail with [`crate::Error::Transport`].
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(ResolvedIp)`: The validated address
    /// - `Err(Error)`: If the lookup failed or returned garbage
    async fn current(&self) -> Result<ResolvedIp, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
