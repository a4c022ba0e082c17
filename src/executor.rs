//! HTTP client construction and the request-executor capability it exposes.
//!
//! The core engine only depends on the [`Executor`] trait; this module is
//! the external collaborator that builds a concrete `reqwest`-backed
//! implementation honoring timeout, TLS-verify, proxy, keep-alive,
//! compression, HTTP/2, a custom resolver, and DNS-skip.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use tracing::{debug, warn};

use crate::errors::{ExecutorError, ExecutorInitError};
use crate::job::Method;

/// Request handed to the executor by a worker.
#[derive(Debug, Clone)]
pub struct ExecutorRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

/// Successful outcome of a request attempt.
#[derive(Debug, Clone)]
pub struct ExecutorResponse {
    pub status: u16,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Opaque, concurrently-usable request-sending capability.
///
/// Implementations must support concurrent `execute` calls from many
/// worker tasks — the core shares one executor instance, read-only,
/// across the whole worker pool.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, request: ExecutorRequest) -> Result<ExecutorResponse, ExecutorError>;
}

/// Proxy configuration, including optional basic-auth credentials.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Transport-level knobs for [`ReqwestExecutor::build`].
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Forward proxy to route requests through.
    pub proxy: Option<ProxyConfig>,
    /// Enable HTTP keep-alive (connection reuse). When false, every request
    /// opens a fresh connection.
    pub keep_alive: bool,
    /// Enable gzip response decompression.
    pub compression: bool,
    /// Negotiate HTTP/2 directly instead of via ALPN upgrade.
    pub http2: bool,
    /// Force DNS resolution of every host to this fixed address
    /// ("skip DNS" — the caller already knows the target IP).
    pub skip_dns_to: Option<SocketAddr>,
    /// Route DNS resolution for one specific host through a fixed address
    /// ("custom resolver" in the original CLI), leaving other hosts alone.
    pub custom_resolver: Option<(String, SocketAddr)>,
}

/// `reqwest`-backed [`Executor`].
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn build(config: &ExecutorConfig) -> Result<Self, ExecutorInitError> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .gzip(config.compression);

        if config.http2 {
            builder = builder.http2_prior_knowledge();
        }

        if config.keep_alive {
            builder = builder.pool_idle_timeout(Some(Duration::from_secs(90)));
        } else {
            builder = builder.pool_max_idle_per_host(0);
        }

        if let Some(ref proxy_cfg) = config.proxy {
            let mut proxy = reqwest::Proxy::all(&proxy_cfg.url)
                .map_err(|e| ExecutorInitError::InvalidProxy(e.to_string()))?;
            if let Some(ref user) = proxy_cfg.username {
                proxy = proxy.basic_auth(user, proxy_cfg.password.as_deref().unwrap_or(""));
            }
            builder = builder.proxy(proxy);
        }

        if let Some(addr) = config.skip_dns_to {
            builder = builder.dns_resolver(Arc::new(FixedResolver(addr)));
        } else if let Some((ref host, addr)) = config.custom_resolver {
            builder = builder.resolve(host, addr);
        }

        let client = builder
            .build()
            .map_err(|e| ExecutorInitError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Executor for ReqwestExecutor {
    async fn execute(&self, request: ExecutorRequest) -> Result<ExecutorResponse, ExecutorError> {
        let bytes_sent = raw_request_size(&request);

        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(request.timeout);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let built = builder
            .build()
            .map_err(|e| ExecutorError::request_build(e.to_string()))?;

        let response = match self.client.execute(built).await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => return Err(ExecutorError::timeout(e.to_string())),
            Err(e) => return Err(ExecutorError::transport(e.to_string())),
        };

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "failed to read response body");
                return Err(ExecutorError::protocol(e.to_string()));
            }
        };

        debug!(status, bytes_received = body.len(), "request completed");

        Ok(ExecutorResponse {
            status,
            bytes_sent,
            bytes_received: body.len() as u64,
        })
    }
}

/// Approximate the serialized size of the outgoing request: request line,
/// headers, and body — enough to report a meaningful `bytes_sent`.
fn raw_request_size(request: &ExecutorRequest) -> u64 {
    let request_line = format!("{} {} HTTP/1.1\r\n", request.method, request.url);
    let headers_size: usize = request
        .headers
        .iter()
        .map(|(k, v)| k.len() + v.len() + 4) // "K: V\r\n"
        .sum();
    (request_line.len() + headers_size + 2 + request.body.len()) as u64
}

/// Resolver that ignores the hostname and always returns one fixed address,
/// for `--skip-dns` (the caller already knows the target IP).
#[derive(Debug, Clone, Copy)]
struct FixedResolver(SocketAddr);

impl Resolve for FixedResolver {
    fn resolve(&self, _name: Name) -> Resolving {
        let addr = self.0;
        Box::pin(async move {
            let addrs: Addrs = Box::new(std::iter::once(addr));
            Ok(addrs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_request_size_accounts_for_headers_and_body() {
        let req = ExecutorRequest {
            method: Method::Post,
            url: "http://example.test/path".into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: b"{}".to_vec(),
            timeout: Duration::from_secs(1),
        };
        let size = raw_request_size(&req);
        assert!(size > req.body.len() as u64);
    }

    #[test]
    fn default_executor_config_builds() {
        let cfg = ExecutorConfig::default();
        assert!(ReqwestExecutor::build(&cfg).is_ok());
    }
}
