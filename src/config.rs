//! CLI flags and environment variables for the load-generation engine.
//!
//! Pattern adapted from the reference codebase's `clap::Parser` +
//! `#[arg(long, env = "...")]` style.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::engine::EngineConfig;
use crate::errors::ConfigError;
use crate::executor::{Executor, ExecutorConfig, ProxyConfig, ReqwestExecutor};
use crate::job::{Job, Method};
use crate::serialize::OutputFormat;

/// yahba-rs — concurrent HTTP load-generation tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "yahba")]
#[command(about = "Concurrent HTTP load-generation tool")]
pub struct CliArgs {
    /// Target URL to send requests to
    #[arg(long, env = "YAHBA_URL")]
    pub url: Option<String>,

    /// HTTP method (GET, HEAD, POST, PUT, DELETE, PATCH)
    #[arg(long, env = "YAHBA_METHOD", default_value = "GET")]
    pub method: String,

    /// Request body (required for POST/PUT/PATCH)
    #[arg(long, env = "YAHBA_BODY")]
    pub body: Option<String>,

    /// Extra request header, "Key: Value"; may be repeated
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Total number of requests to send
    #[arg(short = 'n', long, env = "YAHBA_REQUESTS", default_value = "100")]
    pub requests: u32,

    /// Target requests per second
    #[arg(long, env = "YAHBA_RPS", default_value = "10")]
    pub rps: u32,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "YAHBA_TIMEOUT_MS", default_value = "30000")]
    pub timeout_ms: u64,

    /// Skip TLS certificate verification
    #[arg(long, env = "YAHBA_INSECURE", default_value = "false")]
    pub insecure: bool,

    /// Forward proxy URL, e.g. "http://127.0.0.1:8080"
    #[arg(long, env = "YAHBA_PROXY")]
    pub proxy: Option<String>,

    /// Proxy basic-auth username
    #[arg(long, env = "YAHBA_PROXY_USER")]
    pub proxy_user: Option<String>,

    /// Proxy basic-auth password
    #[arg(long, env = "YAHBA_PROXY_PASSWORD")]
    pub proxy_password: Option<String>,

    /// Resolve this specific host to a fixed address, "host:ip:port"
    #[arg(long, env = "YAHBA_RESOLVER")]
    pub resolver: Option<String>,

    /// Skip DNS entirely: send every request to this fixed address
    #[arg(long, env = "YAHBA_SKIP_DNS")]
    pub skip_dns: Option<SocketAddr>,

    /// Enable HTTP keep-alive (connection reuse)
    #[arg(long, env = "YAHBA_KEEP_ALIVE", default_value = "true")]
    pub keep_alive: bool,

    /// Enable gzip compression
    #[arg(long, env = "YAHBA_COMPRESSION", default_value = "false")]
    pub compression: bool,

    /// Negotiate HTTP/2 directly (prior knowledge)
    #[arg(long, env = "YAHBA_HTTP2", default_value = "false")]
    pub http2: bool,

    /// Output format: raw, json, or yaml
    #[arg(long, env = "YAHBA_OUTPUT", default_value = "raw")]
    pub output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "YAHBA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Launch the built-in test target server instead of running a load test
    #[arg(long, default_value = "false")]
    pub server: bool,

    /// Address for the built-in test target server to listen on
    #[arg(long, env = "YAHBA_SERVER_LISTEN", default_value = "127.0.0.1:8080")]
    pub server_listen: SocketAddr,
}

impl CliArgs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server {
            return Ok(());
        }

        if self.url.is_none() {
            return Err(ConfigError::MissingUrl);
        }

        let method = Method::parse(&self.method)
            .ok_or_else(|| ConfigError::InvalidMethod(self.method.clone()))?;

        if method.expects_body() && self.body.is_none() {
            return Err(ConfigError::MissingBody);
        }

        if self.requests == 0 {
            return Err(ConfigError::InvalidRequests);
        }

        if self.rps == 0 {
            return Err(ConfigError::InvalidRps);
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        OutputFormat::from_str(&self.output)?;

        for raw in &self.headers {
            parse_header(raw)?;
        }

        self.resolver_override()?;

        if self.http2 && self.resolver.is_some() {
            return Err(ConfigError::Http2ResolverConflict);
        }

        Ok(())
    }

    fn parsed_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .filter_map(|raw| parse_header(raw).ok())
            .collect()
    }

    fn method(&self) -> Method {
        Method::parse(&self.method).expect("validated before use")
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_str(&self.output).expect("validated before use")
    }

    /// Build the ordered job list this run dispatches.
    pub fn jobs(&self) -> Vec<Job> {
        let url = self.url.clone().expect("validated before use");
        let body = self.body.clone().unwrap_or_default().into_bytes();
        Job::repeat(&url, self.method(), &body, self.requests as usize)
    }

    fn resolver_override(&self) -> Result<Option<(String, SocketAddr)>, ConfigError> {
        let Some(ref raw) = self.resolver else {
            return Ok(None);
        };
        let (host, addr_part) = raw
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidResolver(raw.clone()))?;
        let socket_addr = addr_part
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidResolver(raw.clone()))?;
        Ok(Some((host.to_string(), socket_addr)))
    }

    fn executor_config(&self) -> Result<ExecutorConfig, ConfigError> {
        let proxy = self.proxy.as_ref().map(|url| ProxyConfig {
            url: url.clone(),
            username: self.proxy_user.clone(),
            password: self.proxy_password.clone(),
        });

        Ok(ExecutorConfig {
            insecure: self.insecure,
            proxy,
            keep_alive: self.keep_alive,
            compression: self.compression,
            http2: self.http2,
            skip_dns_to: self.skip_dns,
            custom_resolver: self.resolver_override()?,
        })
    }

    /// Construct the executor and the `EngineConfig` the driver consumes.
    /// Executor construction happens here, outside `engine::run`, matching
    /// the driver interface taking an already-built `Arc<dyn Executor>`.
    pub fn build_engine_config(&self) -> Result<EngineConfig, crate::errors::ExecutorInitError> {
        let executor_config = self
            .executor_config()
            .expect("validated before build_engine_config is called");
        let executor: Arc<dyn Executor> = Arc::new(ReqwestExecutor::build(&executor_config)?);

        Ok(EngineConfig {
            rps: self.rps,
            timeout: Duration::from_millis(self.timeout_ms),
            headers: self.parsed_headers(),
            executor,
            job_channel_capacity: 64,
            result_channel_capacity: self.requests as usize,
        })
    }
}

/// Parse one "Key: Value" header, matching the format the reference CLI accepts.
fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidHeader(raw.to_string()))?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() {
        return Err(ConfigError::InvalidHeader(raw.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            url: Some("http://localhost:8080/".into()),
            method: "GET".into(),
            body: None,
            headers: vec![],
            requests: 10,
            rps: 5,
            timeout_ms: 1000,
            insecure: false,
            proxy: None,
            proxy_user: None,
            proxy_password: None,
            resolver: None,
            skip_dns: None,
            keep_alive: true,
            compression: false,
            http2: false,
            output: "raw".into(),
            log_level: "info".into(),
            server: false,
            server_listen: "127.0.0.1:8080".parse().unwrap(),
        }
    }

    #[test]
    fn missing_url_is_rejected() {
        let mut args = base_args();
        args.url = None;
        assert_eq!(args.validate(), Err(ConfigError::MissingUrl));
    }

    #[test]
    fn post_without_body_is_rejected() {
        let mut args = base_args();
        args.method = "POST".into();
        assert_eq!(args.validate(), Err(ConfigError::MissingBody));
    }

    #[test]
    fn http2_and_resolver_conflict_is_rejected() {
        let mut args = base_args();
        args.http2 = true;
        args.resolver = Some("example.test:127.0.0.1:9000".into());
        assert_eq!(args.validate(), Err(ConfigError::Http2ResolverConflict));
    }

    #[test]
    fn valid_args_pass() {
        assert!(base_args().validate().is_ok());
    }

    #[test]
    fn header_parsing_trims_whitespace() {
        let (k, v) = parse_header("X-Test:  value  ").unwrap();
        assert_eq!(k, "X-Test");
        assert_eq!(v, "value");
    }

    #[test]
    fn malformed_resolver_is_reported_as_invalid_resolver() {
        let mut args = base_args();
        args.resolver = Some("example.test".into());
        assert_eq!(
            args.validate(),
            Err(ConfigError::InvalidResolver("example.test".into()))
        );
    }
}
