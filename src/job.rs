//! A single unit of work for the engine: one intended HTTP request.

use std::fmt;

/// HTTP method a [`Job`] is dispatched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "HEAD" => Some(Method::Head),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "PATCH" => Some(Method::Patch),
            _ => None,
        }
    }

    /// Methods that conventionally carry a request body.
    pub fn expects_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// One unit of work: created by the driver, consumed exactly once by a worker.
#[derive(Debug, Clone)]
pub struct Job {
    pub target_url: String,
    pub method: Method,
    pub body: Vec<u8>,
}

impl Job {
    pub fn new(target_url: impl Into<String>, method: Method, body: Vec<u8>) -> Self {
        Self {
            target_url: target_url.into(),
            method,
            body,
        }
    }

    /// Build `count` identical jobs, the shape the driver hands to the pool.
    pub fn repeat(target_url: &str, method: Method, body: &[u8], count: usize) -> Vec<Job> {
        (0..count)
            .map(|_| Job::new(target_url, method, body.to_vec()))
            .collect()
    }
}
