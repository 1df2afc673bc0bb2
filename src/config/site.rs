use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Environment variable carrying the backend base URL.
pub const API_URL_ENV: &str = "NEXT_PUBLIC_API_URL";

const RESERVED_ENV_PREFIXES: [&str; 2] = ["__", "NODE_"];
const RESERVED_ENV_NAMES: [&str; 1] = ["NEXT_RUNTIME"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

/// One trusted image origin. Unset fields match anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl RemotePattern {
    pub fn new(protocol: Protocol, hostname: &str) -> Self {
        Self {
            protocol: Some(protocol),
            hostname: hostname.to_string(),
            port: None,
            pathname: None,
            search: None,
        }
    }

    pub fn matches(&self, url: &Url) -> bool {
        if let Some(protocol) = self.protocol {
            if url.scheme() != protocol.as_str() {
                return false;
            }
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        if !glob_matches(&self.hostname, '.', host, true) {
            return false;
        }

        if let Some(port) = &self.port {
            let actual = url.port().map(|p| p.to_string()).unwrap_or_default();
            if *port != actual {
                return false;
            }
        }

        if let Some(pathname) = &self.pathname {
            if !glob_matches(pathname, '/', url.path(), false) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let actual = url.query().map(|q| format!("?{}", q)).unwrap_or_default();
            if *search != actual {
                return false;
            }
        }

        true
    }
}

/// `*` matches within one `separator`-delimited segment, `**` matches across
/// segments. Everything else is literal.
fn glob_matches(pattern: &str, separator: char, value: &str, case_insensitive: bool) -> bool {
    let segment = format!("[^{}]*", regex::escape(&separator.to_string()));
    let mut expr = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                expr.push_str(".*");
            } else {
                expr.push_str(&segment);
            }
        } else {
            expr.push_str(&regex::escape(&c.to_string()));
        }
    }
    expr.push('$');

    match RegexBuilder::new(&expr)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(re) => re.is_match(value),
        Err(e) => {
            tracing::warn!("Ignoring unusable pattern {}: {}", pattern, e);
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub remote_patterns: Vec<RemotePattern>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            remote_patterns: vec![RemotePattern::new(Protocol::Http, "localhost")],
        }
    }
}

impl ImageConfig {
    pub fn is_allowed_url(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
            && self.remote_patterns.iter().any(|p| p.matches(url))
    }

    /// Unparsable sources are never allowed.
    pub fn is_allowed(&self, src: &str) -> bool {
        match Url::parse(src) {
            Ok(url) => self.is_allowed_url(&url),
            Err(_) => false,
        }
    }
}

impl Validate for ImageConfig {
    fn validate(&self) -> Result<()> {
        for (i, pattern) in self.remote_patterns.iter().enumerate() {
            validate_non_empty_string(
                &format!("images.remote_patterns[{}].hostname", i),
                &pattern.hostname,
            )?;

            if let Some(port) = &pattern.port {
                if !port.is_empty() && port.parse::<u16>().is_err() {
                    return Err(ApiError::InvalidConfigValueError {
                        field: format!("images.remote_patterns[{}].port", i),
                        value: port.clone(),
                        reason: "Port must be empty or a number between 0 and 65535".to_string(),
                    });
                }
            }

            if let Some(pathname) = &pattern.pathname {
                if !pathname.starts_with('/') {
                    return Err(ApiError::InvalidConfigValueError {
                        field: format!("images.remote_patterns[{}].pathname", i),
                        value: pathname.clone(),
                        reason: "Pathname must start with '/'".to_string(),
                    });
                }
            }

            if let Some(search) = &pattern.search {
                if !search.is_empty() && !search.starts_with('?') {
                    return Err(ApiError::InvalidConfigValueError {
                        field: format!("images.remote_patterns[{}].search", i),
                        value: search.clone(),
                        reason: "Search must be empty or start with '?'".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Names of environment variables forwarded to client-visible code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEnv {
    #[serde(default)]
    pub passthrough: Vec<String>,
}

impl Default for ClientEnv {
    fn default() -> Self {
        Self {
            passthrough: vec![API_URL_ENV.to_string()],
        }
    }
}

impl ClientEnv {
    /// Client-visible values. Unset variables are left out.
    pub fn resolve<F>(&self, lookup: F) -> BTreeMap<String, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.passthrough
            .iter()
            .filter_map(|name| lookup(name).map(|value| (name.clone(), value)))
            .collect()
    }

    pub fn resolve_from_process(&self) -> BTreeMap<String, String> {
        self.resolve(|name| std::env::var(name).ok())
    }
}

impl Validate for ClientEnv {
    fn validate(&self) -> Result<()> {
        for name in &self.passthrough {
            validate_non_empty_string("env.passthrough", name)?;

            let reserved = RESERVED_ENV_NAMES.contains(&name.as_str())
                || RESERVED_ENV_PREFIXES.iter().any(|p| name.starts_with(p));
            if reserved {
                return Err(ApiError::InvalidConfigValueError {
                    field: "env.passthrough".to_string(),
                    value: name.clone(),
                    reason: "Reserved variable name cannot be exposed to client code".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Settings read once at start-up by whatever serves the frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub env: ClientEnv,
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.images.validate()?;
        self.env.validate()
    }
}
