//! Host configuration wire and domain types.

use serde::{Deserialize, Serialize};

use crate::rules::RawExpression;

/// Protocol the protected host speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            _ => None,
        }
    }
}

/// Whether the configuration throttles everything or only requests matching
/// its expression chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    All,
    Custom,
}

impl FilterMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::All),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Raw host configuration as submitted by the client.
///
/// Every field is optional here so that presence and enum checks are
/// performed by the validator, which reports field-scoped errors, instead
/// of failing opaquely at body parse time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostConfigRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub period: Option<i64>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub frequency: Option<i64>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub expressions: Option<Vec<RawExpression>>,
}

/// A validated, normalized host configuration envelope (everything except
/// the expression chain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    pub name: String,
    pub host: String,
    pub protocol: Protocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub period: u64,
    pub duration: u64,
    pub frequency: u64,
    pub filter: FilterMode,
}

/// Validator output: the normalized envelope plus the structurally-valid
/// raw expression chain. The chain assembler compiles the expressions as
/// the next pipeline stage; failures there are a distinct error channel.
#[derive(Debug, Clone, PartialEq)]
pub struct HostData {
    pub config: HostConfig,
    pub expressions: Vec<RawExpression>,
}

impl HostData {
    /// Rebuild the wire form. Round-tripping through
    /// [`validate`](crate::hostcfg::validate) is idempotent.
    pub fn to_request(&self) -> HostConfigRequest {
        HostConfigRequest {
            name: Some(self.config.name.clone()),
            host: Some(self.config.host.clone()),
            period: Some(self.config.period as i64),
            duration: Some(self.config.duration as i64),
            frequency: Some(self.config.frequency as i64),
            port: self.config.port.clone(),
            protocol: Some(
                match self.config.protocol {
                    Protocol::Http => "http",
                    Protocol::Https => "https",
                }
                .to_string(),
            ),
            filter: Some(
                match self.config.filter {
                    FilterMode::All => "all",
                    FilterMode::Custom => "custom",
                }
                .to_string(),
            ),
            expressions: Some(self.expressions.clone()),
        }
    }
}

/// Envelope validation failure: one message, optionally scoped to a field.
///
/// Deliberately a separate type from [`RuleBuildError`](crate::rules::RuleBuildError):
/// the two channels carry different payloads and the handler maps them to
/// different client-visible shapes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a non-empty string")]
    Required { field: &'static str },

    #[error("{field} must be {max} characters or less")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be a number greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must be at most {max}")]
    AboveMax { field: &'static str, max: u64 },

    #[error("protocol must be either 'http' or 'https'")]
    Protocol,

    #[error("filter must be either 'all' or 'custom'")]
    Filter,

    #[error("a maximum of {max} expressions is allowed")]
    TooManyExpressions { max: usize },

    #[error("expressions must be a non-empty array when filter is 'custom'")]
    ExpressionsRequired,

    #[error("port is required when host is an IP address")]
    PortRequired,

    #[error("port must not be set when host is a hostname")]
    PortForbidden,
}

impl ValidationError {
    /// Field path the error is scoped to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::NotPositive { field }
            | Self::AboveMax { field, .. } => field,
            Self::Protocol => "protocol",
            Self::Filter => "filter",
            Self::TooManyExpressions { .. } | Self::ExpressionsRequired => "expressions",
            Self::PortRequired | Self::PortForbidden => "port",
        }
    }
}
