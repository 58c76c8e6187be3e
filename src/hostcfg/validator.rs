//! Host configuration validator.
//!
//! Ordered, short-circuiting semantic checks over the raw envelope. The
//! first violation wins; the client UI surfaces one error at a time, so no
//! aggregation happens here. A valid result is the normalized envelope,
//! ready for expression compilation.

use super::classify::{classify, HostKind};
use super::types::{FilterMode, HostConfig, HostConfigRequest, HostData, Protocol, ValidationError};

/// Generous schema-level ceiling for period and duration: 7 days. The
/// request handlers re-check against a tighter operational ceiling; both
/// bounds are enforced.
pub const MAX_PERIOD_SECS: u64 = 604_800;

/// Ceiling for frequency (requests per period).
pub const MAX_FREQUENCY: u64 = 10_000;

/// Ceiling for expressions in one chain.
pub const MAX_EXPRESSIONS: usize = 10;

const MAX_NAME_LEN: usize = 100;
const MAX_HOST_LEN: usize = 100;
const MAX_PORT_LEN: usize = 5;

fn require_string(
    value: &Option<String>,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let s = value
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::Required { field })?;
    if s.len() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(s.to_string())
}

fn require_bounded(
    value: Option<i64>,
    field: &'static str,
    max: u64,
) -> Result<u64, ValidationError> {
    let n = value.ok_or(ValidationError::NotPositive { field })?;
    if n <= 0 {
        return Err(ValidationError::NotPositive { field });
    }
    let n = n as u64;
    if n > max {
        return Err(ValidationError::AboveMax { field, max });
    }
    Ok(n)
}

/// Validate a raw host configuration.
///
/// Check order, each short-circuiting:
/// 1. structural: required fields, string lengths, enum values, expression
///    count;
/// 2. normalization: absent or empty expressions force `filter = all`
///    (leftover expressions with no filter intent mean "match everything");
/// 3. cross-field: a custom filter requires a non-empty chain;
/// 4. host classification: IPs require a port, hostnames forbid one;
/// 5. numeric bounds: period, duration, frequency.
///
/// Expressions are carried through raw; compiling them is the chain
/// assembler's job and failures there are a distinct error channel.
pub fn validate(raw: &HostConfigRequest) -> Result<HostData, ValidationError> {
    // 1. Structural
    let name = require_string(&raw.name, "name", MAX_NAME_LEN)?;
    let host = require_string(&raw.host, "host", MAX_HOST_LEN)?;

    if let Some(port) = raw.port.as_deref() {
        if port.len() > MAX_PORT_LEN {
            return Err(ValidationError::TooLong {
                field: "port",
                max: MAX_PORT_LEN,
            });
        }
    }

    let protocol = raw
        .protocol
        .as_deref()
        .and_then(Protocol::parse)
        .ok_or(ValidationError::Protocol)?;

    let filter = raw
        .filter
        .as_deref()
        .and_then(FilterMode::parse)
        .ok_or(ValidationError::Filter)?;

    let expressions = raw.expressions.clone().unwrap_or_default();
    if expressions.len() > MAX_EXPRESSIONS {
        return Err(ValidationError::TooManyExpressions {
            max: MAX_EXPRESSIONS,
        });
    }

    // 2. Normalization: no expressions means nothing to filter on, and a
    // match-everything config carries no chain
    let filter = if expressions.is_empty() {
        FilterMode::All
    } else {
        filter
    };
    let expressions = if filter == FilterMode::All {
        Vec::new()
    } else {
        expressions
    };

    // 3. Cross-field
    if filter == FilterMode::Custom && expressions.is_empty() {
        return Err(ValidationError::ExpressionsRequired);
    }

    // 4. Host classification vs port
    let port = raw.port.as_ref().filter(|p| !p.is_empty()).cloned();
    match classify(&host) {
        HostKind::Ip if port.is_none() => return Err(ValidationError::PortRequired),
        HostKind::Hostname if port.is_some() => return Err(ValidationError::PortForbidden),
        _ => {}
    }

    // 5. Bounds
    let period = require_bounded(raw.period, "period", MAX_PERIOD_SECS)?;
    let duration = require_bounded(raw.duration, "duration", MAX_PERIOD_SECS)?;
    let frequency = require_bounded(raw.frequency, "frequency", MAX_FREQUENCY)?;

    Ok(HostData {
        config: HostConfig {
            name,
            host,
            protocol,
            port,
            period,
            duration,
            frequency,
            filter,
        },
        expressions,
    })
}
