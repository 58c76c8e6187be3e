//! Host classification.
//!
//! Pattern-based classification of the `host` field into IP address or
//! hostname. Purely syntactic; DNS resolvability is never checked. Drives
//! the port consistency rules: IPs require an explicit port, hostnames
//! forbid one.

use regex::Regex;
use std::sync::OnceLock;

const IPV4_PATTERN: &str =
    r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$";

const IPV6_PATTERN: &str = r"^(([0-9a-fA-F]{1,4}:){7,7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,7}:|([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}|([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}|([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}|([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}|[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})|:((:[0-9a-fA-F]{1,4}){1,7}|:)|fe80:(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]{1,}|::(ffff(:0{1,4}){0,1}:){0,1}((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3,3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])|([0-9a-fA-F]{1,4}:){1,4}:((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3,3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9]))$";

// Hostname: at least one label plus a >= 2-letter alphabetic TLD.
const HOSTNAME_PATTERN: &str = r"^[a-zA-Z0-9][a-zA-Z0-9-]{1,61}[a-zA-Z0-9](?:\.[a-zA-Z]{2,})+$";

fn ipv4_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IPV4_PATTERN).expect("ipv4 pattern"))
}

fn ipv6_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IPV6_PATTERN).expect("ipv6 pattern"))
}

fn hostname_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HOSTNAME_PATTERN).expect("hostname pattern"))
}

/// What a `host` string was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// IPv4 or IPv6 literal
    Ip,
    /// Anything else, hostname-shaped or not
    Hostname,
}

/// Classify a host string. IP patterns take precedence; everything that
/// matches neither IP pattern is treated as a hostname, so the
/// port-forbidden rule applies to it.
pub fn classify(host: &str) -> HostKind {
    if ipv4_re().is_match(host) || ipv6_re().is_match(host) {
        HostKind::Ip
    } else {
        HostKind::Hostname
    }
}

/// Whether the string is hostname-shaped (label(s) plus alphabetic TLD).
pub fn is_hostname_shaped(host: &str) -> bool {
    hostname_re().is_match(host)
}
