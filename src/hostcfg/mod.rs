//! Host configuration envelope.
//!
//! The envelope around an expression chain: which host to protect, over
//! which protocol/port, and the throttle parameters (period, duration,
//! frequency). This module owns the wire types and the ordered semantic
//! validation that gates every create/update request before compilation
//! and storage.

mod classify;
mod types;
mod validator;

pub use classify::{classify, is_hostname_shaped, HostKind};
pub use types::{FilterMode, HostConfig, HostConfigRequest, HostData, Protocol, ValidationError};
pub use validator::{validate, MAX_EXPRESSIONS, MAX_FREQUENCY, MAX_PERIOD_SECS};
