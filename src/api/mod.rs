//! Rules API.
//!
//! The external-facing request layer: thin handlers that parse the body,
//! run the envelope validator and the expression compiler, apply the
//! handler-level operational checks (tighter window ceiling, plan quota,
//! id shape), and talk to storage. All domain decisions live in
//! [`hostcfg`](crate::hostcfg) and [`rules`](crate::rules); this module
//! only sequences them and maps their errors onto the wire.

mod error;
mod handlers;
mod server;

pub use error::ApiError;
pub use server::{router, ApiServer, AppState};
