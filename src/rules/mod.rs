//! Filter rule domain.
//!
//! A host configuration may carry a chain of filter expressions that narrow
//! which inbound requests the gateway throttles. This module defines:
//! - The closed field and operator vocabularies
//! - The constraint table mapping each field to its legal operators
//! - The compiler turning raw wire expressions into validated [`Rule`]s
//! - The chain assembler that numbers rules and preserves chain logic
//!
//! Compilation is pure and request-scoped: no shared mutable state, no I/O.
//! The constraint table is a process-wide immutable value.

mod compiler;
mod constraints;
mod types;

pub use compiler::{assemble, compile};
pub use constraints::{allowed_operators, constraint_table};
pub use types::{
    ChainLogic, ExpressionEcho, RawExpression, RawValue, Rule, RuleBuildError, RuleBuildErrorKind,
    RuleField, RuleOperator, RuleValue, ScalarValue,
};
