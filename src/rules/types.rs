//! Rule types: fields, operators, chain logic, values, and build errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The part of an inbound request a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleField {
    /// Scheme, host, path and query string
    FullUri,
    /// Path plus query string
    Uri,
    /// Path only
    UriPath,
    /// Query string only
    UriQueryString,
    /// HTTP method
    RequestMethod,
}

impl RuleField {
    /// All fields, in wire order.
    pub const ALL: [RuleField; 5] = [
        RuleField::FullUri,
        RuleField::Uri,
        RuleField::UriPath,
        RuleField::UriQueryString,
        RuleField::RequestMethod,
    ];

    /// Parse a wire name. Returns `None` for unrecognized names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "FULL_URI" => Some(Self::FullUri),
            "URI" => Some(Self::Uri),
            "URI_PATH" => Some(Self::UriPath),
            "URI_QUERY_STRING" => Some(Self::UriQueryString),
            "REQUEST_METHOD" => Some(Self::RequestMethod),
            _ => None,
        }
    }

    /// Wire name of this field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullUri => "FULL_URI",
            Self::Uri => "URI",
            Self::UriPath => "URI_PATH",
            Self::UriQueryString => "URI_QUERY_STRING",
            Self::RequestMethod => "REQUEST_METHOD",
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The comparison applied between a rule field's runtime value and the
/// configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleOperator {
    Wildcard,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    IsIn,
    IsNotIn,
    StartsWith,
    EndsWith,
    DoesNotStartWith,
    DoesNotEndWith,
    Exists,
    DoesNotExist,
}

impl RuleOperator {
    /// Parse a wire name. Returns `None` for unrecognized names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "WILDCARD" => Some(Self::Wildcard),
            "EQUALS" => Some(Self::Equals),
            "NOT_EQUALS" => Some(Self::NotEquals),
            "GREATER_THAN" => Some(Self::GreaterThan),
            "LESS_THAN" => Some(Self::LessThan),
            "GREATER_THAN_OR_EQUAL" => Some(Self::GreaterThanOrEqual),
            "LESS_THAN_OR_EQUAL" => Some(Self::LessThanOrEqual),
            "CONTAINS" => Some(Self::Contains),
            "IS_IN" => Some(Self::IsIn),
            "IS_NOT_IN" => Some(Self::IsNotIn),
            "STARTS_WITH" => Some(Self::StartsWith),
            "ENDS_WITH" => Some(Self::EndsWith),
            "DOES_NOT_START_WITH" => Some(Self::DoesNotStartWith),
            "DOES_NOT_END_WITH" => Some(Self::DoesNotEndWith),
            "EXISTS" => Some(Self::Exists),
            "DOES_NOT_EXIST" => Some(Self::DoesNotExist),
            _ => None,
        }
    }

    /// Wire name of this operator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wildcard => "WILDCARD",
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
            Self::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Self::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Self::Contains => "CONTAINS",
            Self::IsIn => "IS_IN",
            Self::IsNotIn => "IS_NOT_IN",
            Self::StartsWith => "STARTS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::DoesNotStartWith => "DOES_NOT_START_WITH",
            Self::DoesNotEndWith => "DOES_NOT_END_WITH",
            Self::Exists => "EXISTS",
            Self::DoesNotExist => "DOES_NOT_EXIST",
        }
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boolean combinator linking a rule to the cumulative result of the rules
/// before it. Chains are flat and evaluated strictly left to right; there is
/// no grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChainLogic {
    And,
    Or,
}

impl ChainLogic {
    /// Parse a wire name. Returns `None` for unrecognized names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }
}

/// Scalar payload of a rule value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl ScalarValue {
    /// An empty string carries no comparison payload; numbers and booleans
    /// always do.
    pub fn is_empty(&self) -> bool {
        matches!(self, ScalarValue::String(s) if s.is_empty())
    }
}

/// Validated rule value: a scalar plus an optional key.
///
/// The key is a secondary discriminator reserved for future header/cookie
/// keyed fields; none of the current fields use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: ScalarValue,
}

/// Rule value as it arrives on the wire: either a bare scalar or a keyed
/// object, both with every part optional. The compiler decides whether the
/// payload is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Keyed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<ScalarValue>,
    },
    Scalar(ScalarValue),
}

impl RawValue {
    /// Extract the usable payload, if any.
    pub fn to_rule_value(&self) -> Option<RuleValue> {
        match self {
            RawValue::Scalar(v) if !v.is_empty() => Some(RuleValue {
                key: None,
                value: v.clone(),
            }),
            RawValue::Keyed {
                key,
                value: Some(v),
            } if !v.is_empty() => Some(RuleValue {
                key: key.clone(),
                value: v.clone(),
            }),
            _ => None,
        }
    }
}

/// One filter expression as submitted by the client.
///
/// Field, operator and logic arrive as free strings so that unrecognized
/// names surface as build errors rather than body-parse failures. The
/// client-supplied `id` is ignored; sequence ids are re-derived server side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExpression {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub field: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
    #[serde(default)]
    pub logic: Option<String>,
}

/// A validated filter rule. Created only by the compiler and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Position in the chain, contiguous from 1
    #[serde(rename = "id")]
    pub sequence_id: u32,
    #[serde(rename = "type")]
    pub field: RuleField,
    pub operator: RuleOperator,
    pub value: RuleValue,
    /// Absent exactly on the first element of a chain
    pub logic: Option<ChainLogic>,
}

/// What went wrong while compiling an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleBuildErrorKind {
    UnsupportedField,
    UnsupportedOperator,
    InvalidValue,
    InvalidLogic,
    IncompatibleOperator,
}

impl fmt::Display for RuleBuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::UnsupportedField => "unsupported rule field",
            Self::UnsupportedOperator => "unsupported rule operator",
            Self::InvalidValue => "invalid rule value",
            Self::InvalidLogic => "invalid chain logic",
            Self::IncompatibleOperator => "operator not allowed for this field",
        };
        f.write_str(msg)
    }
}

/// Echo of the offending expression, for field-scoped client feedback.
/// Carries only what the client sent, never internal state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpressionEcho {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
}

impl ExpressionEcho {
    pub fn from_raw(raw: &RawExpression) -> Self {
        Self {
            field: Some(raw.field.clone()),
            operator: Some(raw.operator.clone()),
            value: raw.value.clone(),
            logic: raw.logic.clone(),
        }
    }
}

/// Expression compilation failure.
///
/// Kept distinct from the envelope [`ValidationError`](crate::hostcfg::ValidationError):
/// handlers disambiguate the two channels when formatting the client-visible
/// message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct RuleBuildError {
    pub kind: RuleBuildErrorKind,
    pub echo: ExpressionEcho,
}

impl RuleBuildError {
    pub fn new(kind: RuleBuildErrorKind, raw: &RawExpression) -> Self {
        Self {
            kind,
            echo: ExpressionEcho::from_raw(raw),
        }
    }
}
