//! Field/operator constraint table.
//!
//! The single source of truth for which operators are legal on which field,
//! consulted by the compiler and exposed read-only over `GET /constraints`
//! so client UIs can restrict their own input choices without duplicating
//! the policy. Immutable, defined once, safe for unlimited concurrent
//! readers.

use std::collections::BTreeMap;

use super::types::{RuleField, RuleOperator};

/// Operators legal on the URI-shaped fields.
const URI_OPERATORS: &[RuleOperator] = &[
    RuleOperator::Equals,
    RuleOperator::NotEquals,
    RuleOperator::Contains,
    RuleOperator::StartsWith,
    RuleOperator::EndsWith,
    RuleOperator::DoesNotStartWith,
    RuleOperator::DoesNotEndWith,
    RuleOperator::Wildcard,
];

/// Operators legal on the request method field.
const METHOD_OPERATORS: &[RuleOperator] = &[RuleOperator::Equals, RuleOperator::NotEquals];

/// Operators legal for `field`. Total over the closed field set; unknown
/// field names never reach here because they fail to parse and are rejected
/// as unsupported before the table is consulted.
pub fn allowed_operators(field: RuleField) -> &'static [RuleOperator] {
    match field {
        RuleField::FullUri
        | RuleField::Uri
        | RuleField::UriPath
        | RuleField::UriQueryString => URI_OPERATORS,
        RuleField::RequestMethod => METHOD_OPERATORS,
    }
}

/// The full table as `field -> [operators]`, in stable field order, for the
/// constraints endpoint.
pub fn constraint_table() -> BTreeMap<&'static str, Vec<&'static str>> {
    RuleField::ALL
        .iter()
        .map(|field| {
            (
                field.name(),
                allowed_operators(*field).iter().map(|op| op.name()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_fields_share_the_string_operators() {
        for field in [
            RuleField::FullUri,
            RuleField::Uri,
            RuleField::UriPath,
            RuleField::UriQueryString,
        ] {
            let ops = allowed_operators(field);
            assert_eq!(ops.len(), 8);
            assert!(ops.contains(&RuleOperator::Wildcard));
            assert!(!ops.contains(&RuleOperator::GreaterThan));
            assert!(!ops.contains(&RuleOperator::Exists));
        }
    }

    #[test]
    fn request_method_only_allows_equality() {
        let ops = allowed_operators(RuleField::RequestMethod);
        assert_eq!(ops, &[RuleOperator::Equals, RuleOperator::NotEquals]);
    }

    #[test]
    fn table_covers_every_field() {
        let table = constraint_table();
        assert_eq!(table.len(), RuleField::ALL.len());
        assert_eq!(table["REQUEST_METHOD"], vec!["EQUALS", "NOT_EQUALS"]);
    }
}
