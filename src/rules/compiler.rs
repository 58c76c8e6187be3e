//! Expression compiler and chain assembler.
//!
//! `compile` turns one raw expression into a validated [`Rule`]; `assemble`
//! runs an ordered chain through it, numbering elements from 1. Both are
//! pure functions over their inputs.

use super::constraints::allowed_operators;
use super::types::{
    ChainLogic, RawExpression, Rule, RuleBuildError, RuleBuildErrorKind, RuleField, RuleOperator,
};

/// Compile one raw expression into a [`Rule`].
///
/// Fail fast, first violation wins, in order: unrecognized field,
/// unrecognized operator, missing/empty value, unparseable logic, operator
/// not legal for the field. Errors echo the offending input for field-scoped
/// client feedback.
pub fn compile(sequence_id: u32, raw: &RawExpression) -> Result<Rule, RuleBuildError> {
    let field = RuleField::parse(&raw.field)
        .ok_or_else(|| RuleBuildError::new(RuleBuildErrorKind::UnsupportedField, raw))?;

    let operator = RuleOperator::parse(&raw.operator)
        .ok_or_else(|| RuleBuildError::new(RuleBuildErrorKind::UnsupportedOperator, raw))?;

    let value = raw
        .value
        .as_ref()
        .and_then(|v| v.to_rule_value())
        .ok_or_else(|| RuleBuildError::new(RuleBuildErrorKind::InvalidValue, raw))?;

    let logic = match raw.logic.as_deref() {
        None => None,
        Some(name) => Some(
            ChainLogic::parse(name)
                .ok_or_else(|| RuleBuildError::new(RuleBuildErrorKind::InvalidLogic, raw))?,
        ),
    };

    if !allowed_operators(field).contains(&operator) {
        return Err(RuleBuildError::new(
            RuleBuildErrorKind::IncompatibleOperator,
            raw,
        ));
    }

    Ok(Rule {
        sequence_id,
        field,
        operator,
        value,
        logic,
    })
}

/// Compile an ordered chain of raw expressions.
///
/// Sequence ids are re-derived here, counting from 1; the client-supplied
/// ids are ignored, so identifiers are always contiguous and gap-free
/// regardless of what was submitted. The first compiler error aborts the
/// whole chain; no partial result is returned.
///
/// Chain logic must be absent on the first element and present on every
/// other one (the chain denotes a flat left-associative boolean expression).
/// Chain-length bounds are the envelope validator's responsibility and are
/// not checked here.
pub fn assemble(raws: &[RawExpression]) -> Result<Vec<Rule>, RuleBuildError> {
    let mut rules = Vec::with_capacity(raws.len());

    for (index, raw) in raws.iter().enumerate() {
        let first = index == 0;
        if first != raw.logic.is_none() {
            return Err(RuleBuildError::new(RuleBuildErrorKind::InvalidLogic, raw));
        }

        let rule = compile(index as u32 + 1, raw)?;
        rules.push(rule);
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::types::{RawValue, ScalarValue};

    fn expr(field: &str, operator: &str, value: &str, logic: Option<&str>) -> RawExpression {
        RawExpression {
            id: None,
            field: field.to_string(),
            operator: operator.to_string(),
            value: Some(RawValue::Scalar(ScalarValue::String(value.to_string()))),
            logic: logic.map(str::to_string),
        }
    }

    #[test]
    fn compiles_a_valid_expression() {
        let rule = compile(3, &expr("URI_PATH", "STARTS_WITH", "/api", Some("AND"))).unwrap();
        assert_eq!(rule.sequence_id, 3);
        assert_eq!(rule.field, RuleField::UriPath);
        assert_eq!(rule.operator, RuleOperator::StartsWith);
        assert_eq!(rule.logic, Some(ChainLogic::And));
    }

    #[test]
    fn rejects_unknown_field_before_anything_else() {
        // Operator is also bogus; the field error must win.
        let err = compile(1, &expr("HEADER", "NOPE", "", None)).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::UnsupportedField);
        assert_eq!(err.echo.field.as_deref(), Some("HEADER"));
    }

    #[test]
    fn rejects_unknown_operator() {
        let err = compile(1, &expr("URI", "MATCHES", "/x", None)).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::UnsupportedOperator);
        assert_eq!(err.echo.operator.as_deref(), Some("MATCHES"));
    }

    #[test]
    fn rejects_missing_and_empty_values() {
        let mut raw = expr("URI", "EQUALS", "", None);
        let err = compile(1, &raw).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::InvalidValue);

        raw.value = None;
        let err = compile(1, &raw).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::InvalidValue);
    }

    #[test]
    fn rejects_bad_logic_tokens() {
        let err = compile(1, &expr("URI", "EQUALS", "/x", Some("XOR"))).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::InvalidLogic);
    }

    #[test]
    fn rejects_operator_outside_constraint_table() {
        let err = compile(1, &expr("REQUEST_METHOD", "GREATER_THAN", "GET", None)).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::IncompatibleOperator);
        assert_eq!(err.echo.field.as_deref(), Some("REQUEST_METHOD"));
        assert_eq!(err.echo.operator.as_deref(), Some("GREATER_THAN"));
    }

    #[test]
    fn every_incompatible_pair_is_rejected() {
        for field in RuleField::ALL {
            let legal = allowed_operators(field);
            for name in [
                "WILDCARD",
                "EQUALS",
                "NOT_EQUALS",
                "GREATER_THAN",
                "LESS_THAN",
                "GREATER_THAN_OR_EQUAL",
                "LESS_THAN_OR_EQUAL",
                "CONTAINS",
                "IS_IN",
                "IS_NOT_IN",
                "STARTS_WITH",
                "ENDS_WITH",
                "DOES_NOT_START_WITH",
                "DOES_NOT_END_WITH",
                "EXISTS",
                "DOES_NOT_EXIST",
            ] {
                let op = RuleOperator::parse(name).unwrap();
                let result = compile(1, &expr(field.name(), name, "v", None));
                if legal.contains(&op) {
                    assert!(result.is_ok(), "{field} {name} should compile");
                } else {
                    assert_eq!(
                        result.unwrap_err().kind,
                        RuleBuildErrorKind::IncompatibleOperator,
                        "{field} {name} should be incompatible"
                    );
                }
            }
        }
    }

    #[test]
    fn assembles_sequence_ids_from_one() {
        let raws = vec![
            expr("URI", "EQUALS", "/a", None),
            expr("URI_PATH", "CONTAINS", "b", Some("AND")),
            expr("REQUEST_METHOD", "EQUALS", "GET", Some("OR")),
        ];
        let rules = assemble(&raws).unwrap();
        let ids: Vec<u32> = rules.iter().map(|r| r.sequence_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(rules[0].logic, None);
        assert_eq!(rules[2].logic, Some(ChainLogic::Or));
    }

    #[test]
    fn client_supplied_ids_are_ignored() {
        let mut raws = vec![
            expr("URI", "EQUALS", "/a", None),
            expr("URI", "EQUALS", "/b", Some("OR")),
        ];
        raws[0].id = Some(99);
        raws[1].id = Some(99);
        let rules = assemble(&raws).unwrap();
        assert_eq!(rules[0].sequence_id, 1);
        assert_eq!(rules[1].sequence_id, 2);
    }

    #[test]
    fn first_element_must_not_carry_logic() {
        let raws = vec![expr("URI", "EQUALS", "/a", Some("AND"))];
        let err = assemble(&raws).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::InvalidLogic);
    }

    #[test]
    fn later_elements_must_carry_logic() {
        let raws = vec![
            expr("URI", "EQUALS", "/a", None),
            expr("URI", "EQUALS", "/b", None),
        ];
        let err = assemble(&raws).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::InvalidLogic);
    }

    #[test]
    fn first_error_aborts_with_no_partial_result() {
        let raws = vec![
            expr("URI", "EQUALS", "/a", None),
            expr("URI", "GREATER_THAN", "/b", Some("AND")),
            expr("URI", "EQUALS", "/c", Some("AND")),
        ];
        let err = assemble(&raws).unwrap_err();
        assert_eq!(err.kind, RuleBuildErrorKind::IncompatibleOperator);
    }

    #[test]
    fn empty_chain_assembles_to_nothing() {
        assert_eq!(assemble(&[]).unwrap(), Vec::new());
    }
}
