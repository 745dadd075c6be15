//! Filter compiler
//!
//! Translates the public predicate tree into the docstore's native form.
//! Leaf paths address the opaque config payload, so every path is
//! rewritten under the `config.` storage prefix. Operator semantics are
//! preserved one-to-one; nothing is folded or reordered.

use yucca_api::{ConfigError, FilterExpression, LogicalOperator, RelationalOperator, Result};
use yucca_docstore::{Filter, RelationalOp};

/// Storage prefix of the opaque payload inside a config document.
const CONFIG_FIELD_PREFIX: &str = "config.";

/// Compile a client predicate into a docstore predicate.
///
/// Rejects `Unspecified` operators, empty logical operand lists, and
/// empty leaf paths with `InvalidArgument`.
pub fn compile(expression: &FilterExpression) -> Result<Filter> {
    match expression {
        FilterExpression::Relational { field, op, value } => {
            let field = field.trim();
            if field.is_empty() {
                return Err(ConfigError::invalid_argument(
                    "relational predicate requires a field path",
                ));
            }
            Ok(Filter::Relational {
                field: format!("{CONFIG_FIELD_PREFIX}{field}"),
                op: compile_operator(*op)?,
                value: value.clone(),
            })
        }
        FilterExpression::Logical { op, operands } => {
            if operands.is_empty() {
                return Err(ConfigError::invalid_argument(
                    "logical predicate requires at least one operand",
                ));
            }
            let children = operands.iter().map(compile).collect::<Result<Vec<_>>>()?;
            match op {
                LogicalOperator::And => Ok(Filter::And(children)),
                LogicalOperator::Or => Ok(Filter::Or(children)),
                LogicalOperator::Unspecified => Err(ConfigError::invalid_argument(
                    "unspecified logical operator",
                )),
            }
        }
        FilterExpression::Not(operand) => Ok(Filter::Not(Box::new(compile(operand)?))),
    }
}

fn compile_operator(op: RelationalOperator) -> Result<RelationalOp> {
    match op {
        RelationalOperator::Eq => Ok(RelationalOp::Eq),
        RelationalOperator::Neq => Ok(RelationalOp::Neq),
        RelationalOperator::Lt => Ok(RelationalOp::Lt),
        RelationalOperator::Lte => Ok(RelationalOp::Lte),
        RelationalOperator::Gt => Ok(RelationalOp::Gt),
        RelationalOperator::Gte => Ok(RelationalOp::Gte),
        RelationalOperator::In => Ok(RelationalOp::In),
        RelationalOperator::NotIn => Ok(RelationalOp::NotIn),
        RelationalOperator::Exists => Ok(RelationalOp::Exists),
        RelationalOperator::Like => Ok(RelationalOp::Like),
        RelationalOperator::Unspecified => Err(ConfigError::invalid_argument(
            "unspecified relational operator",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_paths_get_config_prefix() {
        let compiled = compile(&FilterExpression::eq("limits.max", json!(10))).unwrap();
        assert_eq!(
            compiled,
            Filter::Relational {
                field: "config.limits.max".to_string(),
                op: RelationalOp::Eq,
                value: json!(10),
            }
        );
    }

    #[test]
    fn test_every_operator_maps() {
        let pairs = [
            (RelationalOperator::Eq, RelationalOp::Eq),
            (RelationalOperator::Neq, RelationalOp::Neq),
            (RelationalOperator::Lt, RelationalOp::Lt),
            (RelationalOperator::Lte, RelationalOp::Lte),
            (RelationalOperator::Gt, RelationalOp::Gt),
            (RelationalOperator::Gte, RelationalOp::Gte),
            (RelationalOperator::In, RelationalOp::In),
            (RelationalOperator::NotIn, RelationalOp::NotIn),
            (RelationalOperator::Exists, RelationalOp::Exists),
            (RelationalOperator::Like, RelationalOp::Like),
        ];
        for (public, native) in pairs {
            let compiled =
                compile(&FilterExpression::relational("x", public, json!(1))).unwrap();
            match compiled {
                Filter::Relational { op, .. } => assert_eq!(op, native),
                other => panic!("expected relational, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_logical_nesting_preserved() {
        let expr = FilterExpression::and(vec![
            FilterExpression::eq("a", json!(1)),
            FilterExpression::or(vec![
                FilterExpression::eq("b", json!(2)),
                FilterExpression::not(FilterExpression::eq("c", json!(3))),
            ]),
        ]);
        let compiled = compile(&expr).unwrap();
        match compiled {
            Filter::And(children) => {
                assert_eq!(children.len(), 2);
                match &children[1] {
                    Filter::Or(inner) => {
                        assert_eq!(inner.len(), 2);
                        assert!(matches!(inner[1], Filter::Not(_)));
                    }
                    other => panic!("expected or, got {other:?}"),
                }
            }
            other => panic!("expected and, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_empty_logical_operands() {
        let err = compile(&FilterExpression::and(vec![])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));

        let err = compile(&FilterExpression::or(vec![])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_unspecified_operators() {
        let err = compile(&FilterExpression::relational(
            "x",
            RelationalOperator::Unspecified,
            json!(1),
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));

        let err = compile(&FilterExpression::Logical {
            op: LogicalOperator::Unspecified,
            operands: vec![FilterExpression::eq("x", json!(1))],
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_empty_field_path() {
        let err = compile(&FilterExpression::eq("", json!(1))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));

        let err = compile(&FilterExpression::eq("   ", json!(1))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));
    }
}
