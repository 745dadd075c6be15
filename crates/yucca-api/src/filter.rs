//! Structured predicate expressions
//!
//! Clients express upsert conditions (and filtered reads) as a tree of
//! relational and logical nodes over dotted field paths into the config
//! payload. The tree is compiled into the document-store's native
//! predicate form by the core; it is never built from strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relational comparison operators.
///
/// `Unspecified` is the wire default for requests that never set an
/// operator; the compiler rejects it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationalOperator {
    #[default]
    Unspecified,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Exists,
    Like,
}

/// Logical combinators over child expressions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    #[default]
    Unspecified,
    And,
    Or,
}

/// A predicate over the stored config payload.
///
/// Leaf paths are dotted field names relative to the payload root
/// (`"limits.max"` addresses `config.limits.max` in storage).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterExpression {
    Relational {
        field: String,
        op: RelationalOperator,
        value: Value,
    },
    Logical {
        op: LogicalOperator,
        operands: Vec<FilterExpression>,
    },
    Not(Box<FilterExpression>),
}

impl FilterExpression {
    /// `field == value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::relational(field, RelationalOperator::Eq, value)
    }

    /// `field != value`
    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::relational(field, RelationalOperator::Neq, value)
    }

    pub fn relational(
        field: impl Into<String>,
        op: RelationalOperator,
        value: impl Into<Value>,
    ) -> Self {
        FilterExpression::Relational {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn and(operands: Vec<FilterExpression>) -> Self {
        FilterExpression::Logical {
            op: LogicalOperator::And,
            operands,
        }
    }

    pub fn or(operands: Vec<FilterExpression>) -> Self {
        FilterExpression::Logical {
            op: LogicalOperator::Or,
            operands,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: FilterExpression) -> Self {
        FilterExpression::Not(Box::new(operand))
    }
}
