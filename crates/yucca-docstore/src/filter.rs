//! Adapter-native predicates
//!
//! The config core compiles client predicate trees into this form; the
//! embedded backend evaluates it directly, network backends translate it
//! into their own query language.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::Document;

/// Relational comparison operators understood by backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationalOp {
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

/// A predicate over stored documents.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Relational {
        field: String,
        op: RelationalOp,
        value: Value,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// `field == value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Relational {
            field: field.into(),
            op: RelationalOp::Eq,
            value: value.into(),
        }
    }

    pub fn and(children: Vec<Filter>) -> Self {
        Filter::And(children)
    }

    pub fn or(children: Vec<Filter>) -> Self {
        Filter::Or(children)
    }

    /// Evaluate the predicate against a document.
    ///
    /// Missing-field semantics follow document-store convention: positive
    /// comparisons (`Eq`, ordering operators, `In`, `Like`) never match a
    /// missing field, while the negative forms (`Neq`, `NotIn`) do.
    /// `Exists` matches any present, non-null value.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::And(children) => children.iter().all(|child| child.matches(document)),
            Filter::Or(children) => children.iter().any(|child| child.matches(document)),
            Filter::Not(child) => !child.matches(document),
            Filter::Relational { field, op, value } => {
                relational_matches(document.field(field), *op, value)
            }
        }
    }
}

fn relational_matches(actual: Option<&Value>, op: RelationalOp, expected: &Value) -> bool {
    match op {
        RelationalOp::Eq => actual.is_some_and(|lhs| values_equal(lhs, expected)),
        RelationalOp::Neq => actual.is_none_or(|lhs| !values_equal(lhs, expected)),
        RelationalOp::Lt => ordering_matches(actual, expected, |ord| ord == Ordering::Less),
        RelationalOp::Lte => ordering_matches(actual, expected, |ord| ord != Ordering::Greater),
        RelationalOp::Gt => ordering_matches(actual, expected, |ord| ord == Ordering::Greater),
        RelationalOp::Gte => ordering_matches(actual, expected, |ord| ord != Ordering::Less),
        RelationalOp::In => actual.is_some_and(|lhs| set_contains(expected, lhs)),
        RelationalOp::NotIn => actual.is_none_or(|lhs| !set_contains(expected, lhs)),
        RelationalOp::Exists => actual.is_some_and(|lhs| !lhs.is_null()),
        RelationalOp::Like => actual.is_some_and(|lhs| like_matches(lhs, expected)),
    }
}

fn ordering_matches(
    actual: Option<&Value>,
    expected: &Value,
    accept: impl Fn(Ordering) -> bool,
) -> bool {
    actual
        .and_then(|lhs| compare_values(lhs, expected))
        .is_some_and(accept)
}

fn set_contains(set: &Value, candidate: &Value) -> bool {
    set.as_array()
        .is_some_and(|values| values.iter().any(|member| values_equal(member, candidate)))
}

fn like_matches(actual: &Value, pattern: &Value) -> bool {
    let (Some(text), Some(pattern)) = (actual.as_str(), pattern.as_str()) else {
        return false;
    };
    match regex::Regex::new(pattern) {
        Ok(re) => re.is_match(text),
        Err(error) => {
            tracing::warn!(%pattern, %error, "rejecting LIKE predicate with invalid pattern");
            false
        }
    }
}

/// Structural equality with numeric widening, so `3` and `3.0` compare
/// equal the way they do in document stores.
pub(crate) fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        _ => lhs == rhs,
    }
}

/// Ordering for homogeneous scalar pairs; cross-type comparisons have no
/// ordering and never match.
pub(crate) fn compare_values(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::new(value).unwrap()
    }

    #[test]
    fn test_eq_and_neq() {
        let d = doc(json!({"config": {"state": "ACTIVE", "weight": 3}}));

        assert!(Filter::eq("config.state", "ACTIVE").matches(&d));
        assert!(!Filter::eq("config.state", "DISABLED").matches(&d));
        // numeric widening
        assert!(Filter::eq("config.weight", 3.0).matches(&d));

        let neq = Filter::Relational {
            field: "config.state".to_string(),
            op: RelationalOp::Neq,
            value: json!("DISABLED"),
        };
        assert!(neq.matches(&d));
    }

    #[test]
    fn test_missing_field_semantics() {
        let d = doc(json!({"config": {}}));

        assert!(!Filter::eq("config.state", "ACTIVE").matches(&d));
        let neq = Filter::Relational {
            field: "config.state".to_string(),
            op: RelationalOp::Neq,
            value: json!("ACTIVE"),
        };
        assert!(neq.matches(&d));

        let not_in = Filter::Relational {
            field: "config.state".to_string(),
            op: RelationalOp::NotIn,
            value: json!(["ACTIVE"]),
        };
        assert!(not_in.matches(&d));

        let exists = Filter::Relational {
            field: "config.state".to_string(),
            op: RelationalOp::Exists,
            value: Value::Null,
        };
        assert!(!exists.matches(&d));
    }

    #[test]
    fn test_ordering_operators() {
        let d = doc(json!({"config": {"weight": 5, "name": "m"}}));

        let gt = |value| Filter::Relational {
            field: "config.weight".to_string(),
            op: RelationalOp::Gt,
            value,
        };
        assert!(gt(json!(4)).matches(&d));
        assert!(!gt(json!(5)).matches(&d));

        let lte = Filter::Relational {
            field: "config.weight".to_string(),
            op: RelationalOp::Lte,
            value: json!(5),
        };
        assert!(lte.matches(&d));

        // strings compare lexicographically
        let lt = Filter::Relational {
            field: "config.name".to_string(),
            op: RelationalOp::Lt,
            value: json!("z"),
        };
        assert!(lt.matches(&d));

        // cross-type never matches
        let cross = Filter::Relational {
            field: "config.weight".to_string(),
            op: RelationalOp::Gt,
            value: json!("4"),
        };
        assert!(!cross.matches(&d));
    }

    #[test]
    fn test_in_and_not_in() {
        let d = doc(json!({"config": {"zone": "eu-1"}}));

        let in_set = Filter::Relational {
            field: "config.zone".to_string(),
            op: RelationalOp::In,
            value: json!(["us-1", "eu-1"]),
        };
        assert!(in_set.matches(&d));

        let not_in = Filter::Relational {
            field: "config.zone".to_string(),
            op: RelationalOp::NotIn,
            value: json!(["us-1"]),
        };
        assert!(not_in.matches(&d));
    }

    #[test]
    fn test_exists_and_null() {
        let d = doc(json!({"config": {"a": null, "b": 1}}));

        let exists = |field: &str| Filter::Relational {
            field: field.to_string(),
            op: RelationalOp::Exists,
            value: Value::Null,
        };
        assert!(!exists("config.a").matches(&d));
        assert!(exists("config.b").matches(&d));
    }

    #[test]
    fn test_like() {
        let d = doc(json!({"config": {"name": "payment-gateway"}}));

        let like = |pattern: &str| Filter::Relational {
            field: "config.name".to_string(),
            op: RelationalOp::Like,
            value: json!(pattern),
        };
        assert!(like("^payment").matches(&d));
        assert!(like("gateway$").matches(&d));
        assert!(!like("^gateway").matches(&d));
        // invalid pattern never matches
        assert!(!like("[unclosed").matches(&d));
    }

    #[test]
    fn test_logical_composition() {
        let d = doc(json!({"tenantId": "t1", "context": "c1"}));

        let filter = Filter::and(vec![
            Filter::eq("tenantId", "t1"),
            Filter::or(vec![Filter::eq("context", "c1"), Filter::eq("context", "c2")]),
        ]);
        assert!(filter.matches(&d));

        let negated = Filter::Not(Box::new(Filter::eq("tenantId", "t1")));
        assert!(!negated.matches(&d));
    }
}
