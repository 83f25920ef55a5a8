//! Filter parse tree.
//!
//! The tree mirrors the written expression: a [`FilterNode::Group`] holds an
//! alternating sequence of operands and operators, and a NOT-group holds the
//! `NOT` operator followed by its single operand.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Boolean operators of the canonical filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOp {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Negation (unary).
    Not,
}

impl BoolOp {
    /// Parses an operator keyword (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Some(BoolOp::And),
            "OR" => Some(BoolOp::Or),
            "NOT" => Some(BoolOp::Not),
            _ => None,
        }
    }

    /// Returns the canonical (upper-case) keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "NOT",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single scalar filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterScalar {
    /// Whole number.
    Integer(i64),
    /// Fractional number.
    Float(f64),
    /// Text (quoted or bare).
    Text(String),
}

impl FilterScalar {
    /// Creates a text scalar.
    pub fn text(s: impl Into<String>) -> Self {
        FilterScalar::Text(s.into())
    }

    /// Returns the numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FilterScalar::Integer(i) => Some(*i as f64),
            FilterScalar::Float(f) => Some(*f),
            FilterScalar::Text(_) => None,
        }
    }

    /// Returns the text value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterScalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FilterScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterScalar::Integer(i) => write!(f, "{}", i),
            FilterScalar::Float(x) => write!(f, "{}", x),
            FilterScalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FilterScalar {
    fn from(value: i64) -> Self {
        FilterScalar::Integer(value)
    }
}

impl From<i32> for FilterScalar {
    fn from(value: i32) -> Self {
        FilterScalar::Integer(i64::from(value))
    }
}

impl From<f64> for FilterScalar {
    fn from(value: f64) -> Self {
        FilterScalar::Float(value)
    }
}

impl From<&str> for FilterScalar {
    fn from(value: &str) -> Self {
        FilterScalar::Text(value.to_string())
    }
}

impl From<String> for FilterScalar {
    fn from(value: String) -> Self {
        FilterScalar::Text(value)
    }
}

/// The value side of a filter term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    /// A single number or text value.
    Scalar(FilterScalar),
    /// An inclusive `[low, high]` range.
    Range(FilterScalar, FilterScalar),
}

impl FilterValue {
    /// Creates a range value.
    pub fn range(low: impl Into<FilterScalar>, high: impl Into<FilterScalar>) -> Self {
        FilterValue::Range(low.into(), high.into())
    }

    /// Returns true for range values.
    pub fn is_range(&self) -> bool {
        matches!(self, FilterValue::Range(..))
    }
}

impl From<FilterScalar> for FilterValue {
    fn from(value: FilterScalar) -> Self {
        FilterValue::Scalar(value)
    }
}

macro_rules! scalar_value_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterValue {
                fn from(value: $t) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_value_from!(i32, i64, f64, &str, String);

/// An atomic `field:value` comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterTerm {
    /// Canonical field name.
    pub field: String,
    /// Value to compare against.
    pub value: FilterValue,
}

impl FilterTerm {
    /// Creates a new term.
    pub fn new(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A node of the filter parse tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterNode {
    /// A `field:value` term.
    Term(FilterTerm),
    /// A boolean operator between (or, for NOT, before) operands.
    Operator(BoolOp),
    /// A parenthesised sub-expression.
    Group(Vec<FilterNode>),
}

impl FilterNode {
    /// Shorthand for a term node.
    pub fn term(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        FilterNode::Term(FilterTerm::new(field, value))
    }

    /// Returns true if this is a NOT-group (`[NOT, operand]`).
    pub fn is_not_group(&self) -> bool {
        matches!(self, FilterNode::Group(items) if matches!(items.first(), Some(FilterNode::Operator(BoolOp::Not))))
    }

    /// Number of terms in the subtree.
    pub fn term_count(&self) -> usize {
        match self {
            FilterNode::Term(_) => 1,
            FilterNode::Operator(_) => 0,
            FilterNode::Group(items) => items.iter().map(FilterNode::term_count).sum(),
        }
    }

    /// Operators of the subtree in depth-first, left-to-right order.
    pub fn operators(&self) -> Vec<BoolOp> {
        let mut out = Vec::new();
        self.collect_operators(&mut out);
        out
    }

    fn collect_operators(&self, out: &mut Vec<BoolOp>) {
        match self {
            FilterNode::Term(_) => {}
            FilterNode::Operator(op) => out.push(*op),
            FilterNode::Group(items) => {
                for item in items {
                    item.collect_operators(out);
                }
            }
        }
    }
}
