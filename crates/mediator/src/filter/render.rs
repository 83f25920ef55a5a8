//! Rendering of filter trees into provider filter syntax.
//!
//! The walk is depth-first and left-to-right. Terms are translated through the
//! provider's [`FilterRegistry`] and handed to
//! [`FilterTranslator::render_filter_term`]; operators go through
//! [`FilterTranslator::render_operator_term`]. Nested groups are wrapped in
//! parentheses, NOT-groups and the root group are not.

use tracing::trace;

use crate::error::{FilterParsingError, MediatorResult};
use crate::params::QueryParams;
use crate::registry::FilterRegistry;

use super::ast::{BoolOp, FilterNode, FilterValue};

/// Provider-side half of filter support.
///
/// Adapters that can filter expose an implementation through
/// [`SearchAdapter::filtering`](crate::service::SearchAdapter::filtering).
pub trait FilterTranslator: Send + Sync {
    /// Registry translating canonical filter names and values.
    fn filters(&self) -> &FilterRegistry;

    /// Renders a translated `key`/`value` pair in provider syntax.
    fn render_filter_term(&self, key: &str, value: &FilterValue) -> String;

    /// Renders a boolean operator in provider syntax.
    fn render_operator_term(&self, op: BoolOp) -> String;

    /// Turns the rendered filter string into request parameters.
    fn filter_params(&self, rendered: String) -> QueryParams;
}

/// Walks a parse tree and renders it with a [`FilterTranslator`].
pub struct FilterRenderer<'a> {
    translator: &'a dyn FilterTranslator,
}

impl<'a> FilterRenderer<'a> {
    /// Creates a renderer for the given provider.
    pub fn new(translator: &'a dyn FilterTranslator) -> Self {
        Self { translator }
    }

    /// Renders a full tree.
    ///
    /// The root group's own parentheses are not emitted.
    pub fn render(&self, root: &FilterNode) -> MediatorResult<String> {
        let mut out = String::new();
        match root {
            FilterNode::Group(items) if !root.is_not_group() => {
                self.render_sequence(items, &mut out)?
            }
            other => self.render_operand(other, &mut out)?,
        }
        Ok(out)
    }

    fn render_operand(&self, node: &FilterNode, out: &mut String) -> MediatorResult<()> {
        match node {
            FilterNode::Term(term) => {
                let (key, value) = self
                    .translator
                    .filters()
                    .translate_filter(&term.field, &term.value)?;
                let rendered = self.translator.render_filter_term(&key, &value);
                trace!(field = %term.field, key = %key, rendered = %rendered, "Rendered filter term");
                out.push_str(&rendered);
            }
            FilterNode::Operator(op) => {
                return Err(FilterParsingError::malformed(format!(
                    "operator {} in operand position",
                    op
                ))
                .into());
            }
            FilterNode::Group(items) if node.is_not_group() => {
                if items.len() != 2 {
                    return Err(FilterParsingError::malformed(
                        "NOT must be followed by exactly one operand",
                    )
                    .into());
                }
                out.push_str(&self.translator.render_operator_term(BoolOp::Not));
                self.render_operand(&items[1], out)?;
            }
            FilterNode::Group(items) => {
                out.push('(');
                self.render_sequence(items, out)?;
                out.push(')');
            }
        }
        Ok(())
    }

    /// Renders `operand (AND|OR operand)*`.
    fn render_sequence(&self, items: &[FilterNode], out: &mut String) -> MediatorResult<()> {
        if items.is_empty() {
            return Err(FilterParsingError::malformed("empty group").into());
        }
        if items.len() % 2 == 0 {
            return Err(FilterParsingError::malformed("group ends with an operator").into());
        }

        for (i, item) in items.iter().enumerate() {
            if i % 2 == 0 {
                self.render_operand(item, out)?;
                continue;
            }
            match item {
                FilterNode::Operator(op @ (BoolOp::And | BoolOp::Or)) => {
                    out.push_str(&self.translator.render_operator_term(*op));
                }
                other => {
                    return Err(FilterParsingError::malformed(format!(
                        "expected AND/OR between operands, found {:?}",
                        other
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }
}
