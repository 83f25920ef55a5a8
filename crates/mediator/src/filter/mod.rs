//! Canonical filter expressions.
//!
//! A filter string such as `format:wav AND duration:[2,10]` is parsed into a
//! [`FilterNode`] tree by [`parser`], then rendered in a provider's native
//! syntax by [`render`]. Only the two render primitives of
//! [`FilterTranslator`] are provider specific.

pub mod ast;
pub mod parser;
pub mod render;

pub use ast::{BoolOp, FilterNode, FilterScalar, FilterTerm, FilterValue};
pub use parser::{FilterParser, MAX_NESTING_DEPTH, parse_filter};
pub use render::{FilterRenderer, FilterTranslator};

use tracing::debug;

use crate::error::MediatorResult;

/// Parses a canonical filter string and renders it for `translator`.
///
/// Parse errors, malformed trees and untranslatable filters are all fatal.
pub fn build_filter_string(translator: &dyn FilterTranslator, input: &str) -> MediatorResult<String> {
    let tree = FilterParser::parse(input)?;
    let rendered = FilterRenderer::new(translator).render(&tree)?;
    debug!(input = %input, rendered = %rendered, "Built provider filter string");
    Ok(rendered)
}
