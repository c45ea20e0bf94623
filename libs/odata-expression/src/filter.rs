//! Entry point for `$filter` handling.
//!
//! [`parse_filter`] takes the raw option text, parses and type checks it
//! against the target resource type, and hands the typed tree to a
//! renderer. Data providers consume the resulting [`FilterInfo`]: the
//! rendered predicate plus the navigation properties the predicate
//! reaches through, which the provider must expand before evaluating.

use crate::parser::FilterParser;
use crate::renderer::ExpressionRenderer;
use odata_metadata::ResourceType;
use smallvec::SmallVec;
use std::sync::Arc;

/// Navigation property names traversed by one filter path, outermost
/// first. Most paths cross at most a couple of hops.
pub type NavigationChain = SmallVec<[String; 2]>;

/// Outcome of parsing a `$filter` option.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterInfo {
    navigation_chains: Option<Vec<NavigationChain>>,
    expression: String,
}

impl FilterInfo {
    /// Navigation chains the filter traverses, in first-use order with
    /// duplicates removed. `None` when the filter stays on the target
    /// type.
    pub fn navigation_chains(&self) -> Option<&[NavigationChain]> {
        self.navigation_chains.as_deref()
    }

    /// The rendered predicate. Empty when no filter text was supplied.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    fn empty() -> Self {
        FilterInfo {
            navigation_chains: None,
            expression: String::new(),
        }
    }
}

/// Parse, type check and render a `$filter` option against `target`.
///
/// Empty or whitespace-only text yields an empty [`FilterInfo`]. All
/// lexical, syntactic and type failures surface as a 400 error whose
/// message names the offending construct.
pub fn parse_filter(
    text: &str,
    target: &Arc<ResourceType>,
    renderer: &dyn ExpressionRenderer,
) -> odata_common::Result<FilterInfo> {
    if text.trim().is_empty() {
        return Ok(FilterInfo::empty());
    }

    let (expression, chains) = FilterParser::new(text, target)?.parse()?;
    let rendered = renderer.render(&expression);
    tracing::debug!(target_type = %target.full_name(), expression = %rendered, "parsed filter");

    Ok(FilterInfo {
        navigation_chains: if chains.is_empty() { None } else { Some(chains) },
        expression: rendered,
    })
}
