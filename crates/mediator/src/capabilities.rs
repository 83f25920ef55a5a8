//! Text search capability descriptions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SortError;
use crate::params::{SortDirection, SortDirective};
use crate::service::SearchAdapter;
use crate::taxonomy::SortOption;

/// What a provider supports for text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCapabilities {
    /// Canonical fields the provider can return.
    pub supported_fields: BTreeSet<String>,
    /// Canonical fields the provider can filter on.
    pub supported_filters: BTreeSet<String>,
    /// Sort criteria in wire form (`-option` for descending).
    pub supported_sort_criteria: Vec<String>,
}

/// Canonical fields the provider can return.
pub fn supported_fields(adapter: &dyn SearchAdapter) -> BTreeSet<String> {
    adapter.fields().supported_fields()
}

/// Canonical fields the provider can filter on. Empty without filter support.
pub fn supported_filters(adapter: &dyn SearchAdapter) -> BTreeSet<String> {
    adapter
        .filtering()
        .map(|translator| translator.filters().supported_filters())
        .unwrap_or_default()
}

/// Probes every sort option, descending then ascending, in strict mode.
///
/// Returns an empty list as soon as the provider reports that sorting is not
/// implemented, or when it has no sort support at all.
pub fn supported_sort_criteria(adapter: &dyn SearchAdapter) -> Vec<String> {
    let Some(sorting) = adapter.sorting() else {
        return Vec::new();
    };

    let mut criteria = Vec::new();
    for option in SortOption::all() {
        for direction in [SortDirection::Descending, SortDirection::Ascending] {
            let directive = SortDirective::new(*option, direction);
            match sorting.translate_sort(directive, true) {
                Ok(_) => criteria.push(directive.to_string()),
                Err(SortError::NotImplemented) => {
                    debug!(service = adapter.name(), "Sorting not implemented");
                    return Vec::new();
                }
                Err(SortError::Unsupported { .. }) => {}
            }
        }
    }
    criteria
}

/// Describes the text search capabilities of a provider.
pub fn describe_capabilities(adapter: &dyn SearchAdapter) -> SearchCapabilities {
    SearchCapabilities {
        supported_fields: supported_fields(adapter),
        supported_filters: supported_filters(adapter),
        supported_sort_criteria: supported_sort_criteria(adapter),
    }
}
