//! Canonical filter translation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, FilterTranslateError};
use crate::filter::{FilterScalar, FilterValue};

/// Translator closure mapping a canonical filter value to a provider key and value.
pub type FilterTranslatorFn =
    Arc<dyn Fn(&FilterScalar) -> Result<(String, FilterValue), BoxError> + Send + Sync>;

/// Immutable map from canonical filter names to provider keys or translators.
///
/// Ranges are translated bound by bound, so translators only ever see scalars.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    direct: BTreeMap<String, String>,
    translators: BTreeMap<String, FilterTranslatorFn>,
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("direct", &self.direct)
            .field("translators", &self.translators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FilterRegistry {
    /// Starts building a registry.
    pub fn builder() -> FilterRegistryBuilder {
        FilterRegistryBuilder::default()
    }

    /// Translates one filter term to a provider `(key, value)` pair.
    pub fn translate_filter(
        &self,
        field: &str,
        value: &FilterValue,
    ) -> Result<(String, FilterValue), FilterTranslateError> {
        match value {
            FilterValue::Scalar(scalar) => self.translate_scalar(field, scalar),
            FilterValue::Range(low, high) => {
                let (low_key, low) = self.translate_bound(field, low)?;
                let (high_key, high) = self.translate_bound(field, high)?;
                if low_key != high_key {
                    return Err(FilterTranslateError::RangeKeyMismatch {
                        field: field.to_string(),
                        low_key,
                        high_key,
                    });
                }
                Ok((low_key, FilterValue::Range(low, high)))
            }
        }
    }

    fn translate_scalar(
        &self,
        field: &str,
        scalar: &FilterScalar,
    ) -> Result<(String, FilterValue), FilterTranslateError> {
        if let Some(key) = self.direct.get(field) {
            return Ok((key.clone(), FilterValue::Scalar(scalar.clone())));
        }

        let translate = self
            .translators
            .get(field)
            .ok_or_else(|| FilterTranslateError::Unsupported {
                field: field.to_string(),
            })?;

        translate(scalar).map_err(|source| FilterTranslateError::Translator {
            field: field.to_string(),
            source,
        })
    }

    fn translate_bound(
        &self,
        field: &str,
        bound: &FilterScalar,
    ) -> Result<(String, FilterScalar), FilterTranslateError> {
        match self.translate_scalar(field, bound)? {
            (key, FilterValue::Scalar(value)) => Ok((key, value)),
            (_, FilterValue::Range(..)) => Err(FilterTranslateError::NestedRange {
                field: field.to_string(),
            }),
        }
    }

    /// Every canonical field that can be filtered on.
    pub fn supported_filters(&self) -> BTreeSet<String> {
        self.direct
            .keys()
            .chain(self.translators.keys())
            .cloned()
            .collect()
    }
}

/// Builder for [`FilterRegistry`].
#[derive(Default)]
pub struct FilterRegistryBuilder {
    registry: FilterRegistry,
}

impl FilterRegistryBuilder {
    /// Maps a canonical filter straight to a provider key, value unchanged.
    pub fn direct(mut self, field: impl Into<String>, key: impl Into<String>) -> Self {
        self.registry.direct.insert(field.into(), key.into());
        self
    }

    /// Registers a translator closure for a canonical filter.
    pub fn translator<F>(mut self, field: impl Into<String>, translate: F) -> Self
    where
        F: Fn(&FilterScalar) -> Result<(String, FilterValue), BoxError> + Send + Sync + 'static,
    {
        self.registry
            .translators
            .insert(field.into(), Arc::new(translate));
        self
    }

    /// Finishes the registry.
    pub fn build(self) -> FilterRegistry {
        self.registry
    }
}
