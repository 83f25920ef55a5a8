//! Canonical field translation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{BoxError, FieldTranslateError};
use crate::taxonomy::ID_SEPARATOR;

/// Translator closure producing a canonical value from a whole provider result.
pub type FieldTranslatorFn = Arc<dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync>;

/// How a canonical field is obtained from a provider result.
#[derive(Clone)]
pub enum FieldEntry {
    /// Copy `result[key]` unchanged.
    Direct(String),
    /// Compute the value from the whole result.
    Translator(FieldTranslatorFn),
}

impl fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldEntry::Direct(key) => f.debug_tuple("Direct").field(key).finish(),
            FieldEntry::Translator(_) => f.write_str("Translator(..)"),
        }
    }
}

/// Immutable map from canonical field names to [`FieldEntry`].
///
/// Direct mappings win over translators registered for the same name.
#[derive(Clone, Default)]
pub struct FieldRegistry {
    direct: BTreeMap<String, String>,
    translators: BTreeMap<String, FieldTranslatorFn>,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("direct", &self.direct)
            .field("translators", &self.translators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FieldRegistry {
    /// Starts building a registry.
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::default()
    }

    /// Returns the entry used for `field`, if any.
    pub fn entry(&self, field: &str) -> Option<FieldEntry> {
        if let Some(key) = self.direct.get(field) {
            return Some(FieldEntry::Direct(key.clone()));
        }
        self.translators
            .get(field)
            .map(|f| FieldEntry::Translator(Arc::clone(f)))
    }

    /// Produces the canonical value of `field` for one provider result.
    pub fn translate_field(&self, field: &str, result: &Value) -> Result<Value, FieldTranslateError> {
        if let Some(key) = self.direct.get(field) {
            return result
                .get(key)
                .cloned()
                .ok_or_else(|| FieldTranslateError::MissingKey {
                    field: field.to_string(),
                    key: key.clone(),
                });
        }

        match self.translators.get(field) {
            Some(translate) => translate(result).map_err(|source| FieldTranslateError::Translator {
                field: field.to_string(),
                source,
            }),
            None => Err(FieldTranslateError::UnknownField {
                field: field.to_string(),
            }),
        }
    }

    /// Every canonical field this registry can produce.
    pub fn supported_fields(&self) -> BTreeSet<String> {
        self.direct
            .keys()
            .chain(self.translators.keys())
            .cloned()
            .collect()
    }
}

/// Builder for [`FieldRegistry`].
#[derive(Default)]
pub struct FieldRegistryBuilder {
    registry: FieldRegistry,
}

impl FieldRegistryBuilder {
    /// Maps a canonical field straight to a provider key.
    pub fn direct(mut self, field: impl Into<String>, key: impl Into<String>) -> Self {
        self.registry.direct.insert(field.into(), key.into());
        self
    }

    /// Registers a translator closure for a canonical field.
    pub fn translator<F>(mut self, field: impl Into<String>, translate: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.registry
            .translators
            .insert(field.into(), Arc::new(translate));
        self
    }

    /// Registers a [`FieldEntry`].
    pub fn entry(mut self, field: impl Into<String>, entry: FieldEntry) -> Self {
        let field = field.into();
        match entry {
            FieldEntry::Direct(key) => {
                self.registry.direct.insert(field, key);
            }
            FieldEntry::Translator(f) => {
                self.registry.translators.insert(field, f);
            }
        }
        self
    }

    /// Finishes the registry.
    pub fn build(self) -> FieldRegistry {
        self.registry
    }
}

/// Translator for the canonical `id` field: `<service>:<result[id_key]>`.
pub fn prefixed_id(
    service: &str,
    id_key: &str,
) -> impl Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static {
    let prefix = format!("{}{}", service, ID_SEPARATOR);
    let id_key = id_key.to_string();
    move |result: &Value| {
        let id = match result.get(&id_key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(format!("'{}' missing or not a string or number", id_key).into()),
        };
        Ok(Value::String(format!("{}{}", prefix, id)))
    }
}

/// Reads `result[key]` as a string.
pub fn str_field<'a>(result: &'a Value, key: &str) -> Result<&'a str, BoxError> {
    result
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("'{}' missing or not a string", key).into())
}

/// Reads the first element of the array `result[key]`.
pub fn first_of<'a>(result: &'a Value, key: &str) -> Result<&'a Value, BoxError> {
    result
        .get(key)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .ok_or_else(|| format!("'{}' missing or empty", key).into())
}
