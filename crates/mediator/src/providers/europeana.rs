//! Europeana (<https://www.europeana.eu>) adapter.
//!
//! Only openly reusable sound objects are searched. Europeana's filter and
//! sort parameters are not mapped, so `f` and `s` end up as warnings.

use serde_json::Value;

use crate::error::UnsupportedParameterError;
use crate::params::{CommonSearchParams, QueryParams};
use crate::registry::FieldRegistry;
use crate::registry::field::{first_of, prefixed_id};
use crate::service::SearchAdapter;
use crate::taxonomy::{
    FIELD_AUTHOR_NAME, FIELD_ID, FIELD_LICENSE, FIELD_NAME, FIELD_STATIC_RETRIEVE, FIELD_URL,
};
use crate::transport::AuthScheme;

use super::translate_cc_license_url;

/// Provider name.
pub const NAME: &str = "Europeana";
/// Text search endpoint.
pub const TEXT_SEARCH_ENDPOINT: &str = "https://www.europeana.eu/api/v2/search.json";

/// Europeana search adapter.
#[derive(Debug, Clone)]
pub struct EuropeanaAdapter {
    fields: FieldRegistry,
}

impl Default for EuropeanaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EuropeanaAdapter {
    /// Creates the adapter and its field registry.
    pub fn new() -> Self {
        let fields = FieldRegistry::builder()
            .translator(FIELD_ID, prefixed_id(NAME, "id"))
            .direct(FIELD_URL, "guid")
            .translator(FIELD_NAME, |r| Ok(first_of(r, "title")?.clone()))
            .translator(FIELD_AUTHOR_NAME, |r| Ok(first_of(r, "dcCreator")?.clone()))
            .translator(FIELD_LICENSE, |r| {
                let url = first_of(r, "rights")?
                    .as_str()
                    .ok_or("'rights' entries must be strings")?;
                Ok(Value::String(translate_cc_license_url(url).to_string()))
            })
            .translator(FIELD_STATIC_RETRIEVE, |r| {
                Ok(first_of(r, "edmIsShownBy")?.clone())
            })
            .build();
        Self { fields }
    }
}

impl SearchAdapter for EuropeanaAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn text_search_endpoint(&self) -> &str {
        TEXT_SEARCH_ENDPOINT
    }

    fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::ApiKey { param: "wskey" }
    }

    fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    fn process_query(&self, query: &str) -> Result<QueryParams, UnsupportedParameterError> {
        Ok(QueryParams::from([("query".to_string(), query.to_string())]))
    }

    fn process_size(
        &self,
        size: u32,
        _common: &CommonSearchParams,
    ) -> Result<QueryParams, UnsupportedParameterError> {
        Ok(QueryParams::from([("rows".to_string(), size.to_string())]))
    }

    /// Europeana pages by 1-based record offset.
    fn process_page(
        &self,
        page: u32,
        common: &CommonSearchParams,
    ) -> Result<QueryParams, UnsupportedParameterError> {
        let start = u64::from(page.saturating_sub(1)) * u64::from(common.size) + 1;
        Ok(QueryParams::from([("start".to_string(), start.to_string())]))
    }

    fn extra_query_params(&self) -> QueryParams {
        QueryParams::from([
            ("reusability".to_string(), "open".to_string()),
            ("media".to_string(), "true".to_string()),
            ("qf".to_string(), "TYPE:SOUND".to_string()),
            ("profile".to_string(), "rich".to_string()),
        ])
    }

    fn results<'r>(&self, response: &'r Value) -> Option<&'r [Value]> {
        match response.get("items") {
            Some(items) => items.as_array().map(Vec::as_slice),
            // Europeana omits `items` when nothing matched
            None if response.get("totalResults").is_some() => Some(&[]),
            None => None,
        }
    }

    fn total_count(&self, response: &Value) -> Option<u64> {
        response.get("totalResults")?.as_u64()
    }
}
