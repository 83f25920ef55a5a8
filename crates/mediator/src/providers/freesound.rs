//! Freesound (<https://freesound.org>) adapter.
//!
//! Freesound's text search takes a Solr-style `filter` parameter
//! (`type:wav AND duration:[2 TO 10]`), a fixed set of sort keys and the usual
//! `page`/`page_size` paging.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::{BoxError, SortError, UnsupportedParameterError};
use crate::filter::{BoolOp, FilterScalar, FilterTranslator, FilterValue};
use crate::params::{CommonSearchParams, QueryParams, SortDirective};
use crate::registry::field::{prefixed_id, str_field};
use crate::registry::{FieldRegistry, FilterRegistry};
use crate::service::{SearchAdapter, SortTranslator};
use crate::taxonomy::*;
use crate::transport::AuthScheme;

use super::translate_cc_license_url;

/// Provider name.
pub const NAME: &str = "Freesound";
/// Text search endpoint.
pub const TEXT_SEARCH_ENDPOINT: &str = "https://freesound.org/apiv2/search/text/";

const PREVIEW_KEY: &str = "preview-hq-ogg";
const WAVEFORM_KEY: &str = "waveform_m";

/// Freesound search adapter.
#[derive(Debug, Clone)]
pub struct FreesoundAdapter {
    fields: FieldRegistry,
    filtering: FreesoundFilters,
    sorting: FreesoundSort,
}

impl Default for FreesoundAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FreesoundAdapter {
    /// Creates the adapter and its registries.
    pub fn new() -> Self {
        let fields = FieldRegistry::builder()
            .translator(FIELD_ID, prefixed_id(NAME, "id"))
            .direct(FIELD_URL, "url")
            .direct(FIELD_NAME, "name")
            .direct(FIELD_AUTHOR_NAME, "username")
            .translator(FIELD_AUTHOR_URL, |r| {
                let username = str_field(r, "username")?;
                Ok(Value::String(format!("https://freesound.org/people/{}/", username)))
            })
            .translator(FIELD_LICENSE, |r| {
                Ok(Value::String(translate_cc_license_url(str_field(r, "license")?).to_string()))
            })
            .direct(FIELD_STATIC_RETRIEVE, "download")
            .translator(FIELD_PREVIEW, |r| nested(r, "previews", PREVIEW_KEY))
            .direct(FIELD_DURATION, "duration")
            .direct(FIELD_FORMAT, "type")
            .direct(FIELD_TAGS, "tags")
            .direct(FIELD_DESCRIPTION, "description")
            .direct(FIELD_CHANNELS, "channels")
            .direct(FIELD_BITRATE, "bitrate")
            .direct(FIELD_BITDEPTH, "bitdepth")
            .direct(FIELD_SAMPLERATE, "samplerate")
            .direct(FIELD_FILESIZE, "filesize")
            .direct(FIELD_TIMESTAMP, "created")
            .translator(FIELD_IMAGE, |r| nested(r, "images", WAVEFORM_KEY))
            .build();

        Self {
            fields,
            filtering: FreesoundFilters::new(),
            sorting: FreesoundSort,
        }
    }

    /// Native response fields needed to produce `field`.
    fn native_fields(field: &str) -> &'static [&'static str] {
        match field {
            FIELD_ID => &["id"],
            FIELD_URL => &["url"],
            FIELD_NAME => &["name"],
            FIELD_AUTHOR_NAME | FIELD_AUTHOR_URL => &["username"],
            FIELD_LICENSE => &["license"],
            FIELD_STATIC_RETRIEVE => &["download"],
            FIELD_PREVIEW => &["previews"],
            FIELD_DURATION => &["duration"],
            FIELD_FORMAT => &["type"],
            FIELD_TAGS => &["tags"],
            FIELD_DESCRIPTION => &["description"],
            FIELD_CHANNELS => &["channels"],
            FIELD_BITRATE => &["bitrate"],
            FIELD_BITDEPTH => &["bitdepth"],
            FIELD_SAMPLERATE => &["samplerate"],
            FIELD_FILESIZE => &["filesize"],
            FIELD_TIMESTAMP => &["created"],
            FIELD_IMAGE => &["images"],
            _ => &[],
        }
    }
}

/// Reads `result[outer][inner]`.
fn nested(result: &Value, outer: &str, inner: &str) -> Result<Value, BoxError> {
    result
        .get(outer)
        .and_then(|v| v.get(inner))
        .cloned()
        .ok_or_else(|| format!("'{}.{}' missing", outer, inner).into())
}

impl SearchAdapter for FreesoundAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn text_search_endpoint(&self) -> &str {
        TEXT_SEARCH_ENDPOINT
    }

    fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::ApiKey { param: "token" }
    }

    fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    fn filtering(&self) -> Option<&dyn FilterTranslator> {
        Some(&self.filtering)
    }

    fn sorting(&self) -> Option<&dyn SortTranslator> {
        Some(&self.sorting)
    }

    fn process_query(&self, query: &str) -> Result<QueryParams, UnsupportedParameterError> {
        Ok(QueryParams::from([("query".to_string(), query.to_string())]))
    }

    fn process_size(
        &self,
        size: u32,
        _common: &CommonSearchParams,
    ) -> Result<QueryParams, UnsupportedParameterError> {
        Ok(QueryParams::from([("page_size".to_string(), size.to_string())]))
    }

    fn process_page(
        &self,
        page: u32,
        _common: &CommonSearchParams,
    ) -> Result<QueryParams, UnsupportedParameterError> {
        Ok(QueryParams::from([("page".to_string(), page.to_string())]))
    }

    fn process_fields(&self, fields: &[String]) -> QueryParams {
        let native: BTreeSet<&str> = fields
            .iter()
            .flat_map(|f| Self::native_fields(f).iter().copied())
            .collect();
        if native.is_empty() {
            return QueryParams::new();
        }
        let joined = native.into_iter().collect::<Vec<_>>().join(",");
        QueryParams::from([("fields".to_string(), joined)])
    }

    fn results<'r>(&self, response: &'r Value) -> Option<&'r [Value]> {
        response.get("results")?.as_array().map(Vec::as_slice)
    }

    fn total_count(&self, response: &Value) -> Option<u64> {
        response.get("count")?.as_u64()
    }
}

/// Freesound filter syntax.
#[derive(Debug, Clone)]
pub struct FreesoundFilters {
    registry: FilterRegistry,
}

impl FreesoundFilters {
    fn new() -> Self {
        let registry = FilterRegistry::builder()
            .direct(FIELD_FORMAT, "type")
            .direct(FIELD_DURATION, "duration")
            .direct(FIELD_TAGS, "tag")
            .direct(FIELD_DESCRIPTION, "description")
            .direct(FIELD_NAME, "original_filename")
            .direct(FIELD_AUTHOR_NAME, "username")
            .direct(FIELD_CHANNELS, "channels")
            .direct(FIELD_BITRATE, "bitrate")
            .direct(FIELD_BITDEPTH, "bitdepth")
            .direct(FIELD_SAMPLERATE, "samplerate")
            .direct(FIELD_FILESIZE, "filesize")
            .direct(FIELD_TIMESTAMP, "created")
            .translator(FIELD_LICENSE, |value| {
                let license = license_name(value)?;
                Ok(("license".to_string(), FilterValue::from(license)))
            })
            .build();
        Self { registry }
    }
}

/// Freesound license names, as used in its `license` filter.
fn license_name(value: &FilterScalar) -> Result<&'static str, BoxError> {
    let id = value.as_str().ok_or("license must be a text value")?;
    let name = match id {
        LICENSE_CC0 => "Creative Commons 0",
        LICENSE_CC_BY => "Attribution",
        LICENSE_CC_BY_NC => "Attribution Noncommercial",
        LICENSE_CC_SAMPLING_PLUS => "Sampling+",
        other => return Err(format!("license '{}' is not used by {}", other, NAME).into()),
    };
    Ok(name)
}

/// Characters with a meaning in Solr query syntax.
const SOLR_SPECIAL_CHARS: &str = "\"():[]{}^~*?\\/!&|";

/// Whether a text value must be quoted to reach Solr as a literal.
fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.starts_with(['-', '+'])
        || s.chars()
            .any(|c| c.is_whitespace() || SOLR_SPECIAL_CHARS.contains(c))
}

/// Renders a scalar in Solr syntax, quoting text that is not a plain word.
fn render_scalar(value: &FilterScalar) -> String {
    match value {
        FilterScalar::Text(s) if needs_quoting(s) => {
            format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
        }
        other => other.to_string(),
    }
}

impl FilterTranslator for FreesoundFilters {
    fn filters(&self) -> &FilterRegistry {
        &self.registry
    }

    fn render_filter_term(&self, key: &str, value: &FilterValue) -> String {
        match value {
            FilterValue::Scalar(v) => format!("{}:{}", key, render_scalar(v)),
            FilterValue::Range(low, high) => {
                format!("{}:[{} TO {}]", key, render_scalar(low), render_scalar(high))
            }
        }
    }

    fn render_operator_term(&self, op: BoolOp) -> String {
        match op {
            BoolOp::And => " AND ".to_string(),
            BoolOp::Or => " OR ".to_string(),
            BoolOp::Not => "NOT ".to_string(),
        }
    }

    fn filter_params(&self, rendered: String) -> QueryParams {
        QueryParams::from([("filter".to_string(), rendered)])
    }
}

/// Freesound sort keys.
#[derive(Debug, Clone, Copy)]
pub struct FreesoundSort;

impl SortTranslator for FreesoundSort {
    fn translate_sort(&self, directive: SortDirective, strict: bool) -> Result<QueryParams, SortError> {
        let descending = directive.direction.is_descending();
        let key = match directive.option {
            SortOption::Relevance if descending || !strict => "score",
            SortOption::Popularity => pick(descending, "rating_desc", "rating_asc"),
            SortOption::Duration => pick(descending, "duration_desc", "duration_asc"),
            SortOption::Downloads => pick(descending, "downloads_desc", "downloads_asc"),
            SortOption::Created => pick(descending, "created_desc", "created_asc"),
            SortOption::Relevance => {
                return Err(SortError::Unsupported {
                    criterion: directive.to_string(),
                });
            }
        };
        Ok(QueryParams::from([("sort".to_string(), key.to_string())]))
    }
}

fn pick(descending: bool, desc: &'static str, asc: &'static str) -> &'static str {
    if descending { desc } else { asc }
}
