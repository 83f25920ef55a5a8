//! Provider adapters and text search orchestration.
//!
//! A provider is described by a [`SearchAdapter`]. Filtering and sorting are
//! optional capabilities exposed through [`SearchAdapter::filtering`] and
//! [`SearchAdapter::sorting`]; every parameter hook defaults to "not
//! supported", which turns into a response warning rather than an error.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::capabilities::{self, SearchCapabilities};
use crate::error::{MediatorResult, SortError, UnsupportedParameterError};
use crate::filter::{FilterTranslator, build_filter_string};
use crate::params::{
    CommonSearchParams, QUERY_PARAM_FILTER, QUERY_PARAM_PAGE, QUERY_PARAM_QUERY, QUERY_PARAM_SIZE,
    QUERY_PARAM_SORT, QueryParams, SortDirective, TextSearchRequest, merge_missing,
};
use crate::registry::FieldRegistry;
use crate::response::{SearchEnvelope, Warnings, translate_response};
use crate::transport::{AuthScheme, CredentialProvider, Transport};

/// Provider-side half of sort support.
pub trait SortTranslator: Send + Sync {
    /// Translates a sort directive into request parameters.
    ///
    /// With `strict` set, the provider must order exactly as asked; otherwise
    /// it may fall back to the closest ordering it has.
    fn translate_sort(&self, directive: SortDirective, strict: bool) -> Result<QueryParams, SortError>;
}

/// A third-party content provider.
pub trait SearchAdapter: Send + Sync {
    /// Provider name, also used as the id prefix.
    fn name(&self) -> &str;

    /// Absolute URL of the text search endpoint.
    fn text_search_endpoint(&self) -> &str;

    /// Authentication expected by the provider.
    fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::None
    }

    /// Registry producing canonical fields from provider results.
    fn fields(&self) -> &FieldRegistry;

    /// Filter support, if any.
    fn filtering(&self) -> Option<&dyn FilterTranslator> {
        None
    }

    /// Sort support, if any.
    fn sorting(&self) -> Option<&dyn SortTranslator> {
        None
    }

    /// Translates the textual query.
    fn process_query(&self, _query: &str) -> Result<QueryParams, UnsupportedParameterError> {
        Err(UnsupportedParameterError::new(QUERY_PARAM_QUERY))
    }

    /// Translates the page size.
    fn process_size(
        &self,
        _size: u32,
        _common: &CommonSearchParams,
    ) -> Result<QueryParams, UnsupportedParameterError> {
        Err(UnsupportedParameterError::new(QUERY_PARAM_SIZE))
    }

    /// Translates the page number.
    fn process_page(
        &self,
        _page: u32,
        _common: &CommonSearchParams,
    ) -> Result<QueryParams, UnsupportedParameterError> {
        Err(UnsupportedParameterError::new(QUERY_PARAM_PAGE))
    }

    /// Asks the provider for only the native fields needed by `fields`.
    fn process_fields(&self, _fields: &[String]) -> QueryParams {
        QueryParams::new()
    }

    /// Parameters added to every search unless already set.
    fn extra_query_params(&self) -> QueryParams {
        QueryParams::new()
    }

    /// The list of results in a raw response.
    fn results<'r>(&self, response: &'r Value) -> Option<&'r [Value]>;

    /// The total number of matches in a raw response.
    fn total_count(&self, response: &Value) -> Option<u64>;
}

/// Translates the sort parameter, or returns the warning to record.
fn process_sort(adapter: &dyn SearchAdapter, sort: &str) -> Result<QueryParams, String> {
    let unsupported = || UnsupportedParameterError::new(QUERY_PARAM_SORT).to_string();

    let sorting = adapter.sorting().ok_or_else(unsupported)?;
    let directive = SortDirective::parse(sort).map_err(|e| e.to_string())?;
    match sorting.translate_sort(directive, false) {
        Ok(params) => Ok(params),
        Err(SortError::NotImplemented) => Err(unsupported()),
        Err(e) => Err(e.to_string()),
    }
}

/// Builds the provider query parameters for a text search.
///
/// Unsupported parameters are recorded in `warnings`. Filter errors abort.
pub fn build_query_params(
    adapter: &dyn SearchAdapter,
    request: &TextSearchRequest,
    warnings: &mut Warnings,
) -> MediatorResult<QueryParams> {
    let mut params = QueryParams::new();
    let common = &request.common;

    match adapter.process_query(&request.query) {
        Ok(p) => params.extend(p),
        Err(e) => warnings.add(e.to_string()),
    }

    if let Some(filter) = &request.filter {
        match adapter.filtering() {
            Some(translator) => {
                let rendered = build_filter_string(translator, filter)?;
                params.extend(translator.filter_params(rendered));
            }
            None => warnings.add(UnsupportedParameterError::new(QUERY_PARAM_FILTER).to_string()),
        }
    }

    if let Some(sort) = &request.sort {
        match process_sort(adapter, sort) {
            Ok(p) => params.extend(p),
            Err(warning) => warnings.add(warning),
        }
    }

    match adapter.process_size(common.size, common) {
        Ok(p) => params.extend(p),
        Err(e) => warnings.add(e.to_string()),
    }

    if let Some(page) = common.page {
        match adapter.process_page(page, common) {
            Ok(p) => params.extend(p),
            Err(e) => warnings.add(e.to_string()),
        }
    }

    if !common.fields.is_empty() {
        params.extend(adapter.process_fields(&common.fields));
    }

    merge_missing(&mut params, adapter.extra_query_params());

    debug!(service = adapter.name(), params = ?params, "Built provider query parameters");
    Ok(params)
}

/// Runs searches against provider adapters.
#[derive(Clone)]
pub struct Mediator {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
}

impl Mediator {
    /// Creates a mediator with the given collaborators.
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Runs a text search and returns the canonical envelope.
    ///
    /// Transport and credential failures are returned unchanged.
    pub async fn text_search(
        &self,
        adapter: &dyn SearchAdapter,
        request: &TextSearchRequest,
    ) -> MediatorResult<SearchEnvelope> {
        let mut warnings = Warnings::new();
        let params = build_query_params(adapter, request, &mut warnings)?;
        let auth = self
            .credentials
            .auth_for_request(adapter.name(), adapter.auth_scheme())?;

        info!(
            service = adapter.name(),
            endpoint = adapter.text_search_endpoint(),
            "Text search"
        );

        let raw = self
            .transport
            .send_request(adapter.text_search_endpoint(), &params, &auth)
            .await?;

        translate_response(adapter, &raw, &request.common.fields, warnings)
    }

    /// Describes what the provider supports for text search.
    pub fn describe(&self, adapter: &dyn SearchAdapter) -> SearchCapabilities {
        capabilities::describe_capabilities(adapter)
    }
}
