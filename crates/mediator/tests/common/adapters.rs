//! Test adapters.

use serde_json::Value;

use ac_mediator::error::{SortError, UnsupportedParameterError};
use ac_mediator::filter::{BoolOp, FilterScalar, FilterTranslator, FilterValue};
use ac_mediator::registry::field::prefixed_id;
use ac_mediator::registry::{FieldRegistry, FilterRegistry};
use ac_mediator::taxonomy::{ALL_FIELDS, FIELD_ID, SortOption};
use ac_mediator::transport::AuthScheme;
use ac_mediator::{CommonSearchParams, QueryParams, SearchAdapter, SortDirective, SortTranslator};

/// Renders filters back in canonical syntax with unchanged field names.
#[derive(Debug, Clone)]
pub struct CanonicalFilters {
    registry: FilterRegistry,
}

impl CanonicalFilters {
    /// Direct mappings for `fields`, each to itself.
    pub fn new(fields: &[&str]) -> Self {
        let registry = fields
            .iter()
            .fold(FilterRegistry::builder(), |b, f| b.direct(*f, *f))
            .build();
        Self { registry }
    }
}

/// Canonical rendering of a scalar that re-parses to the same scalar.
pub fn canonical_scalar(value: &FilterScalar) -> String {
    match value {
        FilterScalar::Integer(i) => i.to_string(),
        FilterScalar::Float(f) => format!("{:?}", f),
        FilterScalar::Text(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
    }
}

impl FilterTranslator for CanonicalFilters {
    fn filters(&self) -> &FilterRegistry {
        &self.registry
    }

    fn render_filter_term(&self, key: &str, value: &FilterValue) -> String {
        match value {
            FilterValue::Scalar(v) => format!("{}:{}", key, canonical_scalar(v)),
            FilterValue::Range(low, high) => format!(
                "{}:[{},{}]",
                key,
                canonical_scalar(low),
                canonical_scalar(high)
            ),
        }
    }

    fn render_operator_term(&self, op: BoolOp) -> String {
        match op {
            BoolOp::Not => "NOT ".to_string(),
            other => format!(" {} ", other),
        }
    }

    fn filter_params(&self, rendered: String) -> QueryParams {
        QueryParams::from([("f".to_string(), rendered)])
    }
}

/// `k=v` terms and ` OP ` operators.
#[derive(Debug, Clone)]
pub struct EqualsFilters {
    registry: FilterRegistry,
}

impl EqualsFilters {
    /// Direct mappings for `fields`, each to itself.
    pub fn new(fields: &[&str]) -> Self {
        let registry = fields
            .iter()
            .fold(FilterRegistry::builder(), |b, f| b.direct(*f, *f))
            .build();
        Self { registry }
    }
}

impl FilterTranslator for EqualsFilters {
    fn filters(&self) -> &FilterRegistry {
        &self.registry
    }

    fn render_filter_term(&self, key: &str, value: &FilterValue) -> String {
        match value {
            FilterValue::Scalar(v) => format!("{}={}", key, v),
            FilterValue::Range(low, high) => format!("{}=[{},{}]", key, low, high),
        }
    }

    fn render_operator_term(&self, op: BoolOp) -> String {
        match op {
            BoolOp::Not => "NOT ".to_string(),
            other => format!(" {} ", other),
        }
    }

    fn filter_params(&self, rendered: String) -> QueryParams {
        QueryParams::from([("filter".to_string(), rendered)])
    }
}

/// How [`IdentityAdapter`] handles sorting.
#[derive(Debug, Clone)]
pub enum SortSupport {
    /// No sort translator at all.
    Absent,
    /// A translator that reports sorting as not implemented.
    NotImplemented,
    /// A translator accepting exactly these directives.
    Only(Vec<SortDirective>),
}

impl SortTranslator for SortSupport {
    fn translate_sort(&self, directive: SortDirective, _strict: bool) -> Result<QueryParams, SortError> {
        match self {
            SortSupport::Absent | SortSupport::NotImplemented => Err(SortError::NotImplemented),
            SortSupport::Only(accepted) if accepted.contains(&directive) => {
                Ok(QueryParams::from([("sort".to_string(), directive.to_string())]))
            }
            SortSupport::Only(_) => Err(SortError::Unsupported {
                criterion: directive.to_string(),
            }),
        }
    }
}

/// Adapter whose native fields carry the canonical names.
#[derive(Debug, Clone)]
pub struct IdentityAdapter {
    fields: FieldRegistry,
    filtering: Option<CanonicalFilters>,
    sorting: SortSupport,
    paging: bool,
    auth: AuthScheme,
}

impl IdentityAdapter {
    /// Full support: every canonical field, filtering, paging, all sort options.
    pub fn new() -> Self {
        let fields = ALL_FIELDS
            .iter()
            .filter(|f| **f != FIELD_ID)
            .fold(FieldRegistry::builder(), |b, f| b.direct(*f, *f))
            .translator(FIELD_ID, prefixed_id("Identity", "id"))
            .build();
        let every_directive = SortOption::all()
            .iter()
            .flat_map(|o| {
                [
                    SortDirective::parse(&format!("-{}", o)).unwrap(),
                    SortDirective::parse(o.name()).unwrap(),
                ]
            })
            .collect();
        Self {
            fields,
            filtering: Some(CanonicalFilters::new(ALL_FIELDS)),
            sorting: SortSupport::Only(every_directive),
            paging: true,
            auth: AuthScheme::None,
        }
    }

    /// Replaces the field registry.
    pub fn with_fields(mut self, fields: FieldRegistry) -> Self {
        self.fields = fields;
        self
    }

    /// Removes filter support.
    pub fn without_filtering(mut self) -> Self {
        self.filtering = None;
        self
    }

    /// Sets sort support.
    pub fn with_sorting(mut self, sorting: SortSupport) -> Self {
        self.sorting = sorting;
        self
    }

    /// Removes size and page support.
    pub fn without_paging(mut self) -> Self {
        self.paging = false;
        self
    }

    /// Sets the auth scheme.
    pub fn with_auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }
}

impl SearchAdapter for IdentityAdapter {
    fn name(&self) -> &str {
        "Identity"
    }

    fn text_search_endpoint(&self) -> &str {
        "https://identity.example/search"
    }

    fn auth_scheme(&self) -> AuthScheme {
        self.auth
    }

    fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    fn filtering(&self) -> Option<&dyn FilterTranslator> {
        self.filtering.as_ref().map(|f| f as &dyn FilterTranslator)
    }

    fn sorting(&self) -> Option<&dyn SortTranslator> {
        match self.sorting {
            SortSupport::Absent => None,
            _ => Some(&self.sorting),
        }
    }

    fn process_query(&self, query: &str) -> Result<QueryParams, UnsupportedParameterError> {
        Ok(QueryParams::from([("q".to_string(), query.to_string())]))
    }

    fn process_size(
        &self,
        size: u32,
        _common: &CommonSearchParams,
    ) -> Result<QueryParams, UnsupportedParameterError> {
        if !self.paging {
            return Err(UnsupportedParameterError::new("size"));
        }
        Ok(QueryParams::from([("size".to_string(), size.to_string())]))
    }

    fn process_page(
        &self,
        page: u32,
        _common: &CommonSearchParams,
    ) -> Result<QueryParams, UnsupportedParameterError> {
        if !self.paging {
            return Err(UnsupportedParameterError::new("page"));
        }
        Ok(QueryParams::from([("page".to_string(), page.to_string())]))
    }

    fn extra_query_params(&self) -> QueryParams {
        QueryParams::from([
            ("q".to_string(), "overridden".to_string()),
            ("format".to_string(), "json".to_string()),
        ])
    }

    fn results<'r>(&self, response: &'r Value) -> Option<&'r [Value]> {
        response.get("results")?.as_array().map(Vec::as_slice)
    }

    fn total_count(&self, response: &Value) -> Option<u64> {
        response.get("count")?.as_u64()
    }
}
