//! Audio Commons Mediator search translation engine
//!
//! This crate translates canonical Audio Commons search requests into the
//! native requests of third-party content providers, and their responses back
//! into a unified envelope.
//!
//! # Features
//!
//! - **Field translation**: canonical fields are produced from provider
//!   results through direct mappings or translator functions
//! - **Filter grammar**: `format:wav AND duration:[2,10]` style expressions
//!   are parsed once and rendered in each provider's native syntax
//! - **Capability descriptions**: supported fields, filters and sort criteria
//!   are derived from each adapter
//! - **Partial results**: untranslatable fields and unsupported parameters
//!   become response warnings instead of failures
//!
//! Enable the bundled `reqwest` transport with the `http` feature (on by
//! default).
//!
//! # Architecture
//!
//! - [`taxonomy`] - Canonical field names, sort options and licenses
//! - [`filter`] - Filter parser, parse tree and renderer
//! - [`registry`] - Field and filter translation registries
//! - [`service`] - The [`SearchAdapter`] contract and [`Mediator`]
//! - [`response`] - The [`SearchEnvelope`] and response translation
//! - [`capabilities`] - Capability descriptions
//! - [`transport`] - HTTP transport and credential contracts
//! - [`providers`] - Freesound and Europeana adapters
//!
//! # Filters
//!
//! ```
//! use ac_mediator::filter::build_filter_string;
//! use ac_mediator::providers::FreesoundAdapter;
//! use ac_mediator::SearchAdapter;
//!
//! let freesound = FreesoundAdapter::new();
//! let filtering = freesound.filtering().unwrap();
//!
//! let rendered = build_filter_string(filtering, "format:wav AND duration:[2,10]").unwrap();
//! assert_eq!(rendered, "type:wav AND duration:[2 TO 10]");
//! ```
//!
//! # Capabilities
//!
//! ```
//! use ac_mediator::capabilities::describe_capabilities;
//! use ac_mediator::providers::EuropeanaAdapter;
//!
//! let description = describe_capabilities(&EuropeanaAdapter::new());
//! assert!(description.supported_fields.contains("license"));
//! assert!(description.supported_filters.is_empty());
//! assert!(description.supported_sort_criteria.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod capabilities;
pub mod config;
pub mod error;
pub mod filter;
pub mod params;
pub mod providers;
pub mod registry;
pub mod response;
pub mod service;
pub mod taxonomy;
pub mod transport;

// Re-export commonly used types at crate root
pub use capabilities::SearchCapabilities;
pub use error::{MediatorError, MediatorResult};
pub use params::{CommonSearchParams, QueryParams, SortDirective, TextSearchRequest};
pub use response::{SearchEnvelope, Warnings};
pub use service::{Mediator, SearchAdapter, SortTranslator};
pub use taxonomy::SortOption;

#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{AuthParams, AuthScheme, CredentialProvider, StaticCredentials, Transport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
