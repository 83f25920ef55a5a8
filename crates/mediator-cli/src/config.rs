//! Command-line configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AC_LOG_LEVEL` | info | Log level |
//! | `AC_FREESOUND_API_KEY` | | Freesound API token |
//! | `AC_EUROPEANA_API_KEY` | | Europeana `wskey` |
//! | `AC_REQUEST_TIMEOUT` | 30 | Provider request timeout (seconds) |
//! | `AC_DEFAULT_PAGE_SIZE` | 15 | Page size when `--size` is not given |

use std::fmt;

use ac_mediator::config::{HttpTransportConfig, MediatorConfig, ProviderConfig};
use ac_mediator::params::DEFAULT_PAGE_SIZE;
use ac_mediator::providers::{EuropeanaAdapter, FreesoundAdapter, europeana, freesound};
use ac_mediator::{CommonSearchParams, SearchAdapter, TextSearchRequest};
use clap::{Args, Parser, Subcommand, ValueEnum};

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Configuration for the `ac-mediator` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "ac-mediator")]
#[command(about = "Audio Commons mediator: one search request, many sound providers")]
pub struct CliConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "AC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Freesound API token.
    #[arg(long, env = "AC_FREESOUND_API_KEY", hide_env_values = true)]
    pub freesound_api_key: Option<String>,

    /// Europeana API key.
    #[arg(long, env = "AC_EUROPEANA_API_KEY", hide_env_values = true)]
    pub europeana_api_key: Option<String>,

    /// Provider request timeout in seconds.
    #[arg(long, env = "AC_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Page size used when a search does not set one.
    #[arg(long, env = "AC_DEFAULT_PAGE_SIZE", default_value = "15")]
    pub default_page_size: u32,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a text search against a provider.
    Search(SearchArgs),

    /// Print what a provider supports for text search.
    Describe {
        /// Provider to describe.
        #[arg(value_enum)]
        provider: Provider,
    },

    /// Print a canonical filter in a provider's native syntax.
    RenderFilter {
        /// Target provider.
        #[arg(value_enum)]
        provider: Provider,

        /// Filter in canonical syntax, e.g. `format:wav AND duration:[2,10]`.
        filter: String,
    },
}

/// Arguments of the `search` subcommand.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Provider to search.
    #[arg(value_enum)]
    pub provider: Provider,

    /// Textual query.
    pub query: String,

    /// Filter in canonical syntax.
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Sort criterion, `-` prefixed for descending (e.g. `-duration`).
    #[arg(short, long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Results per page.
    #[arg(long)]
    pub size: Option<u32>,

    /// Page number, starting at 1.
    #[arg(long)]
    pub page: Option<u32>,

    /// Comma-separated canonical fields to return.
    #[arg(long, default_value = "id,name,license,preview")]
    pub fields: String,
}

impl SearchArgs {
    /// Builds the canonical request.
    pub fn to_request(&self, default_page_size: u32) -> TextSearchRequest {
        let mut common = CommonSearchParams::default()
            .with_size(self.size.unwrap_or(default_page_size))
            .with_fields(CommonSearchParams::parse_fields(&self.fields));
        if let Some(page) = self.page {
            common = common.with_page(page);
        }

        let mut request = TextSearchRequest::new(self.query.clone()).with_common(common);
        if let Some(filter) = &self.filter {
            request = request.with_filter(filter.clone());
        }
        if let Some(sort) = &self.sort {
            request = request.with_sort(sort.clone());
        }
        request
    }
}

/// Bundled providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// freesound.org
    Freesound,
    /// europeana.eu
    Europeana,
}

impl Provider {
    /// Creates the provider's adapter.
    pub fn adapter(self) -> Box<dyn SearchAdapter> {
        match self {
            Provider::Freesound => Box::new(FreesoundAdapter::new()),
            Provider::Europeana => Box::new(EuropeanaAdapter::new()),
        }
    }

    /// Service name used for credentials and id prefixes.
    pub fn name(self) -> &'static str {
        match self {
            Provider::Freesound => freesound::NAME,
            Provider::Europeana => europeana::NAME,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            freesound_api_key: None,
            europeana_api_key: None,
            request_timeout: 30,
            default_page_size: DEFAULT_PAGE_SIZE,
            command: Command::Describe {
                provider: Provider::Freesound,
            },
        }
    }
}

impl CliConfig {
    /// Library configuration: transport settings and provider credentials.
    pub fn mediator_config(&self) -> MediatorConfig {
        let mut config = MediatorConfig {
            transport: HttpTransportConfig {
                timeout_ms: self.request_timeout.saturating_mul(1000),
                ..Default::default()
            },
            ..Default::default()
        };
        if let Some(key) = &self.freesound_api_key {
            config = config.with_provider(freesound::NAME, ProviderConfig::with_api_key(key));
        }
        if let Some(key) = &self.europeana_api_key {
            config = config.with_provider(europeana::NAME, ProviderConfig::with_api_key(key));
        }
        config
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if let Command::Search(args) = &self.command {
            if args.query.trim().is_empty() {
                errors.push("Search query cannot be empty".to_string());
            }
            if args.size == Some(0) {
                errors.push("Page size cannot be 0".to_string());
            }
            if args.page == Some(0) {
                errors.push("Pages start at 1".to_string());
            }
            let has_key = match args.provider {
                Provider::Freesound => self.freesound_api_key.is_some(),
                Provider::Europeana => self.europeana_api_key.is_some(),
            };
            if !has_key {
                errors.push(format!("No API key configured for {}", args.provider));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
