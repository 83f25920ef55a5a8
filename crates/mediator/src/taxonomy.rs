//! The canonical Audio Commons taxonomy.
//!
//! Field names, sort options and license identifiers shared by every
//! provider adapter. Adapters translate to and from these values; nothing
//! outside this module should spell them out as literals.

use serde::{Deserialize, Serialize};

/// Separator between the provider name and the provider-native resource id.
pub const ID_SEPARATOR: char = ':';

/// Resource identifier, unique across the ecosystem (`<Provider>:<native id>`).
pub const FIELD_ID: &str = "id";
/// URL of the resource page on the provider's site.
pub const FIELD_URL: &str = "url";
/// Resource title.
pub const FIELD_NAME: &str = "name";
/// Name of the resource author.
pub const FIELD_AUTHOR_NAME: &str = "author_name";
/// URL of the author's page.
pub const FIELD_AUTHOR_URL: &str = "author_url";
/// Normalised license identifier (see the `LICENSE_*` constants).
pub const FIELD_LICENSE: &str = "license";
/// URL from which the original file can be retrieved.
pub const FIELD_STATIC_RETRIEVE: &str = "static_retrieve";
/// URL of a lossy preview.
pub const FIELD_PREVIEW: &str = "preview";
/// Duration in seconds.
pub const FIELD_DURATION: &str = "duration";
/// File format (e.g. `wav`).
pub const FIELD_FORMAT: &str = "format";
/// Free-text tags.
pub const FIELD_TAGS: &str = "tags";
/// Free-text description.
pub const FIELD_DESCRIPTION: &str = "description";
/// Number of audio channels.
pub const FIELD_CHANNELS: &str = "channels";
/// Bitrate in kbps.
pub const FIELD_BITRATE: &str = "bitrate";
/// Bit depth.
pub const FIELD_BITDEPTH: &str = "bitdepth";
/// Sample rate in Hz.
pub const FIELD_SAMPLERATE: &str = "samplerate";
/// File size in bytes.
pub const FIELD_FILESIZE: &str = "filesize";
/// Creation timestamp.
pub const FIELD_TIMESTAMP: &str = "timestamp";
/// URL of a representative image (e.g. waveform).
pub const FIELD_IMAGE: &str = "image";

/// Every canonical field name.
pub const ALL_FIELDS: &[&str] = &[
    FIELD_ID,
    FIELD_URL,
    FIELD_NAME,
    FIELD_AUTHOR_NAME,
    FIELD_AUTHOR_URL,
    FIELD_LICENSE,
    FIELD_STATIC_RETRIEVE,
    FIELD_PREVIEW,
    FIELD_DURATION,
    FIELD_FORMAT,
    FIELD_TAGS,
    FIELD_DESCRIPTION,
    FIELD_CHANNELS,
    FIELD_BITRATE,
    FIELD_BITDEPTH,
    FIELD_SAMPLERATE,
    FIELD_FILESIZE,
    FIELD_TIMESTAMP,
    FIELD_IMAGE,
];

/// Returns true if `name` belongs to the canonical field taxonomy.
pub fn is_canonical_field(name: &str) -> bool {
    ALL_FIELDS.contains(&name)
}

/// Creative Commons Zero.
pub const LICENSE_CC0: &str = "CC0";
/// Creative Commons Attribution.
pub const LICENSE_CC_BY: &str = "BY";
/// Creative Commons Attribution-ShareAlike.
pub const LICENSE_CC_BY_SA: &str = "BY-SA";
/// Creative Commons Attribution-NoDerivs.
pub const LICENSE_CC_BY_ND: &str = "BY-ND";
/// Creative Commons Attribution-NonCommercial.
pub const LICENSE_CC_BY_NC: &str = "BY-NC";
/// Creative Commons Attribution-NonCommercial-ShareAlike.
pub const LICENSE_CC_BY_NC_SA: &str = "BY-NC-SA";
/// Creative Commons Attribution-NonCommercial-NoDerivs.
pub const LICENSE_CC_BY_NC_ND: &str = "BY-NC-ND";
/// Creative Commons Sampling+.
pub const LICENSE_CC_SAMPLING_PLUS: &str = "Sampling+";
/// Any license that could not be recognised.
pub const LICENSE_UNKNOWN: &str = "Unknown";

/// Canonical sort criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Relevance to the textual query.
    Relevance,
    /// Provider-defined popularity (ratings, likes).
    Popularity,
    /// Resource duration.
    Duration,
    /// Number of downloads.
    Downloads,
    /// Creation date.
    Created,
}

impl SortOption {
    /// Returns the option name as used in the `s` request parameter.
    pub fn name(&self) -> &'static str {
        match self {
            SortOption::Relevance => "relevance",
            SortOption::Popularity => "popularity",
            SortOption::Duration => "duration",
            SortOption::Downloads => "downloads",
            SortOption::Created => "created",
        }
    }

    /// Parses an option name (case-sensitive, as documented for the API).
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|option| option.name() == s)
    }

    /// All defined sort options, in capability-probing order.
    pub fn all() -> &'static [SortOption] {
        &[
            SortOption::Relevance,
            SortOption::Popularity,
            SortOption::Duration,
            SortOption::Downloads,
            SortOption::Created,
        ]
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
