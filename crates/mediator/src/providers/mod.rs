//! Concrete provider adapters.

pub mod europeana;
pub mod freesound;

pub use europeana::EuropeanaAdapter;
pub use freesound::FreesoundAdapter;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::taxonomy::{
    LICENSE_CC_BY, LICENSE_CC_BY_NC, LICENSE_CC_BY_NC_ND, LICENSE_CC_BY_NC_SA, LICENSE_CC_BY_ND,
    LICENSE_CC_BY_SA, LICENSE_CC_SAMPLING_PLUS, LICENSE_CC0, LICENSE_UNKNOWN,
};

static CC_LICENSE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)creativecommons\.org/(?:licenses|publicdomain)/([a-z+\-]+)")
        .expect("valid license regex")
});

/// Maps a Creative Commons license URL to a canonical license identifier.
///
/// Anything that is not a recognised CC URL maps to [`LICENSE_UNKNOWN`].
pub fn translate_cc_license_url(url: &str) -> &'static str {
    let Some(code) = CC_LICENSE_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
    else {
        return LICENSE_UNKNOWN;
    };

    match code.as_str() {
        "zero" => LICENSE_CC0,
        "by" => LICENSE_CC_BY,
        "by-sa" => LICENSE_CC_BY_SA,
        "by-nd" => LICENSE_CC_BY_ND,
        "by-nc" => LICENSE_CC_BY_NC,
        "by-nc-sa" => LICENSE_CC_BY_NC_SA,
        "by-nc-nd" => LICENSE_CC_BY_NC_ND,
        "sampling+" => LICENSE_CC_SAMPLING_PLUS,
        _ => LICENSE_UNKNOWN,
    }
}
