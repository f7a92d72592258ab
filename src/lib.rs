//! chart-links · deep links for the public budget explorer
//!
//! - `links`: build `/charts/{id}?chart=<json>` and `/entities/{cui}` links
//! - `translations`: merge grep'd translations into a `.po` catalog
//!
//! Important env variables:
//!   CHART_LINKS_CONFIG   : path to TOML config
//!   CHART_LINKS_BASE_URL : overrides `base_url` (default "http://localhost:5173")
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

pub mod config;
pub mod domain;
pub mod error;
pub mod links;
pub mod telemetry;
pub mod translations;
pub mod util;

pub use config::LinkConfig;
pub use domain::{AccountCategory, ChartRecord};
pub use error::{LinkError, MergeError};
pub use links::{decode_chart_url, ChartLinkBuilder, ChartLinks, EntityScope, LinkRequest};
