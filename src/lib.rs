//! Publish one message to many groups through the Graph API.

pub mod config;
pub mod driver;
pub mod error;
pub mod graph;
pub mod images;
pub mod poster;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{GroupConfig, GroupList};
pub use driver::{run_from_file, run_interactive, write_report, RunOutcome};
pub use error::{ApiError, ConfigError, ScanError};
pub use graph::{FeedClient, GraphClient, PostId, PostRequest, GRAPH_URL};
pub use images::{scan_images, try_scan_images, ImageSet, MAX_IMAGES};
pub use poster::{BatchReport, GroupOutcome, Poster};
