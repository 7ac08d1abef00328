//! Error types for config loading, image scanning and Graph API calls.

use std::path::PathBuf;

use reqwest::StatusCode;

/// Fatal errors: nothing gets posted when one of these comes up.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read group file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse group file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("group file at {path} must contain a non-empty 'groups' list")]
    MissingGroups { path: PathBuf },

    #[error("group file at {path} must contain a non-empty 'message' string")]
    MissingMessage { path: PathBuf },

    #[error("no groups to post to")]
    NoGroups,

    #[error("message must not be empty")]
    EmptyMessage,
}

/// Image folder problems. Callers degrade to "no images".
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single "create feed post" call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with an `error` object.
    #[error("Graph API error ({status}): {message}{}", format_code(*.code))]
    Graph {
        status: StatusCode,
        message: String,
        /// The provider's error `type`, e.g. `OAuthException`.
        kind: Option<String>,
        code: Option<i64>,
        payload: serde_json::Value,
    },

    #[error("unexpected response ({status}): {body}")]
    UnexpectedResponse { status: StatusCode, body: String },

    #[error("base url {0} cannot carry a group path")]
    InvalidBaseUrl(String),

    #[error("invalid base url: {0}")]
    ParseUrl(#[from] url::ParseError),
}

fn format_code(code: Option<i64>) -> String {
    match code {
        Some(code) => format!(" (code {code})"),
        None => String::new(),
    }
}
