//! Typed error enum for the Jira crate.

use thiserror::Error;

/// Errors from Jira REST/Agile API calls.
#[derive(Debug, Error)]
pub enum JiraError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("Jira returned status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}
