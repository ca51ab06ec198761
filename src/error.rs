//! Error types returned by the analysis pipeline.
//!
//! Failures that reach the caller are always one of [`Error`]'s variants;
//! field-level failures during insight synthesis are recovered where they
//! happen and never show up here.

use serde::Serialize;
use thiserror::Error;

/// Why a page could not be rendered or queried
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// The page did not finish loading within the allotted time
    #[error("Request timeout: The website took too long to respond")]
    Timeout,

    /// DNS failure, refused connection, TLS failure and the like
    #[error("Invalid URL or website is unreachable: {0}")]
    Unreachable(String),

    /// Anything else the renderer reported (lost session, script error, ...)
    #[error("Scraping failed: {0}")]
    Unexpected(String),
}

/// Failure of a single call to the text-generation service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("text generation request failed: {0}")]
    Request(String),

    #[error("text generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("text generation service returned no text")]
    EmptyResponse,

    #[error("text generation timed out after {0} ms")]
    Timeout(u64),
}

/// Top-level error of an analysis run
#[derive(Debug, Error)]
pub enum Error {
    /// The request was rejected before any extraction was attempted
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),

    /// The mandatory part of insight synthesis failed
    #[error("AI analysis failed: {0}")]
    Analysis(String),

    #[error("Scraping cancelled")]
    Cancelled,
}

/// Coarse classification for presenting an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// The caller sent something unusable
    Client,
    Timeout,
    /// The target site or an external service misbehaved
    Upstream,
    Internal,
    Cancelled,
}

impl Error {
    /// HTTP-like status code for the failure
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Extraction(ExtractionFailure::Timeout) => 408,
            Error::Extraction(ExtractionFailure::Unreachable(_)) => 400,
            Error::Extraction(ExtractionFailure::Unexpected(_)) => 500,
            Error::Analysis(_) => 500,
            Error::Cancelled => 499,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_) => ErrorCategory::Client,
            Error::Extraction(ExtractionFailure::Timeout) => ErrorCategory::Timeout,
            Error::Extraction(ExtractionFailure::Unreachable(_)) => ErrorCategory::Upstream,
            Error::Extraction(ExtractionFailure::Unexpected(_)) => ErrorCategory::Internal,
            Error::Analysis(_) => ErrorCategory::Upstream,
            Error::Cancelled => ErrorCategory::Cancelled,
        }
    }

    /// User-presentable form of this error
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            message: self.to_string(),
            status_code: self.status_code(),
            category: self.category(),
        }
    }
}

/// Serializable error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub message: String,
    pub status_code: u16,
    pub category: ErrorCategory,
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, Error>;
