use thiserror::Error;

use crate::models::Variable;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Failures surfaced by the variable sync client.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("invalid project reference {url}: {reason}")]
    InvalidProjectReference { url: String, reason: String },

    #[error("value cannot be serialized: {reason}")]
    UnserializableValue { reason: String },

    #[error("listing probe carried no usable x-total-pages header")]
    PaginationMetadataMissing,

    /// One or more page fetches failed while listing; the listing as a whole
    /// is voided and no partial collection escapes.
    #[error("listing aborted: {} page fetch(es) failed on pages [{}]", .failed.len(), failed_pages(.failed))]
    PartialListingFailure { failed: Vec<PageFailure> },

    #[error("variable {key} does not exist on the remote project")]
    RemoteNotFound { key: String },

    #[error("remote rejected variable {key} with status {status}: {body}")]
    RemoteRejected {
        key: String,
        status: u16,
        body: String,
    },

    /// Some per-key calls of a batch sync failed. Successful outcomes are
    /// attached so the caller can reconcile which variables now diverge from
    /// intent.
    #[error("batch sync incomplete: {} variable call(s) failed, {} applied", .failures.len(), .applied.len())]
    BatchSyncPartialFailure {
        applied: Vec<Variable>,
        failures: Vec<KeyFailure>,
    },

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },
}

/// A single failed page fetch inside [`SyncError::PartialListingFailure`].
#[derive(Debug)]
pub struct PageFailure {
    pub page: u32,
    pub error: Box<SyncError>,
}

/// A single failed per-key call inside [`SyncError::BatchSyncPartialFailure`].
#[derive(Debug)]
pub struct KeyFailure {
    pub key: String,
    pub error: Box<SyncError>,
}

fn failed_pages(failed: &[PageFailure]) -> String {
    failed
        .iter()
        .map(|f| f.page.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trim a response body down to something loggable.
pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_body_empty() {
        assert_eq!(preview_body("   "), "<empty body>");
    }

    #[test]
    fn preview_body_truncates() {
        let body = "x".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn partial_listing_display_names_first_page() {
        let err = SyncError::PartialListingFailure {
            failed: vec![PageFailure {
                page: 2,
                error: Box::new(SyncError::PaginationMetadataMissing),
            }],
        };
        let msg = err.to_string();
        assert!(msg.contains("1 page fetch(es) failed"));
        assert!(msg.contains("[2]"));
    }

    #[test]
    fn remote_rejected_display_carries_context() {
        let err = SyncError::RemoteRejected {
            key: "ENV".to_string(),
            status: 400,
            body: "key already taken".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ENV"));
        assert!(msg.contains("400"));
        assert!(msg.contains("key already taken"));
    }
}
