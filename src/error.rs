// Error module: every failure the client can hit, split into local
// validation problems (bad path, bad config) and remote operation problems
// (transport, HTTP status, response body).

use crate::api::LockAction;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OwError {
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("{} is not inside the local sync folder {}", .path.display(), .root.display())]
    OutsideSyncRoot { path: PathBuf, root: PathBuf },

    #[error("path is not valid UTF-8: {}", .0.display())]
    PathNotUtf8(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{method} request failed")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP response code {status}. Response text: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP response code {status}, no <{field}> in response. Response text: {body}")]
    MissingField {
        field: &'static str,
        status: u16,
        body: String,
    },

    #[error("unreadable XML in response")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid HTTP method {0}")]
    InvalidMethod(&'static str),

    #[error(
        "{action} failed. Is the Temporary files lock app installed? \
         If attempting to lock, is it already locked by someone/something else? \
         If attempting to unlock, is the path actually locked?\n\
         📄 HTTP request was {method} {url}\n\
         📨 HTTP response code {status}. Response text: {body}"
    )]
    LockRejected {
        action: LockAction,
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },
}

impl OwError {
    /// True for errors detected before any request leaves the machine.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            OwError::PathNotFound(_)
                | OwError::OutsideSyncRoot { .. }
                | OwError::PathNotUtf8(_)
                | OwError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OwError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_and_remote_kinds_are_distinguished() {
        assert!(OwError::PathNotFound(PathBuf::from("/nope")).is_local());
        assert!(OwError::Config("x".into()).is_local());
        assert!(!OwError::Status { status: 500, body: String::new() }.is_local());
    }

    #[test]
    fn lock_rejection_mentions_prior_lock() {
        let err = OwError::LockRejected {
            action: LockAction::Lock,
            method: "LOCK",
            url: "http://localhost:8080/remote.php/dav/files/admin/a.txt".into(),
            status: 423,
            body: "locked".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("lock failed."));
        assert!(msg.contains("already locked"));
        assert!(msg.contains("HTTP response code 423. Response text: locked"));
    }
}
