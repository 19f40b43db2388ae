mod file;
mod gcs;

use std::path::PathBuf;

pub use self::file::FilePublisher;
pub use self::gcs::GcsPublisher;

/// Content type of published summary pages
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// A trait for publishing summary pages to an object store.
pub trait Publish {
    /// Write `body` to the object at `key`, replacing any existing object.
    ///
    /// Returns the URI of the written object.
    fn publish(&mut self, key: &str, body: &str, content_type: &str)
        -> Result<String, PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Not authorised to write to the object store: {0}")]
    Auth(String),
    #[error("Bucket `{bucket}` does not exist")]
    NotFound { bucket: String },
    #[error("Failed to reach the object store: {0}")]
    Network(#[from] ureq::Error),
    #[error("Invalid upload endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("Object store rejected the upload with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
