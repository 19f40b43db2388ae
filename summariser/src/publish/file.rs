use std::path::PathBuf;

use super::{Publish, PublishError};

/// A [`Publish`] implementation that writes objects beneath a local directory.
///
/// The object key is used as the relative path, so the directory mirrors the bucket layout.
#[derive(Debug, Clone)]
pub struct FilePublisher {
    root: PathBuf,
}

impl FilePublisher {
    /// Creates a new [`FilePublisher`] writing beneath `root`.
    pub fn new<P>(root: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { root: root.into() }
    }
}

impl Publish for FilePublisher {
    fn publish(
        &mut self,
        key: &str,
        body: &str,
        content_type: &str,
    ) -> Result<String, PublishError> {
        let path = self.root.join(key);
        log::debug!("Writing {content_type} object to {}", path.display());

        let io_error = |source| PublishError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&path, body).map_err(io_error)?;

        Ok(path.display().to_string())
    }
}
