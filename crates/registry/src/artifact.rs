//! Artifact sources for the upload workflow.

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::path::Path;

/// Reads the artifact to upload.
#[async_trait]
pub trait ArtifactSource: Send + Sync + 'static {
    async fn read(&self, path: &Path) -> io::Result<Bytes>;
}

/// Reads artifacts from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilesystemArtifacts;

#[async_trait]
impl ArtifactSource for FilesystemArtifacts {
    async fn read(&self, path: &Path) -> io::Result<Bytes> {
        let content = tokio::fs::read(path).await?;
        Ok(Bytes::from(content))
    }
}
