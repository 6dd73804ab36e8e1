use kvdeploy_core::config::{RegistryConfig, UploadConfig};
use kvdeploy_registry::{Deployer, Reporter, RevisionRegistry};
use kvdeploy_storage::{KvStore, MemoryBackend};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const NAMESPACE: &str = "foo";

/// Write artifact contents to a temporary file.
#[allow(dead_code)]
pub fn artifact(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// In-memory store pre-populated with string values.
#[allow(dead_code)]
pub fn seeded_store(entries: &[(&str, &str)]) -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::with_entries(entries.iter().copied()))
}

/// Registry over the test namespace.
#[allow(dead_code)]
pub fn registry(store: Arc<dyn KvStore>) -> RevisionRegistry {
    RevisionRegistry::new(store, &RegistryConfig::for_namespace(NAMESPACE)).unwrap()
}

/// Deployer over the test namespace with the given reporter.
#[allow(dead_code)]
pub fn deployer(store: Arc<dyn KvStore>, reporter: Arc<dyn Reporter>) -> Deployer {
    Deployer::new(registry(store)).with_reporter(reporter)
}

/// Upload configuration reading from an explicit file.
#[allow(dead_code)]
pub fn upload_config(revision_key: &str, file: &NamedTempFile) -> UploadConfig {
    let mut config = UploadConfig::for_revision(revision_key);
    config.file_path = Some(file.path().to_path_buf());
    config
}
