use async_trait::async_trait;
use bytes::Bytes;
use kvdeploy_registry::Reporter;
use kvdeploy_storage::{DeleteOptions, KvStore, MemoryBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Reporter that keeps every line for inspection.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingReporter {
    lines: Mutex<Vec<(String, bool)>>,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }

    pub fn lines(&self) -> Vec<(String, bool)> {
        self.lines.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, message: &str, verbose: bool) {
        self.lines
            .lock()
            .unwrap()
            .push((message.to_string(), verbose));
    }
}

/// Memory store with switchable failures and call counters.
#[allow(dead_code)]
pub struct FaultyStore {
    pub inner: Arc<MemoryBackend>,
    pub fail_keys: AtomicBool,
    pub fail_writes: AtomicBool,
    pub deletes: AtomicUsize,
    pub writes: AtomicUsize,
}

#[allow(dead_code)]
impl FaultyStore {
    pub fn new(inner: Arc<MemoryBackend>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_keys: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            deletes: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        })
    }

    fn unavailable() -> StorageError {
        StorageError::UnexpectedStatus {
            backend: "faulty",
            status: 500,
            body: "rpc error: No cluster leader".to_string(),
        }
    }
}

#[async_trait]
impl KvStore for FaultyStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        if self.fail_keys.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.keys(prefix).await
    }

    async fn delete(&self, key: &str, options: DeleteOptions) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key, options).await
    }

    fn backend_name(&self) -> &'static str {
        "faulty"
    }
}
