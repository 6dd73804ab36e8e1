pub mod fixtures;
pub mod mocks;

#[allow(unused_imports)]
pub use fixtures::{artifact, deployer, registry, seeded_store, upload_config};
#[allow(unused_imports)]
pub use mocks::{FaultyStore, RecordingReporter};
