// Adapters for the ports in `app::ports`, plus the CSV codec.
pub mod csv_codec;
pub mod fs_store;
pub mod http_client;
pub mod in_memory;

pub use fs_store::{FsWriter, SnapshotFetcher};
pub use http_client::HttpFetcher;
pub use in_memory::{InMemoryWriter, StaticFetcher};
