//! File-backed key-value storage with an in-memory write-through cache.
//! - `snapshot`: persisted layout and the load/save seam.
//! - `file`: whole-file JSON persistence against a single backing file.
//! - `cache`: the authoritative in-memory map serving all reads.
//! - `keygen`: server-side key generation for keyless writes.

pub mod errors;
pub mod snapshot;
pub mod file;
pub mod cache;
pub mod keygen;

pub use cache::KvStore;
pub use file::FileStore;
pub use snapshot::{Snapshot, SnapshotStore};
