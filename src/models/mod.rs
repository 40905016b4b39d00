// Domain models: the immutable host snapshot and its cache entry

mod snapshot;

pub use snapshot::{BuildIdentity, CacheEntry, DISK_UNKNOWN, Metric, NetworkRate, Snapshot};
