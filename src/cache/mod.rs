//! Badge cache shared by the fetcher (writer) and the scanner (reader).
//!
//! The cache lives only as long as the process. Entries are:
//! - absent: not cached, a scan should start a fetch
//! - pending: a fetch is in flight, do not start another
//! - ready: the badges from the last successful fetch

mod store;

pub use store::{BadgeCache, CacheEntry, DEFAULT_EXPIRY};
