//! Fetching badges for tickets, bounded by a shared concurrency budget.

mod context;
mod fetcher;
#[cfg(test)]
pub(crate) mod testing;

pub use context::{BadgeContext, Limits};
pub use fetcher::{Fetcher, TicketSource};
