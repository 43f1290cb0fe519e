pub mod capability;
pub mod client;
pub mod endpoints;
pub mod paginator;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use capability::Capability;
pub use client::TrackerClient;
pub use endpoints::Endpoints;
pub use paginator::{PageCursor, Paginator, DEFAULT_PAGE_LIMIT};
pub use transport::{Fetch, QueryParams, Transport};
