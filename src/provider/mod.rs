//! Outbound adapter for the BounceBan API.

pub mod client;
pub mod requests;
pub mod traits;
pub mod types;

pub use client::BounceBanClient;
pub use requests::{CheckTarget, Endpoint, FilterStatus, ProviderRequest, ResultsPage, Timeouts};
pub use traits::BulkTaskApi;
