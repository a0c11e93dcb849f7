//! Seam between the bulk poll loop and the provider client.

use async_trait::async_trait;

use super::requests::ResultsPage;
use super::types::{RawBulkDump, RawBulkStatus};
use crate::core::error::Result;

/// The two bulk calls the poll loop repeats: status checks and a final results page.
#[async_trait]
pub trait BulkTaskApi: Send + Sync {
    async fn bulk_status(&self, token: &str, task_id: &str) -> Result<RawBulkStatus>;

    async fn bulk_dump(&self, token: &str, page: &ResultsPage) -> Result<RawBulkDump>;
}
