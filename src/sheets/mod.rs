//! Spreadsheet destinations.
//!
//! Destinations are append-only: the service fetches the destination's
//! header row, projects each record onto that column order, and appends the
//! resulting rows. There is no isolation between concurrent writers to the
//! same destination; interleaving is accepted. Failures propagate unmodified
//! and are never retried here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::Destination;
use crate::errors::SheetError;
use crate::models::ProductRecord;
use crate::pipeline::RecordProjector;

pub mod client;
pub mod memory;

pub use client::SheetsClient;
pub use memory::MemorySink;

/// Row-append seam over a spreadsheet-like store.
#[async_trait]
pub trait RowSink: Send + Sync {
    /// The destination's current header row, which defines projection order.
    async fn header_row(&self, destination: &Destination) -> Result<Vec<String>, SheetError>;

    /// Append rows after the destination's existing data.
    async fn append_rows(
        &self,
        destination: &Destination,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetError>;
}

/// Projects record batches onto every configured destination and appends
/// them. Either all destinations receive their rows or the first failure is
/// returned; there is no partial-success bookkeeping.
pub struct DeliveryService {
    sink: Arc<dyn RowSink>,
    destinations: Vec<Destination>,
}

impl DeliveryService {
    pub fn new(sink: Arc<dyn RowSink>, destinations: Vec<Destination>) -> Self {
        Self { sink, destinations }
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    pub async fn deliver(&self, records: &[ProductRecord]) -> Result<(), SheetError> {
        for destination in &self.destinations {
            let columns = self.sink.header_row(destination).await?;
            let projector = RecordProjector::new(destination.price_format);
            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|record| projector.project(record, &columns))
                .collect();

            info!(
                "Appending {} rows to destination '{}'",
                rows.len(),
                destination.name
            );
            self.sink.append_rows(destination, rows).await?;
        }
        Ok(())
    }
}
