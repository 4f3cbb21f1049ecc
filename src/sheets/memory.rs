//! In-memory destination used by dry-run mode and the test suite.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::config::Destination;
use crate::errors::SheetError;

use super::RowSink;

/// Columns served when a destination has no configured header, mirroring
/// the stock inventory sheet layout.
const DEFAULT_HEADER: &[&str] = &[
    "Name",
    "Sku",
    "Size",
    "Quantity",
    "Cost",
    "List Price",
    "Condition",
];

#[derive(Default)]
pub struct MemorySink {
    headers: HashMap<String, Vec<String>>,
    appended: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the header row served for a destination name.
    pub fn with_header(mut self, destination: &str, columns: &[&str]) -> Self {
        self.headers.insert(
            destination.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Rows appended so far for a destination name.
    pub fn rows(&self, destination: &str) -> Vec<Vec<String>> {
        self.appended
            .lock()
            .unwrap()
            .get(destination)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RowSink for MemorySink {
    async fn header_row(&self, destination: &Destination) -> Result<Vec<String>, SheetError> {
        Ok(self
            .headers
            .get(&destination.name)
            .cloned()
            .unwrap_or_else(|| DEFAULT_HEADER.iter().map(|c| c.to_string()).collect()))
    }

    async fn append_rows(
        &self,
        destination: &Destination,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetError> {
        for row in &rows {
            info!("[dry-run] {} <- {:?}", destination.name, row);
        }
        self.appended
            .lock()
            .unwrap()
            .entry(destination.name.clone())
            .or_default()
            .extend(rows);
        Ok(())
    }
}
