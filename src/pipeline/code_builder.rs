//! Composite catalog code derivation.
//!
//! Catalog-style destinations key rows by a code combining manufacturer,
//! capacity and SKU: `<MFG2>-<REGION>_<capacity>-<sku>`. The code is purely
//! derived and recomputed per record, since capacity varies across a group
//! even when the SKU and manufacturer are shared.

pub struct CodeBuilder {
    region_tag: String,
}

impl CodeBuilder {
    pub fn new(region_tag: impl Into<String>) -> Self {
        Self {
            region_tag: region_tag.into(),
        }
    }

    /// Build the code for one record. Capacity is the compact capacity
    /// token; qualifier words never appear in codes.
    pub fn build(&self, manufacturer: &str, capacity: &str, sku: &str) -> String {
        let prefix: String = manufacturer
            .chars()
            .take(2)
            .collect::<String>()
            .to_uppercase();
        format!("{}-{}_{}-{}", prefix, self.region_tag, capacity, sku)
    }
}
