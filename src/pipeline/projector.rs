//! Record projection onto destination column schemas.
//!
//! The destination's live header row decides which fields are written and in
//! which order. Column matching ignores case and punctuation, so "List
//! Price", "list_price" and "LIST PRICE" all address the same field. Columns
//! the record has no value for are filled with an empty string.

use crate::models::{PricePolicy, ProductRecord};

pub struct RecordProjector {
    policy: PricePolicy,
}

impl RecordProjector {
    pub fn new(policy: PricePolicy) -> Self {
        Self { policy }
    }

    /// Emit one value per destination column, in destination order.
    pub fn project(&self, record: &ProductRecord, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .map(|column| self.field_value(record, column).unwrap_or_default())
            .collect()
    }

    fn field_value(&self, record: &ProductRecord, column: &str) -> Option<String> {
        match normalize_column(column).as_str() {
            "name" => Some(record.name.clone()),
            "sku" => Some(record.sku.clone()),
            "size" | "capacity" => Some(record.capacity.clone()),
            "quantity" | "qty" => Some(record.quantity.to_string()),
            "cost" => Some(self.format_price(record.cost.as_deref())),
            "listprice" | "price" => Some(self.format_price(record.list_price.as_deref())),
            "grade" => Some(record.grade.clone()),
            "condition" | "damages" => Some(record.damages.clone().unwrap_or_default()),
            "code" => Some(record.code.clone()),
            "complete" => Some(if record.complete { "TRUE" } else { "" }.to_string()),
            _ => None,
        }
    }

    fn format_price(&self, price: Option<&str>) -> String {
        match price {
            None => String::new(),
            Some(p) => match self.policy {
                PricePolicy::Raw => p.to_string(),
                PricePolicy::Stripped => p.replace('$', ""),
            },
        }
    }
}

/// Lowercase a column name and strip everything but letters and digits.
fn normalize_column(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
