use serde::{Deserialize, Serialize};

/// Classification assigned to each input line by the tokenizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Header,
    Variant,
    Blank,
}

/// A single line of input text with its classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
    pub kind: LineKind,
}

/// Shared context established by a header line and inherited by the
/// variant lines that follow it, until the next header replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderContext {
    pub name: String,
    pub manufacturer: String,
    pub price_paid: Option<String>,
    pub sku: Option<String>,
    pub condition: Option<ConditionNote>,
}

/// Condition shorthand codes used in variant lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCode {
    DamagedBox,
    NoBox,
    NoLabel,
}

impl ConditionCode {
    pub fn from_abbrev(s: &str) -> Option<Self> {
        match s {
            "db" => Some(Self::DamagedBox),
            "nb" => Some(Self::NoBox),
            "nl" => Some(Self::NoLabel),
            _ => None,
        }
    }

    /// Human-readable note for `count` units: "Damaged box", "2 Damaged boxes".
    pub fn label(&self, count: u32) -> String {
        let (singular, plural) = match self {
            Self::DamagedBox => ("Damaged box", "Damaged boxes"),
            Self::NoBox => ("No box", "No boxes"),
            Self::NoLabel => ("No label", "No labels"),
        };
        if count > 1 {
            format!("{} {}", count, plural)
        } else {
            singular.to_string()
        }
    }
}

/// A condition observed on a line: either a shorthand code with an optional
/// unit count (`db`, `2db`) or a free-word phrase (`damage box`).
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNote {
    Code { code: ConditionCode, count: Option<u32> },
    Phrase(String),
}

/// One capacity/quantity/condition combination parsed from a variant line,
/// before defaults and context are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDescriptor {
    pub sku: Option<String>,
    /// Display capacity including qualifier words, e.g. "10.5w/9 men".
    pub capacity: String,
    /// Bare capacity token without qualifier words, e.g. "10.5w/9".
    pub capacity_compact: String,
    pub quantity_multiplier: Option<u32>,
    pub condition: Option<ConditionNote>,
    pub list_price: Option<String>,
}

/// A fully normalized product row. Created once per expanded variant and
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub sku: String,
    pub capacity: String,
    pub quantity: u32,
    pub cost: Option<String>,
    pub list_price: Option<String>,
    pub grade: String,
    pub damages: Option<String>,
    pub code: String,
    pub complete: bool,
}

/// Result of running one input block through the pipeline.
///
/// Zero records is a valid outcome (header-only or empty input), not an
/// error; `skipped_lines` counts lines that matched neither grammar.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutcome {
    pub records: Vec<ProductRecord>,
    pub skipped_lines: usize,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How prices are formatted when projected to a destination.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PricePolicy {
    /// Keep the currency symbol as typed ("$110").
    Raw,
    /// Strip the currency symbol before writing ("110").
    #[default]
    Stripped,
}
