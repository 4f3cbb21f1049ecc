//! Active header context tracking.
//!
//! A header line establishes the shared name, price and identifier for the
//! variant lines that follow it. The context is replaced wholesale on every
//! new header so no field from an earlier group can leak into a later one.

use crate::models::{ConditionNote, HeaderContext};

use super::tokenizer::Token;
use super::PipelineOptions;

pub struct ContextPropagator<'a> {
    options: &'a PipelineOptions,
    active: Option<HeaderContext>,
}

impl<'a> ContextPropagator<'a> {
    pub fn new(options: &'a PipelineOptions) -> Self {
        Self {
            options,
            active: None,
        }
    }

    /// Replace the active context with one built from a header line.
    pub fn absorb_header(&mut self, tokens: &[Token]) {
        let name = header_name(tokens);
        let manufacturer = self.infer_manufacturer(&name);

        let price_paid = tokens.iter().rev().find_map(|t| match t {
            Token::Price(p) => Some(p.clone()),
            _ => None,
        });

        let sku = tokens.iter().find_map(|t| match t {
            Token::Identifier(id) => Some(id.clone()),
            _ => None,
        });

        self.active = Some(HeaderContext {
            name,
            manufacturer,
            price_paid,
            sku,
            condition: header_condition(tokens),
        });
    }

    /// Context snapshot attached to a variant line. A variant line arriving
    /// before any header acts as its own header: an empty-name context is
    /// established and the normalizer later mirrors the SKU into the name.
    pub fn context_for_variant(&mut self) -> HeaderContext {
        if let Some(active) = &self.active {
            return active.clone();
        }
        let context = HeaderContext {
            name: String::new(),
            manufacturer: self.options.default_manufacturer.clone(),
            price_paid: None,
            sku: None,
            condition: None,
        };
        self.active = Some(context.clone());
        context
    }

    fn infer_manufacturer(&self, name: &str) -> String {
        for word in name.split_whitespace() {
            for brand in &self.options.known_brands {
                if word.eq_ignore_ascii_case(brand) {
                    return brand.clone();
                }
            }
        }
        self.options.default_manufacturer.clone()
    }
}

/// Assemble the product name from a header line: free-text words in order,
/// plus qualifier words that do not bind to a preceding capacity.
fn header_name(tokens: &[Token]) -> String {
    let mut words = Vec::new();
    let mut after_capacity = false;
    for token in tokens {
        match token {
            Token::Text(w) => {
                words.push(w.as_str());
                after_capacity = false;
            }
            Token::Qualifier(w) => {
                if !after_capacity {
                    words.push(w.as_str());
                }
            }
            Token::Capacity { .. } => after_capacity = true,
            _ => after_capacity = false,
        }
    }
    words.join(" ")
}

/// A condition carried on the header itself ("DV9956-103 damage") applies to
/// every following variant line that has no condition of its own.
fn header_condition(tokens: &[Token]) -> Option<ConditionNote> {
    if let Some((code, count)) = tokens.iter().find_map(|t| match t {
        Token::Condition { code, count } => Some((*code, *count)),
        _ => None,
    }) {
        return Some(ConditionNote::Code { code, count });
    }

    let words: Vec<&str> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::ConditionWord(w) => Some(w.as_str()),
            _ => None,
        })
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(ConditionNote::Phrase(words.join(" ")))
    }
}
