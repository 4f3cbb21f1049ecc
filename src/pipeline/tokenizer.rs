//! Line splitting, token recognition and header/variant classification.
//!
//! Classification is purely syntactic: a line is a variant line when it
//! carries at least one capacity token and no free text, a header when it
//! carries free text or an identifier/price without a capacity, and a
//! variant candidate otherwise (pure condition/qualifier lines fall out
//! during expansion instead of opening a new product group).

use regex::Regex;

use crate::models::{ConditionCode, LineKind, RawLine};

/// Words that qualify a capacity and are appended to its display form,
/// e.g. "10.5w/9 men".
const QUALIFIER_WORDS: &[&str] = &[
    "men", "mens", "women", "womens", "kids", "boys", "girls", "youth", "gs", "toddler", "infant",
];

/// Words that make up free-text condition phrases such as "damage box".
const CONDITION_WORDS: &[&str] = &["damage", "damaged", "box", "boxes"];

/// A single token recognized on an input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A currency-marked numeral, e.g. "$110".
    Price(String),
    /// An identifier-like code with embedded digits and a dash, e.g. "Bq6472-107".
    Identifier(String),
    /// A capacity with an optional `x<N>` multiplier suffix, e.g. "9x2".
    Capacity {
        value: String,
        multiplier: Option<u32>,
    },
    /// A condition shorthand code, optionally count-prefixed: "db", "2db".
    Condition {
        code: ConditionCode,
        count: Option<u32>,
    },
    /// One word of a free-text condition phrase: "damage", "box".
    ConditionWord(String),
    /// A capacity qualifier word: "men", "kids".
    Qualifier(String),
    /// The filler word "size"; carries no information.
    SizeFiller,
    /// Free text; anything not matched above.
    Text(String),
}

pub struct Tokenizer {
    price_re: Regex,
    identifier_re: Regex,
    capacity_re: Regex,
    count_condition_re: Regex,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            price_re: Regex::new(r"^\$\d+(?:\.\d{1,2})?$").unwrap(),
            identifier_re: Regex::new(r"^[A-Za-z0-9]+-[A-Za-z0-9]+$").unwrap(),
            capacity_re: Regex::new(
                r"^(?i)(\d+(?:\.\d+)?[a-z]*(?:/\d+(?:\.\d+)?[a-z]*)?)(?:x(\d+))?$",
            )
            .unwrap(),
            count_condition_re: Regex::new(r"^(?i)(\d+)(db|nb|nl)$").unwrap(),
        }
    }

    /// Split raw text into trimmed lines, tokenize and classify each one.
    pub fn scan(&self, text: &str) -> Vec<(RawLine, Vec<Token>)> {
        text.lines()
            .enumerate()
            .map(|(idx, line)| {
                let trimmed = line.trim();
                let tokens = self.tokenize(trimmed);
                let kind = if trimmed.is_empty() {
                    LineKind::Blank
                } else {
                    classify(&tokens)
                };
                (
                    RawLine {
                        number: idx + 1,
                        text: trimmed.to_string(),
                        kind,
                    },
                    tokens,
                )
            })
            .collect()
    }

    /// Tokenize one trimmed line into space-separated typed tokens.
    pub fn tokenize(&self, line: &str) -> Vec<Token> {
        line.split_whitespace()
            .map(|word| self.recognize(word))
            .collect()
    }

    fn recognize(&self, word: &str) -> Token {
        let lower = word.to_lowercase();

        if self.price_re.is_match(word) {
            return Token::Price(word.to_string());
        }

        if let Some(caps) = self.count_condition_re.captures(word) {
            if let Some(code) = ConditionCode::from_abbrev(&caps[2].to_lowercase()) {
                let count = caps[1].parse().ok();
                return Token::Condition { code, count };
            }
        }

        if let Some(code) = ConditionCode::from_abbrev(&lower) {
            return Token::Condition { code, count: None };
        }

        if let Some(caps) = self.capacity_re.captures(word) {
            let multiplier = caps.get(2).and_then(|m| m.as_str().parse().ok());
            return Token::Capacity {
                value: caps[1].to_string(),
                multiplier,
            };
        }

        if self.identifier_re.is_match(word) && word.chars().any(|c| c.is_ascii_digit()) {
            return Token::Identifier(word.to_string());
        }

        if lower == "size" {
            return Token::SizeFiller;
        }

        if QUALIFIER_WORDS.contains(&lower.as_str()) {
            return Token::Qualifier(word.to_string());
        }

        if CONDITION_WORDS.contains(&lower.as_str()) {
            return Token::ConditionWord(lower);
        }

        Token::Text(word.to_string())
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a non-empty line from its tokens.
pub fn classify(tokens: &[Token]) -> LineKind {
    let has_text = tokens.iter().any(|t| matches!(t, Token::Text(_)));
    let has_capacity = tokens.iter().any(|t| matches!(t, Token::Capacity { .. }));
    let has_identifier = tokens.iter().any(|t| matches!(t, Token::Identifier(_)));
    let has_price = tokens.iter().any(|t| matches!(t, Token::Price(_)));

    if has_text {
        // A descriptive name always opens a new product group.
        LineKind::Header
    } else if has_capacity {
        LineKind::Variant
    } else if has_identifier || has_price {
        // An identifier or bare price without a capacity introduces shared
        // context for the lines that follow, e.g. "DV9956-103 damage".
        LineKind::Header
    } else {
        // Pure condition/qualifier lines; the expander drops these.
        LineKind::Variant
    }
}
