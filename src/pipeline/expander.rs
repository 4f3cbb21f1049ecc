//! Variant line expansion.
//!
//! A single variant line may describe several capacities, each with its own
//! multiplier and condition shorthand. Expansion fans the line out into one
//! descriptor per capacity; the line's identifier and price apply to every
//! descriptor it produces. A condition token binds to the most recent
//! capacity, or to the whole line when it precedes any capacity.

use crate::models::{ConditionNote, VariantDescriptor};

use super::tokenizer::Token;

struct PendingCapacity {
    value: String,
    qualifiers: Vec<String>,
    multiplier: Option<u32>,
    condition: Option<ConditionNote>,
}

impl PendingCapacity {
    fn into_descriptor(self) -> VariantDescriptor {
        let capacity = if self.qualifiers.is_empty() {
            self.value.clone()
        } else {
            format!("{} {}", self.value, self.qualifiers.join(" "))
        };
        VariantDescriptor {
            sku: None,
            capacity,
            capacity_compact: self.value,
            quantity_multiplier: self.multiplier,
            condition: self.condition,
            list_price: None,
        }
    }
}

/// Expand one variant line's tokens into atomic descriptors. A line with no
/// capacity token yields nothing and is dropped by the caller.
pub fn expand(tokens: &[Token]) -> Vec<VariantDescriptor> {
    let mut descriptors: Vec<VariantDescriptor> = Vec::new();
    let mut pending: Option<PendingCapacity> = None;
    let mut line_sku: Option<String> = None;
    let mut line_price: Option<String> = None;
    let mut line_condition: Option<ConditionNote> = None;
    let mut phrase_words: Vec<String> = Vec::new();

    let flush_phrase =
        |pending: &mut Option<PendingCapacity>,
         line_condition: &mut Option<ConditionNote>,
         words: &mut Vec<String>| {
            if words.is_empty() {
                return;
            }
            let note = ConditionNote::Phrase(words.join(" "));
            words.clear();
            match pending {
                Some(p) => p.condition = Some(note),
                None => *line_condition = Some(note),
            }
        };

    for token in tokens {
        match token {
            Token::Capacity { value, multiplier } => {
                flush_phrase(&mut pending, &mut line_condition, &mut phrase_words);
                if let Some(prev) = pending.take() {
                    descriptors.push(prev.into_descriptor());
                }
                pending = Some(PendingCapacity {
                    value: value.clone(),
                    qualifiers: Vec::new(),
                    multiplier: *multiplier,
                    condition: None,
                });
            }
            Token::Qualifier(word) => {
                if let Some(p) = pending.as_mut() {
                    p.qualifiers.push(word.clone());
                }
            }
            Token::Condition { code, count } => {
                flush_phrase(&mut pending, &mut line_condition, &mut phrase_words);
                let note = ConditionNote::Code {
                    code: *code,
                    count: *count,
                };
                match pending.as_mut() {
                    Some(p) => p.condition = Some(note),
                    None => line_condition = Some(note),
                }
            }
            Token::ConditionWord(word) => {
                phrase_words.push(word.clone());
            }
            Token::Price(price) => {
                line_price = Some(price.clone());
            }
            Token::Identifier(id) => {
                if line_sku.is_none() {
                    line_sku = Some(id.clone());
                }
            }
            Token::SizeFiller | Token::Text(_) => {}
        }
    }

    flush_phrase(&mut pending, &mut line_condition, &mut phrase_words);
    if let Some(prev) = pending.take() {
        descriptors.push(prev.into_descriptor());
    }

    for descriptor in descriptors.iter_mut() {
        descriptor.sku = line_sku.clone();
        descriptor.list_price = line_price.clone();
        if descriptor.condition.is_none() {
            descriptor.condition = line_condition.clone();
        }
    }

    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConditionCode;
    use crate::pipeline::tokenizer::Tokenizer;

    fn expand_line(line: &str) -> Vec<VariantDescriptor> {
        expand(&Tokenizer::new().tokenize(line))
    }

    #[test]
    fn test_single_capacity() {
        let descriptors = expand_line("9");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].capacity, "9");
        assert_eq!(descriptors[0].quantity_multiplier, None);
        assert_eq!(descriptors[0].condition, None);
    }

    #[test]
    fn test_multiplier_suffix() {
        let descriptors = expand_line("10.5x3");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].capacity, "10.5");
        assert_eq!(descriptors[0].quantity_multiplier, Some(3));
    }

    #[test]
    fn test_capacity_with_count_damage() {
        let descriptors = expand_line("9x2 2db");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].quantity_multiplier, Some(2));
        assert_eq!(
            descriptors[0].condition,
            Some(ConditionNote::Code {
                code: ConditionCode::DamagedBox,
                count: Some(2)
            })
        );
    }

    #[test]
    fn test_identifier_and_price_apply_to_line() {
        let descriptors = expand_line("Bq6472-107 10.5w/9 men $60");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].sku, Some("Bq6472-107".to_string()));
        assert_eq!(descriptors[0].capacity, "10.5w/9 men");
        assert_eq!(descriptors[0].capacity_compact, "10.5w/9");
        assert_eq!(descriptors[0].list_price, Some("$60".to_string()));
    }

    #[test]
    fn test_size_filler_dropped() {
        let descriptors = expand_line("Dm9126-104 size 11w/9.5 men $60");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].capacity, "11w/9.5 men");
    }

    #[test]
    fn test_multiple_capacities_fan_out() {
        let descriptors = expand_line("8 db 9.5x2 11x2");
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].capacity, "8");
        assert_eq!(
            descriptors[0].condition,
            Some(ConditionNote::Code {
                code: ConditionCode::DamagedBox,
                count: None
            })
        );
        assert_eq!(descriptors[1].capacity, "9.5");
        assert_eq!(descriptors[1].quantity_multiplier, Some(2));
        assert_eq!(descriptors[1].condition, None);
        assert_eq!(descriptors[2].capacity, "11");
    }

    #[test]
    fn test_condition_before_capacity_applies_to_line() {
        let descriptors = expand_line("db 9 9.5");
        assert_eq!(descriptors.len(), 2);
        for descriptor in &descriptors {
            assert_eq!(
                descriptor.condition,
                Some(ConditionNote::Code {
                    code: ConditionCode::DamagedBox,
                    count: None
                })
            );
        }
    }

    #[test]
    fn test_word_phrase_binds_to_capacity() {
        let descriptors = expand_line("6y damage box");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(
            descriptors[0].condition,
            Some(ConditionNote::Phrase("damage box".to_string()))
        );
    }

    #[test]
    fn test_line_without_capacity_yields_nothing() {
        assert!(expand_line("db").is_empty());
        assert!(expand_line("men").is_empty());
    }
}
