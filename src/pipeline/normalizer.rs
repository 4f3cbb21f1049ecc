//! Field normalization: defaults, SKU synthesis, condition classification.
//!
//! Takes one descriptor plus its header context and produces finished
//! records. Quantity defaults to 1, a missing SKU is synthesized, and
//! condition shorthand becomes a human-readable damage note. A partial
//! damage count either annotates the whole quantity or splits the variant
//! in two, depending on the configured policy.

use tracing::warn;

use crate::models::{ConditionNote, HeaderContext, ProductRecord, VariantDescriptor};

use super::PipelineOptions;

/// Source of synthesized SKUs. Injectable so tests can pin the sequence.
pub trait SkuGenerator: Send {
    fn generate(&mut self) -> String;
}

/// Default generator: "GEN" followed by three random digits. Collisions
/// across a batch are acceptable and not retried.
pub struct RandomSkuGenerator {
    rng: fastrand::Rng,
}

impl RandomSkuGenerator {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomSkuGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SkuGenerator for RandomSkuGenerator {
    fn generate(&mut self) -> String {
        format!("GEN{:03}", self.rng.u32(0..1000))
    }
}

pub struct FieldNormalizer {
    damage_split: bool,
    sku_generator: Box<dyn SkuGenerator>,
}

impl FieldNormalizer {
    pub fn new(options: &PipelineOptions, sku_generator: Box<dyn SkuGenerator>) -> Self {
        Self {
            damage_split: options.damage_split,
            sku_generator,
        }
    }

    /// Complete one descriptor into records. Returns two records only under
    /// the split policy when a damage count covers part of the quantity.
    pub fn normalize(
        &mut self,
        descriptor: &VariantDescriptor,
        context: &HeaderContext,
    ) -> Vec<ProductRecord> {
        let quantity = descriptor.quantity_multiplier.unwrap_or(1);

        let sku = descriptor
            .sku
            .clone()
            .or_else(|| context.sku.clone())
            .unwrap_or_else(|| self.sku_generator.generate());

        let name = if context.name.is_empty() {
            sku.clone()
        } else {
            context.name.clone()
        };

        let condition = descriptor
            .condition
            .clone()
            .or_else(|| context.condition.clone());

        let base = ProductRecord {
            name,
            sku,
            capacity: descriptor.capacity.clone(),
            quantity,
            cost: context.price_paid.clone(),
            list_price: descriptor.list_price.clone(),
            grade: String::new(),
            damages: None,
            code: String::new(),
            complete: true,
        };

        let mut records = match condition {
            None => vec![ProductRecord {
                damages: None,
                ..base
            }],
            Some(ConditionNote::Phrase(phrase)) => vec![ProductRecord {
                damages: Some(phrase),
                ..base
            }],
            Some(ConditionNote::Code { code, count }) => {
                let damaged = match count {
                    None => quantity,
                    Some(n) if n > quantity => {
                        warn!(
                            "damage count {} exceeds quantity {} for capacity {}, clamping",
                            n, quantity, descriptor.capacity
                        );
                        quantity
                    }
                    Some(n) => n,
                };

                if damaged == quantity {
                    vec![ProductRecord {
                        damages: Some(code.label(quantity)),
                        ..base
                    }]
                } else if self.damage_split {
                    vec![
                        ProductRecord {
                            quantity: quantity - damaged,
                            damages: None,
                            ..base.clone()
                        },
                        ProductRecord {
                            quantity: damaged,
                            damages: Some(code.label(damaged)),
                            ..base
                        },
                    ]
                } else {
                    vec![ProductRecord {
                        damages: Some(code.label(damaged)),
                        ..base
                    }]
                }
            }
        };

        let used = matches!(
            descriptor
                .condition
                .as_ref()
                .or(context.condition.as_ref()),
            Some(ConditionNote::Phrase(_))
        );
        for record in records.iter_mut() {
            record.grade = grade_for(record, used);
        }

        records
    }
}

/// "New" unless the condition was a standalone damage phrase on a product
/// with no descriptive name of its own. A damaged box is not a used product.
fn grade_for(record: &ProductRecord, word_phrase: bool) -> String {
    if record.damages.is_some() && word_phrase && record.name == record.sku {
        "Used".to_string()
    } else {
        "New".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConditionCode;

    fn options() -> PipelineOptions {
        PipelineOptions::default()
    }

    fn split_options() -> PipelineOptions {
        PipelineOptions {
            damage_split: true,
            ..PipelineOptions::default()
        }
    }

    fn normalizer(options: &PipelineOptions) -> FieldNormalizer {
        FieldNormalizer::new(options, Box::new(RandomSkuGenerator::with_seed(7)))
    }

    fn descriptor(capacity: &str) -> VariantDescriptor {
        VariantDescriptor {
            sku: None,
            capacity: capacity.to_string(),
            capacity_compact: capacity.to_string(),
            quantity_multiplier: None,
            condition: None,
            list_price: None,
        }
    }

    fn context(name: &str, price: Option<&str>) -> HeaderContext {
        HeaderContext {
            name: name.to_string(),
            manufacturer: "Nike".to_string(),
            price_paid: price.map(|p| p.to_string()),
            sku: None,
            condition: None,
        }
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let opts = options();
        let records = normalizer(&opts).normalize(&descriptor("9"), &context("ProductX", None));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 1);
    }

    #[test]
    fn test_sku_synthesized_when_missing() {
        let opts = options();
        let records = normalizer(&opts).normalize(&descriptor("9"), &context("ProductX", None));
        assert!(records[0].sku.starts_with("GEN"));
        assert_eq!(records[0].sku.len(), 6);
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let opts = options();
        let first = normalizer(&opts).normalize(&descriptor("9"), &context("ProductX", None));
        let second = normalizer(&opts).normalize(&descriptor("9"), &context("ProductX", None));
        assert_eq!(first[0].sku, second[0].sku);
    }

    #[test]
    fn test_context_sku_inherited() {
        let opts = options();
        let mut ctx = context("", None);
        ctx.sku = Some("924453-004".to_string());
        let records = normalizer(&opts).normalize(&descriptor("8.5"), &ctx);
        assert_eq!(records[0].sku, "924453-004");
        // Name mirrors the SKU when the header carried no descriptive name.
        assert_eq!(records[0].name, "924453-004");
    }

    #[test]
    fn test_cost_from_context_price() {
        let opts = options();
        let records =
            normalizer(&opts).normalize(&descriptor("9"), &context("ProductX", Some("$200")));
        assert_eq!(records[0].cost, Some("$200".to_string()));
        assert_eq!(records[0].list_price, None);
    }

    #[test]
    fn test_full_damage_count_annotates_single_record() {
        let opts = options();
        let mut desc = descriptor("9");
        desc.quantity_multiplier = Some(2);
        desc.condition = Some(ConditionNote::Code {
            code: ConditionCode::DamagedBox,
            count: Some(2),
        });
        let records = normalizer(&opts).normalize(&desc, &context("vapormax black", None));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 2);
        assert_eq!(records[0].damages, Some("2 Damaged boxes".to_string()));
    }

    #[test]
    fn test_singular_damage_note() {
        let opts = options();
        let mut desc = descriptor("8");
        desc.condition = Some(ConditionNote::Code {
            code: ConditionCode::DamagedBox,
            count: None,
        });
        let records = normalizer(&opts).normalize(&desc, &context("vapormax black", None));
        assert_eq!(records[0].damages, Some("Damaged box".to_string()));
        assert_eq!(records[0].grade, "New");
    }

    #[test]
    fn test_partial_damage_annotates_by_default() {
        let opts = options();
        let mut desc = descriptor("9");
        desc.quantity_multiplier = Some(3);
        desc.condition = Some(ConditionNote::Code {
            code: ConditionCode::DamagedBox,
            count: Some(1),
        });
        let records = normalizer(&opts).normalize(&desc, &context("ProductX", None));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 3);
        assert_eq!(records[0].damages, Some("Damaged box".to_string()));
    }

    #[test]
    fn test_partial_damage_splits_when_configured() {
        let opts = split_options();
        let mut desc = descriptor("9");
        desc.quantity_multiplier = Some(3);
        desc.condition = Some(ConditionNote::Code {
            code: ConditionCode::DamagedBox,
            count: Some(1),
        });
        let records = normalizer(&opts).normalize(&desc, &context("ProductX", None));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].quantity, 2);
        assert_eq!(records[0].damages, None);
        assert_eq!(records[1].quantity, 1);
        assert_eq!(records[1].damages, Some("Damaged box".to_string()));
    }

    #[test]
    fn test_damage_count_clamped_to_quantity() {
        let opts = options();
        let mut desc = descriptor("9");
        desc.quantity_multiplier = Some(2);
        desc.condition = Some(ConditionNote::Code {
            code: ConditionCode::DamagedBox,
            count: Some(5),
        });
        let records = normalizer(&opts).normalize(&desc, &context("ProductX", None));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].damages, Some("2 Damaged boxes".to_string()));
    }

    #[test]
    fn test_word_phrase_grade_used_when_name_is_sku() {
        let opts = options();
        let mut ctx = context("", None);
        ctx.sku = Some("DV9956-103".to_string());
        ctx.condition = Some(ConditionNote::Phrase("damage".to_string()));
        let records = normalizer(&opts).normalize(&descriptor("9"), &ctx);
        assert_eq!(records[0].damages, Some("damage".to_string()));
        assert_eq!(records[0].grade, "Used");
    }

    #[test]
    fn test_word_phrase_grade_new_when_named() {
        let opts = options();
        let mut ctx = context("vapormax black", None);
        ctx.condition = Some(ConditionNote::Phrase("damage box".to_string()));
        let records = normalizer(&opts).normalize(&descriptor("9"), &ctx);
        assert_eq!(records[0].grade, "New");
    }
}
