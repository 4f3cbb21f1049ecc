//! The text-to-record normalization pipeline.
//!
//! Raw listing text flows through the stages in order: the tokenizer splits
//! and classifies lines, the context propagator attaches the active header
//! context, the expander fans variant shorthand out into atomic descriptors,
//! the normalizer completes each descriptor into a record, and the code
//! builder derives the composite catalog code. Processing a block is
//! sequential and single-threaded; pipeline instances share no state, so
//! concurrent requests each run their own instance.

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::models::{LineKind, ParseOutcome, ProductRecord};

pub mod code_builder;
pub mod context;
pub mod expander;
pub mod normalizer;
pub mod projector;
pub mod tokenizer;

pub use code_builder::CodeBuilder;
pub use context::ContextPropagator;
pub use normalizer::{FieldNormalizer, RandomSkuGenerator, SkuGenerator};
pub use projector::RecordProjector;
pub use tokenizer::{Token, Tokenizer};

/// Pipeline behavior knobs, resolved once at construction.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub default_manufacturer: String,
    pub known_brands: Vec<String>,
    pub region_tag: String,
    pub damage_split: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            default_manufacturer: "Nike".to_string(),
            known_brands: vec![
                "Nike".to_string(),
                "Adidas".to_string(),
                "Jordan".to_string(),
                "Puma".to_string(),
                "Reebok".to_string(),
            ],
            region_tag: "BR".to_string(),
            damage_split: false,
        }
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            default_manufacturer: config.default_manufacturer.clone(),
            known_brands: config.known_brands.clone(),
            region_tag: config.region_tag.clone(),
            damage_split: config.damage_split,
        }
    }
}

/// One-shot pipeline over a single input block. Built per request.
pub struct IntakePipeline {
    options: PipelineOptions,
    tokenizer: Tokenizer,
    normalizer: FieldNormalizer,
    code_builder: CodeBuilder,
}

impl IntakePipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        let options = PipelineOptions::from(config);
        let generator: Box<dyn SkuGenerator> = match config.sku_seed {
            Some(seed) => Box::new(RandomSkuGenerator::with_seed(seed)),
            None => Box::new(RandomSkuGenerator::new()),
        };
        Self::with_sku_generator(options, generator)
    }

    pub fn from_options(options: PipelineOptions) -> Self {
        Self::with_sku_generator(options, Box::new(RandomSkuGenerator::new()))
    }

    pub fn with_sku_generator(options: PipelineOptions, generator: Box<dyn SkuGenerator>) -> Self {
        let normalizer = FieldNormalizer::new(&options, generator);
        let code_builder = CodeBuilder::new(options.region_tag.clone());
        Self {
            options,
            tokenizer: Tokenizer::new(),
            normalizer,
            code_builder,
        }
    }

    /// Run one input block through every stage. Zero records is a valid
    /// outcome, not an error; malformed lines are skipped and counted.
    pub fn process(&mut self, text: &str) -> ParseOutcome {
        let scanned = self.tokenizer.scan(text);
        info!("Processing input block with {} lines", scanned.len());

        let options = &self.options;
        let normalizer = &mut self.normalizer;
        let code_builder = &self.code_builder;

        let mut propagator = ContextPropagator::new(options);
        let mut records: Vec<ProductRecord> = Vec::new();
        let mut skipped = 0usize;

        for (line, tokens) in &scanned {
            match line.kind {
                LineKind::Blank => continue,
                LineKind::Header => {
                    debug!("Line {}: header '{}'", line.number, line.text);
                    propagator.absorb_header(tokens);

                    // A header carrying capacity tokens also yields its own
                    // variants from the remainder of the line.
                    if tokens
                        .iter()
                        .any(|t| matches!(t, Token::Capacity { .. }))
                    {
                        let ctx = propagator.context_for_variant();
                        for descriptor in expander::expand(tokens) {
                            for mut record in normalizer.normalize(&descriptor, &ctx) {
                                record.code = code_builder.build(
                                    &ctx.manufacturer,
                                    &descriptor.capacity_compact,
                                    &record.sku,
                                );
                                records.push(record);
                            }
                        }
                    }
                }
                LineKind::Variant => {
                    let ctx = propagator.context_for_variant();
                    let descriptors = expander::expand(tokens);
                    if descriptors.is_empty() {
                        debug!("Line {}: no capacity pattern, skipping", line.number);
                        skipped += 1;
                        continue;
                    }
                    for descriptor in descriptors {
                        for mut record in normalizer.normalize(&descriptor, &ctx) {
                            record.code = code_builder.build(
                                &ctx.manufacturer,
                                &descriptor.capacity_compact,
                                &record.sku,
                            );
                            records.push(record);
                        }
                    }
                }
            }
        }

        info!(
            "Block complete: {} records, {} lines skipped",
            records.len(),
            skipped
        );

        ParseOutcome {
            records,
            skipped_lines: skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> IntakePipeline {
        IntakePipeline::with_sku_generator(
            PipelineOptions::default(),
            Box::new(RandomSkuGenerator::with_seed(42)),
        )
    }

    #[test]
    fn test_empty_input_is_zero_records() {
        let outcome = pipeline().process("");
        assert!(outcome.is_empty());
        assert_eq!(outcome.skipped_lines, 0);
    }

    #[test]
    fn test_header_only_input_is_zero_records() {
        let outcome = pipeline().process("Women collection all brand new $200");
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_context_propagation_scenario() {
        let outcome = pipeline().process("ProductX $200\nABC-111 9\nDEF-222 9.5");
        assert_eq!(outcome.records.len(), 2);

        let first = &outcome.records[0];
        assert_eq!(first.name, "ProductX");
        assert_eq!(first.sku, "ABC-111");
        assert_eq!(first.capacity, "9");
        assert_eq!(first.quantity, 1);
        assert_eq!(first.cost, Some("$200".to_string()));

        let second = &outcome.records[1];
        assert_eq!(second.name, "ProductX");
        assert_eq!(second.sku, "DEF-222");
        assert_eq!(second.capacity, "9.5");
        assert_eq!(second.quantity, 1);
        assert_eq!(second.cost, Some("$200".to_string()));
    }

    #[test]
    fn test_header_identifier_inherited_with_damage_count() {
        let outcome = pipeline().process("924453-004 vapormax black $110\n9x2 2db");
        assert_eq!(outcome.records.len(), 1);

        let record = &outcome.records[0];
        assert_eq!(record.sku, "924453-004");
        assert_eq!(record.name, "vapormax black");
        assert_eq!(record.capacity, "9");
        assert_eq!(record.quantity, 2);
        assert_eq!(record.cost, Some("$110".to_string()));
        assert_eq!(record.damages, Some("2 Damaged boxes".to_string()));
    }

    #[test]
    fn test_malformed_line_skipped_silently() {
        let outcome = pipeline().process("ProductX $200\ndb\n9");
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped_lines, 1);
        assert_eq!(outcome.records[0].capacity, "9");
        // The malformed line did not disturb the active context.
        assert_eq!(outcome.records[0].name, "ProductX");
    }

    #[test]
    fn test_idempotent_with_fixed_seed() {
        let input = "vapormax triple $90\n8\n9.5x2";
        let first = pipeline().process(input);
        let second = pipeline().process(input);
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn test_code_derived_per_record() {
        let outcome = pipeline().process("924453-004 vapormax black $110\n9\n9.5");
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].code, "NI-BR_9-924453-004");
        assert_eq!(outcome.records[1].code, "NI-BR_9.5-924453-004");
    }
}
