use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::PricePolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub sheets: SheetsConfig,
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub api_base_url: String,
    /// Bearer token for the sheets API; the SHEETS_ACCESS_TOKEN environment
    /// variable takes precedence when set.
    pub access_token: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Manufacturer assumed when none can be inferred from the header name.
    pub default_manufacturer: String,
    /// Brand names matched (case-insensitively) against header name words to
    /// infer the manufacturer.
    pub known_brands: Vec<String>,
    /// Region tag used in composite catalog codes.
    pub region_tag: String,
    /// When true, a partial damage count splits a variant into an undamaged
    /// record and a damaged record instead of annotating a single record.
    pub damage_split: bool,
    /// Fixed seed for synthesized SKUs; random when unset.
    pub sku_seed: Option<u64>,
}

/// One spreadsheet destination rows are appended to. The live header row of
/// the worksheet decides which record fields are written, in which order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    #[serde(default)]
    pub price_format: PricePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            sheets: SheetsConfig {
                api_base_url: "https://sheets.googleapis.com".to_string(),
                access_token: None,
                request_timeout_secs: 30,
            },
            pipeline: PipelineConfig {
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
                sku_seed: None,
            },
            destinations: vec![Destination {
                name: "inventory".to_string(),
                spreadsheet_id: String::new(),
                worksheet: "Sheet1".to_string(),
                price_format: PricePolicy::Stripped,
            }],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }

    /// Resolved sheets API token: environment variable first, config second.
    pub fn sheets_token(&self) -> Option<String> {
        std::env::var("SHEETS_ACCESS_TOKEN")
            .ok()
            .or_else(|| self.sheets.access_token.clone())
    }
}
