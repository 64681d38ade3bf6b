use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use super::{Destination, DestinationCatalog, DestinationId};
use crate::workflows::pricing::{DiscountRates, FeeSchedule, FeeScheduleError};

/// Errors raised while loading destinations from a CSV export.
#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse destination export: {0}")]
    Csv(#[from] csv::Error),
    #[error("destination {id} has an invalid fee schedule: {source}")]
    InvalidFees {
        id: String,
        #[source]
        source: FeeScheduleError,
    },
}

impl DestinationCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogImportError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Load destinations from a CSV export with one row per destination. List columns use `|`
    /// as separator; blank optional columns fall back to defaults.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut destinations = Vec::new();
        for record in csv_reader.deserialize::<DestinationRow>() {
            let destination = record?.into_destination();
            destination
                .fees
                .validate()
                .map_err(|source| CatalogImportError::InvalidFees {
                    id: destination.id.0.clone(),
                    source,
                })?;
            destinations.push(destination);
        }

        Ok(Self::new(destinations))
    }
}

#[derive(Debug, Deserialize)]
struct DestinationRow {
    id: String,
    name: String,
    visa_type: String,
    base_price: f64,
    registration_fee: f64,
    vat_percent: f64,
    #[serde(default = "default_allow_installments", deserialize_with = "blank_as_true")]
    allow_installments: bool,
    #[serde(default, deserialize_with = "blank_as_zero")]
    discount_full: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    discount_couple: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    discount_reference: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    discount_group: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    discount_skilled: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    discount_custom: f64,
    #[serde(default)]
    custom_discount_name: String,
    #[serde(default, deserialize_with = "pipe_separated")]
    timeline: Vec<String>,
    #[serde(default, deserialize_with = "pipe_separated")]
    docs_app_stage: Vec<String>,
    #[serde(default, deserialize_with = "pipe_separated")]
    docs_embassy_stage: Vec<String>,
}

fn default_allow_installments() -> bool {
    true
}

impl DestinationRow {
    fn into_destination(self) -> Destination {
        Destination {
            id: DestinationId(self.id),
            name: self.name,
            visa_type: self.visa_type,
            fees: FeeSchedule {
                base_price: self.base_price,
                registration_fee: self.registration_fee,
                vat_percent: self.vat_percent,
                discounts: DiscountRates {
                    full: self.discount_full,
                    couple: self.discount_couple,
                    reference: self.discount_reference,
                    group: self.discount_group,
                    skilled: self.discount_skilled,
                    custom: self.discount_custom,
                },
            },
            allow_installments: self.allow_installments,
            custom_discount_name: self.custom_discount_name,
            timeline: self.timeline,
            docs_app_stage: self.docs_app_stage,
            docs_embassy_stage: self.docs_embassy_stage,
        }
    }
}

fn blank_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

fn pipe_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|value| {
            value
                .split('|')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}
