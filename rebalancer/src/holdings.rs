//! Holdings file (holdings.json) loading and conversion to engine holdings.
//!
//! The file is the broker export: stocks with their asset class (domestic
//! stocks unless stated), and funds whose class is resolved through the
//! [`FundInfoCache`], falling back to classifying the category text.

use std::path::Path;

use log::info;
use serde::Deserialize;
use yajirobe::{AssetClass, Holding, classify};

use crate::cache::{FundInfo, FundInfoCache};
use crate::error::{Error, Result};

/// Raw holdings as exported from the broker.
#[derive(Debug, Clone, Deserialize)]
pub struct HoldingsFile {
    #[serde(default)]
    pub stocks: Vec<StockRecord>,
    #[serde(default)]
    pub funds: Vec<FundRecord>,
}

/// A stock line: prices per share.
#[derive(Debug, Clone, Deserialize)]
pub struct StockRecord {
    pub code: String,
    pub name: String,
    pub quantity: u64,
    pub acquisition_unit_price: f64,
    pub current_unit_price: f64,
    #[serde(default = "default_stock_class")]
    pub class: AssetClass,
}

fn default_stock_class() -> AssetClass {
    AssetClass::DomesticStocks
}

/// A fund line: prices per 10,000 units.
#[derive(Debug, Clone, Deserialize)]
pub struct FundRecord {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: u64,
    pub acquisition_unit_price: f64,
    pub current_unit_price: f64,
    /// Broker category text, classified when the cache has no entry
    #[serde(default)]
    pub category: Option<String>,
}

impl HoldingsFile {
    /// Load and validate a holdings.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::HoldingsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: HoldingsFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        if self.stocks.is_empty() && self.funds.is_empty() {
            return Err(Error::Holdings("no stocks or funds".into()));
        }
        let codes = self
            .stocks
            .iter()
            .map(|s| &s.code)
            .chain(self.funds.iter().map(|f| &f.code));
        for code in codes {
            if code.trim().is_empty() {
                return Err(Error::Holdings("empty instrument code".into()));
            }
        }
        Ok(())
    }

    /// Stock lines as engine holdings.
    pub fn stock_holdings(&self) -> Result<Vec<Holding>> {
        self.stocks
            .iter()
            .map(|s| {
                let h = Holding::stock(
                    s.code.clone(),
                    s.name.clone(),
                    s.quantity,
                    s.acquisition_unit_price,
                    s.current_unit_price,
                    s.class,
                );
                h.validate()?;
                Ok(h)
            })
            .collect()
    }

    /// Every line as an engine holding, funds first, with fund classes
    /// resolved through `cache`.
    pub fn resolve(&self, cache: &mut dyn FundInfoCache) -> Result<Vec<Holding>> {
        let mut holdings = Vec::with_capacity(self.funds.len() + self.stocks.len());
        for record in &self.funds {
            holdings.push(resolve_fund(record, cache)?);
        }
        holdings.extend(self.stock_holdings()?);

        info!(
            "loaded {} funds and {} stocks",
            self.funds.len(),
            self.stocks.len()
        );
        Ok(holdings)
    }
}

fn resolve_fund(record: &FundRecord, cache: &mut dyn FundInfoCache) -> Result<Holding> {
    let info = cache.get_or_find(&record.code, &mut |code: &str| match &record.category {
        Some(category) => Ok(FundInfo {
            code: code.to_string(),
            class: classify(category),
            name: record.name.clone().unwrap_or_default(),
        }),
        None => Err(Error::FundInfoMissing(code.to_string())),
    })?;

    let name = record.name.clone().unwrap_or(info.name);
    let holding = Holding::fund(
        record.code.clone(),
        name,
        record.quantity,
        record.acquisition_unit_price,
        record.current_unit_price,
        info.class,
    );
    holding.validate()?;
    Ok(holding)
}
