//! Holding records: single stock or fund positions as reported by a broker.

use std::collections::BTreeMap;

use crate::asset_class::AssetClass;
use crate::error::HoldingError;

/// Whether a holding is a listed equity or an investment fund.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HoldingKind {
    Stock,
    Fund,
}

/// Quoting convention for unit prices.
///
/// Stocks are quoted per share. Japanese investment trusts publish their NAV
/// per 10,000 units, so a fund's value is `unit_price * quantity / 10_000`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Quote {
    PerUnit,
    PerTenThousand,
}

impl Quote {
    /// Number of units one quoted price covers.
    #[inline]
    pub fn scale(self) -> f64 {
        match self {
            Quote::PerUnit => 1.0,
            Quote::PerTenThousand => 10_000.0,
        }
    }
}

/// A single stock or fund position.
///
/// Values are in the account currency. `acquisition_value` and
/// `current_value` are stored rather than recomputed so that importers can
/// carry the broker's own figures.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Holding {
    pub kind: HoldingKind,
    /// Ticker for stocks, association code for funds
    pub code: String,
    pub name: String,
    pub quantity: u64,
    pub quote: Quote,
    pub asset_class: AssetClass,
    pub acquisition_unit_price: f64,
    pub current_unit_price: f64,
    pub acquisition_value: f64,
    pub current_value: f64,
}

impl Holding {
    /// A stock position quoted per share.
    pub fn stock(
        code: impl Into<String>,
        name: impl Into<String>,
        quantity: u64,
        acquisition_unit_price: f64,
        current_unit_price: f64,
        asset_class: AssetClass,
    ) -> Self {
        Self::priced(
            HoldingKind::Stock,
            Quote::PerUnit,
            code.into(),
            name.into(),
            quantity,
            acquisition_unit_price,
            current_unit_price,
            asset_class,
        )
    }

    /// A fund position quoted per 10,000 units.
    pub fn fund(
        code: impl Into<String>,
        name: impl Into<String>,
        quantity: u64,
        acquisition_unit_price: f64,
        current_unit_price: f64,
        asset_class: AssetClass,
    ) -> Self {
        Self::priced(
            HoldingKind::Fund,
            Quote::PerTenThousand,
            code.into(),
            name.into(),
            quantity,
            acquisition_unit_price,
            current_unit_price,
            asset_class,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn priced(
        kind: HoldingKind,
        quote: Quote,
        code: String,
        name: String,
        quantity: u64,
        acquisition_unit_price: f64,
        current_unit_price: f64,
        asset_class: AssetClass,
    ) -> Self {
        let units = quantity as f64 / quote.scale();
        Self {
            kind,
            code,
            name,
            quantity,
            quote,
            asset_class,
            acquisition_unit_price,
            current_unit_price,
            acquisition_value: acquisition_unit_price * units,
            current_value: current_unit_price * units,
        }
    }

    /// Unrealized profit or loss.
    #[inline]
    pub fn profit_and_loss(&self) -> f64 {
        self.current_value - self.acquisition_value
    }

    /// Unrealized P&L as a fraction of acquisition value; 0 when nothing was paid.
    pub fn profit_and_loss_ratio(&self) -> f64 {
        if self.acquisition_value == 0.0 {
            return 0.0;
        }
        self.profit_and_loss() / self.acquisition_value
    }

    /// Reject records an importer should never hand to the engine.
    pub fn validate(&self) -> Result<(), HoldingError> {
        if self.code.trim().is_empty() {
            return Err(HoldingError::EmptyCode);
        }
        let fields = [
            ("acquisition unit price", self.acquisition_unit_price),
            ("current unit price", self.current_unit_price),
            ("acquisition value", self.acquisition_value),
            ("current value", self.current_value),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(HoldingError::NonFinite {
                    code: self.code.clone(),
                    field,
                });
            }
            if value < 0.0 {
                return Err(HoldingError::Negative {
                    code: self.code.clone(),
                    field,
                });
            }
        }
        Ok(())
    }

    /// Re-express a stock as a per-10,000-unit fund of the given class.
    ///
    /// Values are carried over unchanged so the synthetic record merges
    /// cleanly with a fund that shares its code.
    pub fn to_synthetic_fund(&self, asset_class: AssetClass) -> Holding {
        let rescale = Quote::PerTenThousand.scale() / self.quote.scale();
        Holding {
            kind: HoldingKind::Fund,
            code: self.code.clone(),
            name: self.name.clone(),
            quantity: self.quantity,
            quote: Quote::PerTenThousand,
            asset_class,
            acquisition_unit_price: self.acquisition_unit_price * rescale,
            current_unit_price: self.current_unit_price * rescale,
            acquisition_value: self.acquisition_value,
            current_value: self.current_value,
        }
    }
}

/// Listed stocks that track a fund and are allocated as one.
///
/// Keyed by stock code. The default map covers the Nikko foreign-equity ETF
/// (1680), which holds the same index as the MAXIS/eMAXIS funds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EtfMap(BTreeMap<String, AssetClass>);

impl EtfMap {
    /// An empty map: no stock is treated as a fund.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, code: impl Into<String>, class: AssetClass) {
        self.0.insert(code.into(), class);
    }

    pub fn get(&self, code: &str) -> Option<AssetClass> {
        self.0.get(code).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AssetClass)> {
        self.0.iter().map(|(code, &class)| (code.as_str(), class))
    }
}

impl Default for EtfMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.insert("1680", AssetClass::InternationalStocks);
        map
    }
}

impl<S: Into<String>> FromIterator<(S, AssetClass)> for EtfMap {
    fn from_iter<I: IntoIterator<Item = (S, AssetClass)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The holdings that take part in allocation, in input order.
///
/// Funds pass through. A stock listed in `etfs` is replaced by its synthetic
/// fund so it lands in the same bucket as the fund sharing its code. Other
/// stocks are left out: they are reported, never allocated.
pub fn allocation_inputs(holdings: &[Holding], etfs: &EtfMap) -> Vec<Holding> {
    holdings
        .iter()
        .filter_map(|h| match (h.kind, etfs.get(&h.code)) {
            (HoldingKind::Fund, _) => Some(h.clone()),
            (HoldingKind::Stock, Some(class)) => Some(h.to_synthetic_fund(class)),
            (HoldingKind::Stock, None) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_values_are_per_share() {
        let s = Holding::stock("7203", "Toyota", 100, 2_000.0, 2_500.0, AssetClass::DomesticStocks);
        assert_eq!(s.acquisition_value, 200_000.0);
        assert_eq!(s.current_value, 250_000.0);
        assert_eq!(s.profit_and_loss(), 50_000.0);
        assert_eq!(s.profit_and_loss_ratio(), 0.25);
    }

    #[test]
    fn fund_values_are_per_ten_thousand_units() {
        let f = Holding::fund(
            "0331418A",
            "eMAXIS Slim",
            250_000,
            10_000.0,
            12_000.0,
            AssetClass::InternationalStocks,
        );
        assert_eq!(f.acquisition_value, 250_000.0);
        assert_eq!(f.current_value, 300_000.0);
        assert_eq!(f.quote, Quote::PerTenThousand);
    }

    #[test]
    fn pl_ratio_guards_zero_acquisition() {
        let f = Holding::fund("X", "gift", 100, 0.0, 10_000.0, AssetClass::Other);
        assert_eq!(f.profit_and_loss_ratio(), 0.0);
    }

    #[test]
    fn validate_rejects_bad_records() {
        let ok = Holding::stock("1680", "ETF", 10, 1_000.0, 1_100.0, AssetClass::DomesticStocks);
        assert!(ok.validate().is_ok());

        let mut empty = ok.clone();
        empty.code = "  ".into();
        assert_eq!(empty.validate(), Err(HoldingError::EmptyCode));

        let mut nan = ok.clone();
        nan.current_value = f64::NAN;
        assert!(matches!(nan.validate(), Err(HoldingError::NonFinite { .. })));

        let mut neg = ok;
        neg.acquisition_unit_price = -1.0;
        assert!(matches!(neg.validate(), Err(HoldingError::Negative { .. })));
    }

    #[test]
    fn synthetic_fund_keeps_values_and_rescales_prices() {
        let etf = Holding::stock("1680", "ETF", 10, 1_000.0, 1_100.0, AssetClass::DomesticStocks);
        let fund = etf.to_synthetic_fund(AssetClass::InternationalStocks);
        assert_eq!(fund.kind, HoldingKind::Fund);
        assert_eq!(fund.asset_class, AssetClass::InternationalStocks);
        assert_eq!(fund.acquisition_unit_price, 10_000_000.0);
        assert_eq!(fund.current_unit_price, 11_000_000.0);
        assert_eq!(fund.acquisition_value, etf.acquisition_value);
        assert_eq!(fund.current_value, etf.current_value);
    }

    #[test]
    fn allocation_inputs_keeps_funds_and_mapped_etfs_only() {
        let holdings = vec![
            Holding::stock("1680", "ETF", 10, 1_000.0, 1_100.0, AssetClass::DomesticStocks),
            Holding::stock("7203", "Toyota", 100, 2_000.0, 2_500.0, AssetClass::DomesticStocks),
            Holding::fund("1680", "Fund", 10_000, 10_000.0, 10_000.0, AssetClass::InternationalStocks),
        ];
        let inputs = allocation_inputs(&holdings, &EtfMap::default());
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].kind, HoldingKind::Fund);
        assert_eq!(inputs[0].asset_class, AssetClass::InternationalStocks);
        assert_eq!(inputs[1], holdings[2]);
        assert!(inputs.iter().all(|h| h.code != "7203"));
    }

    #[test]
    fn etf_map_from_iter() {
        let map: EtfMap = [("1680", AssetClass::InternationalStocks), ("1681", AssetClass::EmergingStocks)]
            .into_iter()
            .collect();
        assert_eq!(map.iter().count(), 2);
        assert_eq!(map.get("1681"), Some(AssetClass::EmergingStocks));
        assert_eq!(map.get("9999"), None);
        assert_eq!(EtfMap::empty().iter().count(), 0);
    }
}
