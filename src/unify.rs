//! Holding unification: one aggregate position per instrument code.
//!
//! The same fund is often held in several accounts (taxable, NISA, iDeCo) or
//! reported twice when an ETF mirrors it. Unification folds every holding
//! sharing a code into a single [`UnifiedPosition`] whose value fields are the
//! exact sums of its sources.

use std::collections::BTreeMap;

use crate::asset_class::AssetClass;
use crate::holding::{EtfMap, Holding, Quote, allocation_inputs};

/// Unified positions keyed by instrument code (sorted, so folds are ordered).
pub type UnifiedPositions = BTreeMap<String, UnifiedPosition>;

/// All holdings sharing one instrument code, merged.
///
/// Name, asset class and quoting convention come from the first source seen.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnifiedPosition {
    pub code: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub quote: Quote,
    pub quantity: u64,
    /// Weighted average acquisition price, in the position's quoting convention
    pub acquisition_unit_price: f64,
    /// Weighted average current price, in the position's quoting convention
    pub current_unit_price: f64,
    pub acquisition_value: f64,
    pub current_value: f64,
    /// Contributing holdings, in input order
    pub sources: Vec<Holding>,
}

impl UnifiedPosition {
    /// Seed a position from its first holding.
    pub fn new(seed: &Holding) -> Self {
        Self {
            code: seed.code.clone(),
            name: seed.name.clone(),
            asset_class: seed.asset_class,
            quote: seed.quote,
            quantity: seed.quantity,
            acquisition_unit_price: seed.acquisition_unit_price,
            current_unit_price: seed.current_unit_price,
            acquisition_value: seed.acquisition_value,
            current_value: seed.current_value,
            sources: vec![seed.clone()],
        }
    }

    /// Fold another holding with the same code into this position.
    ///
    /// Quantities and values are summed; unit prices are re-derived from the
    /// new totals. An all-zero quantity leaves unit prices at zero.
    pub fn merge(mut self, other: &Holding) -> Self {
        debug_assert_eq!(self.code, other.code);

        self.quantity += other.quantity;
        self.acquisition_value += other.acquisition_value;
        self.current_value += other.current_value;

        let (aunit, cunit) = if self.quantity == 0 {
            (0.0, 0.0)
        } else {
            let per_quote = self.quote.scale() / self.quantity as f64;
            (
                self.acquisition_value * per_quote,
                self.current_value * per_quote,
            )
        };
        self.acquisition_unit_price = aunit;
        self.current_unit_price = cunit;

        self.sources.push(other.clone());
        self
    }

    /// Unrealized profit or loss across all sources.
    #[inline]
    pub fn profit_and_loss(&self) -> f64 {
        self.current_value - self.acquisition_value
    }
}

/// Merge holdings sharing an instrument code, visiting them in input order.
pub fn unify(holdings: &[Holding]) -> UnifiedPositions {
    holdings.iter().fold(UnifiedPositions::new(), |mut acc, h| {
        let merged = match acc.remove(&h.code) {
            Some(existing) => existing.merge(h),
            None => UnifiedPosition::new(h),
        };
        acc.insert(h.code.clone(), merged);
        acc
    })
}

/// Unify the allocation inputs of a raw holdings list: funds, plus the
/// synthetic funds standing in for stocks listed in `etfs`. Other stocks are
/// left out.
pub fn unify_portfolio(holdings: &[Holding], etfs: &EtfMap) -> UnifiedPositions {
    unify(&allocation_inputs(holdings, etfs))
}
