//! Asset allocation: unified positions grouped by asset class and compared
//! against target ratios.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::asset_class::AssetClass;
use crate::rebalance::{self, BuyPlan};
use crate::unify::{UnifiedPosition, UnifiedPositions};

/// Target ratio per asset class. Ratios need not sum to 1; unlisted classes
/// have a target of 0.
pub type AllocationTarget = FxHashMap<AssetClass, f64>;

/// Aggregated metrics for one asset class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetClassDetail {
    pub class: AssetClass,
    pub acquisition_value: f64,
    pub current_value: f64,
    pub target_ratio: f64,
    /// Share of the portfolio's current value held in this class
    pub actual_ratio: f64,
    /// `target_ratio * portfolio current value`
    pub target_value: f64,
    /// `current_value - target_value`; negative means underweight
    pub diff: f64,
    /// `current / acquisition - 1`
    pub profit_loss_ratio: f64,
    pub positions: BTreeMap<String, UnifiedPosition>,
}

impl AssetClassDetail {
    fn seeded(class: AssetClass, target_ratio: f64) -> Self {
        Self {
            class,
            acquisition_value: 0.0,
            current_value: 0.0,
            target_ratio,
            actual_ratio: 0.0,
            target_value: 0.0,
            diff: 0.0,
            profit_loss_ratio: 0.0,
            positions: BTreeMap::new(),
        }
    }

    fn with_position(mut self, position: &UnifiedPosition) -> Self {
        self.acquisition_value += position.acquisition_value;
        self.current_value += position.current_value;
        self.positions
            .insert(position.code.clone(), position.clone());
        self
    }

    fn with_ratios(mut self, portfolio_current: f64) -> Self {
        self.actual_ratio = if portfolio_current == 0.0 {
            0.0
        } else {
            self.current_value / portfolio_current
        };
        self.target_value = self.target_ratio * portfolio_current;
        self.diff = self.current_value - self.target_value;
        self.profit_loss_ratio = if self.acquisition_value == 0.0 {
            0.0
        } else {
            self.current_value / self.acquisition_value - 1.0
        };
        self
    }
}

/// A classified snapshot of a portfolio.
///
/// Built once by [`AssetAllocation::aggregate`] and never mutated. Iteration
/// always follows [`AssetClass::CANONICAL`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetAllocation {
    acquisition_value: f64,
    current_value: f64,
    details: FxHashMap<AssetClass, AssetClassDetail>,
}

impl AssetAllocation {
    /// Group unified positions by asset class and compute ratios.
    ///
    /// Every class named in `targets` appears in the result, even with no
    /// holdings; classes held but not targeted appear with a target of 0.
    pub fn aggregate(unified: &UnifiedPositions, targets: &AllocationTarget) -> Self {
        let seeded: FxHashMap<AssetClass, AssetClassDetail> = targets
            .iter()
            .map(|(&class, &ratio)| (class, AssetClassDetail::seeded(class, ratio)))
            .collect();

        let mut folded = unified.values().fold(seeded, |mut acc, position| {
            let detail = acc
                .remove(&position.asset_class)
                .unwrap_or_else(|| AssetClassDetail::seeded(position.asset_class, 0.0));
            acc.insert(position.asset_class, detail.with_position(position));
            acc
        });

        // Portfolio totals are the class totals summed in canonical order, so
        // they equal any canonical-order sum of the details bit for bit.
        let (acquisition_value, current_value) = AssetClass::CANONICAL
            .iter()
            .filter_map(|c| folded.get(c))
            .fold((0.0, 0.0), |(a, c), d| {
                (a + d.acquisition_value, c + d.current_value)
            });

        let details = folded
            .drain()
            .map(|(class, detail)| (class, detail.with_ratios(current_value)))
            .collect();

        Self {
            acquisition_value,
            current_value,
            details,
        }
    }

    /// Total acquisition value.
    #[inline]
    pub fn acquisition_value(&self) -> f64 {
        self.acquisition_value
    }

    /// Total current value.
    #[inline]
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Portfolio-wide `current / acquisition - 1`, 0 when nothing was paid.
    pub fn profit_loss_ratio(&self) -> f64 {
        if self.acquisition_value == 0.0 {
            return 0.0;
        }
        self.current_value / self.acquisition_value - 1.0
    }

    /// Detail for one class, if it is targeted or held.
    pub fn detail(&self, class: AssetClass) -> Option<&AssetClassDetail> {
        self.details.get(&class)
    }

    /// Classes present, in canonical order.
    pub fn classes(&self) -> Vec<AssetClass> {
        self.iter().map(|d| d.class).collect()
    }

    /// Details in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetClassDetail> {
        AssetClass::CANONICAL
            .iter()
            .filter_map(|c| self.details.get(c))
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Split a new contribution across underweight classes. See
    /// [`rebalance::rebalancing_buy`].
    pub fn rebalancing_buy(&self, contribution: f64) -> BuyPlan {
        rebalance::rebalancing_buy(self, contribution)
    }
}
