//! Rebalancing buy: split a new contribution across underweight asset classes
//! without selling anything.
//!
//! Worked example, portfolio of 1,000 with a contribution of 100:
//!
//! | class         | target | target value (1,100) | current | shortfall | buy |
//! |---------------|--------|----------------------|---------|-----------|-----|
//! | emerging      | 25%    | 275                  | 200     | -75       | 37  |
//! | domestic      | 30%    | 330                  | 200     | -130      | 63  |
//! | international | 45%    | 495                  | 600     | +105      | -   |
//!
//! Each underweight class receives `shortfall / total_shortfall * contribution`
//! rounded half-to-even; any rounding residual is absorbed by the first class
//! in canonical order that received a non-zero share.

use crate::allocation::AssetAllocation;
use crate::asset_class::AssetClass;

/// Round to the nearest integer, ties to even (banker's rounding).
///
/// `0.5 -> 0`, `1.5 -> 2`, `2.5 -> 2`, `-1.5 -> -2`.
#[inline]
pub fn round_half_even(x: f64) -> f64 {
    x.round_ties_even()
}

/// Amounts to buy per asset class, in canonical order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuyPlan {
    contribution: f64,
    amounts: Vec<(AssetClass, f64)>,
}

impl BuyPlan {
    fn empty(contribution: f64) -> Self {
        Self {
            contribution,
            amounts: Vec::new(),
        }
    }

    /// The contribution this plan splits.
    #[inline]
    pub fn contribution(&self) -> f64 {
        self.contribution
    }

    /// Amount assigned to `class`, if it is underweight.
    pub fn get(&self, class: AssetClass) -> Option<f64> {
        self.amounts
            .iter()
            .find(|(c, _)| *c == class)
            .map(|&(_, amount)| amount)
    }

    /// `(class, amount)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        self.amounts.iter().copied()
    }

    /// Sum of all amounts; equals [`contribution`](Self::contribution) for a
    /// non-empty plan.
    pub fn total(&self) -> f64 {
        self.amounts.iter().map(|&(_, a)| a).sum()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Split `contribution` across the classes of `allocation` that would be
/// below target once the contribution is added.
///
/// Returns an empty plan when the contribution is not a positive finite
/// amount, or when no class is underweight.
pub fn rebalancing_buy(allocation: &AssetAllocation, contribution: f64) -> BuyPlan {
    if !contribution.is_finite() || contribution <= 0.0 {
        return BuyPlan::empty(contribution);
    }

    let new_total = allocation.current_value() + contribution;

    // (class, |shortfall|) for underweight classes, canonical order
    let underweight: Vec<(AssetClass, f64)> = allocation
        .iter()
        .filter_map(|d| {
            let shortfall = d.current_value - d.target_ratio * new_total;
            (shortfall < 0.0).then_some((d.class, -shortfall))
        })
        .collect();

    if underweight.is_empty() {
        return BuyPlan::empty(contribution);
    }

    let total_shortfall: f64 = underweight.iter().map(|&(_, s)| s).sum();

    let mut amounts: Vec<(AssetClass, f64)> = underweight
        .iter()
        .map(|&(class, s)| (class, round_half_even(s / total_shortfall * contribution)))
        .collect();

    let allotted: f64 = amounts.iter().map(|&(_, a)| a).sum();
    let residual = contribution - allotted;
    if residual != 0.0 {
        // First non-zero share absorbs the residual; if rounding zeroed every
        // share, the first underweight class takes it all.
        let idx = amounts.iter().position(|&(_, a)| a != 0.0).unwrap_or(0);
        amounts[idx].1 += residual;
    }

    BuyPlan {
        contribution,
        amounts,
    }
}
