//! # yajirobe
//!
//! Portfolio aggregation by asset class and buy-only rebalancing of new
//! contributions.
//!
//! ## Pipeline
//!
//! - **Classify**: map a fund's free-text category to an [`AssetClass`]
//! - **Unify**: merge holdings that share an instrument code (the same fund in
//!   several accounts, or an ETF mirroring a fund) into one position
//! - **Aggregate**: group positions by class and compare against target ratios
//! - **Rebalance**: split a new contribution across underweight classes,
//!   never selling, with amounts that sum exactly to the contribution
//!
//! ## Quick Start
//!
//! ```
//! use yajirobe::{AllocationTarget, AssetAllocation, AssetClass, EtfMap, Holding, unify_portfolio};
//!
//! let holdings = vec![
//!     Holding::fund("EM01", "Emerging index", 10_000, 200.0, 200.0, AssetClass::EmergingStocks),
//!     Holding::fund("JP01", "TOPIX index", 10_000, 200.0, 200.0, AssetClass::DomesticStocks),
//!     Holding::fund("WD01", "World index", 10_000, 600.0, 600.0, AssetClass::InternationalStocks),
//! ];
//!
//! let targets: AllocationTarget = [
//!     (AssetClass::EmergingStocks, 0.25),
//!     (AssetClass::DomesticStocks, 0.30),
//!     (AssetClass::InternationalStocks, 0.45),
//! ]
//! .into_iter()
//! .collect();
//!
//! let unified = unify_portfolio(&holdings, &EtfMap::default());
//! let allocation = AssetAllocation::aggregate(&unified, &targets);
//! assert_eq!(allocation.current_value(), 1000.0);
//!
//! let plan = allocation.rebalancing_buy(100.0);
//! assert_eq!(plan.get(AssetClass::EmergingStocks), Some(37.0));
//! assert_eq!(plan.get(AssetClass::DomesticStocks), Some(63.0));
//! assert_eq!(plan.get(AssetClass::InternationalStocks), None);
//! assert_eq!(plan.total(), 100.0);
//! ```
//!
//! ## Determinism
//!
//! Everything that iterates asset classes walks [`AssetClass::CANONICAL`];
//! positions are keyed by code in a sorted map. Identical inputs give
//! bit-identical totals, and the rounding residual of a buy plan always lands
//! on the same class.
//!
//! ## Quoting
//!
//! Stocks are priced per share and funds per 10,000 units (see [`Quote`]).
//! Unit prices of merged positions are re-derived in the first holding's
//! convention; value fields are plain sums.

pub mod allocation;
pub mod asset_class;
mod error;
pub mod holding;
pub mod rebalance;
pub mod unify;

pub use allocation::{AllocationTarget, AssetAllocation, AssetClassDetail};
pub use asset_class::{AssetClass, classify};
pub use error::{HoldingError, ParseAssetClassError};
pub use holding::{EtfMap, Holding, HoldingKind, Quote, allocation_inputs};
pub use rebalance::{BuyPlan, rebalancing_buy, round_half_even};
pub use unify::{UnifiedPosition, UnifiedPositions, unify, unify_portfolio};
