//! yajirobe-rebalancer: command-line front end for the yajirobe engine.
//!
//! Reads target ratios and a broker holdings export, resolves fund asset
//! classes through a fund info cache, prints the allocation snapshot and
//! computes how to split a new contribution, with an audit trail.

pub mod audit;
pub mod cache;
pub mod config;
pub mod error;
pub mod holdings;
pub mod report;
pub mod target;
pub mod workflow;
