//! Run orchestration: load inputs -> unify -> aggregate -> report/buy plan.
//!
//! This is the workflow behind each CLI command.

use std::path::Path;

use log::info;
use yajirobe::{AssetAllocation, AssetClass, BuyPlan, Holding, unify_portfolio};

use crate::audit::{self, AuditLog};
use crate::cache::{FileCache, FundInfo, FundInfoCache, MemoryCache};
use crate::config::{CacheBackend, Config};
use crate::error::{Error, Result};
use crate::holdings::HoldingsFile;
use crate::report::{AllocationReport, BuyPlanReport, StocksReport};
use crate::target::TargetSpec;

/// Open the fund info cache selected by the config.
pub fn open_cache(config: &Config) -> Result<Box<dyn FundInfoCache>> {
    match config.cache.backend {
        CacheBackend::Memory => Ok(Box::new(MemoryCache::new())),
        CacheBackend::File => {
            let dir = config.cache_dir()?;
            info!("fund info cache: {}", dir.display());
            Ok(Box::new(FileCache::new(dir)))
        }
    }
}

/// Reject contributions the allocator would turn into an empty plan.
pub fn validate_contribution(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::Contribution(amount))
    }
}

/// Holdings and their allocation snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub holdings: Vec<Holding>,
    pub allocation: AssetAllocation,
}

/// Resolve the holdings file and aggregate it against `target`.
pub fn build_snapshot(
    config: &Config,
    target: &TargetSpec,
    holdings: &HoldingsFile,
    cache: &mut dyn FundInfoCache,
) -> Result<Snapshot> {
    let holdings = holdings.resolve(cache)?;
    let unified = unify_portfolio(&holdings, &config.etf_map());
    let allocation = AssetAllocation::aggregate(&unified, &target.as_allocation_target());
    info!(
        "{} holdings -> {} positions in {} classes, current value {:.0}",
        holdings.len(),
        unified.len(),
        allocation.len(),
        allocation.current_value()
    );
    Ok(Snapshot {
        holdings,
        allocation,
    })
}

fn open_audit(config: &Config) -> Result<Option<AuditLog>> {
    if !config.logging.enabled {
        return Ok(None);
    }
    Ok(Some(AuditLog::open(&config.audit_path())?))
}

/// Load both input files, build the snapshot and record it in the audit
/// trail.
fn load_and_aggregate(
    config: &Config,
    command: &str,
    target_file: &Path,
    holdings_file: &Path,
    audit: &mut Option<AuditLog>,
) -> Result<Snapshot> {
    if let Some(log) = audit.as_mut() {
        audit::log_run_started(log, command, target_file, holdings_file)?;
    }

    let target = TargetSpec::load(target_file)?;
    let holdings = HoldingsFile::load(holdings_file)?;
    let mut cache = open_cache(config)?;
    let snapshot = build_snapshot(config, &target, &holdings, cache.as_mut())?;

    if let Some(log) = audit.as_mut() {
        audit::log_holdings(log, &snapshot.holdings)?;
        audit::log_allocation(log, &snapshot.allocation)?;
    }
    Ok(snapshot)
}

fn finish(audit: &mut Option<AuditLog>, snapshot: &Snapshot) -> Result<()> {
    if let Some(log) = audit.as_mut() {
        audit::log_run_completed(log, snapshot.holdings.len(), snapshot.allocation.len())?;
    }
    Ok(())
}

/// `allocation`: print the allocation table and the stock list.
pub fn run_allocation(config: &Config, target_file: &Path, holdings_file: &Path) -> Result<Snapshot> {
    let mut audit = open_audit(config)?;
    let snapshot = load_and_aggregate(config, "allocation", target_file, holdings_file, &mut audit)?;

    print!("{}", AllocationReport(&snapshot.allocation));
    println!();
    print!("{}", StocksReport(&snapshot.holdings));

    finish(&mut audit, &snapshot)?;
    Ok(snapshot)
}

/// `buy`: print the allocation table and the plan for `amount`.
pub fn run_buy(
    config: &Config,
    target_file: &Path,
    holdings_file: &Path,
    amount: f64,
) -> Result<BuyPlan> {
    let amount = validate_contribution(amount)?;
    let mut audit = open_audit(config)?;
    let snapshot = load_and_aggregate(config, "buy", target_file, holdings_file, &mut audit)?;

    let plan = snapshot.allocation.rebalancing_buy(amount);
    info!("buy plan: {} classes for {amount:.0}", plan.len());

    print!("{}", AllocationReport(&snapshot.allocation));
    println!();
    print!("{}", BuyPlanReport(&plan));

    if let Some(log) = audit.as_mut() {
        if plan.is_empty() {
            log.log_simple("no_underweight_class")?;
        } else {
            audit::log_buy_plan(log, &plan)?;
        }
    }
    finish(&mut audit, &snapshot)?;
    Ok(plan)
}

/// `cache get`: cached info for one fund.
pub fn cache_get(config: &Config, code: &str) -> Result<Option<FundInfo>> {
    open_cache(config)?.get(code)
}

/// `cache set`: store or overwrite one fund's class.
pub fn cache_set(config: &Config, code: &str, class: AssetClass, name: &str) -> Result<FundInfo> {
    let info = FundInfo {
        code: code.to_string(),
        class,
        name: name.to_string(),
    };
    open_cache(config)?.set(&info)?;
    info!("cached {code} as {}", class.id());
    Ok(info)
}
