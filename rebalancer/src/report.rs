//! Text tables for the terminal: allocation snapshot, stock list, buy plan.

use std::fmt;

use yajirobe::{AssetAllocation, BuyPlan, Holding, HoldingKind};

/// Allocation table: portfolio totals, then one row per class.
pub struct AllocationReport<'a>(pub &'a AssetAllocation);

impl fmt::Display for AllocationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allocation = self.0;
        writeln!(f, "ASSET ALLOCATION:")?;
        writeln!(
            f,
            "  {:22} {:>8} {:>8} {:>14} {:>14} {:>8}",
            "Class", "Target%", "Actual%", "Current", "Diff", "P/L%"
        )?;
        writeln!(
            f,
            "  {:22} {:>8} {:>8} {:>14.0} {:>14} {:>+7.2}%",
            "Total",
            "",
            "",
            allocation.current_value(),
            "",
            allocation.profit_loss_ratio() * 100.0,
        )?;
        for d in allocation.iter() {
            writeln!(
                f,
                "  {:22} {:>7.2}% {:>7.2}% {:>14.0} {:>+14.0} {:>+7.2}%",
                d.class,
                d.target_ratio * 100.0,
                d.actual_ratio * 100.0,
                d.current_value,
                d.diff,
                d.profit_loss_ratio * 100.0,
            )?;
        }
        Ok(())
    }
}

/// Stock holdings with their current value and profit or loss.
pub struct StocksReport<'a>(pub &'a [Holding]);

impl fmt::Display for StocksReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stocks: Vec<&Holding> = self
            .0
            .iter()
            .filter(|h| h.kind == HoldingKind::Stock)
            .collect();
        if stocks.is_empty() {
            return writeln!(f, "No stocks.");
        }

        writeln!(f, "STOCKS:")?;
        writeln!(
            f,
            "  {:8} {:24} {:>8} {:>14} {:>14} {:>8}",
            "Code", "Name", "Qty", "Current", "P/L", "P/L%"
        )?;
        for h in stocks {
            writeln!(
                f,
                "  {:8} {:24} {:>8} {:>14.0} {:>+14.0} {:>+7.2}%",
                h.code,
                h.name,
                h.quantity,
                h.current_value,
                h.profit_and_loss(),
                h.profit_and_loss_ratio() * 100.0,
            )?;
        }
        Ok(())
    }
}

/// Amount to buy per class.
pub struct BuyPlanReport<'a>(pub &'a BuyPlan);

impl fmt::Display for BuyPlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        if plan.is_empty() {
            return writeln!(
                f,
                "No underweight class; nothing to buy with {:.0}.",
                plan.contribution()
            );
        }

        writeln!(f, "BUY PLAN ({:.0}):", plan.contribution())?;
        for (class, amount) in plan.iter() {
            writeln!(f, "  {:22} {:>14.0}", class, amount)?;
        }
        writeln!(f, "  {:22} {:>14.0}", "Total", plan.total())?;
        Ok(())
    }
}
