//! JSONL audit trail logging.
//!
//! Each `allocation` or `buy` run appends events to an audit.jsonl file,
//! one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use yajirobe::{AssetAllocation, BuyPlan, Holding};

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

/// Log the start of a run and its inputs.
pub fn log_run_started(
    audit: &mut AuditLog,
    command: &str,
    target_file: &Path,
    holdings_file: &Path,
) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "command": command,
            "target_file": target_file.display().to_string(),
            "holdings_file": holdings_file.display().to_string(),
        }),
    )
}

/// Log the resolved holdings.
pub fn log_holdings(audit: &mut AuditLog, holdings: &[Holding]) -> Result<()> {
    let data: Vec<_> = holdings
        .iter()
        .map(|h| {
            serde_json::json!({
                "code": h.code,
                "kind": format!("{:?}", h.kind).to_lowercase(),
                "class": h.asset_class.id(),
                "qty": h.quantity,
                "current": h.current_value,
            })
        })
        .collect();

    audit.log("holdings_loaded", serde_json::json!({ "holdings": data }))
}

/// Log the per-class snapshot.
pub fn log_allocation(audit: &mut AuditLog, allocation: &AssetAllocation) -> Result<()> {
    let classes: Vec<_> = allocation
        .iter()
        .map(|d| {
            serde_json::json!({
                "class": d.class.id(),
                "current": d.current_value,
                "target_ratio": d.target_ratio,
                "actual_ratio": d.actual_ratio,
                "diff": d.diff,
            })
        })
        .collect();

    audit.log(
        "allocation_computed",
        serde_json::json!({
            "acquisition": allocation.acquisition_value(),
            "current": allocation.current_value(),
            "classes": classes,
        }),
    )
}

/// Log a computed buy plan.
pub fn log_buy_plan(audit: &mut AuditLog, plan: &BuyPlan) -> Result<()> {
    let amounts: Vec<_> = plan
        .iter()
        .map(|(class, amount)| serde_json::json!({ "class": class.id(), "amount": amount }))
        .collect();

    audit.log(
        "buy_plan_computed",
        serde_json::json!({
            "contribution": plan.contribution(),
            "amounts": amounts,
        }),
    )
}

/// Log run completion.
pub fn log_run_completed(audit: &mut AuditLog, positions: usize, classes: usize) -> Result<()> {
    audit.log(
        "run_completed",
        serde_json::json!({
            "positions": positions,
            "classes": classes,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_log_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_audit.jsonl");

        {
            let mut log = AuditLog::open(&path).unwrap();
            log.log_simple("test_event").unwrap();
            log.log("test_data", serde_json::json!({"key": "value"}))
                .unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        // Each line should be valid JSON
        for line in &lines {
            let _: serde_json::Value = serde_json::from_str(line).unwrap();
        }

        // First line should have "test_event"
        assert!(lines[0].contains("\"event\":\"test_event\""));
    }

    #[test]
    fn audit_log_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subdir").join("deep").join("audit.jsonl");

        let mut log = AuditLog::open(&path).unwrap();
        log.log_simple("test").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn buy_plan_event_lists_amounts_in_order() {
        use yajirobe::{AllocationTarget, AssetClass, unify};

        let holdings = vec![
            Holding::stock("A", "a", 200, 1.0, 1.0, AssetClass::DomesticStocks),
            Holding::stock("B", "b", 200, 1.0, 1.0, AssetClass::EmergingStocks),
        ];
        let targets: AllocationTarget = [
            (AssetClass::DomesticStocks, 0.5),
            (AssetClass::EmergingStocks, 0.5),
        ]
        .into_iter()
        .collect();
        let allocation = AssetAllocation::aggregate(&unify(&holdings), &targets);
        let plan = allocation.rebalancing_buy(10.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        {
            let mut log = AuditLog::open(&path).unwrap();
            log_allocation(&mut log, &allocation).unwrap();
            log_buy_plan(&mut log, &plan).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["event"], "allocation_computed");
        assert_eq!(lines[0]["current"], 400.0);
        assert_eq!(lines[1]["event"], "buy_plan_computed");
        assert_eq!(lines[1]["contribution"], 10.0);
        assert_eq!(lines[1]["amounts"][0]["class"], "domestic-stocks");
        assert_eq!(lines[1]["amounts"][0]["amount"], 5.0);
        assert_eq!(lines[1]["amounts"][1]["class"], "emerging-stocks");
    }
}
