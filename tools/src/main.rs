//! od-runner: headless analytics runner for the OD tracking system.
//!
//! Usage:
//!   od-runner --db odtrack.db --staff s-001 --semester 2025-ODD \
//!             --from 2025-06-01 --to 2025-11-15
//!   od-runner --db odtrack.db --summary

use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use odtrack_core::{
    config::AnalyticsConfig,
    engine::AnalyticsEngine,
    report::ReportOptions,
    store::OdStore,
    types::DateRange,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = arg_value(&args, "--db").unwrap_or_else(|| "odtrack.db".to_string());
    let seed: u64 = arg_value(&args, "--seed")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(42);
    let summary_only = args.iter().any(|a| a == "--summary");

    let config = match arg_value(&args, "--config") {
        Some(path) => AnalyticsConfig::load(&path)?,
        None => AnalyticsConfig::default(),
    };

    let store = OdStore::open(&db)?;
    store.migrate()?;
    let engine = AnalyticsEngine::new(store, config, seed);

    if summary_only {
        let summary = engine.request_summary()?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let staff_id = arg_value(&args, "--staff")
        .ok_or_else(|| anyhow::anyhow!("--staff is required (or pass --summary)"))?;
    let semester = arg_value(&args, "--semester")
        .ok_or_else(|| anyhow::anyhow!("--semester is required"))?;
    let from = parse_date(&arg_value(&args, "--from").ok_or_else(|| {
        anyhow::anyhow!("--from is required (YYYY-MM-DD)")
    })?)?;
    let to = parse_date(
        &arg_value(&args, "--to").ok_or_else(|| anyhow::anyhow!("--to is required (YYYY-MM-DD)"))?,
    )?;
    let range = DateRange::new(from, to)?;

    log::info!("running analytics for {staff_id} ({semester})");

    let report = engine.performance_report(
        &staff_id,
        &ReportOptions {
            semester: semester.clone(),
            range,
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}

fn parse_date(text: &str) -> Result<chrono::DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("bad date '{text}': {e}"))?;
    Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}
