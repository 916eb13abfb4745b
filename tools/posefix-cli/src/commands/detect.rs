//! Flag implausible frames in a coordinate store.

use std::path::PathBuf;

use posefix_common::AppConfig;
use posefix_processing_core::detect_anomalies;
use posefix_processing_core::outlier::SignalKind;

pub fn run(store: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Detecting tracking outliers in: {}", store.display());

    let (list_path, report) = detect_anomalies(&store, &config.detection)
        .map_err(|e| anyhow::anyhow!("Detection failed: {e}"))?;

    for check in &report.checks {
        let signal = match &check.signal {
            SignalKind::Area => "area".to_string(),
            SignalKind::Distance { from, to } => format!("{from}-{to}"),
        };
        println!(
            "  {:<8} {:<24} median {:>10.2}  band ±{:<10.2} {} flagged",
            check.individual,
            signal,
            check.median,
            check.threshold,
            check.flagged.len()
        );
    }

    println!();
    println!(
        "{} flagged entries ({} distinct frames) written to {}",
        report.flagged_count(),
        report.index_list().sorted_unique().len(),
        list_path.display()
    );

    Ok(())
}
