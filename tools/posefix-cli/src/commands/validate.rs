//! Validate a coordinate store.

use std::path::PathBuf;

use posefix_pose_model::load_table;

pub fn run(store: PathBuf, frames: Option<usize>) -> anyhow::Result<()> {
    println!("Validating store at: {}", store.display());

    let table = load_table(&store).map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;

    println!("  Scorer: {}", table.scorer());
    println!("  Individuals: {}", table.individuals().join(", "));
    println!("  Bodyparts: {}", table.bodyparts().len());
    println!("  Frames: {}", table.frame_count());

    let issues = table.validate(frames);
    if issues.is_empty() {
        println!("\nStore is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Detection may not be usable on this store.",
            issues.len()
        );
    }

    Ok(())
}
