//! Show store information.

use std::path::PathBuf;

use posefix_pose_model::load_table;

pub fn run(store: PathBuf) -> anyhow::Result<()> {
    let table = load_table(&store).map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;

    println!("Store: {}", store.display());
    println!("  Key: {}", table.key());
    println!("  Scorer: {}", table.scorer());
    println!("  Frames: {}", table.frame_count());
    println!();

    println!("Individuals ({}):", table.individuals().len());
    for individual in table.individuals() {
        println!("  {individual}");
    }
    println!();

    println!("Bodyparts ({}):", table.bodyparts().len());
    for bodypart in table.bodyparts() {
        println!("  {bodypart}");
    }
    println!();

    let total = table.points().len();
    println!(
        "Missing points: {} of {} ({:.1}%)",
        table.missing_points(),
        total,
        if total == 0 {
            0.0
        } else {
            table.missing_points() as f64 / total as f64 * 100.0
        }
    );

    Ok(())
}
