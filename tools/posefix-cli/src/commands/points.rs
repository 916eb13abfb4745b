//! Print one frame's points in display space.

use std::collections::BTreeMap;
use std::path::PathBuf;

use posefix_pose_model::load_table;

pub fn run(store: PathBuf, frame: usize, scale: f64, pixels: bool) -> anyhow::Result<()> {
    let table = load_table(&store).map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;
    let points = table
        .frame_points(frame, scale)
        .map_err(|e| anyhow::anyhow!("Failed to read frame: {e}"))?;

    let json = if pixels {
        let drawn: BTreeMap<&str, BTreeMap<&str, Option<(i64, i64)>>> = points
            .iter()
            .map(|(individual, parts)| {
                let parts = parts
                    .iter()
                    .map(|(bodypart, point)| (bodypart.as_str(), point.truncated()))
                    .collect();
                (individual.as_str(), parts)
            })
            .collect();
        serde_json::to_string_pretty(&drawn)?
    } else {
        serde_json::to_string_pretty(&points)?
    };
    println!("{json}");
    Ok(())
}
