//! Review progress per video.

use std::path::Path;

use posefix_pose_model::SessionLog;

pub fn save(session_file: &Path, video: String, frame: usize) -> anyhow::Result<()> {
    let mut log = SessionLog::load(session_file)
        .map_err(|e| anyhow::anyhow!("Failed to load session: {e}"))?;
    log.record(video.clone(), frame);
    log.save()
        .map_err(|e| anyhow::anyhow!("Failed to save session: {e}"))?;

    println!("Saved {video} at frame {frame}.");
    Ok(())
}

pub fn show(session_file: &Path, video: Option<String>) -> anyhow::Result<()> {
    let log = SessionLog::load(session_file)
        .map_err(|e| anyhow::anyhow!("Failed to load session: {e}"))?;

    match video {
        Some(video) => match log.last_frame(&video) {
            Some(frame) => println!("{video}: frame {frame}"),
            None => println!("{video}: no progress recorded"),
        },
        None => {
            if log.entries().is_empty() {
                println!("No progress recorded in {}", session_file.display());
            }
            for (video, entry) in log.entries() {
                println!("{video}: frame {} (saved {})", entry.frame, entry.updated_at);
            }
        }
    }
    Ok(())
}
