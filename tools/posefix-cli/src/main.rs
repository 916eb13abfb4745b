//! PoseFix CLI: review and correct pose tracking from the command line.
//!
//! Usage:
//!   posefix detect <STORE>                 Flag implausible frames
//!   posefix next <STORE> --frame N         Next flagged frame after N
//!   posefix jump <STORE> --frame N         Move N frames forward or back
//!   posefix swap <STORE> --frame N         Swap two individuals at one frame
//!   posefix swap-seq <STORE> --from A --to B
//!   posefix propagate <STORE> --frame N --direction forward|backward
//!   posefix points <STORE> --frame N       Print display-space points
//!   posefix edit <STORE> --frame N --points FILE
//!   posefix info <STORE>                   Show store information
//!   posefix validate <STORE>               Check store structure
//!   posefix progress save|show             Review progress per video

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use posefix_common::AppConfig;

mod commands;
mod ui;

#[derive(Parser)]
#[command(
    name = "posefix",
    about = "Find and correct mis-tracked frames in multi-animal pose data",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/posefix/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flag frames with implausible body area or bodypart distances
    Detect {
        /// Coordinate store (.json or .csv)
        store: PathBuf,
    },

    /// Show the next flagged frame after the current one
    Next {
        store: PathBuf,

        /// Current frame
        #[arg(short, long)]
        frame: usize,
    },

    /// Move a number of frames forward or backward
    Jump {
        store: PathBuf,

        /// Current frame
        #[arg(short, long)]
        frame: usize,

        /// Number of frames to move
        #[arg(long, default_value = "15")]
        by: usize,

        /// Move backward instead of forward
        #[arg(long)]
        back: bool,
    },

    /// Swap two individuals at one frame
    Swap {
        store: PathBuf,

        #[arg(short, long)]
        frame: usize,

        /// Individuals to swap (defaults to the first two)
        #[arg(long, value_delimiter = ',')]
        pair: Option<Vec<String>>,
    },

    /// Swap two individuals over an inclusive frame range
    SwapSeq {
        store: PathBuf,

        /// First frame
        #[arg(long)]
        from: usize,

        /// Last frame
        #[arg(long)]
        to: usize,

        /// Individuals to swap (defaults to the first two)
        #[arg(long, value_delimiter = ',')]
        pair: Option<Vec<String>>,
    },

    /// Copy one frame's labels onto neighbouring frames
    Propagate {
        store: PathBuf,

        /// Reference frame
        #[arg(short, long)]
        frame: usize,

        /// forward|backward
        #[arg(short, long, default_value = "forward")]
        direction: String,

        /// Number of frames to rewrite
        #[arg(short, long)]
        steps: Option<usize>,

        /// Individual to rewrite, or "both" for all
        #[arg(short, long, default_value = "both")]
        target: String,
    },

    /// Print one frame's points in display space as JSON
    Points {
        store: PathBuf,

        #[arg(short, long)]
        frame: usize,

        /// Display scale factor (defaults to the configured one)
        #[arg(long)]
        scale: Option<f64>,

        /// Print integer pixel positions as drawn on screen
        #[arg(long)]
        pixels: bool,
    },

    /// Overwrite one frame with edited display-space points
    Edit {
        store: PathBuf,

        #[arg(short, long)]
        frame: usize,

        /// JSON file with `individual -> bodypart -> {x, y}`
        #[arg(short, long)]
        points: PathBuf,

        /// Display scale factor the points were edited at
        #[arg(long)]
        scale: Option<f64>,
    },

    /// Show store information
    Info { store: PathBuf },

    /// Check store structure
    Validate {
        store: PathBuf,

        /// Expected number of frames (e.g. the video length)
        #[arg(long)]
        frames: Option<usize>,
    },

    /// Remember or show the last reviewed frame per video
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },
}

#[derive(Subcommand)]
enum ProgressAction {
    /// Record the last reviewed frame of a video
    Save {
        video: String,

        #[arg(short, long)]
        frame: usize,
    },

    /// Show recorded progress
    Show {
        /// Only this video
        video: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    posefix_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Detect { store } => commands::detect::run(store, &config),
        Commands::Next { store, frame } => commands::next::run(store, frame, &config),
        Commands::Jump {
            store,
            frame,
            by,
            back,
        } => commands::next::jump(store, frame, by, back),
        Commands::Swap { store, frame, pair } => commands::swap::run(store, frame, pair),
        Commands::SwapSeq {
            store,
            from,
            to,
            pair,
        } => commands::swap::run_sequence(store, from, to, pair),
        Commands::Propagate {
            store,
            frame,
            direction,
            steps,
            target,
        } => commands::propagate::run(store, frame, direction, steps, target),
        Commands::Points {
            store,
            frame,
            scale,
            pixels,
        } => commands::points::run(
            store,
            frame,
            scale.unwrap_or(config.display.scale_factor),
            pixels,
        ),
        Commands::Edit {
            store,
            frame,
            points,
            scale,
        } => commands::edit::run(
            store,
            frame,
            points,
            scale.unwrap_or(config.display.scale_factor),
        ),
        Commands::Info { store } => commands::info::run(store),
        Commands::Validate { store, frames } => commands::validate::run(store, frames),
        Commands::Progress { action } => match action {
            ProgressAction::Save { video, frame } => {
                commands::progress::save(&config.session_file, video, frame)
            }
            ProgressAction::Show { video } => commands::progress::show(&config.session_file, video),
        },
    }
}
