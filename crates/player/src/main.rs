//! Sprite Player - replays streamed sprite shapes into PNG frames.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use common::color::Color;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use player::{Player, PlayerConfig};

/// Sprite Player - renders record batches to PNG frames
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Batch stream to replay, one JSON array of records per line ("-" for stdin)
    #[arg(default_value = "-")]
    input: String,

    /// Directory of sprite sheets, keyed by file stem
    #[arg(short, long)]
    images: Option<PathBuf>,

    /// Directory to write frames to
    #[arg(short, long, default_value = "frames")]
    output: PathBuf,

    /// Use the small preview preset
    #[arg(long, conflicts_with = "hd")]
    preview: bool,

    /// Use the 1280x720 preset
    #[arg(long)]
    hd: bool,

    /// Viewport width
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height
    #[arg(long)]
    height: Option<u32>,

    /// Background color as hex (#rgb, #rrggbb or #rrggbbaa)
    #[arg(long)]
    background: Option<String>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u32>,

    /// Fail on malformed batches instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<PlayerConfig> {
        let mut config = if self.preview {
            PlayerConfig::preview()
        } else if self.hd {
            PlayerConfig::hd()
        } else {
            PlayerConfig::default()
        };

        config.output_dir = self.output.clone();
        config.images_dir = self.images.clone();
        config.strict = self.strict;
        if let Some(width) = self.width {
            config.viewport_width = width;
        }
        if let Some(height) = self.height {
            config.viewport_height = height;
        }
        if let Some(max_frames) = self.max_frames {
            config.max_frames = Some(max_frames);
        }
        if let Some(hex) = &self.background {
            config.background = Color::from_hex(hex).ok_or_else(|| anyhow!("invalid background color: {}", hex))?;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Sprite Player v{}", player::VERSION);

    let config = args.config()?;
    info!(
        "Viewport {}x{}, writing to {}",
        config.viewport_width,
        config.viewport_height,
        config.output_dir.display()
    );

    let mut player = Player::new(config);
    player.load_images().context("loading images")?;

    let frames = if args.input == "-" {
        player.run(io::stdin().lock())?
    } else {
        let file = File::open(&args.input).with_context(|| format!("opening {}", args.input))?;
        player.run(BufReader::new(file))?
    };

    info!("Rendered {} frames", frames);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default() {
        let args = Args::parse_from(["sprite-player"]);
        assert_eq!(args.input, "-");
        assert_eq!(args.output, PathBuf::from("frames"));
        assert!(!args.strict);

        let config = args.config().unwrap();
        assert_eq!(config.viewport_width, 640);
        assert!(config.images_dir.is_none());
    }

    #[test]
    fn test_args_override_preset() {
        let args = Args::parse_from([
            "sprite-player",
            "batches.ndjson",
            "--images",
            "sheets",
            "--preview",
            "--width",
            "100",
            "--background",
            "#f00",
        ]);
        let config = args.config().unwrap();

        assert_eq!(args.input, "batches.ndjson");
        assert_eq!((config.viewport_width, config.viewport_height), (100, 240));
        assert_eq!(config.background, Color::RED);
        assert_eq!(config.images_dir, Some(PathBuf::from("sheets")));
    }

    #[test]
    fn test_args_hd_preset() {
        let args = Args::parse_from(["sprite-player", "--hd", "--height", "1080"]);
        let config = args.config().unwrap();
        assert_eq!((config.viewport_width, config.viewport_height), (1280, 1080));

        assert!(Args::try_parse_from(["sprite-player", "--hd", "--preview"]).is_err());
    }

    #[test]
    fn test_args_bad_background() {
        let args = Args::parse_from(["sprite-player", "--background", "nope"]);
        assert!(args.config().is_err());
    }
}
